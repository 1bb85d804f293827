use serde::{Deserialize, Serialize};

/// A typed span of an answer, as labelled by the data-preparation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: String,
}

impl AnswerBlock {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Question/answer pair with its block labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QASample {
    pub site: String,
    pub question_title: String,
    #[serde(default)]
    pub question_body: String,
    #[serde(default)]
    pub answer_body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default)]
    pub blocks: Vec<AnswerBlock>,
}

impl QASample {
    /// Block types in the order they first appear in the answer.
    pub fn block_types(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for block in &self.blocks {
            if !seen.contains(&block.block_type) {
                seen.push(block.block_type.clone());
            }
        }
        seen
    }

    /// Case-insensitive match against titles, bodies, block types and block texts.
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.question_title.to_lowercase().contains(&term)
            || self.question_body.to_lowercase().contains(&term)
            || self.answer_body.to_lowercase().contains(&term)
            || self.blocks.iter().any(|b| {
                b.block_type.to_lowercase().contains(&term) || b.text.to_lowercase().contains(&term)
            })
    }
}
