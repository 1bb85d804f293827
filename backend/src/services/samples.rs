//! Sample viewer: random QA samples, search and block highlighting.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{block_color, QASample, Scope};

/// Samples inside `scope` that match `search` (all of them when `search` is blank).
pub fn filter_samples<'a>(
    samples: &'a [QASample],
    scope: &Scope,
    search: Option<&str>,
) -> Vec<&'a QASample> {
    samples
        .iter()
        .filter(|s| scope.matches(&s.site))
        .filter(|s| search.map_or(true, |term| s.matches_term(term)))
        .collect()
}

/// Pick one matching sample uniformly at random. `None` if nothing matches.
pub fn random_sample<'a, R: Rng + ?Sized>(
    samples: &'a [QASample],
    scope: &Scope,
    search: Option<&str>,
    rng: &mut R,
) -> Option<&'a QASample> {
    let matches = filter_samples(samples, scope, search);
    matches.choose(rng).copied()
}

/// One rendered block of a sample answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBlockView {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: String,
    pub words: usize,
    pub color: String,
    pub active: bool,
}

/// A sample together with the block types currently highlighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleView {
    pub sample: QASample,
    pub active_types: BTreeSet<String>,
}

impl SampleView {
    /// Fresh view with every block type of the sample highlighted.
    pub fn new(sample: QASample) -> Self {
        let active_types = sample.blocks.iter().map(|b| b.block_type.clone()).collect();
        Self {
            sample,
            active_types,
        }
    }

    /// Flip the highlight of one block type.
    pub fn toggle(&mut self, block_type: &str) {
        if !self.active_types.remove(block_type) {
            self.active_types.insert(block_type.to_string());
        }
    }

    pub fn blocks(&self) -> Vec<SampleBlockView> {
        self.sample
            .blocks
            .iter()
            .map(|b| SampleBlockView {
                block_type: b.block_type.clone(),
                text: b.text.clone(),
                words: b.word_count(),
                color: block_color(&b.block_type).to_string(),
                active: self.active_types.contains(&b.block_type),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerBlock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(site: &str, title: &str, types: &[&str]) -> QASample {
        QASample {
            site: site.to_string(),
            question_title: title.to_string(),
            question_body: String::new(),
            answer_body: String::new(),
            audience_level: None,
            tone: None,
            blocks: types
                .iter()
                .map(|t| AnswerBlock {
                    block_type: t.to_string(),
                    text: "one two three".to_string(),
                })
                .collect(),
        }
    }

    fn pool() -> Vec<QASample> {
        vec![
            sample("cooking", "Bread", &["Claim", "Example"]),
            sample("physics", "Gravity", &["Definition"]),
            sample("physics", "Light", &["Analogy", "Claim"]),
        ]
    }

    #[test]
    fn test_random_sample_respects_scope() {
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked =
                random_sample(&pool, &Scope::Site("physics".to_string()), None, &mut rng).unwrap();
            assert_eq!(picked.site, "physics");
        }
    }

    #[test]
    fn test_random_sample_empty_scope_is_none() {
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(random_sample(&pool, &Scope::Site("law".to_string()), None, &mut rng).is_none());
    }

    #[test]
    fn test_filter_with_search() {
        let pool = pool();
        let hits = filter_samples(&pool, &Scope::All, Some("analogy"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].question_title, "Light");
    }

    #[test]
    fn test_view_toggle_and_word_counts() {
        let mut view = SampleView::new(pool().remove(0));
        assert_eq!(view.active_types.len(), 2);
        view.toggle("Claim");
        let blocks = view.blocks();
        assert!(!blocks[0].active);
        assert!(blocks[1].active);
        assert_eq!(blocks[0].words, 3);
        view.toggle("Claim");
        assert!(view.blocks()[0].active);
    }
}
