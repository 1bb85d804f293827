//! Export of the active chain and its explanation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::playground::Playground;
use crate::models::ExplanationBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// JSON export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub prompt: String,
    pub structure: Vec<ExplanationBlock>,
    pub explanation: String,
}

impl ExportDocument {
    pub fn from_playground(playground: &Playground) -> Self {
        Self {
            prompt: playground.prompt().to_string(),
            structure: playground.active_blocks().to_vec(),
            explanation: playground
                .output(playground.active_chain_id())
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_markdown(&self) -> String {
        let structure = self
            .structure
            .iter()
            .map(|b| format!("- {} **{}**: {}", b.icon, b.block_type, b.description))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "# GPT Explanation\n\n## Prompt\n{}\n\n## Structure\n{}\n\n## Explanation\n{}",
            self.prompt, structure, self.explanation
        )
    }

    pub fn render(&self, format: ExportFormat) -> Result<String, serde_json::Error> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Markdown => Ok(self.to_markdown()),
        }
    }
}

/// `explanation-<unix millis>.<ext>`
pub fn export_file_name(format: ExportFormat, unix_millis: i64) -> String {
    format!("explanation-{}.{}", unix_millis, format.extension())
}
