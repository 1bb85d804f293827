//! Playground block types: templates, block instances, chain ids and history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::define_string_id;

define_string_id!(BlockId);

/// A reusable block shape offered in the template tray.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTemplate {
    #[serde(rename = "type")]
    pub block_type: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub color: String,
}

impl BlockTemplate {
    pub fn new(
        block_type: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            block_type: block_type.into(),
            description: description.into(),
            icon: String::new(),
            color: color.into(),
        }
    }

    /// Instantiate this template as a block carrying `id`.
    pub fn instantiate(&self, id: BlockId) -> ExplanationBlock {
        ExplanationBlock {
            id,
            block_type: self.block_type.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
            full_text: None,
        }
    }
}

/// The built-in template tray.
pub fn default_templates() -> Vec<BlockTemplate> {
    vec![
        BlockTemplate::new(
            "Definition",
            "Clarify what something means",
            "hsla(112, 95.60%, 17.60%, 0.80)",
        ),
        BlockTemplate::new(
            "Example",
            "Give a real-world instance",
            "hsla(180, 99.20%, 49.00%, 0.80)",
        ),
        BlockTemplate::new(
            "Analogy",
            "Make a comparison",
            "hsla(325, 100.00%, 42.00%, 0.80)",
        ),
        BlockTemplate::new(
            "Claim",
            "State an assertion",
            "hsla(39, 86.50%, 56.30%, 0.80)",
        ),
        BlockTemplate::new(
            "Elaboration",
            "Add supporting detail or context",
            "hsla(147, 66.20%, 54.70%, 0.80)",
        ),
        BlockTemplate::new(
            "Procedure",
            "Step-by-step instructions or methods",
            "hsla(230, 98.10%, 20.40%, 0.80)",
        ),
        BlockTemplate::new(
            "Story",
            "Narrative or illustrative scenario",
            "hsla(302, 100.00%, 50.00%, 0.80)",
        ),
        BlockTemplate::new(
            "Implication",
            "What follows logically or practically",
            "hsla(219, 100.00%, 39.80%, 0.80)",
        ),
        BlockTemplate::new(
            "Hypothesis",
            "A plausible guess or speculation",
            "hsla(216, 100.00%, 49.80%, 0.80)",
        ),
        BlockTemplate::new(
            "Visual Description",
            "Describe something visually",
            "hsla(350, 100.00%, 75.10%, 0.80)",
        ),
        BlockTemplate::new("Custom", "Define your own block", "hsla(220, 15%, 80%, 0.8)"),
    ]
}

/// One block placed in a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationBlock {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub color: String,
    /// Expanded text attached by a blend.
    #[serde(rename = "fullText", default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
}

/// Identifies a chain: the main chain, or the branch rooted at a block.
///
/// Serialized as the literal `"main"` or the parent block id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChainId {
    #[default]
    Main,
    Branch(BlockId),
}

impl ChainId {
    pub const MAIN_TOKEN: &'static str = "main";

    pub fn is_main(&self) -> bool {
        matches!(self, ChainId::Main)
    }

    pub fn branch_root(&self) -> Option<&BlockId> {
        match self {
            ChainId::Main => None,
            ChainId::Branch(id) => Some(id),
        }
    }
}

impl From<String> for ChainId {
    fn from(value: String) -> Self {
        if value == ChainId::MAIN_TOKEN {
            ChainId::Main
        } else {
            ChainId::Branch(BlockId(value))
        }
    }
}

impl From<&str> for ChainId {
    fn from(value: &str) -> Self {
        ChainId::from(value.to_string())
    }
}

impl From<BlockId> for ChainId {
    fn from(value: BlockId) -> Self {
        ChainId::Branch(value)
    }
}

impl From<ChainId> for String {
    fn from(value: ChainId) -> Self {
        match value {
            ChainId::Main => ChainId::MAIN_TOKEN.to_string(),
            ChainId::Branch(id) => id.0,
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainId::Main => f.write_str(ChainId::MAIN_TOKEN),
            ChainId::Branch(id) => f.write_str(id.as_str()),
        }
    }
}

/// A successful generation, kept in the session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub explanation: String,
    pub timestamp: DateTime<Utc>,
    pub train_id: ChainId,
    pub train_name: String,
    pub prompt: String,
}
