//! Block playground: a forest of explanation chains.
//!
//! The forest is a main chain plus a flat map from parent block id to the
//! ordered branch rooted at that block. A branch can hang off any block,
//! including blocks that live in another branch, so the map describes an
//! arbitrarily deep tree. Branch and blend always mint fresh blocks and
//! reorder never crosses chains, so the map cannot contain a cycle.
//!
//! Generation and blending call out to an [`ExplanationGenerator`]. Both are
//! split into a synchronous `begin_*` step that validates input and builds the
//! prompt, and a `finish_*` step that applies the outcome, so the caller can
//! release any lock on the playground while the request is in flight. Only one
//! such request may be pending per playground.

use chrono::Utc;
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::ids::{IdGenerator, UuidIds};
use super::prompts::{blend_prompt, generate_prompt, structure_hints};
use crate::llm::{ExplainerError, ExplanationGenerator};
use crate::models::{
    default_templates, rotate_hue, BlockId, BlockTemplate, ChainId, ExplanationBlock, HistoryEntry,
    NEUTRAL_COLOR,
};

pub const NO_EXPLANATION: &str = "⚠️ No explanation returned.";
pub const GENERATION_FAILED: &str = "⚠️ Something went wrong.";
pub const NO_BLEND_RESULT: &str = "⚠️ No result.";
pub const BLEND_ICON: &str = "🧬";
pub const BLEND_DESCRIPTION: &str = "🧬 Blended block — click to expand";
pub const HIGHLIGHT_ICON: &str = "✂️";
pub const MAIN_CHAIN_NAME: &str = "Main Chain";

/// Hue step applied to a branch's color relative to its parent.
pub const BRANCH_HUE_SHIFT: f64 = 15.0;

/// Highlighted text must be longer than this (after trimming) to become a block.
pub const MIN_HIGHLIGHT_CHARS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum PlaygroundError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Chain not found: {0}")]
    ChainNotFound(ChainId),

    #[error("Unknown block template: {0}")]
    UnknownTemplate(String),

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Chain {0} has no blocks")]
    EmptyChain(ChainId),

    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("Blending needs at least two blocks, got {0}")]
    NotEnoughBlocks(usize),

    #[error("Another generation is already in progress")]
    Busy,

    #[error("No pending request matches ticket {0}")]
    StaleTicket(u64),

    #[error("Explainer failed: {0}")]
    Explainer(#[from] ExplainerError),
}

/// Prepared generate request, returned by [`Playground::begin_generate`].
#[derive(Debug, Clone)]
pub struct GenerateTicket {
    pub ticket: u64,
    pub chain: ChainId,
    pub user_prompt: String,
    /// Full prompt text for the explainer.
    pub prompt: String,
    /// `- <description>` outline of the chain.
    pub structure: String,
}

/// Prepared blend request, returned by [`Playground::begin_blend`].
#[derive(Debug, Clone)]
pub struct BlendTicket {
    pub ticket: u64,
    pub blocks: Vec<ExplanationBlock>,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOutcome {
    pub chain: ChainId,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_entry: Option<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Serializable view of the whole playground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundSnapshot {
    pub main_chain: Vec<ExplanationBlock>,
    pub parallel_trains: BTreeMap<String, Vec<ExplanationBlock>>,
    pub active_train: ChainId,
    pub train_outputs: BTreeMap<String, String>,
    pub custom_templates: Vec<BlockTemplate>,
    pub history_len: usize,
    pub prompt: String,
    pub pending: bool,
}

/// A block and the branch rooted at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub block: ExplanationBlock,
    /// The branch rooted at this block is the active chain.
    pub active: bool,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestTree {
    pub active_train: ChainId,
    pub main_active: bool,
    pub block_count: usize,
    pub branch_count: usize,
    pub main: Vec<TreeNode>,
}

/// Two history entries side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryComparison {
    pub left: HistoryEntry,
    pub right: HistoryEntry,
}

pub struct Playground {
    main: Vec<ExplanationBlock>,
    branches: HashMap<BlockId, Vec<ExplanationBlock>>,
    active: ChainId,
    outputs: HashMap<ChainId, String>,
    history: Vec<HistoryEntry>,
    custom_templates: Vec<BlockTemplate>,
    prompt: String,
    pending: Option<u64>,
    next_ticket: u64,
    ids: Arc<dyn IdGenerator>,
}

impl fmt::Debug for Playground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playground")
            .field("main", &self.main.len())
            .field("branches", &self.branches.len())
            .field("active", &self.active)
            .field("history", &self.history.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl Default for Playground {
    fn default() -> Self {
        Self::new()
    }
}

impl Playground {
    pub fn new() -> Self {
        Self::with_ids(Arc::new(UuidIds))
    }

    pub fn with_ids(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            main: Vec::new(),
            branches: HashMap::new(),
            active: ChainId::Main,
            outputs: HashMap::new(),
            history: Vec::new(),
            custom_templates: Vec::new(),
            prompt: String::new(),
            pending: None,
            next_ticket: 0,
            ids,
        }
    }

    // ==================== Lookups ====================

    pub fn main_chain(&self) -> &[ExplanationBlock] {
        &self.main
    }

    pub fn branch(&self, parent: &BlockId) -> Option<&[ExplanationBlock]> {
        self.branches.get(parent).map(Vec::as_slice)
    }

    pub fn branch_roots(&self) -> impl Iterator<Item = &BlockId> {
        self.branches.keys()
    }

    pub fn active_chain_id(&self) -> &ChainId {
        &self.active
    }

    /// Blocks of a chain. A branch that has no blocks yet reads as empty.
    pub fn chain(&self, chain: &ChainId) -> &[ExplanationBlock] {
        match chain {
            ChainId::Main => &self.main,
            ChainId::Branch(parent) => self.branches.get(parent).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn active_blocks(&self) -> &[ExplanationBlock] {
        self.chain(&self.active)
    }

    pub fn output(&self, chain: &ChainId) -> Option<&str> {
        self.outputs.get(chain).map(String::as_str)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn history_entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.history.iter().find(|h| h.id == id)
    }

    pub fn compare(&self, left: &str, right: &str) -> Option<HistoryComparison> {
        Some(HistoryComparison {
            left: self.history_entry(left)?.clone(),
            right: self.history_entry(right)?.clone(),
        })
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Find a block anywhere in the forest.
    pub fn find_block(&self, id: &BlockId) -> Option<&ExplanationBlock> {
        self.main
            .iter()
            .chain(self.branches.values().flatten())
            .find(|b| &b.id == id)
    }

    fn find_block_mut(&mut self, id: &BlockId) -> Option<&mut ExplanationBlock> {
        self.main
            .iter_mut()
            .chain(self.branches.values_mut().flatten())
            .find(|b| &b.id == id)
    }

    /// The chain holding block `id`.
    pub fn locate(&self, id: &BlockId) -> Option<ChainId> {
        if self.main.iter().any(|b| &b.id == id) {
            return Some(ChainId::Main);
        }
        self.branches
            .iter()
            .find(|(_, blocks)| blocks.iter().any(|b| &b.id == id))
            .map(|(parent, _)| ChainId::Branch(parent.clone()))
    }

    /// Whether `chain` can be targeted: main, or rooted at an existing block.
    pub fn chain_exists(&self, chain: &ChainId) -> bool {
        match chain {
            ChainId::Main => true,
            ChainId::Branch(parent) => self.find_block(parent).is_some(),
        }
    }

    fn chain_mut(&mut self, chain: &ChainId) -> Result<&mut Vec<ExplanationBlock>, PlaygroundError> {
        if !self.chain_exists(chain) {
            return Err(PlaygroundError::ChainNotFound(chain.clone()));
        }
        Ok(match chain {
            ChainId::Main => &mut self.main,
            ChainId::Branch(parent) => self.branches.entry(parent.clone()).or_default(),
        })
    }

    /// Built-in templates followed by this session's custom ones.
    pub fn templates(&self) -> Vec<BlockTemplate> {
        let mut all = default_templates();
        all.extend(self.custom_templates.iter().cloned());
        all
    }

    /// Latest template registered under `block_type` (custom ones shadow built-ins).
    pub fn template(&self, block_type: &str) -> Option<BlockTemplate> {
        self.templates()
            .into_iter()
            .rev()
            .find(|t| t.block_type == block_type)
    }

    fn train_name(&self, chain: &ChainId) -> String {
        match chain {
            ChainId::Main => MAIN_CHAIN_NAME.to_string(),
            ChainId::Branch(parent) => format!(
                "Branch: {}",
                self.find_block(parent)
                    .map(|b| b.block_type.as_str())
                    .unwrap_or("Unknown")
            ),
        }
    }

    // ==================== Editing ====================

    /// Append a fresh instance of `template` to `chain`.
    pub fn add_block(
        &mut self,
        chain: &ChainId,
        template: &BlockTemplate,
    ) -> Result<BlockId, PlaygroundError> {
        let prefix = template.block_type.split_whitespace().collect::<Vec<_>>().join("-");
        let id = BlockId::new(self.ids.next_id(&prefix));
        let block = template.instantiate(id.clone());
        self.chain_mut(chain)?.push(block);
        debug!("added {} block {} to {}", template.block_type, id, chain);
        Ok(id)
    }

    /// Append an instance of the template named `block_type` to `chain`.
    pub fn add_template_block(
        &mut self,
        chain: &ChainId,
        block_type: &str,
    ) -> Result<BlockId, PlaygroundError> {
        let template = self
            .template(block_type)
            .ok_or_else(|| PlaygroundError::UnknownTemplate(block_type.to_string()))?;
        self.add_block(chain, &template)
    }

    /// Register a custom template and drop one instance into the active chain.
    pub fn add_custom_template(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<BlockId, PlaygroundError> {
        if name.trim().is_empty() {
            return Err(PlaygroundError::BlankField("name"));
        }
        if description.trim().is_empty() {
            return Err(PlaygroundError::BlankField("description"));
        }

        let hue: u16 = rand::thread_rng().gen_range(0..360);
        let template = BlockTemplate::new(name, description, format!("hsla({}, 85%, 45%, 0.80)", hue));
        let id = BlockId::new(self.ids.next_id("custom"));
        let block = template.instantiate(id.clone());

        let active = self.active.clone();
        self.chain_mut(&active)?.push(block);
        self.custom_templates.push(template);
        Ok(id)
    }

    /// Move block `from` to the position of block `to`. Both must be in `chain`.
    ///
    /// Returns `false` (and changes nothing) otherwise.
    pub fn reorder(&mut self, chain: &ChainId, from: &BlockId, to: &BlockId) -> bool {
        let blocks = match chain {
            ChainId::Main => &mut self.main,
            ChainId::Branch(parent) => match self.branches.get_mut(parent) {
                Some(blocks) => blocks,
                None => return false,
            },
        };
        let (Some(old), Some(new)) = (
            blocks.iter().position(|b| &b.id == from),
            blocks.iter().position(|b| &b.id == to),
        ) else {
            return false;
        };
        if old != new {
            let block = blocks.remove(old);
            blocks.insert(new, block);
        }
        true
    }

    /// Grow a branch from block `id` and make it the active chain.
    pub fn branch_from(&mut self, id: &BlockId) -> Result<BlockId, PlaygroundError> {
        let parent = self
            .find_block(id)
            .ok_or_else(|| PlaygroundError::BlockNotFound(id.clone()))?;

        let parent_color = if parent.color.is_empty() {
            NEUTRAL_COLOR
        } else {
            parent.color.as_str()
        };
        let block = ExplanationBlock {
            id: BlockId::new(self.ids.next_id("spawn")),
            block_type: format!("Branch of {}", parent.block_type),
            description: format!("Expanding on: {}", parent.description),
            icon: String::new(),
            color: rotate_hue(parent_color, BRANCH_HUE_SHIFT),
            full_text: None,
        };
        let new_id = block.id.clone();

        self.branches.entry(id.clone()).or_default().push(block);
        self.active = ChainId::Branch(id.clone());
        info!("branched {} from {}", new_id, id);
        Ok(new_id)
    }

    /// Replace the description of block `id`. A blank description is ignored (`Ok(false)`).
    pub fn edit_description(&mut self, id: &BlockId, text: &str) -> Result<bool, PlaygroundError> {
        let block = self
            .find_block_mut(id)
            .ok_or_else(|| PlaygroundError::BlockNotFound(id.clone()))?;
        if text.trim().is_empty() {
            return Ok(false);
        }
        block.description = text.to_string();
        Ok(true)
    }

    /// Point the active chain at main or at the branch rooted at an existing block.
    pub fn activate(&mut self, chain: ChainId) -> Result<(), PlaygroundError> {
        if !self.chain_exists(&chain) {
            return Err(PlaygroundError::ChainNotFound(chain));
        }
        self.active = chain;
        Ok(())
    }

    /// Turn a text selection into a `Custom` block on the active chain.
    ///
    /// Returns `None` when the trimmed text is too short.
    pub fn highlight(&mut self, text: &str) -> Option<BlockId> {
        let text = text.trim();
        if text.chars().count() <= MIN_HIGHLIGHT_CHARS {
            return None;
        }
        let block = ExplanationBlock {
            id: BlockId::new(self.ids.next_id("highlight")),
            block_type: "Custom".to_string(),
            description: text.to_string(),
            icon: HIGHLIGHT_ICON.to_string(),
            color: NEUTRAL_COLOR.to_string(),
            full_text: None,
        };
        let id = block.id.clone();
        let active = self.active.clone();
        match self.chain_mut(&active) {
            Ok(chain) => chain.push(block),
            Err(_) => {
                self.active = ChainId::Main;
                self.main.push(block);
            }
        }
        Some(id)
    }

    // ==================== Removal ====================

    /// Drop the branch rooted at `root` and, recursively, every branch rooted
    /// inside it. Returns the ids of all blocks that went away with it.
    fn drop_subtree(&mut self, root: &BlockId) -> HashSet<BlockId> {
        let mut removed = HashSet::new();
        let mut stack = vec![root.clone()];
        while let Some(parent) = stack.pop() {
            if let Some(blocks) = self.branches.remove(&parent) {
                for block in blocks {
                    stack.push(block.id.clone());
                    removed.insert(block.id);
                }
            }
            self.outputs.remove(&ChainId::Branch(parent));
        }
        removed
    }

    /// Reset the active pointer to `fallback` if it pointed at `removed_root`
    /// or any block removed with it.
    fn repair_active(&mut self, removed_root: &BlockId, removed: &HashSet<BlockId>, fallback: ChainId) {
        let orphaned = match &self.active {
            ChainId::Branch(active) => active == removed_root || removed.contains(active),
            ChainId::Main => false,
        };
        if orphaned {
            debug!("active chain {} removed, falling back to {}", self.active, fallback);
            self.active = fallback;
        }
    }

    /// Remove block `id` from the main chain along with every branch under it.
    pub fn remove_from_main(&mut self, id: &BlockId) -> bool {
        let Some(pos) = self.main.iter().position(|b| &b.id == id) else {
            return false;
        };
        self.main.remove(pos);
        let removed = self.drop_subtree(id);
        self.repair_active(id, &removed, ChainId::Main);
        true
    }

    /// Remove block `id` from the branch rooted at `parent` along with every branch under it.
    pub fn remove_from_branch(&mut self, parent: &BlockId, id: &BlockId) -> bool {
        let Some(blocks) = self.branches.get_mut(parent) else {
            return false;
        };
        let Some(pos) = blocks.iter().position(|b| &b.id == id) else {
            return false;
        };
        blocks.remove(pos);
        let removed = self.drop_subtree(id);
        self.repair_active(id, &removed, ChainId::Branch(parent.clone()));
        true
    }

    /// Remove block `id` from whichever chain holds it.
    fn detach(&mut self, id: &BlockId) -> bool {
        match self.locate(id) {
            Some(ChainId::Main) => self.remove_from_main(id),
            Some(ChainId::Branch(parent)) => self.remove_from_branch(&parent, id),
            None => false,
        }
    }

    // ==================== Explainer round trips ====================

    fn claim_ticket(&mut self) -> Result<u64, PlaygroundError> {
        if self.pending.is_some() {
            return Err(PlaygroundError::Busy);
        }
        self.next_ticket += 1;
        self.pending = Some(self.next_ticket);
        Ok(self.next_ticket)
    }

    fn release_ticket(&mut self, ticket: u64) -> Result<(), PlaygroundError> {
        if self.pending != Some(ticket) {
            return Err(PlaygroundError::StaleTicket(ticket));
        }
        self.pending = None;
        Ok(())
    }

    /// Give up on a pending request without applying anything.
    pub fn cancel(&mut self, ticket: u64) -> Result<(), PlaygroundError> {
        self.release_ticket(ticket)
    }

    /// Validate and build a generate request for `chain`.
    pub fn begin_generate(
        &mut self,
        chain: ChainId,
        user_prompt: &str,
    ) -> Result<GenerateTicket, PlaygroundError> {
        if user_prompt.trim().is_empty() {
            return Err(PlaygroundError::EmptyPrompt);
        }
        if !self.chain_exists(&chain) {
            return Err(PlaygroundError::ChainNotFound(chain));
        }
        let blocks = self.chain(&chain);
        if blocks.is_empty() {
            return Err(PlaygroundError::EmptyChain(chain));
        }
        let prompt = generate_prompt(user_prompt, blocks);
        let structure = structure_hints(blocks);

        let ticket = self.claim_ticket()?;
        Ok(GenerateTicket {
            ticket,
            chain,
            user_prompt: user_prompt.to_string(),
            prompt,
            structure,
        })
    }

    /// Apply the explainer's answer to a generate request.
    ///
    /// A failed call still yields an outcome: the chain's output becomes a
    /// placeholder and nothing is added to the history. If the chain was
    /// removed while the call was out, the answer is dropped.
    pub fn finish_generate(
        &mut self,
        ticket: GenerateTicket,
        result: Result<String, ExplainerError>,
    ) -> Result<GenerateOutcome, PlaygroundError> {
        self.release_ticket(ticket.ticket)?;
        if !self.chain_exists(&ticket.chain) {
            warn!("chain {} was removed during generation", ticket.chain);
            return Err(PlaygroundError::ChainNotFound(ticket.chain));
        }
        self.prompt = ticket.user_prompt.clone();

        match result {
            Ok(text) => {
                let output = if text.trim().is_empty() {
                    NO_EXPLANATION.to_string()
                } else {
                    text
                };
                let entry = HistoryEntry {
                    id: self.ids.next_id("explanation"),
                    explanation: output.clone(),
                    timestamp: Utc::now(),
                    train_id: ticket.chain.clone(),
                    train_name: self.train_name(&ticket.chain),
                    prompt: ticket.user_prompt,
                };
                self.outputs.insert(ticket.chain.clone(), output.clone());
                self.history.push(entry.clone());
                Ok(GenerateOutcome {
                    chain: ticket.chain,
                    output,
                    history_entry: Some(entry),
                    error: None,
                })
            }
            Err(e) => {
                warn!("generation for {} failed: {}", ticket.chain, e);
                self.outputs
                    .insert(ticket.chain.clone(), GENERATION_FAILED.to_string());
                Ok(GenerateOutcome {
                    chain: ticket.chain,
                    output: GENERATION_FAILED.to_string(),
                    history_entry: None,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Validate and build a blend request for the given blocks.
    pub fn begin_blend(&mut self, ids: &[BlockId]) -> Result<BlendTicket, PlaygroundError> {
        let mut unique: Vec<&BlockId> = Vec::new();
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.len() < 2 {
            return Err(PlaygroundError::NotEnoughBlocks(unique.len()));
        }
        let blocks = unique
            .into_iter()
            .map(|id| {
                self.find_block(id)
                    .cloned()
                    .ok_or_else(|| PlaygroundError::BlockNotFound(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let prompt = blend_prompt(&blocks);

        let ticket = self.claim_ticket()?;
        Ok(BlendTicket {
            ticket,
            blocks,
            prompt,
        })
    }

    /// Apply the explainer's answer to a blend request.
    ///
    /// On success the selected blocks are removed from their chains and one
    /// blended block is appended to the active chain. On failure nothing changes.
    pub fn finish_blend(
        &mut self,
        ticket: BlendTicket,
        result: Result<String, ExplainerError>,
    ) -> Result<ExplanationBlock, PlaygroundError> {
        self.release_ticket(ticket.ticket)?;
        let text = result.map_err(|e| {
            warn!("blend of {} blocks failed: {}", ticket.blocks.len(), e);
            PlaygroundError::Explainer(e)
        })?;

        let color = ticket
            .blocks
            .first()
            .map(|b| b.color.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| NEUTRAL_COLOR.to_string());
        let blended = ExplanationBlock {
            id: BlockId::new(self.ids.next_id("blend")),
            block_type: ticket
                .blocks
                .iter()
                .map(|b| b.block_type.as_str())
                .collect::<Vec<_>>()
                .join("-"),
            description: BLEND_DESCRIPTION.to_string(),
            icon: BLEND_ICON.to_string(),
            color,
            full_text: Some(if text.trim().is_empty() {
                NO_BLEND_RESULT.to_string()
            } else {
                text
            }),
        };

        for block in &ticket.blocks {
            self.detach(&block.id);
        }
        let active = self.active.clone();
        match self.chain_mut(&active) {
            Ok(chain) => chain.push(blended.clone()),
            Err(_) => {
                self.active = ChainId::Main;
                self.main.push(blended.clone());
            }
        }
        info!("blended {} blocks into {}", ticket.blocks.len(), blended.id);
        Ok(blended)
    }

    /// Generate an explanation for `chain` in one call.
    pub async fn generate(
        &mut self,
        generator: &dyn ExplanationGenerator,
        chain: ChainId,
        user_prompt: &str,
    ) -> Result<GenerateOutcome, PlaygroundError> {
        let ticket = self.begin_generate(chain, user_prompt)?;
        let result = generator
            .explain(&ticket.prompt, Some(&ticket.structure))
            .await;
        self.finish_generate(ticket, result)
    }

    /// Blend the given blocks in one call.
    pub async fn blend(
        &mut self,
        generator: &dyn ExplanationGenerator,
        ids: &[BlockId],
    ) -> Result<ExplanationBlock, PlaygroundError> {
        let ticket = self.begin_blend(ids)?;
        let result = generator.explain(&ticket.prompt, None).await;
        self.finish_blend(ticket, result)
    }

    // ==================== Views ====================

    fn tree_node(&self, block: &ExplanationBlock) -> TreeNode {
        let root = ChainId::Branch(block.id.clone());
        TreeNode {
            active: self.active == root,
            children: self
                .branches
                .get(&block.id)
                .map(|blocks| blocks.iter().map(|b| self.tree_node(b)).collect())
                .unwrap_or_default(),
            block: block.clone(),
        }
    }

    /// Nested view of the forest, main chain first.
    pub fn tree(&self) -> ForestTree {
        ForestTree {
            active_train: self.active.clone(),
            main_active: self.active.is_main(),
            block_count: self.main.len() + self.branches.values().map(Vec::len).sum::<usize>(),
            branch_count: self.branches.values().filter(|b| !b.is_empty()).count(),
            main: self.main.iter().map(|b| self.tree_node(b)).collect(),
        }
    }

    pub fn snapshot(&self) -> PlaygroundSnapshot {
        PlaygroundSnapshot {
            main_chain: self.main.clone(),
            parallel_trains: self
                .branches
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            active_train: self.active.clone(),
            train_outputs: self
                .outputs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            custom_templates: self.custom_templates.clone(),
            history_len: self.history.len(),
            prompt: self.prompt.clone(),
            pending: self.pending.is_some(),
        }
    }
}

#[cfg(test)]
#[path = "playground_tests.rs"]
mod playground_tests;
