#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use blockscope::llm::{ExplainerError, ExplanationGenerator};
use blockscope::models::{AnswerBlock, BlockSummary, QASample};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the variables on unwind and serializes access to the process
/// environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Explanation generator with a canned answer that counts its calls.
pub struct StubGenerator {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn answering(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExplanationGenerator for StubGenerator {
    async fn explain(&self, _prompt: &str, _structure: Option<&str>) -> Result<String, ExplainerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(ExplainerError::Transport)
    }
}

/// Explanation generator that never answers.
pub struct HangingGenerator;

#[async_trait]
impl ExplanationGenerator for HangingGenerator {
    async fn explain(&self, _prompt: &str, _structure: Option<&str>) -> Result<String, ExplainerError> {
        std::future::pending::<Result<String, ExplainerError>>().await
    }
}

/// Two sites with a shared `Claim` type and one site-specific type each.
pub fn two_site_summaries() -> Vec<BlockSummary> {
    vec![
        BlockSummary::new("A", "Claim", 10, 50.0, 1.0),
        BlockSummary::new("A", "Example", 10, 50.0, 2.0),
        BlockSummary::new("B", "Claim", 5, 20.0, 3.0),
        BlockSummary::new("B", "Definition", 20, 80.0, 1.5),
    ]
}

pub fn sample(site: &str, title: &str, blocks: &[(&str, &str)]) -> QASample {
    QASample {
        site: site.to_string(),
        question_title: title.to_string(),
        question_body: String::new(),
        answer_body: String::new(),
        audience_level: None,
        tone: None,
        blocks: blocks
            .iter()
            .map(|(t, text)| AnswerBlock {
                block_type: t.to_string(),
                text: text.to_string(),
            })
            .collect(),
    }
}
