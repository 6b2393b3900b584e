//! Instruction decomposition against the model service.
//!
//! Builds the decomposition prompts, invokes the retrying gateway, and
//! pulls a JSON array of raw task records out of whatever prose the model
//! wrapped it in.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::prompt::{decompose_user_prompt, DECOMPOSE_SYSTEM_PROMPT};
use crate::llm::{ChatMessage, ChatOptions, LlmError, ModelGateway, RetryingInvoker};
use crate::task::TaskContext;

/// Greedy first-`[` to last-`]` span, newlines included.
static JSON_ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Errors from the decomposition stage.
#[derive(Debug, Error)]
pub enum DecomposeError {
    /// The gateway call failed; never retried here.
    #[error("instruction decomposition failed: {0}")]
    Gateway(#[from] LlmError),

    /// The response carried no parseable JSON task array.
    #[error("model response contained no valid JSON task array: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    /// The invoker came back empty-handed.
    #[error("model returned no usable response")]
    EmptyResponse,
}

/// One loosely-structured task record as emitted by the model, before
/// normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTask {
    #[serde(default, rename = "type")]
    pub task_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub action_type: Option<String>,

    #[serde(default)]
    pub parameters: HashMap<String, Value>,

    #[serde(default)]
    pub priority: Option<i64>,

    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Extract the task-record array from a raw model response.
///
/// Searches for the first greedy `[` ... `]` substring and parses it; when
/// no bracketed span exists, the whole response is tried instead.
pub(crate) fn extract_task_records(response: &str) -> Result<Vec<RawTask>, DecomposeError> {
    let candidate = JSON_ARRAY_RE
        .find(response)
        .map(|m| m.as_str())
        .unwrap_or(response);

    serde_json::from_str(candidate).map_err(|source| DecomposeError::InvalidJson { source })
}

/// Decomposes compound natural-language instructions into raw task
/// records via the model service.
pub struct InstructionParser<G> {
    invoker: RetryingInvoker<G>,
}

impl<G: ModelGateway> InstructionParser<G> {
    pub fn new(invoker: RetryingInvoker<G>) -> Self {
        Self { invoker }
    }

    /// Model identifier, recorded in sequence metadata.
    pub fn model_name(&self) -> &str {
        self.invoker.gateway().model_name()
    }

    /// Decompose `instruction` into raw task records.
    ///
    /// Temperature is pinned to 0 and no validator is supplied: the first
    /// response is trusted, and shape problems surface as
    /// [`DecomposeError::InvalidJson`].
    pub async fn decompose(
        &self,
        instruction: &str,
        context: &TaskContext,
    ) -> Result<Vec<RawTask>, DecomposeError> {
        let messages = [
            ChatMessage::system(DECOMPOSE_SYSTEM_PROMPT),
            ChatMessage::user(decompose_user_prompt(instruction, context)),
        ];

        let response = self
            .invoker
            .invoke(&messages, &ChatOptions::deterministic(), None)
            .await?
            .ok_or(DecomposeError::EmptyResponse)?;

        extract_task_records(&response)
    }
}
