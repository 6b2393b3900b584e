//! Paragraph-to-steps splitting via the model service.
//!
//! The one consumer of the invoker's validation predicate: the response
//! must be a bracketed JSON array, and reasoning models get their
//! `</think>` preamble stripped before the check. Exhausting the retry
//! budget yields `None`, not an error.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use super::parser::DecomposeError;
use super::prompt::{split_steps_user_prompt, SPLIT_STEPS_SYSTEM_PROMPT};
use crate::llm::{ChatMessage, ChatOptions, ModelGateway, RetryingInvoker};

/// Everything up to and including a closing `</think>` tag.
static THINK_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^.*?</think>").unwrap());

/// Drop a reasoning preamble, leaving the answer body.
fn strip_reasoning(response: &str) -> &str {
    match THINK_PREFIX_RE.find(response) {
        Some(m) => &response[m.end()..],
        None => response,
    }
}

/// Shape check applied before a response is accepted.
fn is_bracketed_array(response: &str) -> bool {
    let body = strip_reasoning(response).trim();
    body.len() >= 2 && body.starts_with('[') && body.ends_with(']')
}

/// Splits a free-form paragraph into an ordered list of step strings.
pub struct StepSplitter<G> {
    invoker: RetryingInvoker<G>,
}

impl<G: ModelGateway> StepSplitter<G> {
    pub fn new(invoker: RetryingInvoker<G>) -> Self {
        Self { invoker }
    }

    /// Split `natural_language` into steps.
    ///
    /// Returns `Ok(None)` when no response passed shape validation within
    /// the retry budget.
    ///
    /// # Errors
    /// Propagates gateway failures, and reports a validated-but-unparseable
    /// array as [`DecomposeError::InvalidJson`].
    pub async fn split(&self, natural_language: &str) -> Result<Option<Vec<String>>, DecomposeError> {
        info!(instruction = natural_language, "splitting instruction into steps");

        let messages = [
            ChatMessage::system(SPLIT_STEPS_SYSTEM_PROMPT),
            ChatMessage::user(split_steps_user_prompt(natural_language)),
        ];

        let validate = is_bracketed_array;
        let Some(response) = self
            .invoker
            .invoke(&messages, &ChatOptions::deterministic(), Some(&validate))
            .await?
        else {
            return Ok(None);
        };

        let body = strip_reasoning(&response).trim().to_string();
        let steps: Vec<String> = serde_json::from_str(&body)
            .map_err(|source| DecomposeError::InvalidJson { source })?;

        info!(step_count = steps.len(), "instruction split into steps");
        Ok(Some(steps))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::LlmError;

    /// Gateway that pops scripted replies in order.
    struct ScriptedGateway {
        replies: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn new(replies: &[&str]) -> Self {
            let mut replies: Vec<String> = replies.iter().map(|s| s.to_string()).collect();
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        async fn converse(
            &self,
            _messages: &[ChatMessage],
            _options: &ChatOptions,
        ) -> Result<String, LlmError> {
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "exhausted".to_string()))
        }

        fn model_name(&self) -> &str {
            "scripted-gateway"
        }
    }

    #[tokio::test]
    async fn test_split_retries_until_shape_validates() {
        let gateway = ScriptedGateway::new(&[
            "Sure! The steps are: open the page, then search.",
            "<think>format it properly this time</think>[\"open the page\",\"search for hello\"]",
        ]);
        let invoker = RetryingInvoker::new(gateway, 3, Duration::from_millis(1));
        let splitter = StepSplitter::new(invoker);

        let steps = splitter
            .split("open the page and search for hello")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(steps, ["open the page", "search for hello"]);
    }

    #[tokio::test]
    async fn test_split_exhaustion_is_absent() {
        let gateway = ScriptedGateway::new(&["prose", "more prose", "still prose", "and more"]);
        let invoker = RetryingInvoker::new(gateway, 2, Duration::from_millis(1));
        let splitter = StepSplitter::new(invoker);

        let result = splitter.split("do something").await.unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_strip_reasoning_removes_think_prefix() {
        let response = "<think>let me reason about this</think>\n[\"open the page\"]";
        assert_eq!(strip_reasoning(response).trim(), "[\"open the page\"]");
    }

    #[test]
    fn test_strip_reasoning_is_identity_without_tag() {
        assert_eq!(strip_reasoning("[\"step\"]"), "[\"step\"]");
    }

    #[test]
    fn test_bracket_validation() {
        assert!(is_bracketed_array("[\"a\",\"b\"]"));
        assert!(is_bracketed_array("  [\"a\"]  "));
        assert!(is_bracketed_array("<think>hmm</think>[\"a\"]"));
        assert!(!is_bracketed_array("the steps are: a, b"));
        assert!(!is_bracketed_array("["));
        assert!(!is_bracketed_array(""));
    }
}
