//! Bounded-attempt invoker driven by content validation.
//!
//! Wraps a [`ModelGateway`] and re-asks the model when a caller-supplied
//! predicate rejects the response text. Two failure modes are deliberately
//! kept apart and must not be unified:
//!
//! - transport failure: the gateway errored. Propagated immediately, never
//!   retried — callers read this as "API broken".
//! - validation exhaustion: every response was well-delivered but unusable.
//!   Returns `None` after the attempt budget, with a warning — callers read
//!   this as "content was never usable".

use std::time::Duration;

use tracing::{debug, warn};

use super::{ChatMessage, ChatOptions, LlmError, ModelGateway};
use crate::config::Config;

/// Predicate applied to a raw response before it is accepted.
pub type Validator<'a> = &'a (dyn Fn(&str) -> bool + Send + Sync);

/// Gateway wrapper with a fixed retry budget and inter-attempt delay.
pub struct RetryingInvoker<G> {
    gateway: G,
    max_retries: u32,
    delay: Duration,
}

impl<G: ModelGateway> RetryingInvoker<G> {
    /// Create an invoker with an explicit budget.
    ///
    /// `max_retries` counts retries, not calls: a budget of 3 allows up to
    /// 4 gateway calls.
    pub fn new(gateway: G, max_retries: u32, delay: Duration) -> Self {
        Self {
            gateway,
            max_retries,
            delay,
        }
    }

    /// Create an invoker using the configured budget and delay.
    pub fn from_config(gateway: G, config: &Config) -> Self {
        Self::new(gateway, config.retry_times, config.retry_delay)
    }

    /// The wrapped gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Call the gateway, optionally re-asking until `validate` accepts.
    ///
    /// Without a validator the first successful response is returned
    /// verbatim. With one, rejected responses are retried after the
    /// configured delay until the budget runs out, at which point the
    /// result is `None` rather than an error.
    ///
    /// # Errors
    /// Propagates [`LlmError`] from the first failing gateway call.
    pub async fn invoke(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
        validate: Option<Validator<'_>>,
    ) -> Result<Option<String>, LlmError> {
        let Some(validate) = validate else {
            return self.gateway.converse(messages, options).await.map(Some);
        };

        for attempt in 0..=self.max_retries {
            let response = self.gateway.converse(messages, options).await?;
            if validate(&response) {
                return Ok(Some(response));
            }
            debug!(attempt, "model response failed validation");
            if attempt < self.max_retries {
                tokio::time::sleep(self.delay).await;
            }
        }

        warn!(
            attempts = self.max_retries + 1,
            "no model response passed validation within the retry budget"
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct CountingGateway {
        calls: AtomicU32,
        reply: String,
    }

    impl CountingGateway {
        fn replying(reply: &str) -> Self {
            Self {
                calls: AtomicU32::new(0),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl ModelGateway for CountingGateway {
        async fn converse(
            &self,
            _messages: &[ChatMessage],
            _options: &ChatOptions,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "counting-gateway"
        }
    }

    struct FailingGateway {
        calls: AtomicU32,
    }

    #[async_trait]
    impl ModelGateway for FailingGateway {
        async fn converse(
            &self,
            _messages: &[ChatMessage],
            _options: &ChatOptions,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LlmError::network_error("connection refused".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing-gateway"
        }
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::user("hello")]
    }

    #[tokio::test]
    async fn test_no_validator_returns_first_response() {
        let invoker = RetryingInvoker::new(
            CountingGateway::replying("raw text"),
            3,
            Duration::from_millis(1),
        );
        let result = invoker
            .invoke(&messages(), &ChatOptions::default(), None)
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("raw text"));
        assert_eq!(invoker.gateway().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_accepting_validator_returns_response() {
        let invoker = RetryingInvoker::new(
            CountingGateway::replying("[1]"),
            3,
            Duration::from_millis(1),
        );
        let validate = |text: &str| text.starts_with('[');
        let result = invoker
            .invoke(&messages(), &ChatOptions::default(), Some(&validate))
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("[1]"));
        assert_eq!(invoker.gateway().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_is_absent_not_error() {
        // Budget of 2 retries means exactly 3 gateway calls.
        let invoker = RetryingInvoker::new(
            CountingGateway::replying("nonsense"),
            2,
            Duration::from_millis(1),
        );
        let validate = |_: &str| false;
        let result = invoker
            .invoke(&messages(), &ChatOptions::default(), Some(&validate))
            .await
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(invoker.gateway().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transport_error_propagates_without_retry() {
        let invoker = RetryingInvoker::new(
            FailingGateway {
                calls: AtomicU32::new(0),
            },
            3,
            Duration::from_millis(1),
        );
        let validate = |_: &str| true;
        let result = invoker
            .invoke(&messages(), &ChatOptions::default(), Some(&validate))
            .await;
        assert!(result.is_err());
        assert_eq!(invoker.gateway().calls.load(Ordering::SeqCst), 1);
    }
}
