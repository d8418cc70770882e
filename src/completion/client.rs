use std::time::Duration;

use super::openai::OpenAiBackend;
use super::types::{CompletionBackend, CompletionOutcome};
use crate::config::CompletionConfig;
use crate::models::PromptMessage;

/// Remote completion invocation with a fixed model and a bounded, strictly
/// sequential retry loop.
///
/// Each failed attempt is logged and followed by a fixed pause; the first
/// success stops the loop. When the budget runs out the outcome carries the
/// last failure's classification, and rendering it for the caller yields the
/// sentinel rather than the raw error.
pub struct CompletionClient {
    backend: Box<dyn CompletionBackend>,
    model: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl CompletionClient {
    /// Client over the HTTP chat-completions backend.
    pub fn new(config: &CompletionConfig) -> Self {
        Self::with_backend(Box::new(OpenAiBackend::new(config)), config)
    }

    /// Client over an arbitrary backend; tests inject deterministic faults
    /// through this.
    pub fn with_backend(backend: Box<dyn CompletionBackend>, config: &CompletionConfig) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the prompt sequence, retrying failed attempts up to the
    /// configured budget.
    ///
    /// Attempts never overlap; the pause between them runs on the calling
    /// thread, which is expected to be a blocking worker, not an executor
    /// thread (see [`crate::insights::InsightService::answer`]).
    pub fn complete(&self, messages: &[PromptMessage]) -> CompletionOutcome {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match self.backend.request(&self.model, messages) {
                Ok(text) => {
                    tracing::debug!(attempt, "completion answered");
                    return CompletionOutcome::Answered(text);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "completion attempt failed"
                    );
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        std::thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        tracing::error!(
            attempts = self.max_attempts,
            "completion retry budget exhausted"
        );
        let e = last_error.expect("at least one attempt ran");
        CompletionOutcome::Exhausted(e)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::completion::{CompletionError, MockCompletionBackend, FAILURE_SENTINEL};

    fn fast_config() -> CompletionConfig {
        let mut config = CompletionConfig::new("test-key");
        config.retry_delay = Duration::from_millis(40);
        config
    }

    fn messages() -> Vec<PromptMessage> {
        vec![
            PromptMessage::system("Patient profile:\npatient_id: P1"),
            PromptMessage::user("question"),
        ]
    }

    fn client_with_script(
        script: Vec<Result<String, CompletionError>>,
        config: &CompletionConfig,
    ) -> (CompletionClient, std::sync::Arc<MockCompletionBackend>) {
        // Keep a second handle to the backend to observe the attempt count.
        struct Shared(std::sync::Arc<MockCompletionBackend>);
        impl crate::completion::CompletionBackend for Shared {
            fn request(
                &self,
                model: &str,
                msgs: &[PromptMessage],
            ) -> Result<String, CompletionError> {
                self.0.request(model, msgs)
            }
        }

        let backend = std::sync::Arc::new(MockCompletionBackend::scripted(script));
        let client = CompletionClient::with_backend(Box::new(Shared(backend.clone())), config);
        (client, backend)
    }

    #[test]
    fn first_success_stops_the_loop() {
        let config = fast_config();
        let (client, backend) = client_with_script(vec![Ok("advice".into())], &config);
        assert_eq!(client.model(), "gpt-4");
        let outcome = client.complete(&messages());
        assert_eq!(outcome.into_text(), "advice");
        assert_eq!(backend.requests(), 1);
    }

    #[test]
    fn recovers_on_second_attempt() {
        let config = fast_config();
        let (client, backend) = client_with_script(
            vec![Err(CompletionError::Timeout(30)), Ok("late advice".into())],
            &config,
        );
        let outcome = client.complete(&messages());
        assert_eq!(outcome.into_text(), "late advice");
        assert_eq!(backend.requests(), 2);
    }

    #[test]
    fn sustained_failure_tries_three_times_then_yields_sentinel() {
        let config = fast_config();
        let (client, backend) = client_with_script(
            vec![
                Err(CompletionError::Connection("down".into())),
                Err(CompletionError::Connection("down".into())),
                Err(CompletionError::Timeout(30)),
            ],
            &config,
        );

        let started = Instant::now();
        let outcome = client.complete(&messages());
        let elapsed = started.elapsed();

        assert_eq!(backend.requests(), 3);
        // Two pauses between three attempts, none after the last.
        assert!(elapsed >= Duration::from_millis(80), "elapsed {elapsed:?}");
        match &outcome {
            CompletionOutcome::Exhausted(CompletionError::Timeout(30)) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(outcome.into_text(), FAILURE_SENTINEL);
    }

    #[test]
    fn zero_attempt_config_still_tries_once() {
        let mut config = fast_config();
        config.max_attempts = 0;
        let (client, backend) = client_with_script(vec![Ok("advice".into())], &config);
        assert!(client.complete(&messages()).is_answered());
        assert_eq!(backend.requests(), 1);
    }
}
