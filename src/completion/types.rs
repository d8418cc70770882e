use super::CompletionError;
use crate::models::PromptMessage;

/// Sentinel returned to the caller when every attempt has failed.
/// Distinguishable from legitimate model output; the raw provider error
/// never leaks past it.
pub const FAILURE_SENTINEL: &str = "Error: Failed to fetch response.";

/// Trait seam over the remote completion transport.
///
/// One call is one attempt: no retries, no delays. The retry policy lives in
/// [`super::CompletionClient`], which lets tests drive the loop with
/// deterministic fault-injecting backends.
pub trait CompletionBackend: Send + Sync {
    /// Send the prompt sequence once and return the primary response text.
    fn request(&self, model: &str, messages: &[PromptMessage])
        -> Result<String, CompletionError>;
}

/// Terminal result of a completion call after the retry budget.
///
/// `Exhausted` keeps the last attempt's failure classification for logs and
/// tests; the caller-facing rendering collapses it to [`FAILURE_SENTINEL`].
#[derive(Debug)]
pub enum CompletionOutcome {
    Answered(String),
    Exhausted(CompletionError),
}

impl CompletionOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, CompletionOutcome::Answered(_))
    }

    /// The string handed to the caller: model text on success, the fixed
    /// sentinel otherwise.
    pub fn into_text(self) -> String {
        match self {
            CompletionOutcome::Answered(text) => text,
            CompletionOutcome::Exhausted(_) => FAILURE_SENTINEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answered_renders_model_text() {
        let outcome = CompletionOutcome::Answered("advice".into());
        assert!(outcome.is_answered());
        assert_eq!(outcome.into_text(), "advice");
    }

    #[test]
    fn exhausted_renders_sentinel_not_the_error() {
        let outcome = CompletionOutcome::Exhausted(CompletionError::Provider {
            status: 500,
            body: "secret provider details".into(),
        });
        assert!(!outcome.is_answered());
        let text = outcome.into_text();
        assert_eq!(text, "Error: Failed to fetch response.");
        assert!(!text.contains("secret"));
    }
}
