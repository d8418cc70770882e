use serde::{Deserialize, Serialize};

use super::types::CompletionBackend;
use super::CompletionError;
use crate::config::CompletionConfig;
use crate::models::PromptMessage;

/// Chat-completions HTTP backend.
///
/// Speaks the OpenAI-style wire format: bearer credential, JSON body with
/// model and messages, response text at `choices[0].message.content`. The
/// per-attempt timeout is baked into the underlying client.
pub struct OpenAiBackend {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiBackend {
    pub fn new(config: &CompletionConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Request body for POST /chat/completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
}

/// Response body from /chat/completions
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl CompletionBackend for OpenAiBackend {
    fn request(
        &self,
        model: &str,
        messages: &[PromptMessage],
    ) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest { model, messages };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    CompletionError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    CompletionError::Timeout(self.timeout_secs)
                } else {
                    CompletionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        match parsed.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content),
            None => Err(CompletionError::MalformedResponse(
                "response carried no choices".into(),
            )),
        }
    }
}

/// Scripted backend for testing: plays back a fixed sequence of results,
/// one entry per attempt, and counts how many attempts reached it. A drained
/// script fails further attempts with a connection error.
pub struct MockCompletionBackend {
    script: std::sync::Mutex<std::collections::VecDeque<Result<String, CompletionError>>>,
    requests: std::sync::atomic::AtomicUsize,
}

impl MockCompletionBackend {
    /// Backend whose first attempt answers with `text`.
    pub fn answering(text: &str) -> Self {
        Self::scripted(vec![Ok(text.to_string())])
    }

    pub fn scripted(script: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: std::sync::Mutex::new(script.into()),
            requests: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of attempts that reached this backend.
    pub fn requests(&self) -> usize {
        self.requests.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl CompletionBackend for MockCompletionBackend {
    fn request(
        &self,
        _model: &str,
        _messages: &[PromptMessage],
    ) -> Result<String, CompletionError> {
        self.requests
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut script = self.script.lock().expect("mock script lock");
        script
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Connection("mock script drained".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_wire_format() {
        let messages = vec![
            PromptMessage::system("Patient profile:\npatient_id: P1"),
            PromptMessage::user("What next?"),
        ];
        let body = ChatRequest {
            model: "gpt-4",
            messages: &messages,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "What next?");
    }

    #[test]
    fn chat_response_extracts_primary_choice() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"take rest"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content, "take rest");
    }

    #[test]
    fn backend_constructor_trims_trailing_slash() {
        let config = CompletionConfig::new("key").with_base_url("http://localhost:9999/v1/");
        let backend = OpenAiBackend::new(&config);
        assert_eq!(backend.base_url, "http://localhost:9999/v1");
        assert_eq!(backend.timeout_secs, 30);
    }

    #[test]
    fn mock_plays_script_front_to_back() {
        let mock = MockCompletionBackend::scripted(vec![
            Err(CompletionError::Timeout(30)),
            Ok("second try".into()),
        ]);
        assert!(mock.request("m", &[]).is_err());
        assert_eq!(mock.request("m", &[]).unwrap(), "second try");
        assert!(mock.request("m", &[]).is_err());
        assert_eq!(mock.requests(), 3);
    }
}
