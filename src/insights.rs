//! Query orchestration: selection → record → prompt → completion → reply.

use std::sync::Arc;

use serde::Serialize;

use crate::completion::CompletionClient;
use crate::directory::PatientDirectory;
use crate::prompt;

pub const INVALID_SELECTION: &str = "Error: Invalid selection";
pub const PATIENT_NOT_FOUND: &str = "Error: Patient not found";
pub const NO_SUGGESTIONS: &str = "No suggestions available";

/// What a query hands back: always two fully populated strings, either real
/// data or the fixed error pair. Never partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightReply {
    pub profile: String,
    pub suggestion: String,
}

impl InsightReply {
    fn error(profile: &str) -> Self {
        Self {
            profile: profile.to_string(),
            suggestion: NO_SUGGESTIONS.to_string(),
        }
    }
}

/// The query pipeline over a loaded directory and a completion client.
///
/// Cheap to clone; the directory is immutable post-load and shared, so
/// concurrent queries touch no shared mutable state.
#[derive(Clone)]
pub struct InsightService {
    directory: Arc<PatientDirectory>,
    client: Arc<CompletionClient>,
}

impl InsightService {
    pub fn new(directory: PatientDirectory, client: CompletionClient) -> Self {
        Self {
            directory: Arc::new(directory),
            client: Arc::new(client),
        }
    }

    pub fn directory(&self) -> &PatientDirectory {
        &self.directory
    }

    /// Answer a query without blocking the caller's executor thread.
    ///
    /// The whole pipeline, including the completion retry loop and its
    /// pauses, runs on a blocking worker. There is no cancellation: once
    /// issued, the query runs to success or to the end of its retry budget.
    pub async fn answer(
        &self,
        selection: &str,
        free_text_question: &str,
        predefined_question: &str,
    ) -> InsightReply {
        let service = self.clone();
        let selection = selection.to_owned();
        let free_text = free_text_question.to_owned();
        let predefined = predefined_question.to_owned();

        tokio::task::spawn_blocking(move || {
            service.answer_blocking(&selection, &free_text, &predefined)
        })
        .await
        .expect("insight query task panicked")
    }

    /// Sequential pipeline behind [`answer`](Self::answer).
    ///
    /// Validation order: malformed selection first (directory and completion
    /// are never consulted), then the directory lookup, and only then the
    /// remote call.
    pub fn answer_blocking(
        &self,
        selection: &str,
        free_text_question: &str,
        predefined_question: &str,
    ) -> InsightReply {
        // Split on the first ", " only: the name half may itself contain
        // commas.
        let Some((patient_id, _)) = selection.split_once(", ") else {
            tracing::debug!(selection, "malformed patient selection");
            return InsightReply::error(INVALID_SELECTION);
        };

        let Some(record) = self.directory.lookup(patient_id) else {
            tracing::debug!(patient_id, "patient not found");
            return InsightReply::error(PATIENT_NOT_FOUND);
        };

        let profile = record.profile_summary();
        let question = if free_text_question.is_empty() {
            predefined_question
        } else {
            free_text_question
        };

        let messages = prompt::compose(record, question);
        let outcome = self.client.complete(&messages);
        if !outcome.is_answered() {
            tracing::warn!(patient_id, "returning failure sentinel to caller");
        }

        InsightReply {
            profile,
            suggestion: outcome.into_text(),
        }
    }
}
