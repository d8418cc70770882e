//! Builds the two-message prompt sequence for the completion service.

use crate::models::{PatientRecord, PromptMessage};

/// Lead-in framing the serialized profile inside the system message.
pub const PROFILE_LEAD_IN: &str = "Patient profile:";

/// Fixed questions the presentation layer offers when the physician types
/// nothing. Order matters: the first entry is the default selection.
pub const PREDEFINED_QUESTIONS: &[&str] = &[
    "What are some medications to treat this condition?",
    "What is a preliminary diagnosis for this patient?",
    "What are suggestions to improve the patient's health?",
];

/// Compose the prompt for one query: a system message carrying the full
/// record (identifier included; only the *displayed* summary omits it),
/// then a user message carrying the already-resolved question.
///
/// Pure; a record with zero fields yields a system message holding just the
/// lead-in line.
pub fn compose(record: &PatientRecord, question: &str) -> Vec<PromptMessage> {
    let body = record.profile_full();
    let system = if body.is_empty() {
        PROFILE_LEAD_IN.to_string()
    } else {
        format!("{PROFILE_LEAD_IN}\n{body}")
    };
    vec![PromptMessage::system(system), PromptMessage::user(question)]
}
