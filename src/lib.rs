//! Clinsight pairs a patient's profile from tabular clinical data with an
//! LLM-backed suggestion for the physician's question.
//!
//! The pipeline behind [`insights::InsightService::answer`]: validate the
//! caller's patient selection, resolve the record in the read-only
//! [`directory::PatientDirectory`], compose the two-message prompt, invoke
//! the completion service with bounded retries and a timeout, and hand back
//! the (profile, suggestion) pair. The presentation layer and the LLM
//! provider's internals stay outside this crate.

pub mod completion;
pub mod config;
pub mod dataset;
pub mod directory;
pub mod insights;
pub mod models;
pub mod prompt;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the embedding application. Call once at startup.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
