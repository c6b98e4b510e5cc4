//! Error types shared across the backend.
//!
//! `NotRegistered`, `NoPendingQuiz`, and `MalformedReply` are expected,
//! user-correctable conditions: routes turn them into plain textual replies
//! and they are never treated as failures. `EmptyCatalog` is a startup
//! configuration error; `Storage` wraps persistence failures.

#[derive(Debug, thiserror::Error)]
pub enum TutorError {
  #[error("user is not registered; /start creates a profile")]
  NotRegistered,

  #[error("no pending quiz for this user; /daily issues one")]
  NoPendingQuiz,

  #[error("reply is not in the `<grammar> || <puzzle>` format")]
  MalformedReply,

  #[error("content catalog has no {category} items")]
  EmptyCatalog { category: &'static str },

  #[error("profile storage error: {0}")]
  Storage(String),
}

impl From<std::io::Error> for TutorError {
  fn from(e: std::io::Error) -> Self {
    TutorError::Storage(e.to_string())
  }
}

impl From<serde_json::Error> for TutorError {
  fn from(e: serde_json::Error) -> Self {
    TutorError::Storage(e.to_string())
  }
}
