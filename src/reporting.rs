//! # Error Reporting
//!
//! Canned diagnostics for client and collection failures, and the [`LogSink`]
//! they are written to.
//!
//! The messages are public constants so callers can compare against them: the
//! repository surfaces the same text through
//! [`RepositoryError`](crate::clients::RepositoryError)'s `Display`.
//!
//! By default every message goes to `tracing::error!` through [`TracingSink`].
//! Tests swap in a [`RecordingSink`] to count what was emitted.

use std::fmt::Display;
use std::sync::{Arc, Mutex, PoisonError};

pub const INVALID_ENTITIES_MSG: &str =
    "Entities for the collection are invalid. One of the following occurred:\n\
     - entities is missing\n\
     - entities is null\n\
     - entities is not an array\n";

pub const INVALID_COLLECTION_MSG: &str =
    "Entities could not be retrieved from the collection, the collection was invalid";

pub const INITIALIZATION_FAILURE_MSG: &str =
    "Collection could not be initialized. At least one of the following occurred:\n\
     - data client was invalid\n\
     - type was invalid\n";

pub const CLIENT_INITIALIZATION_FAILURE_MSG: &str =
    "Data client could not be initialized. At least one of the following occurred:\n\
     - organization name was invalid\n\
     - application name was invalid\n";

pub const LOGIN_REJECTED_MSG: &str = "Login could not be performed. The following were invalid:";

/// Destination for error diagnostics.
pub trait LogSink: Send + Sync {
    fn error(&self, message: &str);
}

/// Forwards diagnostics to `tracing` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times exactly `message` was emitted.
    pub fn count(&self, message: &str) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.as_str() == message)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl LogSink for RecordingSink {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_owned());
    }
}

/// Emits the canned diagnostics to a [`LogSink`].
#[derive(Clone)]
pub struct ErrorReporter {
    sink: Arc<dyn LogSink>,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl ErrorReporter {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn invalid_entities(&self) {
        self.sink.error(INVALID_ENTITIES_MSG);
    }

    pub fn invalid_collection(&self) {
        self.sink.error(INVALID_COLLECTION_MSG);
    }

    pub fn initialization_failure(&self) {
        self.sink.error(INITIALIZATION_FAILURE_MSG);
    }

    pub fn client_initialization_failure(&self) {
        self.sink.error(CLIENT_INITIALIZATION_FAILURE_MSG);
    }

    /// Names every rejected login argument, one per line.
    pub fn login_rejected(&self, fields: &[&str]) {
        self.sink.error(&login_rejected_message(fields));
    }

    pub fn login_failed(&self, error: &dyn Display) {
        self.sink.error(&format!("login error: {error}"));
    }

    pub fn remote_failure(&self, error: &dyn Display) {
        self.sink.error(&error.to_string());
    }
}

/// The composite message logged for rejected login arguments.
pub fn login_rejected_message(fields: &[&str]) -> String {
    let mut message = LOGIN_REJECTED_MSG.to_owned();
    for field in fields {
        message.push_str("\n- ");
        message.push_str(field);
    }
    message
}
