//! # Remote Errors
//!
//! Errors surfaced by a [`DataService`](crate::sdk::DataService) implementation.
//! They cross the boundary unchanged: the repository and factory wrap them, never
//! reinterpret them.

/// Errors that can occur while talking to the remote data service.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RemoteError {
    #[error("Data service closed")]
    ServiceClosed,
    #[error("Data service dropped response channel")]
    ServiceDropped,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("Remote error: {0}")]
    Other(String),
}
