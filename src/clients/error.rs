use crate::reporting::{INVALID_COLLECTION_MSG, INVALID_ENTITIES_MSG};
use crate::sdk::RemoteError;

/// Errors returned by the [`ClientFactory`](crate::clients::ClientFactory).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ClientError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Errors returned by the [`CollectionRepository`](crate::clients::CollectionRepository).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RepositoryError {
    #[error("{}", INVALID_COLLECTION_MSG)]
    InvalidCollection,
    #[error("{}", INVALID_ENTITIES_MSG)]
    InvalidEntities,
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
