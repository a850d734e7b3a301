//! Errors raised while converting descriptors into handles.

use thiserror::Error;

/// A JSON descriptor could not be turned into a handle.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The value does not have the data client shape.
    #[error("Descriptor is not a data client")]
    NotADataClient,

    /// The value does not have the collection shape.
    #[error("Descriptor is not a collection")]
    NotACollection,

    /// The collection was described against a different client.
    #[error("Collection descriptor belongs to {org_name}/{app_name}")]
    ClientMismatch { org_name: String, app_name: String },

    /// The client behind a collection has been dropped.
    #[error("Client behind the collection was released")]
    ClientReleased,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
