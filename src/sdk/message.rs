//! # Store Messages
//!
//! Requests sent from a [`StoreClient`](crate::sdk::StoreClient) to the
//! [`StoreActor`](crate::sdk::StoreActor). Every request carries a one-shot
//! channel the actor answers on.

use serde_json::Value;
use tokio::sync::oneshot;

use crate::model::{AuthToken, QuerySpec};
use crate::sdk::RemoteError;

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, RemoteError>>;

#[derive(Debug)]
pub enum StoreRequest {
    RegisterUser {
        username: String,
        password: String,
        respond_to: Response<()>,
    },
    Login {
        org_name: String,
        app_name: String,
        username: String,
        password: String,
        respond_to: Response<AuthToken>,
    },
    Insert {
        entity_type: String,
        entity: Value,
        respond_to: Response<usize>,
    },
    /// Answered with `{ "entities": [...], "cursor": <next cursor or null> }`.
    FetchPage {
        entity_type: String,
        query: QuerySpec,
        cursor: Option<String>,
        token: Option<AuthToken>,
        respond_to: Response<Value>,
    },
    Shutdown,
}
