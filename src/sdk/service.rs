//! # DataService Trait
//!
//! The contract for the remote data service this crate wraps. Anything that can
//! authenticate a user and page through a typed collection can sit behind it:
//! the in-memory [`StoreClient`](crate::sdk::StoreClient), the
//! [`MockDataService`](crate::sdk::mock::MockDataService) used in tests, or an
//! HTTP-backed client.
//!
//! # Pagination
//! Cursor state belongs to the service, not to the caller. [`DataService::open_cursor`]
//! hands out a fresh [`PageCursor`] for one pass over a collection; the caller
//! calls [`PageCursor::fetch`] once, then [`PageCursor::next_page`] for as long as
//! [`PageCursor::has_next_page`] reports more data.
//!
//! Payloads are returned as raw JSON. Validating their shape is the caller's job
//! (see [`EntityPage::from_payload`](crate::model::EntityPage::from_payload)).

use async_trait::async_trait;
use serde_json::Value;

use crate::model::{AuthToken, DataClient, QuerySpec};
use crate::sdk::RemoteError;

/// The remote data service, consumed as an opaque collaborator.
#[async_trait]
pub trait DataService: Send + Sync + 'static {
    /// Exchange credentials for a session token.
    async fn login(
        &self,
        client: &DataClient,
        username: &str,
        password: &str,
    ) -> Result<AuthToken, RemoteError>;

    /// Open a cursor over `entity_type`, filtered and sized by `query`.
    ///
    /// No I/O happens until the cursor is fetched.
    fn open_cursor(
        &self,
        client: &DataClient,
        entity_type: &str,
        query: &QuerySpec,
    ) -> Box<dyn PageCursor>;
}

/// One pass over a remote collection.
#[async_trait]
pub trait PageCursor: Send {
    /// Fetch the first page.
    async fn fetch(&mut self) -> Result<Value, RemoteError>;

    /// Whether the service reported another page after the last one fetched.
    fn has_next_page(&self) -> bool;

    /// Fetch the page after the last one fetched.
    async fn next_page(&mut self) -> Result<Value, RemoteError>;
}
