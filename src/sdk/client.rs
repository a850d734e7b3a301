//! # Store Client
//!
//! The handle for talking to a [`StoreActor`](crate::sdk::StoreActor). It forwards
//! requests over a Tokio mpsc channel and awaits the answer on a oneshot channel.
//! Cloning only clones the sender.
//!
//! `StoreClient` implements [`DataService`], so a factory built on it behaves like
//! one built on a remote service.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::model::{AuthToken, DataClient, QuerySpec};
use crate::sdk::message::StoreRequest;
use crate::sdk::{DataService, PageCursor, RemoteError};

#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    pub async fn register_user(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::RegisterUser {
                username: username.into(),
                password: password.into(),
                respond_to,
            })
            .await
            .map_err(|_| RemoteError::ServiceClosed)?;
        response.await.map_err(|_| RemoteError::ServiceDropped)?
    }

    /// Stores `entity` under `entity_type`, returning the collection's new size.
    pub async fn insert(
        &self,
        entity_type: impl Into<String>,
        entity: Value,
    ) -> Result<usize, RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Insert {
                entity_type: entity_type.into(),
                entity,
                respond_to,
            })
            .await
            .map_err(|_| RemoteError::ServiceClosed)?;
        response.await.map_err(|_| RemoteError::ServiceDropped)?
    }

    pub async fn fetch_page(
        &self,
        entity_type: &str,
        query: &QuerySpec,
        cursor: Option<String>,
        token: Option<AuthToken>,
    ) -> Result<Value, RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::FetchPage {
                entity_type: entity_type.to_owned(),
                query: query.clone(),
                cursor,
                token,
                respond_to,
            })
            .await
            .map_err(|_| RemoteError::ServiceClosed)?;
        response.await.map_err(|_| RemoteError::ServiceDropped)?
    }

    /// Asks the actor to stop. Requests already queued ahead of this one are answered.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(StoreRequest::Shutdown).await;
    }
}

#[async_trait]
impl DataService for StoreClient {
    async fn login(
        &self,
        client: &DataClient,
        username: &str,
        password: &str,
    ) -> Result<AuthToken, RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Login {
                org_name: client.org_name().to_owned(),
                app_name: client.app_name().to_owned(),
                username: username.to_owned(),
                password: password.to_owned(),
                respond_to,
            })
            .await
            .map_err(|_| RemoteError::ServiceClosed)?;
        response.await.map_err(|_| RemoteError::ServiceDropped)?
    }

    fn open_cursor(
        &self,
        client: &DataClient,
        entity_type: &str,
        query: &QuerySpec,
    ) -> Box<dyn PageCursor> {
        Box::new(StoreCursor {
            store: self.clone(),
            entity_type: entity_type.to_owned(),
            query: query.clone(),
            token: client.token(),
            next: None,
        })
    }
}

/// Cursor over one collection of a [`StoreActor`](crate::sdk::StoreActor).
struct StoreCursor {
    store: StoreClient,
    entity_type: String,
    query: QuerySpec,
    token: Option<AuthToken>,
    next: Option<String>,
}

impl StoreCursor {
    async fn load(&mut self, cursor: Option<String>) -> Result<Value, RemoteError> {
        let page = self
            .store
            .fetch_page(&self.entity_type, &self.query, cursor, self.token.clone())
            .await?;
        self.next = page
            .get("cursor")
            .and_then(Value::as_str)
            .map(str::to_owned);
        debug!(entity_type = %self.entity_type, next = ?self.next, "Page loaded");
        Ok(page)
    }
}

#[async_trait]
impl PageCursor for StoreCursor {
    async fn fetch(&mut self) -> Result<Value, RemoteError> {
        self.load(None).await
    }

    fn has_next_page(&self) -> bool {
        self.next.is_some()
    }

    async fn next_page(&mut self) -> Result<Value, RemoteError> {
        match self.next.take() {
            Some(cursor) => self.load(Some(cursor)).await,
            None => Err(RemoteError::InvalidCursor("no next page".to_owned())),
        }
    }
}
