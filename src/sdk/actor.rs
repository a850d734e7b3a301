//! # In-Memory Store Actor
//!
//! The `StoreActor` is an in-memory stand-in for the remote data service. It owns
//! the entities of one organization/application, the registered user accounts,
//! and the tokens it has issued. Requests are processed sequentially in a single
//! Tokio task, so the state needs no locks.
//!
//! # Usage Pattern
//!
//! 1.  **Create**: `StoreActor::new()` returns the actor and its [`StoreClient`].
//! 2.  **Run**: spawn `actor.run()` in a background task.
//! 3.  **Use**: hand the client to a [`ClientFactory`](crate::clients::ClientFactory)
//!     as its [`DataService`](crate::sdk::DataService).
//!
//! ```rust
//! use persistence_api::sdk::StoreActor;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, store) = StoreActor::new("myOrg", "myApp", 10);
//!     tokio::spawn(actor.run());
//!
//!     store.insert("customers", json!({ "name": "Fred" })).await.unwrap();
//!     store.shutdown().await;
//! }
//! ```
//!
//! # Paging
//!
//! A `FetchPage` request returns up to `limit` entities starting at the offset
//! encoded in the cursor. The reply carries the cursor of the following page, or
//! `null` once the collection is exhausted. The query-language string is
//! accepted but not interpreted; every entity of the type matches.

use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::model::{AuthToken, QuerySpec, DEFAULT_PAGE_LIMIT};
use crate::sdk::message::StoreRequest;
use crate::sdk::{RemoteError, StoreClient};

pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    org_name: String,
    app_name: String,
    collections: HashMap<String, Vec<Value>>,
    accounts: HashMap<String, String>,
    tokens: HashSet<AuthToken>,
    next_token: u64,
}

impl StoreActor {
    /// Creates a store serving `org_name`/`app_name` and the client that talks to it.
    ///
    /// `buffer_size` is the capacity of the request channel.
    pub fn new(
        org_name: impl Into<String>,
        app_name: impl Into<String>,
        buffer_size: usize,
    ) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            org_name: org_name.into(),
            app_name: app_name.into(),
            collections: HashMap::new(),
            accounts: HashMap::new(),
            tokens: HashSet::new(),
            next_token: 1,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the store's event loop until the channel closes or a shutdown is requested.
    pub async fn run(mut self) {
        info!(org = %self.org_name, app = %self.app_name, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::RegisterUser {
                    username,
                    password,
                    respond_to,
                } => {
                    debug!(%username, "RegisterUser");
                    self.accounts.insert(username, password);
                    let _ = respond_to.send(Ok(()));
                }
                StoreRequest::Login {
                    org_name,
                    app_name,
                    username,
                    password,
                    respond_to,
                } => {
                    debug!(%username, "Login");
                    let _ = respond_to.send(self.login(&org_name, &app_name, &username, &password));
                }
                StoreRequest::Insert {
                    entity_type,
                    entity,
                    respond_to,
                } => {
                    let size = self.insert(&entity_type, entity);
                    debug!(%entity_type, size, "Inserted");
                    let _ = respond_to.send(Ok(size));
                }
                StoreRequest::FetchPage {
                    entity_type,
                    query,
                    cursor,
                    token,
                    respond_to,
                } => {
                    debug!(%entity_type, ql = %query.ql, limit = query.limit, ?cursor, "FetchPage");
                    let result =
                        self.fetch_page(&entity_type, &query, cursor.as_deref(), token.as_ref());
                    if let Err(e) = &result {
                        warn!(%entity_type, error = %e, "FetchPage failed");
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Shutdown => break,
            }
        }

        info!(
            collections = self.collections.len(),
            accounts = self.accounts.len(),
            "Store shutdown"
        );
    }

    fn login(
        &mut self,
        org_name: &str,
        app_name: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthToken, RemoteError> {
        if org_name != self.org_name || app_name != self.app_name {
            warn!(org_name, app_name, "Login against unknown application");
            return Err(RemoteError::Unauthorized(format!(
                "unknown application {org_name}/{app_name}"
            )));
        }
        match self.accounts.get(username) {
            Some(expected) if expected == password => {
                let token = AuthToken::new(format!("token_{}", self.next_token));
                self.next_token += 1;
                self.tokens.insert(token.clone());
                info!(username, "Logged in");
                Ok(token)
            }
            _ => {
                warn!(username, "Invalid credentials");
                Err(RemoteError::Unauthorized("invalid username or password".to_owned()))
            }
        }
    }

    fn insert(&mut self, entity_type: &str, mut entity: Value) -> usize {
        if let Value::Object(fields) = &mut entity {
            fields
                .entry("type")
                .or_insert_with(|| Value::String(entity_type.to_owned()));
        }
        let entities = self.collections.entry(entity_type.to_owned()).or_default();
        entities.push(entity);
        entities.len()
    }

    fn fetch_page(
        &self,
        entity_type: &str,
        query: &QuerySpec,
        cursor: Option<&str>,
        token: Option<&AuthToken>,
    ) -> Result<Value, RemoteError> {
        if let Some(token) = token {
            if !self.tokens.contains(token) {
                return Err(RemoteError::Unauthorized(format!("unknown token {token}")));
            }
        }

        let offset = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| RemoteError::InvalidCursor(cursor.to_owned()))?,
            None => 0,
        };
        let limit = match query.limit {
            0 => DEFAULT_PAGE_LIMIT as usize,
            limit => limit as usize,
        };

        let all = self
            .collections
            .get(entity_type)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if offset > all.len() {
            return Err(RemoteError::InvalidCursor(offset.to_string()));
        }

        let end = (offset + limit).min(all.len());
        let next = (end < all.len()).then(|| end.to_string());
        Ok(json!({
            "entities": &all[offset..end],
            "cursor": next,
        }))
    }
}
