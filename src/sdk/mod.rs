//! # Data Service SDK
//!
//! The boundary to the remote data service.
//!
//! - [`DataService`] and [`PageCursor`] are the contract the factory and
//!   repository are written against.
//! - [`StoreActor`] / [`StoreClient`] implement that contract in memory, as an
//!   actor owning its entities and accounts.
//! - [`mock::MockDataService`] scripts the contract for tests.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod service;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use error::RemoteError;
pub use message::{Response, StoreRequest};
pub use service::{DataService, PageCursor};
