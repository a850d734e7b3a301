//! Handles and records exchanged with the remote data service.
//!
//! - [`DataClient`]: an organization/application pair plus session state.
//! - [`Collection`]: a typed query against a client, with its [`QuerySpec`].
//! - [`EntityPage`] / [`EntityList`]: one validated page, and pages accumulated in order.

pub mod collection;
pub mod data_client;
pub mod entity;
pub mod error;

pub use collection::*;
pub use data_client::*;
pub use entity::*;
pub use error::*;
