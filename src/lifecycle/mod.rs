//! Runtime wiring and observability setup.
//!
//! - [`PersistenceSystem`] starts the in-memory store and builds the factory and
//!   repository on top of it.
//! - [`setup_tracing`] initializes logging.

pub mod persistence_system;
pub mod tracing;

pub use persistence_system::*;
pub use self::tracing::*;
