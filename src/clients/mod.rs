//! Caller-facing services over a [`DataService`](crate::sdk::DataService).

pub mod client_factory;
pub mod collection_repository;
pub mod error;

pub use client_factory::*;
pub use collection_repository::*;
pub use error::*;
