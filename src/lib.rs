#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Persistence API
//!
//! > **A thin service layer over a remote entity-persistence service.**
//!
//! This crate validates inputs, builds client and collection handles, pages
//! through result sets, and reports what went wrong. Transport, authentication
//! and the query language belong to the data service behind the
//! [`DataService`](sdk::DataService) trait.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Nominal handles, shape checks at the edge
//! A [`DataClient`](model::DataClient) or [`Collection`](model::Collection) can
//! only be built by the factory, the repository, or a descriptor parser. Code that
//! holds one never asks "does this look like a client?". The shape predicates in
//! [`validation`] are kept for JSON that crosses the boundary.
//!
//! ### Per-call results
//! [`get_all`](clients::CollectionRepository::get_all) returns a fresh
//! [`EntityList`](model::EntityList) every time. Nothing accumulates on the
//! repository, and a failure halfway through pagination still hands back the
//! pages that arrived, as [`FetchOutcome::Partial`](clients::FetchOutcome::Partial).
//!
//! ## 🚀 Core Concepts
//!
//! ### Errors are values and log lines
//! Every failure is written to an [`ErrorReporter`](reporting::ErrorReporter)
//! using a fixed message, and is also returned as a typed error
//! ([`ClientError`](clients::ClientError), [`RepositoryError`](clients::RepositoryError)).
//! Nothing panics on bad input.
//!
//! ### Mocking: Testing without a server
//! [`MockDataService`](sdk::mock::MockDataService) scripts logins and pages with a
//! fluent expectation queue. [`RecordingSink`](reporting::RecordingSink) captures
//! diagnostics so tests can count them.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Boundary ([`sdk`])
//! - **Role**: The data service contract and an in-memory actor implementing it.
//! - **Key items**: [`DataService`](sdk::DataService), [`PageCursor`](sdk::PageCursor),
//!   [`StoreActor`](sdk::StoreActor).
//!
//! ### 2. The Handles ([`model`])
//! - **Role**: Clients, collections, pages and their wire descriptors.
//!
//! ### 3. The Interface ([`clients`])
//! - **Role**: What callers use.
//! - **Key items**: [`ClientFactory`](clients::ClientFactory),
//!   [`CollectionRepository`](clients::CollectionRepository).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! - **Role**: Starts the store and wires the services from a [`config`].
//! - **Key items**: [`PersistenceSystem`](lifecycle::PersistenceSystem),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 5. The Leaves ([`validation`], [`reporting`])
//! - **Role**: Pure predicates and canned diagnostics.
//!
//! ## 🚀 Quick Start
//!
//! ### Running the Demo
//!
//! ```bash
//! # Run with info logs
//! RUST_LOG=info cargo run
//!
//! # Use your own credentials
//! PERSISTENCE_CONFIG=persistence.json cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod reporting;
pub mod sdk;
pub mod validation;
