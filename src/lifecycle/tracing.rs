//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the subscriber used by the demo binary.
//!
//! ## Configuration
//!
//! Levels come from `RUST_LOG`. The format is compact and hides the module
//! prefix (`with_target(false)`); the structured fields (`entity_type`, `page`,
//! `size`, `org`) carry the context instead.
//!
//! ## What Gets Traced
//!
//! - **Store lifecycle**: startup, shutdown, and how many collections it held
//! - **Client operations**: `init_client`, `login`, `init_collection`, `get_all` spans
//! - **Pagination**: one `debug` line per page, one `info` line per completed fetch
//! - **Errors**: every canned diagnostic, at `error` level through the log sink
//!
//! ```bash
//! # Completion and lifecycle lines only
//! RUST_LOG=info cargo run
//!
//! # Every page and store request
//! RUST_LOG=debug cargo run
//! ```
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Store started org="myOrg" app="myApp"
//! INFO login{username="fred" org=myOrg app=myApp}: Logged in username="fred"
//! INFO get_all{entity_type=customers}: Collection fetched pages=3 size=25
//! INFO Store shutdown collections=1 accounts=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Structured fields identify the component
        .compact()
        .init();
}
