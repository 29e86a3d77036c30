//! nippou-core library.
//!
//! Everything the `nippou` binary needs that is not I/O plumbing: the
//! checklist model and its tolerant [`normalize`](normalize::normalize)r,
//! slug-based id assignment, positional reordering, the admin
//! [`EditSession`](session::EditSession), the [`ConfigStore`](store::ConfigStore)
//! contract with memory and file backends, answer collection, and the pure
//! daily report generator.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at module boundaries, each mapped
//!   to an [`ErrorCode`](error::ErrorCode); `anyhow::Result` for settings I/O.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod answers;
pub mod config;
pub mod defaults;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reorder;
pub mod report;
pub mod session;
pub mod slug;
pub mod store;
pub mod view;
