//! `tracing` subscriber setup.
//!
//! The engine emits `tracing` spans and events throughout (enrichment,
//! state transitions, action failures). Embedding hosts usually install
//! their own subscriber; [`init_tracing`] is a convenience for the CLI and
//! for hosts that have none.
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` option of [`TableConfig`](crate::TableConfig)
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! ```rust
//! use complete_table::observability::init_tracing;
//! use complete_table::TableConfig;
//!
//! init_tracing(&TableConfig::default());
//! tracing::debug!("table initialized");
//! ```
//!
//! # Modules
//!
//! - `init`: Subscriber construction and installation

mod init;

pub use init::init_tracing;
