//! Domain layer for the table engine.
//!
//! This module contains the types the host hands to the engine (column and
//! action declarations, opaque rows) and the error type, independent of any
//! rendering concern.
//!
//! # Organization
//!
//! - [`action`]: Row action declarations and outcomes
//! - [`column`]: Column declarations, badge configuration, column types
//! - [`error`]: Error types and result aliases
//! - [`row`]: Dotted-path cell access and row identity
//!
//! # Examples
//!
//! ```
//! use complete_table::domain::{ColumnDef, ColumnType, Result};
//!
//! fn declare() -> Result<Vec<ColumnDef>> {
//!     Ok(vec![
//!         ColumnDef::new("name", "Name").sortable(),
//!         ColumnDef::new("created_at", "Created").with_type(ColumnType::Date),
//!     ])
//! }
//! # assert_eq!(declare().unwrap().len(), 2);
//! ```

pub mod action;
pub mod column;
pub mod error;
pub mod row;

pub use action::{ActionColor, ActionDef, ActionOutcome, BoxError};
pub use column::{
    Align, Appearance, BadgeColor, BadgeConfig, BadgeSize, BadgeVariant, BooleanLabels,
    CellFormatter, ColumnDef, ColumnType, StickySide,
};
pub use error::{Result, TableError};
pub use row::{RowIdentity, RowKey};
