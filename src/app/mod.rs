//! Application layer coordinating table state, events, and notifications.
//!
//! This module defines the table's behavior, sitting between the host
//! renderer and the column/domain layers. It implements the event-driven
//! architecture behind every interaction.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Host Input → Event → handle_event → State Mutations → TableEvent → Host
//!                                          │
//!                   execute_action ────────┴──▶ future ──▶ ActionExecuted
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Row action execution and loading tracking
//! - [`dropdown`]: Exclusive row action menus
//! - [`events`]: Outbound notifications
//! - [`handler`]: Event processing and state transition coordinator
//! - [`search`]: Debounced search and local row filtering
//! - [`selection`]: Identity-based row selection
//! - [`sort`]: Sort state machine
//! - [`state`]: Central table state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use complete_table::app::{handle_event, Event, TableState};
//! use complete_table::TableConfig;
//!
//! let mut state = TableState::new(TableConfig::default());
//! let events = handle_event(&mut state, &Event::CloseDropdowns)?;
//! assert!(events.is_empty());
//! # Ok::<(), complete_table::TableError>(())
//! ```

pub mod actions;
pub mod dropdown;
pub mod events;
pub mod handler;
pub mod search;
pub mod selection;
pub mod sort;
pub mod state;

pub use actions::{ActionController, ActionExecuted};
pub use events::TableEvent;
pub use handler::{handle_event, Event};
pub use sort::{SortDirection, SortState};
pub use state::TableState;
