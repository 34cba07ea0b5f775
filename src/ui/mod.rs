//! Presentation layer: render-ready view models and page controls.
//!
//! Nothing in this module draws. It turns table state into plain data the
//! host renderer maps onto its own widgets.
//!
//! ```text
//! TableState → compute_viewmodel → TableViewModel → host renderer
//! PageInfo   → visible_pages     → [1] … [4] (5) [6] … [20]
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable table state
//! - [`pagination`]: Page window computation and page bookkeeping

pub mod pagination;
pub mod viewmodel;

pub use pagination::{visible_pages, PageChange, PageInfo, PageItem};
pub use viewmodel::{ActionButton, CellView, HeaderCell, RowView, TableViewModel};
