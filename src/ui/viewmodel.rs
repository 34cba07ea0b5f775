//! View model types representing renderable table state.
//!
//! This module defines immutable view models computed from table state,
//! following the MVVM pattern. They carry display-ready strings and flags
//! (formatted cell text, badge colors, loading and selection markers) and no
//! business logic.
//!
//! # Architecture
//!
//! View models are created via `TableState::compute_viewmodel()` and consumed
//! by the host renderer. All types serialize to JSON for hosts living in
//! another runtime.

use crate::app::sort::SortDirection;
use crate::domain::{ActionColor, Align, BadgeColor, ColumnType, RowKey, StickySide};
use serde::Serialize;

/// Complete table view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableViewModel {
    /// Visible column headers in display order.
    pub headers: Vec<HeaderCell>,

    /// One entry per dataset row, in dataset order.
    pub rows: Vec<RowView>,

    /// Column span of a full-width cell (empty state, loading row):
    /// visible columns plus the row-number and selection columns when shown.
    pub colspan: usize,

    /// State of the header checkbox.
    pub all_selected: bool,
    pub partially_selected: bool,
    pub selected_count: usize,

    /// Text currently typed in the search field.
    pub search_text: String,

    /// Whether the toolbar (selection count, search) is shown.
    pub show_toolbar: bool,

    /// `true` when the dataset has no rows.
    pub is_empty: bool,
}

/// Header of one visible column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub kind: ColumnType,
    pub sortable: bool,

    /// Direction indicator, set only on the active sort column.
    pub sort_direction: Option<SortDirection>,
    pub align: Option<Align>,
    pub sticky: Option<StickySide>,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    /// Identity key, suitable for keyed list rendering.
    pub key: RowKey,

    /// 1-based row number.
    pub number: usize,
    pub selected: bool,

    /// Odd rows of a striped table.
    pub striped: bool,
    pub dropdown_open: bool,
    pub cells: Vec<CellView>,
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub key: String,
    pub text: String,

    /// Badge color for badge columns with a value.
    pub badge: Option<BadgeColor>,
}

/// An action offered on a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub id: String,
    pub label: String,
    pub color: ActionColor,

    /// The action is running for this row; the button should be disabled.
    pub loading: bool,
}
