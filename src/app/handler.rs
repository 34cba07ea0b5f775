//! Event handling and state transition logic.
//!
//! This module implements the handler that processes host events,
//! translating them into state changes and outbound notifications.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the host renderer (clicks, keystrokes, timer ticks, new data)
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via [`TableState`] and its sub-states
//! 4. [`TableEvent`]s are collected and returned for the host to forward
//!
//! # Event Types
//!
//! Events fall into several categories:
//! - **Data**: `SetData`, `SetColumns`
//! - **Sorting**: `Sort`
//! - **Selection**: `ToggleRow`, `ToggleAll`, `ClearSelection`
//! - **Search**: `SearchInput`, `ClearSearch`, `Tick`
//! - **Menus**: `ToggleDropdown`, `CloseDropdowns`, `PointerOutside`
//!
//! Row actions are not events: they yield a future, see
//! [`TableState::execute_action`].
//!
//! # Example
//!
//! ```rust
//! use complete_table::{handle_event, Event, TableConfig, TableEvent, TableState};
//!
//! let mut state = TableState::new(TableConfig::default());
//! let events = handle_event(&mut state, &Event::Sort("name".to_string()))?;
//! assert_eq!(events.len(), 2);
//! assert_eq!(events[0].name(), "sortChanged");
//! assert_eq!(events[1].name(), "stateChanged");
//! # Ok::<(), complete_table::TableError>(())
//! ```

use super::events::TableEvent;
use super::state::TableState;
use crate::domain::{ColumnDef, Result, TableError};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Events reported by the host.
///
/// Each event represents a discrete occurrence that may cause state changes
/// and notifications. The handler processes them sequentially, so state
/// transitions are deterministic.
#[derive(Debug, Clone)]
pub enum Event {
    /// Replaces the dataset.
    SetData(Arc<[Value]>),

    /// Replaces the column declarations.
    SetColumns(Arc<[ColumnDef]>),

    /// Header click on the column with this key.
    Sort(String),

    /// Selection checkbox of the row at this index.
    ToggleRow(usize),

    /// Header checkbox.
    ToggleAll,

    ClearSelection,

    /// The search field changed.
    SearchInput {
        text: String,
        /// When the keystroke happened.
        at: Instant,
    },

    /// The search field was cleared with its clear button.
    ClearSearch { at: Instant },

    /// Periodic timer; fires a settled search.
    Tick(Instant),

    /// Action menu button of the row at this index.
    ToggleDropdown(usize),

    CloseDropdowns,

    /// A pointer event landed outside the table.
    PointerOutside,
}

impl Event {
    /// Variant name, used as the span field instead of the full payload.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetData(_) => "SetData",
            Self::SetColumns(_) => "SetColumns",
            Self::Sort(_) => "Sort",
            Self::ToggleRow(_) => "ToggleRow",
            Self::ToggleAll => "ToggleAll",
            Self::ClearSelection => "ClearSelection",
            Self::SearchInput { .. } => "SearchInput",
            Self::ClearSearch { .. } => "ClearSearch",
            Self::Tick(_) => "Tick",
            Self::ToggleDropdown(_) => "ToggleDropdown",
            Self::CloseDropdowns => "CloseDropdowns",
            Self::PointerOutside => "PointerOutside",
        }
    }
}

fn selection_events(state: &TableState) -> Vec<TableEvent> {
    vec![
        TableEvent::SelectionChanged {
            items: state.selection.items().to_vec(),
        },
        state.state_changed(),
    ]
}

fn check_row(state: &TableState, index: usize) -> Result<()> {
    let len = state.rows().len();
    if index < len {
        Ok(())
    } else {
        Err(TableError::RowOutOfRange { index, len })
    }
}

fn committed(text: Option<String>) -> Vec<TableEvent> {
    text.map(|text| TableEvent::SearchCommitted { text })
        .into_iter()
        .collect()
}

/// Processes an event, mutates table state, and returns notifications to forward.
///
/// # Parameters
///
/// * `state` - Mutable reference to table state
/// * `event` - Event to process
///
/// # Returns
///
/// The notifications in emission order. May be empty when nothing observable
/// changed (a keystroke still inside the debounce window, a selection click
/// on a non-selectable table).
///
/// # Errors
///
/// Returns [`TableError::RowOutOfRange`] when a row-addressed event points
/// outside the current dataset.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event name. Payloads are not
/// recorded; datasets only contribute their row count.
pub fn handle_event(state: &mut TableState, event: &Event) -> Result<Vec<TableEvent>> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    match event {
        Event::SetData(rows) => {
            if state.set_data(Arc::clone(rows)) {
                return Ok(selection_events(state));
            }
            Ok(vec![])
        }
        Event::SetColumns(columns) => {
            state.set_columns(Arc::clone(columns));
            Ok(vec![])
        }
        Event::Sort(column) => {
            let (column, direction) = state.sort.sort(column);
            Ok(vec![
                TableEvent::SortChanged { column, direction },
                state.state_changed(),
            ])
        }
        Event::ToggleRow(index) => {
            if !state.config().selectable {
                tracing::debug!(index, "selection disabled, ignoring row toggle");
                return Ok(vec![]);
            }
            check_row(state, *index)?;
            let row = state.rows()[*index].clone();
            state.selection.toggle(&row);
            Ok(selection_events(state))
        }
        Event::ToggleAll => {
            if !state.config().selectable {
                tracing::debug!("selection disabled, ignoring select all");
                return Ok(vec![]);
            }
            let rows = state.rows().to_vec();
            state.selection.toggle_all(&rows);
            Ok(selection_events(state))
        }
        Event::ClearSelection => {
            state.selection.clear();
            Ok(selection_events(state))
        }
        Event::SearchInput { text, at } => {
            tracing::trace!(query_len = text.len(), "search input");
            Ok(committed(state.search.input(text, *at)))
        }
        Event::ClearSearch { at } => Ok(committed(state.search.input("", *at))),
        Event::Tick(now) => Ok(committed(state.search.poll(*now))),
        Event::ToggleDropdown(index) => {
            check_row(state, *index)?;
            state.controller.dropdown_mut().toggle(*index);
            tracing::debug!(open = ?state.controller.dropdown().open_row(), "dropdown toggled");
            Ok(vec![])
        }
        Event::CloseDropdowns => {
            state.controller.dropdown_mut().close_all();
            Ok(vec![])
        }
        Event::PointerOutside => {
            state.controller.dropdown_mut().pointer_outside();
            Ok(vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::sort::SortDirection;
    use crate::TableConfig;
    use serde_json::json;
    use std::time::Duration;

    fn five_rows() -> Arc<[Value]> {
        (1..=5).map(|id| json!({ "id": id })).collect::<Vec<_>>().into()
    }

    fn selectable() -> TableState {
        let mut state = TableState::new(TableConfig {
            selectable: true,
            ..Default::default()
        });
        handle_event(&mut state, &Event::SetData(five_rows())).unwrap();
        state
    }

    #[test]
    fn sort_cycles_and_reports_state() {
        let mut state = selectable();
        let sort = Event::Sort("name".to_string());
        handle_event(&mut state, &sort).unwrap();
        let events = handle_event(&mut state, &sort).unwrap();

        assert_eq!(
            events[0],
            TableEvent::SortChanged {
                column: "name".to_string(),
                direction: SortDirection::Desc,
            }
        );
        assert!(matches!(
            &events[1],
            TableEvent::StateChanged { sort_column: Some(c), sort_direction: SortDirection::Desc, .. } if c == "name"
        ));
    }

    #[test]
    fn toggle_all_then_deselect_one() {
        let mut state = selectable();
        let events = handle_event(&mut state, &Event::ToggleAll).unwrap();
        assert!(matches!(&events[0], TableEvent::SelectionChanged { items } if items.len() == 5));

        handle_event(&mut state, &Event::ToggleRow(2)).unwrap();
        let vm = state.compute_viewmodel();
        assert!(vm.partially_selected);
        assert!(!vm.all_selected);
        assert_eq!(vm.selected_count, 4);
    }

    #[test]
    fn selection_events_ignored_when_not_selectable() {
        let mut state = TableState::new(TableConfig::default());
        handle_event(&mut state, &Event::SetData(five_rows())).unwrap();
        assert!(handle_event(&mut state, &Event::ToggleRow(0)).unwrap().is_empty());
        assert!(handle_event(&mut state, &Event::ToggleAll).unwrap().is_empty());
        assert!(state.selection().is_empty());
    }

    #[test]
    fn row_events_are_bounds_checked() {
        let mut state = selectable();
        assert!(matches!(
            handle_event(&mut state, &Event::ToggleRow(5)),
            Err(TableError::RowOutOfRange { index: 5, len: 5 })
        ));
        assert!(handle_event(&mut state, &Event::ToggleDropdown(7)).is_err());
    }

    #[test]
    fn dropdowns_are_exclusive() {
        let mut state = selectable();
        handle_event(&mut state, &Event::ToggleDropdown(2)).unwrap();
        handle_event(&mut state, &Event::ToggleDropdown(4)).unwrap();
        assert!(!state.action_controller().dropdown().is_open(2));
        assert!(state.action_controller().dropdown().is_open(4));

        handle_event(&mut state, &Event::PointerOutside).unwrap();
        assert_eq!(state.action_controller().dropdown().open_row(), None);
    }

    #[test]
    fn event_names_leave_out_payloads() {
        let rows: Arc<[Value]> = (0..1000).map(|id| json!({ "id": id, "blob": "x".repeat(64) })).collect::<Vec<_>>().into();
        assert_eq!(Event::SetData(rows).name(), "SetData");
        assert_eq!(Event::Sort("name".to_string()).name(), "Sort");
        assert_eq!(Event::ClearSearch { at: Instant::now() }.name(), "ClearSearch");
    }

    #[test]
    fn search_burst_commits_once() {
        let mut state = selectable();
        let t0 = Instant::now();
        let mut events = Vec::new();
        for (i, text) in ["a", "ad", "ada"].iter().enumerate() {
            let at = t0 + Duration::from_millis(100 * i as u64);
            events.extend(handle_event(&mut state, &Event::SearchInput { text: (*text).to_string(), at }).unwrap());
            events.extend(handle_event(&mut state, &Event::Tick(at)).unwrap());
        }
        events.extend(handle_event(&mut state, &Event::Tick(t0 + Duration::from_millis(500))).unwrap());

        assert_eq!(
            events,
            vec![TableEvent::SearchCommitted {
                text: "ada".to_string()
            }]
        );
    }

    #[test]
    fn clear_search_goes_through_the_debouncer() {
        let mut state = selectable();
        let t0 = Instant::now();
        handle_event(&mut state, &Event::SearchInput { text: "x".to_string(), at: t0 }).unwrap();
        handle_event(&mut state, &Event::Tick(t0 + Duration::from_millis(300))).unwrap();

        let at = t0 + Duration::from_millis(400);
        assert!(handle_event(&mut state, &Event::ClearSearch { at }).unwrap().is_empty());
        let events = handle_event(&mut state, &Event::Tick(at + Duration::from_millis(300))).unwrap();
        assert_eq!(events, vec![TableEvent::SearchCommitted { text: String::new() }]);
    }

    #[test]
    fn reset_on_new_data_reports_cleared_selection() {
        let mut state = TableState::new(TableConfig {
            selectable: true,
            reset_on_data_change: true,
            ..Default::default()
        });
        handle_event(&mut state, &Event::SetData(five_rows())).unwrap();
        handle_event(&mut state, &Event::ToggleRow(0)).unwrap();

        let events = handle_event(&mut state, &Event::SetData(five_rows())).unwrap();
        assert_eq!(events[0], TableEvent::SelectionChanged { items: vec![] });
    }
}
