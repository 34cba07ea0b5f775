//! Table state management and view model computation.
//!
//! This module defines [`TableState`], the single widget instance the host
//! talks to. It owns the current dataset and declarations together with the
//! independent sub-states (sort, selection, search, actions) and computes the
//! enriched columns and view models from them on demand.
//!
//! # Architecture
//!
//! `TableState` separates inputs (rows, column and action declarations,
//! configuration) from derived state (enriched columns, view models). Derived
//! state is never stored where it could go stale: enrichment is memoized on
//! the identity of its inputs and view models are recomputed per call.
//!
//! # State Components
//!
//! - **Rows**: Current dataset, shared as `Arc<[Value]>`
//! - **Columns**: Declarations as supplied; enriched copies are memoized
//! - **Sort**: Active sort column and direction
//! - **Selection**: Identity-deduplicated selected rows
//! - **Actions**: Declarations plus the controller tracking in-flight runs
//! - **Search**: Debouncer holding the typed and committed text
//!
//! # Example
//!
//! ```rust
//! use complete_table::{ColumnDef, TableConfig, TableState};
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! let mut state = TableState::new(TableConfig::default());
//! let rows: Arc<[Value]> = vec![json!({ "id": 1, "total": 1200 })].into();
//! state.set_data(rows);
//! state.set_columns(vec![ColumnDef::new("total", "Total")].into());
//!
//! let viewmodel = state.compute_viewmodel();
//! assert_eq!(viewmodel.rows[0].cells[0].text, "1,200");
//! ```

use super::actions::{ActionController, ActionExecuted};
use super::events::TableEvent;
use super::search::{filter_rows, SearchDebouncer};
use super::selection::Selection;
use super::sort::SortState;
use crate::columns::badges::resolve_color;
use crate::columns::format::format_cell;
use crate::columns::ColumnEnricher;
use crate::domain::row::value_at;
use crate::domain::{ActionDef, ColumnDef, ColumnType, Result, RowIdentity, TableError};
use crate::ui::viewmodel::{ActionButton, CellView, HeaderCell, RowView, TableViewModel};
use crate::TableConfig;
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// A table instance.
///
/// Mutated by [`handle_event`](super::handle_event) in response to host
/// events. Row actions are started directly through
/// [`TableState::execute_action`] because they produce a future rather than
/// an immediate notification.
#[derive(Debug)]
pub struct TableState {
    config: TableConfig,
    rows: Arc<[Value]>,
    columns: Arc<[ColumnDef]>,
    actions: Vec<ActionDef>,
    enricher: ColumnEnricher,
    pub(crate) sort: SortState,
    pub(crate) selection: Selection,
    pub(crate) controller: ActionController,
    pub(crate) search: SearchDebouncer,
}

impl TableState {
    /// Creates an empty table for `config`.
    #[must_use]
    pub fn new(config: TableConfig) -> Self {
        let selection = Selection::new(config.row_identity(), config.multi_select);
        let search = SearchDebouncer::new(Duration::from_millis(config.search_debounce_ms))
            .with_instant_clear(config.instant_clear_search);

        Self {
            config,
            rows: Arc::from(Vec::new()),
            columns: Arc::from(Vec::new()),
            actions: Vec::new(),
            enricher: ColumnEnricher::new(),
            sort: SortState::new(),
            selection,
            controller: ActionController::new(),
            search,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TableConfig {
        &self.config
    }

    #[must_use]
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Column declarations as supplied by the host.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    #[must_use]
    pub fn actions(&self) -> &[ActionDef] {
        &self.actions
    }

    #[must_use]
    pub const fn sort_state(&self) -> &SortState {
        &self.sort
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn action_controller(&self) -> &ActionController {
        &self.controller
    }

    #[must_use]
    pub const fn search(&self) -> &SearchDebouncer {
        &self.search
    }

    /// Replaces the dataset.
    ///
    /// Selection, sort and open menus survive unless
    /// `reset_on_data_change` is set. Returns `true` when something was reset.
    /// In-flight actions are never cancelled.
    pub fn set_data(&mut self, rows: Arc<[Value]>) -> bool {
        tracing::debug!(rows = rows.len(), "dataset replaced");
        self.rows = rows;
        if let Some(open) = self.controller.dropdown().open_row() {
            if open >= self.rows.len() {
                self.controller.dropdown_mut().close_all();
            }
        }

        if !self.config.reset_on_data_change {
            return false;
        }
        let had_state = !self.selection.is_empty() || self.sort.column().is_some();
        self.selection.clear();
        self.sort.clear();
        self.controller.dropdown_mut().close_all();
        if had_state {
            tracing::debug!("selection and sort reset for new dataset");
        }
        had_state
    }

    pub fn set_columns(&mut self, columns: Arc<[ColumnDef]>) {
        tracing::debug!(columns = columns.len(), "column declarations replaced");
        self.columns = columns;
    }

    pub fn set_actions(&mut self, actions: Vec<ActionDef>) {
        tracing::debug!(actions = actions.len(), "action declarations replaced");
        self.actions = actions;
    }

    /// Installs a row identity strategy, typically a key function.
    pub fn set_row_identity(&mut self, identity: RowIdentity) {
        self.selection.set_identity(identity);
    }

    /// Columns after type detection and per-type configuration.
    ///
    /// Memoized: repeated calls without new rows or declarations return the
    /// same `Arc`.
    pub fn enriched_columns(&mut self) -> Arc<[ColumnDef]> {
        self.enricher
            .enrich(&self.rows, &self.columns, self.config.detection_options())
    }

    /// Enriched columns that are not hidden, in declaration order.
    pub fn visible_columns(&mut self) -> Vec<ColumnDef> {
        self.enriched_columns()
            .iter()
            .filter(|c| c.visible)
            .cloned()
            .collect()
    }

    /// Aggregate snapshot of sort and selection.
    #[must_use]
    pub fn state_changed(&self) -> TableEvent {
        TableEvent::StateChanged {
            sort_column: self.sort.column().map(str::to_string),
            sort_direction: self.sort.direction(),
            selected_items: self.selection.items().to_vec(),
        }
    }

    /// Indices of rows matching the committed search text.
    pub fn matching_rows(&mut self) -> Vec<usize> {
        let columns = self.enriched_columns();
        filter_rows(&self.rows, &columns, self.search.committed(), self.config.locale)
    }

    fn resolve_action(&self, action_id: &str, row_index: usize) -> Result<(&ActionDef, &Value)> {
        let action = self
            .actions
            .iter()
            .find(|a| a.id == action_id)
            .ok_or_else(|| TableError::UnknownAction(action_id.to_string()))?;
        let row = self.rows.get(row_index).ok_or(TableError::RowOutOfRange {
            index: row_index,
            len: self.rows.len(),
        })?;
        Ok((action, row))
    }

    /// Starts `action_id` on the row at `row_index`.
    ///
    /// Returns `Ok(None)` when the same action is already running for that
    /// row. The returned future resolves to the completion record; wrap it in
    /// [`TableEvent::ActionExecuted`] to notify the host.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownAction`] for an undeclared action id and
    /// [`TableError::RowOutOfRange`] for an index outside the dataset.
    ///
    /// # Example
    ///
    /// ```rust
    /// use complete_table::{ActionDef, TableConfig, TableEvent, TableState};
    /// use futures_util::FutureExt;
    /// use serde_json::{json, Value};
    ///
    /// let mut state = TableState::new(TableConfig::default());
    /// state.set_data(vec![json!({ "id": 1 })].into());
    /// state.set_actions(vec![ActionDef::new("open", "Open", |row: Value| async move { Ok(row) }.boxed())]);
    ///
    /// let running = state.execute_action("open", 0)?.expect("not running yet");
    /// let done = futures::executor::block_on(running);
    /// assert!(done.outcome.is_ok());
    /// assert!(state.execute_action("close", 0).is_err());
    /// # Ok::<(), complete_table::TableError>(())
    /// ```
    pub fn execute_action(
        &self,
        action_id: &str,
        row_index: usize,
    ) -> Result<Option<BoxFuture<'static, ActionExecuted>>> {
        let (action, row) = self.resolve_action(action_id, row_index)?;
        if !action.is_available(row) {
            tracing::debug!(action = action_id, row_index, "action not available for row");
            return Ok(None);
        }
        Ok(self.controller.execute(action, row, self.selection.identity()))
    }

    /// Same as [`TableState::execute_action`], closing the row's menu first.
    ///
    /// # Errors
    ///
    /// See [`TableState::execute_action`]. The menu stays open on error.
    pub fn execute_action_from_dropdown(
        &mut self,
        action_id: &str,
        row_index: usize,
    ) -> Result<Option<BoxFuture<'static, ActionExecuted>>> {
        let (action, row) = self.resolve_action(action_id, row_index)?;
        if !action.is_available(row) {
            self.controller.dropdown_mut().close(row_index);
            return Ok(None);
        }
        let (action, row) = (action.clone(), row.clone());
        let identity = self.selection.identity().clone();
        Ok(self
            .controller
            .execute_from_dropdown(row_index, &action, &row, &identity))
    }

    /// Cancels pending timers. Call when the table goes away.
    pub fn teardown(&mut self) {
        tracing::debug!(in_flight = self.controller.in_flight(), "table teardown");
        self.search.cancel();
        self.controller.dropdown_mut().close_all();
    }

    /// Computes a renderable view model of the current dataset.
    ///
    /// Rows are presented in dataset order; sorting, filtering and paging are
    /// the host's concern (see [`SortState::sort_rows`] and
    /// [`TableState::matching_rows`] for local helpers).
    pub fn compute_viewmodel(&mut self) -> TableViewModel {
        let _span = tracing::debug_span!("compute_viewmodel", rows = self.rows.len()).entered();

        let columns = self.visible_columns();
        let headers = columns.iter().map(|c| self.compute_header(c)).collect();
        let rows: Vec<RowView> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| self.compute_row(index, row, &columns))
            .collect();

        let colspan = columns.len()
            + usize::from(self.config.show_row_numbers)
            + usize::from(self.config.selectable);

        TableViewModel {
            headers,
            is_empty: rows.is_empty(),
            rows,
            colspan,
            all_selected: self.selection.is_all_selected(&self.rows),
            partially_selected: self.selection.is_partially_selected(&self.rows),
            selected_count: self.selection.len(),
            search_text: self.search.current().to_string(),
            show_toolbar: self.config.selectable || self.config.searchable,
        }
    }

    fn compute_header(&self, column: &ColumnDef) -> HeaderCell {
        HeaderCell {
            key: column.key.clone(),
            label: column.label.clone(),
            kind: column.resolved_type(),
            sortable: column.sortable,
            sort_direction: self
                .sort
                .is_sorted_by(&column.key)
                .then(|| self.sort.direction()),
            align: column.align,
            sticky: column.sticky,
        }
    }

    fn compute_row(&self, index: usize, row: &Value, columns: &[ColumnDef]) -> RowView {
        let key = self.selection.identity().key(row);

        let cells = columns
            .iter()
            .map(|column| {
                let kind = column.resolved_type();
                let badge = match (kind, &column.badge) {
                    (ColumnType::Badge, Some(config)) => value_at(row, &column.key)
                        .filter(|v| !v.is_null())
                        .map(|v| resolve_color(v, config)),
                    _ => None,
                };
                CellView {
                    key: column.key.clone(),
                    text: format_cell(row, column, self.config.locale),
                    badge,
                }
            })
            .collect();

        let actions = self
            .controller
            .visible_actions(&self.actions, row)
            .into_iter()
            .map(|action| ActionButton {
                id: action.id.clone(),
                label: action.label.clone(),
                color: action.color,
                loading: self.controller.is_loading_key(&action.id, &key),
            })
            .collect();

        RowView {
            selected: self.selection.contains_key(&key),
            key,
            number: index + 1,
            striped: self.config.striped && index % 2 == 1,
            dropdown_open: self.controller.dropdown().is_open(index),
            cells,
            actions,
        }
    }
}
