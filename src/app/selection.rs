//! Row selection.
//!
//! [`Selection`] keeps an ordered, identity-deduplicated list of selected
//! rows. Identity comes from a [`RowIdentity`], so a row that is re-fetched
//! (a new JSON value with the same key) is still recognized as selected.
//! Every mutating operation returns the new snapshot for the host's
//! `selectionChanged` handler.

use crate::domain::row::{RowIdentity, RowKey};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Selection {
    identity: RowIdentity,
    multi_select: bool,
    items: Vec<Value>,
    /// Identity keys of `items`, same order.
    keys: Vec<RowKey>,
    lookup: HashSet<RowKey>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(RowIdentity::default(), true)
    }
}

impl Selection {
    #[must_use]
    pub fn new(identity: RowIdentity, multi_select: bool) -> Self {
        Self {
            identity,
            multi_select,
            items: Vec::new(),
            keys: Vec::new(),
            lookup: HashSet::new(),
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &RowIdentity {
        &self.identity
    }

    /// Replaces the identity strategy. Existing entries are kept and re-keyed.
    pub fn set_identity(&mut self, identity: RowIdentity) {
        self.identity = identity;
        self.keys = self.items.iter().map(|row| self.identity.key(row)).collect();
        self.lookup = self.keys.iter().cloned().collect();
    }

    fn push(&mut self, key: RowKey, row: &Value) {
        if self.lookup.insert(key.clone()) {
            self.keys.push(key);
            self.items.push(row.clone());
        }
    }

    fn remove_all(&mut self) {
        self.items.clear();
        self.keys.clear();
        self.lookup.clear();
    }

    pub fn set_multi_select(&mut self, multi_select: bool) {
        self.multi_select = multi_select;
    }

    /// Selected rows in selection order.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `row` if no selected row shares its identity, otherwise removes the match.
    ///
    /// In single-select mode adding a row replaces the previous selection.
    ///
    /// ```
    /// use complete_table::app::selection::Selection;
    /// use serde_json::json;
    ///
    /// let mut selection = Selection::default();
    /// selection.toggle(&json!({ "id": 7 }));
    /// assert!(selection.is_selected(&json!({ "id": 7, "name": "refetched" })));
    /// selection.toggle(&json!({ "id": 7 }));
    /// assert!(selection.is_empty());
    /// ```
    pub fn toggle(&mut self, row: &Value) -> &[Value] {
        let key = self.identity.key(row);
        if self.lookup.remove(&key) {
            if let Some(pos) = self.keys.iter().position(|k| *k == key) {
                self.keys.remove(pos);
                self.items.remove(pos);
            }
        } else {
            if !self.multi_select {
                self.remove_all();
            }
            self.push(key, row);
        }
        tracing::debug!(selected = self.items.len(), "selection toggled");
        &self.items
    }

    /// Clears the selection if every row of `dataset` is selected, selects the
    /// whole dataset otherwise.
    ///
    /// Without multi-select only clearing is possible.
    pub fn toggle_all(&mut self, dataset: &[Value]) -> &[Value] {
        if self.is_all_selected(dataset) {
            self.remove_all();
        } else if self.multi_select {
            self.remove_all();
            for row in dataset {
                let key = self.identity.key(row);
                self.push(key, row);
            }
        }
        tracing::debug!(selected = self.items.len(), dataset = dataset.len(), "select all toggled");
        &self.items
    }

    pub fn clear(&mut self) -> &[Value] {
        self.remove_all();
        &self.items
    }

    #[must_use]
    pub fn is_selected(&self, row: &Value) -> bool {
        self.contains_key(&self.identity.key(row))
    }

    /// Same as [`Self::is_selected`] for an already computed identity key.
    #[must_use]
    pub fn contains_key(&self, key: &RowKey) -> bool {
        self.lookup.contains(key)
    }

    /// `true` when `dataset` is non-empty and each of its rows is selected.
    #[must_use]
    pub fn is_all_selected(&self, dataset: &[Value]) -> bool {
        !dataset.is_empty() && dataset.iter().all(|row| self.is_selected(row))
    }

    /// `true` when something is selected but not the whole dataset.
    #[must_use]
    pub fn is_partially_selected(&self, dataset: &[Value]) -> bool {
        !self.items.is_empty() && !self.is_all_selected(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::row::RowKey;
    use serde_json::json;

    fn dataset() -> Vec<Value> {
        (1..=5).map(|id| json!({ "id": id, "name": format!("row {id}") })).collect()
    }

    #[test]
    fn toggle_all_then_deselect_one() {
        let data = dataset();
        let mut selection = Selection::default();
        assert_eq!(selection.toggle_all(&data).len(), 5);
        assert!(selection.is_all_selected(&data));

        selection.toggle(&data[2]);
        assert!(selection.is_partially_selected(&data));
        assert!(!selection.is_all_selected(&data));
    }

    #[test]
    fn toggle_all_on_full_selection_clears() {
        let data = dataset();
        let mut selection = Selection::default();
        selection.toggle_all(&data);
        assert!(selection.toggle_all(&data).is_empty());
        assert!(!selection.is_partially_selected(&data));
    }

    #[test]
    fn empty_dataset_is_never_all_selected() {
        let selection = Selection::default();
        assert!(!selection.is_all_selected(&[]));
    }

    #[test]
    fn toggle_keeps_selection_order() {
        let data = dataset();
        let mut selection = Selection::default();
        selection.toggle(&data[3]);
        selection.toggle(&data[0]);
        let ids: Vec<_> = selection.items().iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(4), json!(1)]);
    }

    #[test]
    fn custom_key_function_distinguishes_every_row() {
        let identity = RowIdentity::from_fn(|row| RowKey(row["sku"].to_string()));
        let mut selection = Selection::new(identity, true);
        let a = json!({ "sku": "A" });
        let b = json!({ "sku": "B" });
        selection.toggle(&a);
        assert!(selection.is_selected(&a));
        assert!(!selection.is_selected(&b));
    }

    #[test]
    fn refetched_rows_stay_selected_after_rekeying() {
        let data = dataset();
        let mut selection = Selection::default();
        selection.toggle(&data[0]);
        selection.toggle(&data[4]);
        selection.set_identity(RowIdentity::Field("name".to_string()));

        assert!(selection.is_selected(&json!({ "id": 99, "name": "row 5" })));
        selection.toggle(&json!({ "name": "row 1" }));
        assert_eq!(selection.items(), &data[4..5]);
        assert!(!selection.contains_key(&RowIdentity::Field("name".to_string()).key(&data[0])));
    }

    #[test]
    fn single_select_replaces_previous_row() {
        let data = dataset();
        let mut selection = Selection::new(RowIdentity::default(), false);
        selection.toggle(&data[0]);
        selection.toggle(&data[1]);
        assert_eq!(selection.items(), &data[1..2]);
        assert_eq!(selection.toggle_all(&data).len(), 1);
    }
}
