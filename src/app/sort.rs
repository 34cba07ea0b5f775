//! Single-column sort state.
//!
//! # State Machine
//!
//! ```text
//! Unsorted ──sort(c)──▶ (c, Asc) ──sort(c)──▶ (c, Desc) ──sort(c)──▶ (c, Asc)
//!                          │
//!                          └──sort(d)──▶ (d, Asc)
//! ```
//!
//! The controller only tracks state. Reordering rows is the host's job,
//! although [`SortState::sort_rows`] is available for hosts that sort locally.

use crate::columns::inference::parse_number;
use crate::domain::row::{value_at, value_to_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Current sort column and direction, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(String, SortDirection)>,
}

impl SortState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a click on `column` and returns the resulting (column, direction).
    ///
    /// ```
    /// use complete_table::app::sort::{SortDirection, SortState};
    ///
    /// let mut sort = SortState::new();
    /// assert_eq!(sort.sort("name").1, SortDirection::Asc);
    /// assert_eq!(sort.sort("name").1, SortDirection::Desc);
    /// assert_eq!(sort.sort("name").1, SortDirection::Asc);
    /// assert_eq!(sort.sort("age"), ("age".to_string(), SortDirection::Asc));
    /// ```
    pub fn sort(&mut self, column: &str) -> (String, SortDirection) {
        let next = match &self.active {
            Some((current, direction)) if current == column => direction.flipped(),
            _ => SortDirection::Asc,
        };
        self.active = Some((column.to_string(), next));
        tracing::debug!(column, direction = ?next, "sort changed");
        (column.to_string(), next)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.active.as_ref().map(|(c, _)| c.as_str())
    }

    /// Current direction. Ascending when nothing is sorted.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.active.as_ref().map(|(_, d)| *d).unwrap_or_default()
    }

    #[must_use]
    pub fn is_sorted_by(&self, column: &str) -> bool {
        self.column() == Some(column)
    }

    /// Stable in-place sort of `rows` by the active column.
    ///
    /// Numbers (including numeric strings) compare numerically and before
    /// text, text compares case-insensitively, null and missing values go last
    /// in both directions.
    pub fn sort_rows(&self, rows: &mut [Value]) {
        let Some((column, direction)) = &self.active else {
            return;
        };
        rows.sort_by(|a, b| {
            let (a, b) = (value_at(a, column), value_at(b, column));
            match (a.filter(|v| !v.is_null()), b.filter(|v| !v.is_null())) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => {
                    let ord = compare_cells(a, b);
                    match direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                }
            }
        });
    }
}

fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => value_to_text(a).to_lowercase().cmp(&value_to_text(b).to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_column_resets_to_ascending() {
        let mut sort = SortState::new();
        sort.sort("a");
        sort.sort("a");
        assert_eq!(sort.direction(), SortDirection::Desc);
        sort.sort("b");
        assert_eq!(sort.column(), Some("b"));
        assert_eq!(sort.direction(), SortDirection::Asc);
    }

    #[test]
    fn clear_returns_to_unsorted() {
        let mut sort = SortState::new();
        sort.sort("a");
        sort.clear();
        assert_eq!(sort.column(), None);
        assert_eq!(sort.sort("a").1, SortDirection::Asc);
    }

    #[test]
    fn sort_rows_numeric_and_nulls_last() {
        let mut rows = vec![
            json!({ "n": "10" }),
            json!({ "n": null }),
            json!({ "n": 9 }),
            json!({}),
            json!({ "n": "2.5" }),
        ];
        let mut sort = SortState::new();
        sort.sort("n");
        sort.sort_rows(&mut rows);
        let ns: Vec<_> = rows.iter().map(|r| r.get("n").cloned().unwrap_or(Value::Null)).collect();
        assert_eq!(ns, vec![json!("2.5"), json!(9), json!("10"), Value::Null, Value::Null]);

        sort.sort("n");
        sort.sort_rows(&mut rows);
        assert_eq!(rows[0]["n"], json!("10"));
        assert!(rows[4].get("n").map_or(true, Value::is_null));
    }

    #[test]
    fn text_sorts_case_insensitively() {
        let mut rows = vec![json!({ "s": "beta" }), json!({ "s": "Alpha" }), json!({ "s": "gamma" })];
        let mut sort = SortState::new();
        sort.sort("s");
        sort.sort_rows(&mut rows);
        assert_eq!(rows[0]["s"], "Alpha");
        assert_eq!(rows[2]["s"], "gamma");
    }
}
