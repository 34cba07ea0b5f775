//! Debounced free-text search.
//!
//! The debouncer owns no timer thread. The host reports keystrokes with
//! [`SearchDebouncer::input`] and polls with [`SearchDebouncer::poll`] (for
//! example on every tick of its event loop, or when
//! [`SearchDebouncer::next_deadline`] elapses). Each keystroke cancels the
//! pending one and restarts the delay; a fired value is only committed when it
//! differs from the last committed value. Before the first commit there is no
//! previous value, so even an empty first query is committed.
//!
//! Hosts that filter locally can pass the committed text to [`filter_rows`].

use crate::columns::format::{format_cell, TableLocale};
use crate::domain::{ColumnDef, ColumnType};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Default delay between the last keystroke and the committed search.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    text: String,
    deadline: Instant,
}

/// Cancel-and-reschedule debouncer with distinct-until-changed output.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    instant_clear: bool,
    pending: Option<Pending>,
    last_emitted: Option<String>,
    current: String,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchDebouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            instant_clear: false,
            pending: None,
            last_emitted: None,
            current: String::new(),
        }
    }

    /// Lets an empty input commit immediately instead of waiting for the delay.
    #[must_use]
    pub const fn with_instant_clear(mut self, instant_clear: bool) -> Self {
        self.instant_clear = instant_clear;
        self
    }

    /// Records a keystroke.
    ///
    /// Returns a committed value only when instant clearing is enabled and the
    /// field was emptied; otherwise the value is scheduled for `now + delay`.
    pub fn input(&mut self, text: &str, now: Instant) -> Option<String> {
        self.current = text.to_string();

        if self.instant_clear && text.is_empty() {
            self.pending = None;
            return self.commit(String::new());
        }

        self.pending = Some(Pending {
            text: text.to_string(),
            deadline: now + self.delay,
        });
        None
    }

    /// Fires the pending value if its deadline has passed.
    ///
    /// ```
    /// use complete_table::app::search::SearchDebouncer;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut search = SearchDebouncer::default();
    /// let t0 = Instant::now();
    /// search.input("a", t0);
    /// search.input("ab", t0 + Duration::from_millis(100));
    /// search.input("abc", t0 + Duration::from_millis(200));
    /// assert_eq!(search.poll(t0 + Duration::from_millis(450)), None);
    /// assert_eq!(search.poll(t0 + Duration::from_millis(500)), Some("abc".to_string()));
    /// assert_eq!(search.poll(t0 + Duration::from_millis(900)), None);
    /// ```
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if !due {
            return None;
        }
        let fired = self.pending.take()?;
        self.commit(fired.text)
    }

    fn commit(&mut self, text: String) -> Option<String> {
        if self.last_emitted.as_deref() == Some(text.as_str()) {
            tracing::trace!(query_len = text.len(), "search unchanged, not committed");
            return None;
        }
        tracing::debug!(query_len = text.len(), "search committed");
        self.last_emitted = Some(text.clone());
        Some(text)
    }

    /// Drops the pending value. Called on teardown.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the host should poll next, if anything is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Text currently in the field, committed or not.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Last committed search text, empty before the first commit.
    #[must_use]
    pub fn committed(&self) -> &str {
        self.last_emitted.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Indices of the rows matching `query`, in dataset order.
///
/// The query is split on whitespace and every token must fuzzy-match the
/// formatted text of at least one searchable, non-action column. An empty
/// query matches every row.
#[must_use]
pub fn filter_rows(rows: &[Value], columns: &[ColumnDef], query: &str, locale: TableLocale) -> Vec<usize> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return (0..rows.len()).collect();
    }

    let _span = tracing::debug_span!("filter_rows", rows = rows.len(), tokens = tokens.len()).entered();

    let searchable: Vec<&ColumnDef> = columns
        .iter()
        .filter(|c| c.searchable && c.resolved_type() != ColumnType::Actions)
        .collect();
    let matcher = SkimMatcherV2::default();

    let matches: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let cells: Vec<String> = searchable
                .iter()
                .map(|column| format_cell(row, column, locale).to_lowercase())
                .collect();
            tokens
                .iter()
                .all(|token| cells.iter().any(|cell| matcher.fuzzy_match(cell, token).is_some()))
        })
        .map(|(index, _)| index)
        .collect();

    tracing::debug!(matched = matches.len(), "search filter applied");
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn three_keystrokes_produce_one_event() {
        let mut search = SearchDebouncer::default();
        let t0 = Instant::now();
        let mut events = Vec::new();

        for (i, text) in ["r", "ru", "rus"].iter().enumerate() {
            let at = t0 + ms(100 * i as u64);
            events.extend(search.input(text, at));
            events.extend(search.poll(at));
        }
        for step in 0..=10 {
            events.extend(search.poll(t0 + ms(200 + step * 50)));
        }

        assert_eq!(events, vec!["rus".to_string()]);
        assert_eq!(search.committed(), "rus");
    }

    #[test]
    fn fires_no_earlier_than_the_delay() {
        let mut search = SearchDebouncer::default();
        let t0 = Instant::now();
        search.input("x", t0);
        assert_eq!(search.poll(t0 + ms(299)), None);
        assert_eq!(search.next_deadline(), Some(t0 + ms(300)));
        assert_eq!(search.poll(t0 + ms(300)), Some("x".to_string()));
    }

    #[test]
    fn returning_to_the_committed_value_emits_nothing() {
        let mut search = SearchDebouncer::default();
        let t0 = Instant::now();
        search.input("abc", t0);
        search.poll(t0 + ms(300));
        search.input("abcd", t0 + ms(400));
        search.input("abc", t0 + ms(450));
        assert_eq!(search.poll(t0 + ms(800)), None);
        assert!(!search.is_pending());
    }

    #[test]
    fn clearing_is_debounced_by_default() {
        let mut search = SearchDebouncer::default();
        let t0 = Instant::now();
        search.input("abc", t0);
        search.poll(t0 + ms(300));
        assert_eq!(search.input("", t0 + ms(400)), None);
        assert_eq!(search.poll(t0 + ms(700)), Some(String::new()));
    }

    #[test]
    fn emptying_the_field_before_the_first_commit_still_commits() {
        let mut search = SearchDebouncer::default();
        let t0 = Instant::now();
        search.input("a", t0);
        search.input("", t0 + ms(100));
        assert_eq!(search.poll(t0 + ms(400)), Some(String::new()));
        assert_eq!(search.committed(), "");

        search.input("", t0 + ms(500));
        assert_eq!(search.poll(t0 + ms(800)), None);
    }

    #[test]
    fn instant_clear_bypasses_the_delay() {
        let mut search = SearchDebouncer::default().with_instant_clear(true);
        let t0 = Instant::now();
        search.input("abc", t0);
        search.poll(t0 + ms(300));
        assert_eq!(search.input("", t0 + ms(400)), Some(String::new()));
        assert!(!search.is_pending());
    }

    #[test]
    fn cancel_drops_the_pending_value() {
        let mut search = SearchDebouncer::default();
        let t0 = Instant::now();
        search.input("abc", t0);
        search.cancel();
        assert_eq!(search.poll(t0 + ms(1000)), None);
        assert_eq!(search.current(), "abc");
    }

    #[test]
    fn filter_requires_every_token() {
        let rows = vec![
            json!({ "name": "Ada Lovelace", "city": "London" }),
            json!({ "name": "Alan Turing", "city": "Wilmslow" }),
            json!({ "name": "Grace Hopper", "city": "New York" }),
        ];
        let columns = vec![ColumnDef::new("name", "Name"), ColumnDef::new("city", "City")];

        assert_eq!(filter_rows(&rows, &columns, "", TableLocale::En), vec![0, 1, 2]);
        assert_eq!(filter_rows(&rows, &columns, "ada lon", TableLocale::En), vec![0]);
        assert_eq!(filter_rows(&rows, &columns, "TURING", TableLocale::En), vec![1]);
        assert!(filter_rows(&rows, &columns, "zzz", TableLocale::En).is_empty());
    }

    #[test]
    fn filter_skips_unsearchable_columns() {
        let rows = vec![json!({ "name": "Ada", "secret": "hidden" })];
        let mut secret = ColumnDef::new("secret", "Secret");
        secret.searchable = false;
        let columns = vec![ColumnDef::new("name", "Name"), secret];
        assert!(filter_rows(&rows, &columns, "hidden", TableLocale::En).is_empty());
    }
}
