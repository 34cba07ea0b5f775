//! Heuristic column type inference.
//!
//! Classifies a column from a stride sample of its values. Classification runs
//! a fixed priority ladder where the first matching rule wins:
//!
//! ```text
//! boolean → date (≥ 70 %) → number (≥ 80 %) → badge (smart badges only) → text
//! ```
//!
//! Nothing in this module fails. A column without any usable value is left
//! undetected and an ambiguous one falls through to text.

use crate::domain::row::{is_blank, value_at, value_to_text};
use crate::domain::ColumnType;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// Maximum number of rows inspected per column.
pub const SAMPLE_LIMIT: usize = 100;

/// Normalized spellings accepted as "true" by boolean detection and formatting.
pub const TRUE_WORDS: &[&str] = &["true", "1", "oui", "yes", "actif", "active", "enabled", "on"];

/// Normalized spellings accepted as "false" by boolean detection and formatting.
pub const FALSE_WORDS: &[&str] = &["false", "0", "non", "no", "inactif", "inactive", "disabled", "off"];

/// Column-key fragments that mark a categorical field.
const BADGE_FIELD_TERMS: &[&str] = &[
    "status", "statut", "state", "etat", "type", "category", "categorie", "priority",
    "priorite", "level", "niveau", "role", "grade",
];

const BADGE_MIN_UNIQUE: usize = 2;
const BADGE_MAX_UNIQUE: usize = 15;
const BADGE_MAX_AVG_LEN: usize = 20;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern should compile"));
static DMY_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("date pattern should compile"));
static ISO_DATETIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}").expect("date pattern should compile"));

/// Picks at most `limit` rows at an even stride across the whole slice.
///
/// Row `i` of the sample is row `i * len / limit` of the input, so the tail
/// of a large dataset is represented as well as its head.
///
/// ```
/// use complete_table::columns::inference::stride_sample;
/// use serde_json::json;
///
/// let rows: Vec<_> = (0..250).map(|i| json!(i)).collect();
/// let sample = stride_sample(&rows, 100);
/// assert_eq!(sample.len(), 100);
/// assert_eq!(sample[0], &json!(0));
/// assert_eq!(sample[99], &json!(247));
/// ```
#[must_use]
pub fn stride_sample(rows: &[Value], limit: usize) -> Vec<&Value> {
    if rows.len() <= limit {
        return rows.iter().collect();
    }
    (0..limit).filter_map(|i| rows.get(i * rows.len() / limit)).collect()
}

/// Extracts the non-blank values at `path` from a stride sample of `rows`.
#[must_use]
pub fn sample_values<'a>(rows: &'a [Value], path: &str) -> Vec<&'a Value> {
    stride_sample(rows, SAMPLE_LIMIT)
        .into_iter()
        .filter_map(|row| value_at(row, path))
        .filter(|v| !is_blank(v))
        .collect()
}

fn normalize(value: &Value) -> String {
    value_to_text(value).trim().to_lowercase()
}

/// Parses a cell as a calendar date.
///
/// Accepted shapes are `YYYY-MM-DD`, `DD/MM/YYYY` and ISO datetimes starting
/// with `YYYY-MM-DDTHH:MM`. The date must exist and its year must be after 1900.
#[must_use]
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let Value::String(raw) = value else {
        return None;
    };
    let text = raw.as_str();

    let date = if ISO_DATE.is_match(text) {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
    } else if DMY_DATE.is_match(text) {
        NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
    } else if ISO_DATETIME.is_match(text) {
        parse_iso_datetime(text)
    } else {
        None
    }?;

    (date.year() > 1900).then_some(date)
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}

/// Parses a cell as a finite number. Numeric strings are accepted after trimming.
#[must_use]
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Returns `true` when every distinct value belongs to the boolean vocabulary.
#[must_use]
pub fn is_boolean_column(unique: &BTreeSet<String>) -> bool {
    if unique.is_empty() || unique.len() > 3 {
        return false;
    }
    unique.iter().all(|v| {
        v.is_empty() || v == "null" || TRUE_WORDS.contains(&v.as_str()) || FALSE_WORDS.contains(&v.as_str())
    })
}

/// At least 70 % of the values are valid dates.
#[must_use]
pub fn is_date_column(values: &[&Value]) -> bool {
    let dates = values.iter().filter(|v| parse_date(v).is_some()).count();
    !values.is_empty() && dates * 10 >= values.len() * 7
}

/// At least 80 % of the values are finite numbers.
#[must_use]
pub fn is_number_column(values: &[&Value]) -> bool {
    let numbers = values.iter().filter(|v| parse_number(v).is_some()).count();
    !values.is_empty() && numbers * 10 >= values.len() * 8
}

/// Categorical heuristic: a semantic field name, or a small set of short values.
#[must_use]
pub fn is_badge_column(key: &str, unique: &BTreeSet<String>) -> bool {
    let key = key.to_lowercase();
    if BADGE_FIELD_TERMS.iter().any(|term| key.contains(term)) {
        return true;
    }
    if !(BADGE_MIN_UNIQUE..=BADGE_MAX_UNIQUE).contains(&unique.len()) {
        return false;
    }
    let total_len: usize = unique.iter().map(|v| v.chars().count()).sum();
    total_len <= BADGE_MAX_AVG_LEN * unique.len()
}

/// Classifies a column from its sampled values without caching.
///
/// ```
/// use complete_table::columns::inference::classify;
/// use complete_table::domain::ColumnType;
/// use serde_json::json;
///
/// let values = [json!("yes"), json!("no"), json!("Yes")];
/// let refs: Vec<_> = values.iter().collect();
/// assert_eq!(classify("subscribed", &refs, true), ColumnType::Boolean);
/// ```
#[must_use]
pub fn classify(key: &str, values: &[&Value], smart_badges: bool) -> ColumnType {
    let unique: BTreeSet<String> = values.iter().map(|v| normalize(v)).filter(|v| !v.is_empty()).collect();

    if is_boolean_column(&unique) {
        ColumnType::Boolean
    } else if is_date_column(values) {
        ColumnType::Date
    } else if is_number_column(values) {
        ColumnType::Number
    } else if smart_badges && is_badge_column(key, &unique) {
        ColumnType::Badge
    } else {
        ColumnType::Text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DetectionKey {
    column: String,
    signature: String,
    smart_badges: bool,
}

/// Upper bound on memoized classifications before the cache is flushed.
pub const DETECTION_CACHE_CAPACITY: usize = 256;

/// Memoizing wrapper around [`classify`].
///
/// The cache is keyed by the column key, the sorted sample values and the
/// smart-badge flag. It holds at most [`DETECTION_CACHE_CAPACITY`] entries and
/// starts over once full.
#[derive(Debug, Default)]
pub struct TypeDetector {
    cache: HashMap<DetectionKey, ColumnType>,
}

impl TypeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `values`, reusing an earlier result for an identical sample.
    pub fn detect(&mut self, key: &str, values: &[&Value], smart_badges: bool) -> ColumnType {
        let mut texts: Vec<String> = values.iter().map(|v| value_to_text(v)).collect();
        texts.sort_unstable();
        let cache_key = DetectionKey {
            column: key.to_string(),
            signature: texts.join("\u{1f}"),
            smart_badges,
        };

        if let Some(kind) = self.cache.get(&cache_key) {
            tracing::trace!(column = key, kind = %kind, "type detection cache hit");
            return *kind;
        }

        let kind = classify(key, values, smart_badges);
        tracing::debug!(column = key, kind = %kind, sample = values.len(), "column type detected");
        if self.cache.len() >= DETECTION_CACHE_CAPACITY {
            tracing::debug!(entries = self.cache.len(), "type detection cache full, flushing");
            self.cache.clear();
        }
        self.cache.insert(cache_key, kind);
        kind
    }

    /// Number of memoized classifications.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refs(values: &[Value]) -> Vec<&Value> {
        values.iter().collect()
    }

    #[test]
    fn booleans_with_a_blank_cell() {
        let rows: Vec<Value> = (0..10)
            .map(|i| match i {
                9 => json!({ "flag": "" }),
                i if i % 2 == 0 => json!({ "flag": "true" }),
                _ => json!({ "flag": "false" }),
            })
            .collect();
        let values = sample_values(&rows, "flag");
        assert_eq!(values.len(), 9);
        assert_eq!(classify("flag", &values, true), ColumnType::Boolean);
    }

    #[test]
    fn french_booleans_are_recognized() {
        let values = [json!("Oui"), json!(" non "), json!("oui")];
        assert_eq!(classify("abonne", &refs(&values), false), ColumnType::Boolean);
    }

    #[test]
    fn four_distinct_boolean_words_are_not_boolean() {
        let values = [json!("yes"), json!("no"), json!("on"), json!("off")];
        assert_ne!(classify("x", &refs(&values), false), ColumnType::Boolean);
    }

    #[test]
    fn date_threshold_is_seventy_percent() {
        let mut values: Vec<Value> = (1..=8).map(|d| json!(format!("2024-03-{d:02}"))).collect();
        values.push(json!("garbage"));
        values.push(json!("nope"));
        assert_eq!(classify("when", &refs(&values), false), ColumnType::Date);

        let mut values: Vec<Value> = (1..=6).map(|d| json!(format!("2024-03-{d:02}"))).collect();
        values.extend((0..4).map(|i| json!(format!("word{i}"))));
        assert_ne!(classify("when", &refs(&values), false), ColumnType::Date);
    }

    #[test]
    fn date_shapes_and_validity() {
        assert!(parse_date(&json!("2024-02-29")).is_some());
        assert!(parse_date(&json!("2023-02-29")).is_none());
        assert!(parse_date(&json!("31/12/2024")).is_some());
        assert!(parse_date(&json!("2024-06-01T10:30:00Z")).is_some());
        assert!(parse_date(&json!("2024-06-01T10:30")).is_some());
        assert!(parse_date(&json!("1850-01-01")).is_none());
        assert!(parse_date(&json!("2024-6-1")).is_none());
        assert!(parse_date(&json!(20_240_601)).is_none());
    }

    #[test]
    fn number_threshold_is_inclusive_at_eighty_percent() {
        let mut values: Vec<Value> = (0..80).map(|i| json!(i * 7 + 2)).collect();
        values.extend((0..20).map(|i| json!(format!("n/a {i}"))));
        assert_eq!(classify("amount", &refs(&values), false), ColumnType::Number);

        let mut values: Vec<Value> = (0..79).map(|i| json!(format!("{}.5", i + 2))).collect();
        values.extend((0..21).map(|i| json!(format!("n/a {i}"))));
        assert_ne!(classify("amount", &refs(&values), false), ColumnType::Number);
    }

    #[test]
    fn zero_one_columns_are_boolean_before_number() {
        let values = [json!(0), json!(1), json!(1)];
        assert_eq!(classify("count", &refs(&values), true), ColumnType::Boolean);
    }

    #[test]
    fn badges_need_smart_badges() {
        let values = [json!("open"), json!("closed"), json!("open"), json!("draft")];
        assert_eq!(classify("ticket", &refs(&values), true), ColumnType::Badge);
        assert_eq!(classify("ticket", &refs(&values), false), ColumnType::Text);
    }

    #[test]
    fn semantic_key_forces_badge() {
        let values = [json!("a very long free-form description of the state")];
        assert_eq!(classify("order_status", &refs(&values), true), ColumnType::Badge);
    }

    #[test]
    fn long_distinct_values_are_text() {
        let values: Vec<Value> = (0..30).map(|i| json!(format!("customer comment number {i}"))).collect();
        assert_eq!(classify("comment", &refs(&values), true), ColumnType::Text);
    }

    #[test]
    fn stride_sample_covers_the_tail() {
        let rows: Vec<Value> = (0..1000).map(|i| json!(i)).collect();
        let sample = stride_sample(&rows, SAMPLE_LIMIT);
        assert_eq!(sample.len(), SAMPLE_LIMIT);
        assert_eq!(sample.last(), Some(&&json!(990)));
    }

    #[test]
    fn detector_is_idempotent_and_cached() {
        let values = [json!("12"), json!("13.5"), json!("x")];
        let mut detector = TypeDetector::new();
        let first = detector.detect("qty", &refs(&values), true);
        let second = detector.detect("qty", &refs(&values), true);
        assert_eq!(first, second);
        assert_eq!(detector.cached(), 1);
    }

    #[test]
    fn detector_cache_stays_bounded_across_datasets() {
        let mut detector = TypeDetector::new();
        for poll in 0..DETECTION_CACHE_CAPACITY * 3 {
            let values = [json!(poll + 1000), json!(poll + 2000)];
            assert_eq!(detector.detect("count", &refs(&values), true), ColumnType::Number);
            assert!(detector.cached() <= DETECTION_CACHE_CAPACITY);
        }
    }
}
