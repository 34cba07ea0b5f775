//! Cell formatting.
//!
//! Resolution order for a cell:
//!
//! 1. null or missing value → [`PLACEHOLDER`]
//! 2. the column's own formatter
//! 3. the default for the column type (boolean labels, locale date, grouped number)
//! 4. the raw value
//!
//! Formatting never fails. A value that does not fit its column type is
//! rendered raw.

use super::inference::{parse_date, parse_number, FALSE_WORDS, TRUE_WORDS};
use crate::domain::row::value_to_text;
use crate::domain::{BooleanLabels, ColumnDef, ColumnType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rendered in place of a null or missing value.
pub const PLACEHOLDER: &str = "-";

const MAX_FRACTION_DIGITS: usize = 3;

/// Locale conventions used for dates and numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLocale {
    /// `1,234.5` and `03/31/2024`.
    #[default]
    En,
    /// `1 234,5` and `31/03/2024`.
    Fr,
    /// `1234.5` and `2024-03-31`.
    Iso,
}

impl TableLocale {
    const fn date_pattern(self) -> &'static str {
        match self {
            Self::En => "%m/%d/%Y",
            Self::Fr => "%d/%m/%Y",
            Self::Iso => "%Y-%m-%d",
        }
    }

    const fn separators(self) -> (Option<char>, char) {
        match self {
            Self::En => (Some(','), '.'),
            Self::Fr => (Some('\u{202f}'), ','),
            Self::Iso => (None, '.'),
        }
    }

    /// Parses a locale name such as `"en"`, `"fr-FR"` or `"iso"`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let lang = name.trim().to_lowercase();
        match lang.split(['-', '_']).next() {
            Some("en") => Some(Self::En),
            Some("fr") => Some(Self::Fr),
            Some("iso") => Some(Self::Iso),
            _ => None,
        }
    }
}

/// Formats a number with grouped thousands and at most three fraction digits.
///
/// ```
/// use complete_table::columns::format::{format_number, TableLocale};
///
/// assert_eq!(format_number(1234567.891, TableLocale::En), "1,234,567.891");
/// assert_eq!(format_number(-1234.5, TableLocale::Fr), "-1\u{202f}234,5");
/// assert_eq!(format_number(0.10004, TableLocale::En), "0.1");
/// ```
#[must_use]
pub fn format_number(n: f64, locale: TableLocale) -> String {
    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let (group_sep, decimal_sep) = locale.separators();

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            if let Some(sep) = group_sep {
                grouped.push(sep);
            }
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let mut out = String::new();
    if n.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push(decimal_sep);
        out.push_str(frac_part);
    }
    out
}

/// Maps a boolean-like cell to its label, or `None` if it is not boolean-like.
#[must_use]
pub fn format_boolean(value: &Value, labels: &BooleanLabels) -> Option<String> {
    let truth = match value {
        Value::Bool(b) => *b,
        other => {
            let normalized = value_to_text(other).trim().to_lowercase();
            if TRUE_WORDS.contains(&normalized.as_str()) {
                true
            } else if FALSE_WORDS.contains(&normalized.as_str()) {
                false
            } else {
                return None;
            }
        }
    };
    Some(if truth { labels.yes.clone() } else { labels.no.clone() })
}

/// Formats one cell of `row` for `column`.
///
/// # Examples
///
/// ```
/// use complete_table::columns::format::{format_cell, TableLocale};
/// use complete_table::domain::{ColumnDef, ColumnType};
/// use serde_json::json;
///
/// let row = json!({ "total": 1500, "paid": "oui", "due": null });
/// let total = ColumnDef::new("total", "Total").with_type(ColumnType::Number);
/// let paid = ColumnDef::new("paid", "Paid").with_type(ColumnType::Boolean);
/// let due = ColumnDef::new("due", "Due").with_type(ColumnType::Date);
///
/// assert_eq!(format_cell(&row, &total, TableLocale::En), "1,500");
/// assert_eq!(format_cell(&row, &paid, TableLocale::En), "Yes");
/// assert_eq!(format_cell(&row, &due, TableLocale::En), "-");
/// ```
#[must_use]
pub fn format_cell(row: &Value, column: &ColumnDef, locale: TableLocale) -> String {
    match crate::domain::row::value_at(row, &column.key) {
        Some(value) => format_value(value, row, column, locale),
        None => PLACEHOLDER.to_string(),
    }
}

/// Formats an already-extracted value. See [`format_cell`].
#[must_use]
pub fn format_value(value: &Value, row: &Value, column: &ColumnDef, locale: TableLocale) -> String {
    if value.is_null() {
        return PLACEHOLDER.to_string();
    }
    if let Some(formatter) = &column.format {
        return formatter.call(value, row);
    }

    let typed = match column.resolved_type() {
        ColumnType::Boolean => {
            let labels = column
                .badge
                .as_ref()
                .and_then(|b| b.true_false_labels.clone())
                .unwrap_or_default();
            format_boolean(value, &labels)
        }
        ColumnType::Date => parse_date(value).map(|d| d.format(locale.date_pattern()).to_string()),
        ColumnType::Number => parse_number(value).map(|n| format_number(n, locale)),
        ColumnType::Text | ColumnType::Badge | ColumnType::Actions | ColumnType::Custom => None,
    };

    typed.unwrap_or_else(|| value_to_text(value))
}
