//! Badge color assignment for categorical columns.
//!
//! Values are first matched against a bilingual (English/French) semantic
//! lexicon so that "active", "validé" or "rejected" get a meaningful color.
//! Everything else is colored round-robin from a fixed palette, in the order
//! the values were first seen, which keeps the assignment deterministic for a
//! stable input ordering.

use crate::domain::{BadgeColor, BadgeConfig};
use serde_json::Value;
use std::collections::BTreeMap;

/// Colors handed out to values the lexicon does not recognize.
pub const PALETTE: [BadgeColor; 8] = [
    BadgeColor::Blue,
    BadgeColor::Green,
    BadgeColor::Yellow,
    BadgeColor::Purple,
    BadgeColor::Pink,
    BadgeColor::Indigo,
    BadgeColor::Orange,
    BadgeColor::Teal,
];

const LEXICON: &[(&str, BadgeColor)] = &[
    // positive
    ("actif", BadgeColor::Green),
    ("active", BadgeColor::Green),
    ("enabled", BadgeColor::Green),
    ("on", BadgeColor::Green),
    ("oui", BadgeColor::Green),
    ("yes", BadgeColor::Green),
    ("true", BadgeColor::Green),
    ("success", BadgeColor::Green),
    ("validé", BadgeColor::Green),
    ("approved", BadgeColor::Green),
    ("confirmé", BadgeColor::Green),
    ("terminé", BadgeColor::Green),
    // negative
    ("inactif", BadgeColor::Red),
    ("inactive", BadgeColor::Red),
    ("disabled", BadgeColor::Red),
    ("off", BadgeColor::Red),
    ("non", BadgeColor::Red),
    ("no", BadgeColor::Red),
    ("false", BadgeColor::Red),
    ("error", BadgeColor::Red),
    ("rejected", BadgeColor::Red),
    ("refusé", BadgeColor::Red),
    ("annulé", BadgeColor::Red),
    ("échec", BadgeColor::Red),
    // pending
    ("pending", BadgeColor::Yellow),
    ("en attente", BadgeColor::Yellow),
    ("warning", BadgeColor::Yellow),
    ("attention", BadgeColor::Yellow),
    ("en cours", BadgeColor::Yellow),
    ("processing", BadgeColor::Yellow),
    // informational
    ("info", BadgeColor::Blue),
    ("information", BadgeColor::Blue),
    ("draft", BadgeColor::Blue),
    ("brouillon", BadgeColor::Blue),
    ("nouveau", BadgeColor::Blue),
    ("new", BadgeColor::Blue),
    // priority
    ("high", BadgeColor::Red),
    ("haute", BadgeColor::Red),
    ("urgent", BadgeColor::Red),
    ("medium", BadgeColor::Yellow),
    ("moyenne", BadgeColor::Yellow),
    ("normal", BadgeColor::Yellow),
    ("low", BadgeColor::Green),
    ("basse", BadgeColor::Green),
    ("faible", BadgeColor::Green),
];

/// Looks a value up in the semantic lexicon.
///
/// An exact (normalized) match wins. Otherwise the longest lexicon term the
/// value contains is used, so "inactive" is red even though it contains
/// "active".
///
/// ```
/// use complete_table::columns::badges::semantic_color;
/// use complete_table::domain::BadgeColor;
///
/// assert_eq!(semantic_color("Approved"), Some(BadgeColor::Green));
/// assert_eq!(semantic_color("inactive"), Some(BadgeColor::Red));
/// assert_eq!(semantic_color("En attente de paiement"), Some(BadgeColor::Yellow));
/// assert_eq!(semantic_color("mauve"), None);
/// ```
#[must_use]
pub fn semantic_color(value: &str) -> Option<BadgeColor> {
    let normalized = value.trim().to_lowercase();
    if let Some((_, color)) = LEXICON.iter().find(|(term, _)| *term == normalized) {
        return Some(*color);
    }
    LEXICON
        .iter()
        .filter(|(term, _)| normalized.contains(term))
        .max_by_key(|(term, _)| term.chars().count())
        .map(|(_, color)| *color)
}

/// Builds a color map for the given unique values.
///
/// `values` must already be deduplicated and in first-seen order. Values the
/// lexicon does not know receive `PALETTE[index % 8]`, where `index` is their
/// position in `values`. Entries of `explicit` always override the result.
#[must_use]
pub fn assign_colors(
    values: &[String],
    explicit: &BTreeMap<String, BadgeColor>,
) -> BTreeMap<String, BadgeColor> {
    let mut map: BTreeMap<String, BadgeColor> = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let color = semantic_color(value).unwrap_or(PALETTE[index % PALETTE.len()]);
            (value.clone(), color)
        })
        .collect();

    for (value, color) in explicit {
        map.insert(value.clone(), *color);
    }
    map
}

/// Resolves the color of a single cell value against a badge configuration.
///
/// Mapped values use their map entry, JSON booleans are green/red, anything
/// else falls back to the configured default color.
#[must_use]
pub fn resolve_color(value: &Value, config: &BadgeConfig) -> BadgeColor {
    let key = match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => {
            return config
                .color_map
                .get(&b.to_string())
                .copied()
                .unwrap_or(if *b { BadgeColor::Green } else { BadgeColor::Red });
        }
        other => other.to_string(),
    };
    config.color_map.get(&key).copied().unwrap_or(config.default_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn lexicon_colors_take_precedence_over_palette() {
        let map = assign_colors(&strings(&["Validé", "Refusé", "Pending"]), &BTreeMap::new());
        assert_eq!(map["Validé"], BadgeColor::Green);
        assert_eq!(map["Refusé"], BadgeColor::Red);
        assert_eq!(map["Pending"], BadgeColor::Yellow);
    }

    #[test]
    fn unknown_values_rotate_through_palette_by_position() {
        let map = assign_colors(&strings(&["alpha", "beta", "gamma"]), &BTreeMap::new());
        assert_eq!(map["alpha"], BadgeColor::Blue);
        assert_eq!(map["beta"], BadgeColor::Green);
        assert_eq!(map["gamma"], BadgeColor::Yellow);
    }

    #[test]
    fn palette_wraps_after_eight_values() {
        let values: Vec<String> = (0..10).map(|i| format!("zz{i}")).collect();
        let map = assign_colors(&values, &BTreeMap::new());
        assert_eq!(map["zz8"], BadgeColor::Blue);
        assert_eq!(map["zz9"], BadgeColor::Green);
    }

    #[test]
    fn explicit_entries_win() {
        let explicit = BTreeMap::from([("active".to_string(), BadgeColor::Purple)]);
        let map = assign_colors(&strings(&["active", "inactive"]), &explicit);
        assert_eq!(map["active"], BadgeColor::Purple);
        assert_eq!(map["inactive"], BadgeColor::Red);
    }

    #[test]
    fn priority_terms_follow_severity() {
        assert_eq!(semantic_color("HIGH"), Some(BadgeColor::Red));
        assert_eq!(semantic_color("medium"), Some(BadgeColor::Yellow));
        assert_eq!(semantic_color("faible"), Some(BadgeColor::Green));
    }

    #[test]
    fn unresolved_cells_use_default_color() {
        let config = BadgeConfig {
            color_map: BTreeMap::from([("open".to_string(), BadgeColor::Teal)]),
            ..BadgeConfig::default()
        };
        assert_eq!(resolve_color(&json!("open"), &config), BadgeColor::Teal);
        assert_eq!(resolve_color(&json!("unknown"), &config), BadgeColor::Gray);
        assert_eq!(resolve_color(&json!(true), &config), BadgeColor::Green);
        assert_eq!(resolve_color(&json!(false), &config), BadgeColor::Red);
    }
}
