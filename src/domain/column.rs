//! Column declarations and their enriched form.
//!
//! A [`ColumnDef`] is what the host declares. After enrichment (see
//! [`crate::columns`]) the same type carries the resolved [`ColumnType`], the
//! defaulted flags and, for badge columns, a complete color map.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Resolved kind of a column.
///
/// `Actions` and `Custom` are only ever declared by the host; inference
/// produces one of the first five variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Date,
    Boolean,
    Badge,
    Actions,
    Custom,
}

impl ColumnType {
    /// Lowercase name used in configuration files and outbound summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Badge => "badge",
            Self::Actions => "actions",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display color of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    #[default]
    Gray,
    Red,
    Yellow,
    Green,
    Blue,
    Indigo,
    Purple,
    Pink,
    Orange,
    Teal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    #[default]
    Soft,
    Filled,
    Outlined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeSize {
    Xs,
    #[default]
    Sm,
    Md,
    Lg,
}

/// Labels used when rendering boolean cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanLabels {
    #[serde(rename = "true")]
    pub yes: String,
    #[serde(rename = "false")]
    pub no: String,
}

impl Default for BooleanLabels {
    fn default() -> Self {
        Self {
            yes: "Yes".to_string(),
            no: "No".to_string(),
        }
    }
}

/// Badge rendering configuration of a column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    /// Explicit value → color entries. After enrichment this also holds the
    /// generated colors for every observed value.
    pub color_map: BTreeMap<String, BadgeColor>,
    pub default_color: BadgeColor,
    pub variant: BadgeVariant,
    pub size: BadgeSize,
    pub true_false_labels: Option<BooleanLabels>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickySide {
    Left,
    Right,
}

/// Presentation hints passed through untouched to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub header_class: Option<String>,
    pub cell_class: Option<String>,
    pub bordered: Option<bool>,
    pub background: Option<String>,
    pub text_color: Option<String>,
    pub font_weight: Option<String>,
    pub font_size: Option<String>,
}

/// Column-level formatting function, called with `(value, row)`.
#[derive(Clone)]
pub struct CellFormatter(Arc<dyn Fn(&Value, &Value) -> String + Send + Sync>);

impl CellFormatter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn call(&self, value: &Value, row: &Value) -> String {
        (self.0)(value, row)
    }
}

impl fmt::Debug for CellFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellFormatter(..)")
    }
}

/// A column declaration.
///
/// Only `key` and `label` are required. `kind == None` (or `type = "auto"` in
/// configuration files) asks the engine to infer the type from the data.
///
/// # Examples
///
/// ```
/// use complete_table::domain::{ColumnDef, ColumnType};
///
/// let status = ColumnDef::new("status", "Status");
/// let amount = ColumnDef::new("amount", "Amount").with_type(ColumnType::Number);
/// assert!(status.kind.is_none());
/// assert_eq!(amount.kind, Some(ColumnType::Number));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<ColumnType>,
    #[serde(skip)]
    pub format: Option<CellFormatter>,
    #[serde(default, rename = "badge_config")]
    pub badge: Option<BadgeConfig>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub searchable: bool,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub sticky: Option<StickySide>,
    #[serde(default)]
    pub align: Option<Align>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub min_width: Option<String>,
    #[serde(default)]
    pub max_width: Option<String>,
    #[serde(default)]
    pub appearance: Option<Appearance>,
}

const fn default_true() -> bool {
    true
}

fn deserialize_kind<'de, D>(deserializer: D) -> Result<Option<ColumnType>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Declared {
        Fixed(ColumnType),
        Other(String),
    }

    match Option::<Declared>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Declared::Fixed(kind)) => Ok(Some(kind)),
        Some(Declared::Other(s)) if s == "auto" => Ok(None),
        Some(Declared::Other(s)) => Err(serde::de::Error::custom(format!(
            "unknown column type `{s}`"
        ))),
    }
}

impl ColumnDef {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: None,
            format: None,
            badge: None,
            visible: true,
            searchable: true,
            sortable: false,
            priority: 0,
            sticky: None,
            align: None,
            width: None,
            min_width: None,
            max_width: None,
            appearance: None,
        }
    }

    #[must_use]
    pub const fn with_type(mut self, kind: ColumnType) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_format<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> String + Send + Sync + 'static,
    {
        self.format = Some(CellFormatter::new(f));
        self
    }

    #[must_use]
    pub fn with_badge(mut self, badge: BadgeConfig) -> Self {
        self.badge = Some(badge);
        self
    }

    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Resolved type, treating an undetected column as text.
    #[must_use]
    pub fn resolved_type(&self) -> ColumnType {
        self.kind.unwrap_or(ColumnType::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_declaration_defaults_flags() {
        let col: ColumnDef = toml::from_str("key = \"status\"\nlabel = \"Status\"\ntype = \"auto\"").unwrap();
        assert!(col.kind.is_none());
        assert!(col.visible);
        assert!(col.searchable);
        assert_eq!(col.priority, 0);
    }

    #[test]
    fn toml_declaration_accepts_fixed_type_and_badge_map() {
        let src = r#"
            key = "state"
            label = "State"
            type = "badge"

            [badge_config.color_map]
            open = "teal"
        "#;
        let col: ColumnDef = toml::from_str(src).unwrap();
        assert_eq!(col.kind, Some(ColumnType::Badge));
        let badge = col.badge.unwrap();
        assert_eq!(badge.color_map.get("open"), Some(&BadgeColor::Teal));
        assert_eq!(badge.default_color, BadgeColor::Gray);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let res: Result<ColumnDef, _> = toml::from_str("key = \"a\"\nlabel = \"A\"\ntype = \"money\"");
        assert!(res.is_err());
    }
}
