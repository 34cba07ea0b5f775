//! Complete Table: a headless, adaptive data-table engine.
//!
//! The engine owns everything a data table decides that is not markup:
//! - Heuristic column-type inference from sampled rows (boolean, date, number, badge, text)
//! - Semantic badge colors with a round-robin palette fallback
//! - Locale-aware cell formatting with a `-` placeholder for missing values
//! - Single-column sort state, identity-based row selection
//! - Per-row asynchronous actions with loading tracking and exclusive dropdown menus
//! - Debounced free-text search and page-window computation

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host renderer / CLI (main.rs)                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ Event            ▲ TableEvent
//!                        ▼                  │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Sort, selection, search, row actions             │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                                      │
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │ Columns Layer (columns/) │   │ UI Layer (ui/)           │
//! │ - Type inference         │   │ - View model types       │
//! │ - Badge colors           │   │ - Pagination window      │
//! │ - Cell formatting        │   │                          │
//! └──────────────────────────┘   └──────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Column and action declarations                   │
//! │  - Row access and identity                          │
//! │  - Error types                                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber setup                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Table state machine with inbound events and outbound notifications
//! - [`columns`]: Column enrichment (inference, badges, formatting)
//! - [`domain`]: Core domain types (columns, actions, rows, errors)
//! - [`ui`]: View models and pagination
//! - [`observability`]: `tracing` subscriber initialization
//!
//! # Configuration
//!
//! The table is configured from a TOML file, a TOML string, or the flat
//! string map a host framework passes around:
//!
//! ```toml
//! auto_detect_types = true
//! smart_badges = true
//! selectable = true
//! multi_select = true
//! striped = true
//! locale = "fr"
//! search_debounce_ms = 300
//! track_by = "uuid"
//!
//! [global_styles]
//! header_bg = "bg-gray-50"
//! selected_bg = "bg-primary-light"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use complete_table::{handle_event, initialize, Event, TableConfig, TableEvent};
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! let config = TableConfig {
//!     selectable: true,
//!     ..Default::default()
//! };
//! let mut state = initialize(&config);
//!
//! let rows: Arc<[Value]> = vec![json!({ "id": 1, "status": "active" })].into();
//! handle_event(&mut state, &Event::SetData(rows))?;
//!
//! let events = handle_event(&mut state, &Event::ToggleRow(0))?;
//! assert!(matches!(&events[0], TableEvent::SelectionChanged { items } if items.len() == 1));
//! # Ok::<(), complete_table::TableError>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## Headless State
//!
//! The engine never renders. Hosts feed [`Event`]s into [`handle_event`],
//! forward the returned [`TableEvent`]s and draw from
//! [`TableState::compute_viewmodel`].
//!
//! ## Memoized Enrichment
//!
//! Column enrichment is keyed on the identity of the row and column buffers
//! (`Arc` pointers), so recomputing on every change notification costs
//! nothing until new data actually arrives.
//!
//! ## Loading Owned by the Engine
//!
//! Action descriptors are never mutated. In-flight state is tracked per
//! `(action, row)` pair, so the same action can run on several rows at once.

pub mod app;
pub mod columns;
pub mod domain;
pub mod observability;
pub mod ui;

pub use app::{handle_event, ActionExecuted, Event, SortDirection, TableEvent, TableState};
pub use columns::format::TableLocale;
pub use columns::{ColumnEnricher, DetectionOptions};
pub use domain::{ActionDef, ColumnDef, ColumnType, Result, RowIdentity, RowKey, TableError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Opaque style overrides forwarded to the renderer.
///
/// The engine only stores these; their values are class names or CSS
/// fragments interpreted by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalStyles {
    pub header_bg: Option<String>,
    pub header_text: Option<String>,
    pub row_hover: Option<String>,
    pub selected_bg: Option<String>,
    pub border_color: Option<String>,
    pub font_size: Option<String>,
    pub default_border: bool,
    pub table_height: Option<String>,
}

impl Default for GlobalStyles {
    fn default() -> Self {
        Self {
            header_bg: Some("bg-gray-50".to_string()),
            header_text: Some("text-gray-900".to_string()),
            row_hover: Some("hover:bg-gray-50".to_string()),
            selected_bg: Some("bg-primary-light".to_string()),
            border_color: Some("border-gray-200".to_string()),
            font_size: Some("sm".to_string()),
            default_border: true,
            table_height: None,
        }
    }
}

/// Table configuration.
///
/// Every field has a default, so a configuration file only lists what it
/// overrides.
///
/// # Example
///
/// ```toml
/// selectable = true
/// multi_select = false
/// show_row_numbers = true
/// trace_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Detect the type of columns declared without one. Default: `true`
    pub auto_detect_types: bool,

    /// Allow detection to classify categorical columns as badges. Default: `true`
    pub smart_badges: bool,

    pub striped: bool,
    pub hover: bool,
    pub bordered: bool,
    pub compact: bool,

    /// Enables the selection column and selection events.
    pub selectable: bool,

    /// When `false`, selecting a row replaces the previous selection. Default: `true`
    pub multi_select: bool,

    /// Shows the search field.
    pub searchable: bool,

    pub show_row_numbers: bool,
    pub sticky_header: bool,

    /// Carried for the renderer; the engine does not virtualize.
    pub virtual_scrolling: bool,

    /// Locale used for dates and numbers. Default: `en`
    pub locale: TableLocale,

    /// Delay between the last keystroke and the committed search. Default: `300`
    pub search_debounce_ms: u64,

    /// Commit an emptied search field immediately instead of debouncing it.
    pub instant_clear_search: bool,

    /// Clear selection, sort and open menus when a new dataset is set.
    pub reset_on_data_change: bool,

    /// Dotted path of the row identity field. Default: `id`
    ///
    /// A key function can be installed with [`TableState::set_row_identity`].
    pub track_by: Option<String>,

    pub global_styles: GlobalStyles,

    /// Tracing level for the subscriber installed by
    /// [`observability::init_tracing`].
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            auto_detect_types: true,
            smart_badges: true,
            striped: false,
            hover: false,
            bordered: false,
            compact: false,
            selectable: false,
            multi_select: true,
            searchable: false,
            show_row_numbers: false,
            sticky_header: false,
            virtual_scrolling: false,
            locale: TableLocale::default(),
            search_debounce_ms: 300,
            instant_clear_search: false,
            reset_on_data_change: false,
            track_by: None,
            global_styles: GlobalStyles::default(),
            trace_level: None,
        }
    }
}

fn parse_flag(config: &BTreeMap<String, String>, key: &str, default: bool) -> bool {
    let Some(raw) = config.get(key) else {
        return default;
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        other => {
            tracing::warn!(key, value = other, "invalid boolean option, using default");
            default
        }
    }
}

impl TableConfig {
    /// Parses configuration from a flat string map.
    ///
    /// Unknown keys are ignored and malformed values fall back to their
    /// defaults with a warning. Style overrides use a `global_styles.` prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use complete_table::{TableConfig, TableLocale};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("selectable".to_string(), "true".to_string());
    /// map.insert("locale".to_string(), "fr-FR".to_string());
    /// map.insert("search_debounce_ms".to_string(), "150".to_string());
    ///
    /// let config = TableConfig::from_map(&map);
    /// assert!(config.selectable);
    /// assert_eq!(config.locale, TableLocale::Fr);
    /// assert_eq!(config.search_debounce_ms, 150);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let locale = config.get("locale").map_or(defaults.locale, |name| {
            TableLocale::parse(name).unwrap_or_else(|| {
                tracing::warn!(locale = %name, "unknown locale, using default");
                defaults.locale
            })
        });

        let search_debounce_ms = config
            .get("search_debounce_ms")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(defaults.search_debounce_ms);

        let style = |key: &str, default: Option<String>| {
            config
                .get(&format!("global_styles.{key}"))
                .cloned()
                .or(default)
        };
        let base = defaults.global_styles.clone();
        let global_styles = GlobalStyles {
            header_bg: style("header_bg", base.header_bg),
            header_text: style("header_text", base.header_text),
            row_hover: style("row_hover", base.row_hover),
            selected_bg: style("selected_bg", base.selected_bg),
            border_color: style("border_color", base.border_color),
            font_size: style("font_size", base.font_size),
            default_border: parse_flag(config, "global_styles.default_border", base.default_border),
            table_height: style("table_height", base.table_height),
        };

        Self {
            auto_detect_types: parse_flag(config, "auto_detect_types", defaults.auto_detect_types),
            smart_badges: parse_flag(config, "smart_badges", defaults.smart_badges),
            striped: parse_flag(config, "striped", defaults.striped),
            hover: parse_flag(config, "hover", defaults.hover),
            bordered: parse_flag(config, "bordered", defaults.bordered),
            compact: parse_flag(config, "compact", defaults.compact),
            selectable: parse_flag(config, "selectable", defaults.selectable),
            multi_select: parse_flag(config, "multi_select", defaults.multi_select),
            searchable: parse_flag(config, "searchable", defaults.searchable),
            show_row_numbers: parse_flag(config, "show_row_numbers", defaults.show_row_numbers),
            sticky_header: parse_flag(config, "sticky_header", defaults.sticky_header),
            virtual_scrolling: parse_flag(config, "virtual_scrolling", defaults.virtual_scrolling),
            locale,
            search_debounce_ms,
            instant_clear_search: parse_flag(config, "instant_clear_search", defaults.instant_clear_search),
            reset_on_data_change: parse_flag(config, "reset_on_data_change", defaults.reset_on_data_change),
            track_by: config.get("track_by").map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            global_styles,
            trace_level: config.get("trace_level").cloned(),
        }
    }

    /// Parses a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Parse`] for malformed TOML or mistyped fields and
    /// [`TableError::Config`] when the values are inconsistent.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] when the file cannot be read, otherwise the
    /// errors of [`TableConfig::from_toml_str`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading table configuration");
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.track_by.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(TableError::Config("track_by must not be empty".to_string()));
        }
        if let Some(level) = &self.trace_level {
            if tracing_subscriber::EnvFilter::try_new(level).is_err() {
                return Err(TableError::Config(format!("invalid trace_level `{level}`")));
            }
        }
        Ok(())
    }

    /// Options that influence column enrichment.
    #[must_use]
    pub const fn detection_options(&self) -> DetectionOptions {
        DetectionOptions {
            auto_detect_types: self.auto_detect_types,
            smart_badges: self.smart_badges,
        }
    }

    /// Row identity derived from `track_by`.
    #[must_use]
    pub fn row_identity(&self) -> RowIdentity {
        self.track_by
            .as_ref()
            .map_or_else(RowIdentity::default, |path| RowIdentity::Field(path.clone()))
    }
}

/// Creates a table instance for `config`.
///
/// The table starts without rows, columns or actions; feed them with
/// [`Event::SetData`], [`Event::SetColumns`] and
/// [`TableState::set_actions`].
///
/// # Example
///
/// ```rust
/// use complete_table::{initialize, TableConfig};
///
/// let state = initialize(&TableConfig::default());
/// assert!(state.rows().is_empty());
/// ```
#[must_use]
pub fn initialize(config: &TableConfig) -> TableState {
    tracing::debug!(
        selectable = config.selectable,
        multi_select = config.multi_select,
        locale = ?config.locale,
        "initializing table"
    );
    TableState::new(config.clone())
}
