//! Column enrichment: type inference, badge colors and cell formatting.
//!
//! Enrichment turns the host's column declarations into render-ready columns
//! by detecting the type of every `auto` column from the data and applying
//! the per-type defaults (badge color maps, boolean labels, number
//! alignment). It is a pure function of (rows, declarations, options); the
//! [`ColumnEnricher`] memoizes it so the host can call it on every change
//! notification without paying for unchanged inputs.
//!
//! # Modules
//!
//! - [`inference`]: Stride sampling and the type classification ladder
//! - [`badges`]: Semantic and round-robin badge colors
//! - [`format`]: Display strings for cells

pub mod badges;
pub mod format;
pub mod inference;

use crate::domain::row::value_to_text;
use crate::domain::{Align, BadgeConfig, BooleanLabels, ColumnDef, ColumnType};
use inference::{sample_values, TypeDetector};
use serde_json::Value;
use std::sync::Arc;

/// Options of the table configuration that influence enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionOptions {
    pub auto_detect_types: bool,
    pub smart_badges: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            auto_detect_types: true,
            smart_badges: true,
        }
    }
}

/// Enriches `columns` against `rows`.
///
/// The output always has one column per input column, in the same order.
/// Columns with a declared type keep it; `auto` columns without any usable
/// sample value stay undetected and render as text.
pub fn enrich_columns(
    detector: &mut TypeDetector,
    columns: &[ColumnDef],
    rows: &[Value],
    options: DetectionOptions,
) -> Vec<ColumnDef> {
    let _span = tracing::debug_span!(
        "enrich_columns",
        columns = columns.len(),
        rows = rows.len(),
        auto_detect = options.auto_detect_types
    )
    .entered();

    columns
        .iter()
        .map(|column| {
            let mut enriched = column.clone();
            if rows.is_empty() {
                return enriched;
            }

            let values = sample_values(rows, &column.key);
            if values.is_empty() {
                return enriched;
            }

            if enriched.kind.is_none() {
                if !options.auto_detect_types {
                    return enriched;
                }
                enriched.kind = Some(detector.detect(&column.key, &values, options.smart_badges));
            }
            configure_by_type(&mut enriched, &values);
            enriched
        })
        .collect()
}

fn configure_by_type(column: &mut ColumnDef, values: &[&Value]) {
    match column.kind {
        Some(ColumnType::Badge) => {
            let mut unique: Vec<String> = Vec::new();
            for text in values.iter().map(|v| value_to_text(v)) {
                if !unique.contains(&text) {
                    unique.push(text);
                }
            }
            let badge = column.badge.get_or_insert_with(BadgeConfig::default);
            badge.color_map = badges::assign_colors(&unique, &badge.color_map);
        }
        Some(ColumnType::Boolean) => {
            if column.badge.is_none() {
                column.badge = Some(BadgeConfig {
                    true_false_labels: Some(BooleanLabels::default()),
                    ..BadgeConfig::default()
                });
            }
        }
        Some(ColumnType::Number) => {
            column.align.get_or_insert(Align::Right);
        }
        _ => {}
    }
}

struct Memo {
    rows: Arc<[Value]>,
    columns: Arc<[ColumnDef]>,
    options: DetectionOptions,
    enriched: Arc<[ColumnDef]>,
}

/// Memoized column enrichment.
///
/// The memo key is the identity of the row and declaration buffers (`Arc`
/// pointer equality) plus the detection options. Replacing either buffer with
/// a new `Arc` triggers a recompute; detection results for identical samples
/// are still served from the detector cache.
///
/// # Examples
///
/// ```
/// use complete_table::columns::{ColumnEnricher, DetectionOptions};
/// use complete_table::domain::{ColumnDef, ColumnType};
/// use serde_json::{json, Value};
/// use std::sync::Arc;
///
/// let rows: Arc<[Value]> = vec![json!({ "qty": 3 }), json!({ "qty": 12 })].into();
/// let columns: Arc<[ColumnDef]> = vec![ColumnDef::new("qty", "Qty")].into();
///
/// let mut enricher = ColumnEnricher::new();
/// let enriched = enricher.enrich(&rows, &columns, DetectionOptions::default());
/// assert_eq!(enriched[0].kind, Some(ColumnType::Number));
///
/// let again = enricher.enrich(&rows, &columns, DetectionOptions::default());
/// assert!(Arc::ptr_eq(&enriched, &again));
/// ```
#[derive(Default)]
pub struct ColumnEnricher {
    detector: TypeDetector,
    memo: Option<Memo>,
}

impl std::fmt::Debug for ColumnEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnEnricher")
            .field("detector", &self.detector)
            .field("memoized", &self.memo.is_some())
            .finish()
    }
}

impl ColumnEnricher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the enriched columns, recomputing only when an input changed.
    pub fn enrich(
        &mut self,
        rows: &Arc<[Value]>,
        columns: &Arc<[ColumnDef]>,
        options: DetectionOptions,
    ) -> Arc<[ColumnDef]> {
        if let Some(memo) = &self.memo {
            if Arc::ptr_eq(&memo.rows, rows) && Arc::ptr_eq(&memo.columns, columns) && memo.options == options {
                return Arc::clone(&memo.enriched);
            }
        }

        let enriched: Arc<[ColumnDef]> = enrich_columns(&mut self.detector, columns, rows, options).into();
        self.memo = Some(Memo {
            rows: Arc::clone(rows),
            columns: Arc::clone(columns),
            options,
            enriched: Arc::clone(&enriched),
        });
        enriched
    }

    /// Drops the memoized result. The detection cache is kept.
    pub fn invalidate(&mut self) {
        self.memo = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BadgeColor;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({ "id": 1, "status": "active", "amount": "1200", "joined": "2023-01-05", "meta": { "tier": "gold" } }),
            json!({ "id": 2, "status": "inactive", "amount": "87.5", "joined": "2023-02-11", "meta": { "tier": "silver" } }),
            json!({ "id": 3, "status": "pending", "amount": "40", "joined": "2023-03-20", "meta": { "tier": "gold" } }),
            json!({ "id": 4, "status": "active", "amount": "5", "joined": "2023-04-02", "meta": { "tier": "bronze" } }),
        ]
    }

    #[test]
    fn enrichment_preserves_count_and_order() {
        let columns = vec![
            ColumnDef::new("status", "Status"),
            ColumnDef::new("amount", "Amount"),
            ColumnDef::new("joined", "Joined"),
            ColumnDef::new("meta.tier", "Tier"),
            ColumnDef::new("missing", "Missing"),
        ];
        let mut detector = TypeDetector::new();
        let enriched = enrich_columns(&mut detector, &columns, &rows(), DetectionOptions::default());

        assert_eq!(enriched.len(), columns.len());
        let kinds: Vec<_> = enriched.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Some(ColumnType::Badge),
                Some(ColumnType::Number),
                Some(ColumnType::Date),
                Some(ColumnType::Badge),
                None,
            ]
        );
        assert!(enriched.iter().all(|c| c.visible && c.priority == 0));
    }

    #[test]
    fn badge_columns_get_semantic_color_maps() {
        let columns = vec![ColumnDef::new("status", "Status")];
        let mut detector = TypeDetector::new();
        let enriched = enrich_columns(&mut detector, &columns, &rows(), DetectionOptions::default());
        let badge = enriched[0].badge.as_ref().unwrap();

        assert_eq!(badge.color_map["active"], BadgeColor::Green);
        assert_eq!(badge.color_map["inactive"], BadgeColor::Red);
        assert_eq!(badge.color_map["pending"], BadgeColor::Yellow);
        assert_eq!(badge.default_color, BadgeColor::Gray);
    }

    #[test]
    fn number_columns_align_right_unless_declared() {
        let mut centered = ColumnDef::new("id", "Id");
        centered.align = Some(Align::Center);
        let columns = vec![ColumnDef::new("amount", "Amount"), centered];
        let mut detector = TypeDetector::new();
        let enriched = enrich_columns(&mut detector, &columns, &rows(), DetectionOptions::default());
        assert_eq!(enriched[0].align, Some(Align::Right));
        assert_eq!(enriched[1].align, Some(Align::Center));
    }

    #[test]
    fn declared_types_are_never_overridden() {
        let columns = vec![ColumnDef::new("amount", "Amount").with_type(ColumnType::Text)];
        let mut detector = TypeDetector::new();
        let enriched = enrich_columns(&mut detector, &columns, &rows(), DetectionOptions::default());
        assert_eq!(enriched[0].kind, Some(ColumnType::Text));
        assert_eq!(detector.cached(), 0);
    }

    #[test]
    fn detection_can_be_disabled() {
        let columns = vec![ColumnDef::new("amount", "Amount")];
        let options = DetectionOptions {
            auto_detect_types: false,
            smart_badges: true,
        };
        let mut detector = TypeDetector::new();
        let enriched = enrich_columns(&mut detector, &columns, &rows(), options);
        assert_eq!(enriched[0].kind, None);
        assert_eq!(enriched[0].resolved_type(), ColumnType::Text);
    }

    #[test]
    fn enricher_recomputes_on_new_buffers() {
        let columns: Arc<[ColumnDef]> = vec![ColumnDef::new("amount", "Amount")].into();
        let first: Arc<[Value]> = rows().into();
        let second: Arc<[Value]> = vec![json!({ "amount": "x" }), json!({ "amount": "y" })].into();

        let mut enricher = ColumnEnricher::new();
        let a = enricher.enrich(&first, &columns, DetectionOptions::default());
        let b = enricher.enrich(&second, &columns, DetectionOptions::default());
        assert_eq!(a[0].kind, Some(ColumnType::Number));
        assert_eq!(b[0].kind, Some(ColumnType::Badge));
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
