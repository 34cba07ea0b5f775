//! Command-line front end for the table engine.
//!
//! Reads a JSON array of rows, runs column enrichment, and prints the result
//! as JSON. Useful to check what the engine infers for a dataset before wiring
//! it into a renderer.
//!
//! # Pipeline
//!
//! ```text
//! rows.json ─▶ enrich columns ─▶ sort ─▶ search filter ─▶ page ─▶ JSON report
//!                   ▲
//!        columns.toml / config.toml (optional)
//! ```
//!
//! # Usage
//!
//! ```text
//! complete-table users.json
//! complete-table users.json --config table.toml --columns columns.toml
//! complete-table users.json --view --sort name --desc --search "ada" --page 2 --page-size 20
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see detection decisions.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use complete_table::app::search::filter_rows;
use complete_table::app::SortState;
use complete_table::observability::init_tracing;
use complete_table::ui::pagination::{PageInfo, PageItem, DEFAULT_MAX_VISIBLE};
use complete_table::ui::TableViewModel;
use complete_table::{initialize, ColumnDef, Result, TableConfig, TableError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Number of rows scanned for column keys when no declarations are given.
const KEY_SCAN_LIMIT: usize = 100;

#[derive(Parser)]
#[command(name = "complete-table")]
#[command(about = "Infer column types and render table state for a JSON dataset", long_about = None)]
struct Cli {
    /// JSON file holding an array of row objects
    rows: PathBuf,

    /// TOML table configuration
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// TOML file with `[[columns]]` declarations (keys are discovered from the rows otherwise)
    #[arg(long)]
    columns: Option<PathBuf>,

    /// Include the rendered view model of the selected page
    #[arg(long)]
    view: bool,

    /// Sort by this column key
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending (with --sort)
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Keep only rows matching this search text
    #[arg(long)]
    search: Option<String>,

    /// 1-based page to render
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page; 0 renders every row
    #[arg(long, default_value_t = 0)]
    page_size: usize,
}

#[derive(Deserialize)]
struct ColumnFile {
    columns: Vec<ColumnDef>,
}

#[derive(Serialize)]
struct PageReport {
    current_page: usize,
    total_pages: usize,
    start_item: usize,
    end_item: usize,
    pages: Vec<PageItem>,
}

#[derive(Serialize)]
struct Report {
    rows: usize,
    matched: usize,
    columns: Vec<ColumnDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<PageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<TableViewModel>,
}

fn read_rows(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Array(rows) => Ok(rows),
        _ => Err(TableError::Config(format!(
            "{} must contain a JSON array of rows",
            path.display()
        ))),
    }
}

fn read_columns(path: &Path) -> Result<Vec<ColumnDef>> {
    let content = std::fs::read_to_string(path)?;
    let file: ColumnFile = toml::from_str(&content)?;
    Ok(file.columns)
}

/// One auto-typed column per top-level key, in first-seen order.
fn discover_columns(rows: &[Value]) -> Vec<ColumnDef> {
    let mut keys: Vec<String> = Vec::new();
    for row in rows.iter().take(KEY_SCAN_LIMIT) {
        if let Value::Object(map) = row {
            for key in map.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
    }
    keys.into_iter()
        .map(|key| ColumnDef::new(key.clone(), key).sortable())
        .collect()
}

/// Rows of the requested page; everything when paging is off, nothing past the last page.
fn page_slice(rows: Vec<Value>, page: Option<&PageInfo>) -> Vec<Value> {
    match page {
        Some(info) if info.current_page <= info.total_pages() => rows
            .into_iter()
            .skip(info.start_item().saturating_sub(1))
            .take(info.end_item() + 1 - info.start_item())
            .collect(),
        Some(_) => Vec::new(),
        None => rows,
    }
}

fn run(cli: &Cli) -> Result<Report> {
    let config = cli
        .config
        .as_ref()
        .map_or_else(|| Ok(TableConfig::default()), TableConfig::from_file)?;
    init_tracing(&config);

    let rows = read_rows(&cli.rows)?;
    let declared = match &cli.columns {
        Some(path) => read_columns(path)?,
        None => discover_columns(&rows),
    };
    tracing::info!(rows = rows.len(), columns = declared.len(), "dataset loaded");

    let mut state = initialize(&config);
    state.set_data(Arc::from(rows.clone()));
    state.set_columns(Arc::from(declared));
    let enriched = state.enriched_columns();

    let mut processed = rows;
    if let Some(column) = &cli.sort {
        let mut sort = SortState::new();
        sort.sort(column);
        if cli.desc {
            sort.sort(column);
        }
        sort.sort_rows(&mut processed);
    }
    if let Some(query) = &cli.search {
        let keep = filter_rows(&processed, &enriched, query, config.locale);
        processed = keep.into_iter().map(|i| processed[i].clone()).collect();
    }
    let matched = processed.len();

    let page = (cli.page_size > 0).then(|| PageInfo::new(cli.page, cli.page_size, matched));
    let page_rows = page_slice(processed, page.as_ref());

    let view = cli.view.then(|| {
        let mut view_state = initialize(&config);
        view_state.set_columns(Arc::clone(&enriched));
        view_state.set_data(Arc::from(page_rows));
        view_state.compute_viewmodel()
    });

    Ok(Report {
        rows: state.rows().len(),
        matched,
        columns: enriched.to_vec(),
        page: page.map(|info| PageReport {
            current_page: info.current_page,
            total_pages: info.total_pages(),
            start_item: info.start_item(),
            end_item: info.end_item(),
            pages: info.visible_pages(DEFAULT_MAX_VISIBLE),
        }),
        view,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.page == 0 {
        eprintln!("error: --page is 1-based");
        return ExitCode::FAILURE;
    }

    match run(&cli).and_then(|report| Ok(serde_json::to_string_pretty(&report)?)) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "complete-table failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Value> {
        (1..=n).map(|id| json!({ "id": id })).collect()
    }

    #[test]
    fn page_slice_takes_the_requested_page() {
        let info = PageInfo::new(2, 4, 10);
        let ids: Vec<_> = page_slice(rows(10), Some(&info)).iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(5), json!(6), json!(7), json!(8)]);
        assert_eq!(page_slice(rows(10), None).len(), 10);
    }

    #[test]
    fn page_slice_past_the_end_is_empty() {
        let huge = PageInfo::new(4_611_686_018_427_387_904, 4, 10);
        assert!(page_slice(rows(10), Some(&huge)).is_empty());
        assert!(page_slice(Vec::new(), Some(&PageInfo::new(1, 4, 0))).is_empty());
    }
}
