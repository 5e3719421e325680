//! Command line front end for the table engine.
//!
//! Loads a CSV file (or a small built-in order list), applies the persisted
//! view state plus any command line overrides and prints the composed page.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tv_core::{display_string, ColumnDescriptor, FilterType};
use tv_data::{CsvSource, FileStore, TableConfig, TableFeatures};
use tv_views::{RenderRow, TableController};

/// Directory holding persisted view state
const STATE_DIR: &str = ".tableview";

/// Print a filtered, sorted and paged view of a CSV file
#[derive(Parser, Debug)]
#[command(name = "tableview", version)]
struct Args {
    /// CSV file to show; a built-in order list is used when omitted
    #[arg(value_name = "PATH")]
    csv: Option<PathBuf>,

    /// JSON table configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Global search query
    #[arg(long)]
    search: Option<String>,

    /// Column to group rows by
    #[arg(long = "group", value_name = "COLUMN")]
    group_by: Option<String>,

    /// Sort column; repeat for a multi-column sort
    #[arg(long, value_name = "COLUMN")]
    sort: Vec<String>,

    #[arg(long)]
    page: Option<usize>,

    #[arg(long = "per-page", value_name = "N")]
    per_page: Option<usize>,

    /// Drop the persisted view state first
    #[arg(long, action)]
    reset: bool,
}

fn demo_rows() -> Vec<Value> {
    let customers = ["acme", "globex", "initech", "umbrella"];
    let statuses = ["open", "shipped", "closed"];
    (1..=24)
        .map(|i: usize| {
            json!({
                "id": i,
                "customer": customers[i % customers.len()],
                "status": statuses[i % statuses.len()],
                "amount": (i * 37 % 500) as f64 + 0.5,
                "created": format!("2024-03-{:02}", i),
            })
        })
        .collect()
}

fn demo_columns() -> Vec<ColumnDescriptor<Value>> {
    vec![
        ColumnDescriptor::new("id").filterable(FilterType::Number),
        ColumnDescriptor::new("customer").filterable(FilterType::Text),
        ColumnDescriptor::new("status").filterable(FilterType::Text),
        ColumnDescriptor::new("amount").filterable(FilterType::Number),
        ColumnDescriptor::new("created").filterable(FilterType::Date),
    ]
}

fn print_table(table: &TableController<Value>) {
    let columns = table.visible_columns();
    let header: Vec<&str> = columns.iter().map(|c| c.label()).collect();
    println!("{}", header.join(" | "));

    let view = table.view();
    for row in &view.rows {
        match row {
            RenderRow::GroupHeader { key, count, expanded } => {
                let marker = if *expanded { "-" } else { "+" };
                println!("{} {} ({})", marker, key, count);
            }
            RenderRow::Data { source_index } => {
                let record = &table.rows()[*source_index];
                let cells: Vec<String> = columns
                    .iter()
                    .map(|c| display_string(c.value(record).as_deref()))
                    .collect();
                println!("{}", cells.join(" | "));
            }
        }
    }

    if view.show_pagination {
        println!(
            "{} (page {} of {})",
            view.pagination.summary(),
            view.pagination.current_page,
            view.pagination.max_page
        );
    } else {
        println!("{} records", view.filtered_count);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TableConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => TableConfig::default().with_features(TableFeatures {
            pagination: true,
            ..TableFeatures::default()
        }),
    };

    let (columns, rows) = match &args.csv {
        Some(path) => {
            let source = CsvSource::load(path.clone())
                .await
                .with_context(|| format!("Failed to load {}", path.display()))?;
            if config.save_key.is_none() {
                if let Some(stem) = path.file_stem() {
                    config = config.with_save_key(stem.to_string_lossy());
                }
            }
            (source.column_descriptors(), source.into_rows())
        }
        None => {
            info!("No CSV given, using the demo order list");
            if config.save_key.is_none() {
                config = config.with_save_key("demo");
            }
            (demo_columns(), demo_rows())
        }
    };

    let store = Arc::new(FileStore::open(STATE_DIR)?);
    let mut table = TableController::new(columns, rows, config, store)?;

    if args.reset {
        table.reset_view_state();
    }
    if let Some(query) = args.search {
        table.set_search(query);
    }
    if !args.sort.is_empty() {
        for (i, column) in args.sort.iter().enumerate() {
            table.toggle_sort(column, i > 0)?;
        }
    }
    if let Some(column) = args.group_by.as_deref() {
        table.set_group_by(Some(column))?;
    }
    if let Some(per_page) = args.per_page {
        table.set_per_page(per_page);
    }
    if let Some(page) = args.page {
        table.set_page(page);
    }

    info!(
        "{} of {} rows match, {} columns visible",
        table.filtered_count(),
        table.rows().len(),
        table.visible_columns().len()
    );
    print_table(&table);
    Ok(())
}
