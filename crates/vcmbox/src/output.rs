use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One displayed property: name, optional id label and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: &'static str,
    pub id: Option<&'static str>,
    pub value: String,
}

impl Row {
    pub fn new(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            id: None,
            value: value.to_string(),
        }
    }

    pub fn labeled(name: &'static str, id: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            id: Some(id),
            value: value.to_string(),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn render_rows(rows: &[Row], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PROPERTY", "ID", "VALUE"]);
            for row in rows {
                table.add_row(vec![
                    row.name.to_string(),
                    row.id.unwrap_or("").to_string(),
                    row.value.clone(),
                ]);
            }
            table.to_string()
        }
        OutputFormat::Pretty => {
            let width = rows.iter().map(|r| key(r).len()).max().unwrap_or(0);
            rows.iter()
                .map(|r| format!("  {:<width$}  {}", key(r), r.value))
                .collect::<Vec<_>>()
                .join("\n")
        }
        OutputFormat::Raw => rows
            .iter()
            .map(|r| format!("{}={}", key(r), r.value))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn key(row: &Row) -> String {
    match row.id {
        Some(id) => format!("{}.{id}", row.name),
        None => row.name.to_string(),
    }
}
