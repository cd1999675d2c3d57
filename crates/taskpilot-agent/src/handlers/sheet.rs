//! Sheet update: stamp an uploaded table, or synthesize a placeholder one.

use chrono::{DateTime, TimeZone};
use rand::Rng;
use tracing::debug;

use taskpilot_intent::Intent;
use taskpilot_table::{Cell, Table};

use super::DATE_FORMAT;
use crate::error::{AgentError, Result};
use crate::output::TaskOutput;

/// Columns used when the request names none.
pub const DEFAULT_COLUMNS: [&str; 4] = ["Name", "Value", "Status", "Date"];

/// Upper bound on the `rows` parameter.
pub const MAX_ROWS: u64 = 10_000;

/// Name of the timestamp column on uploaded tables.
pub const LAST_UPDATED: &str = "Last_Updated";

pub fn run<Tz, R>(
    intent: &Intent,
    uploaded: Option<&Table>,
    now: &DateTime<Tz>,
    rng: &mut R,
) -> Result<TaskOutput>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    R: Rng + ?Sized,
{
    match uploaded {
        Some(table) => stamp_upload(table, now),
        None => synthesize(intent, now, rng),
    }
}

/// Copy the upload and set its `Last_Updated` column to `now`, adding the
/// column when the sheet has none.
fn stamp_upload<Tz>(table: &Table, now: &DateTime<Tz>) -> Result<TaskOutput>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut table = table.clone();
    let stamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    table.set_constant_column(LAST_UPDATED, Cell::Text(stamp));

    let summary = format!(
        "Processed uploaded sheet: {} rows, {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(TaskOutput::Table { table, summary })
}

fn synthesize<Tz, R>(intent: &Intent, now: &DateTime<Tz>, rng: &mut R) -> Result<TaskOutput>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    R: Rng + ?Sized,
{
    let rows = match intent.param_u64("rows") {
        Some(n) if n > MAX_ROWS => {
            return Err(AgentError::InvalidParameter {
                name: "rows".into(),
                reason: format!("{n} exceeds the limit of {MAX_ROWS}"),
            });
        }
        Some(n) => n as usize,
        None => rng.gen_range(10..=100),
    };

    let columns = intent
        .param_str_list("columns")
        .filter(|cols| !cols.is_empty())
        .unwrap_or_else(|| DEFAULT_COLUMNS.iter().map(|c| (*c).to_owned()).collect());
    debug!(rows, columns = columns.len(), "synthesizing sheet");

    let today = now.format(DATE_FORMAT).to_string();
    let mut table = Table::new(columns.iter().cloned());
    for i in 0..rows {
        let row = columns
            .iter()
            .map(|col| {
                if col == "Date" {
                    Cell::Text(today.clone())
                } else {
                    Cell::Text(format!("Data_{i}"))
                }
            })
            .collect();
        table.push_row(row)?;
    }

    let summary = format!(
        "Generated {} rows across {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(TaskOutput::Table { table, summary })
}
