use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use heft_core::models::{Dated, Theme, validate_entry_date};
use heft_core::reconcile;

pub(crate) const LBS_PER_KG: f64 = 2.20462;
pub(crate) const KG_PER_LB: f64 = 0.453_592;

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(date_str: Option<&str>) -> Result<NaiveDate> {
    match date_str {
        None | Some("today") => Ok(today()),
        Some("yesterday") => Ok(today() - chrono::Duration::days(1)),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{s}'. Use YYYY-MM-DD, today, or yesterday")),
    }
}

/// Parse the date an entry is logged under. Entries can't be dated after today.
pub(crate) fn parse_entry_date(date_str: Option<&str>) -> Result<NaiveDate> {
    let date = parse_date(date_str)?;
    Ok(validate_entry_date(date, today())?)
}

/// Convert a weight in `unit` to kilograms.
pub(crate) fn to_kg(value: f64, unit: &str) -> Result<f64> {
    match unit.to_lowercase().as_str() {
        "kg" => Ok(value),
        "lbs" | "lb" => {
            let kg = no_neg_zero(value * KG_PER_LB);
            eprintln!("Converting {value:.1} lbs → {kg:.2} kg");
            Ok(kg)
        }
        _ => anyhow::bail!("Invalid unit '{unit}'. Use 'kg' or 'lbs'"),
    }
}

/// The entry a save at `date` would overwrite. An edit that keeps its own
/// date only updates itself.
pub(crate) fn overwritten_entry<T: Dated>(
    entries: &[T],
    date: NaiveDate,
    original_date: Option<NaiveDate>,
) -> Option<&T> {
    if original_date == Some(date) {
        return None;
    }
    reconcile::find(entries, date)
}

/// Ask a yes/no question on stderr. Anything but `y`/`yes` is a no.
pub(crate) fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    eprint!("{question} [y/N]: ");
    io::stderr().flush()?;
    let stdin = io::stdin();
    let line = match stdin.lock().lines().next() {
        Some(line) => line?,
        None => return Ok(false),
    };
    Ok(is_yes(&line))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Render rows as a table styled for the active theme, right-aligning the
/// numeric columns in `numeric`.
pub(crate) fn render_table<T: Tabled>(
    rows: &[T],
    theme: Theme,
    numeric: std::ops::Range<usize>,
) -> String {
    let mut table = Table::new(rows);
    match theme {
        Theme::Dark => table.with(Style::rounded()),
        Theme::Light => table.with(Style::modern()),
    };
    table
        .with(Modify::new(Columns::new(numeric)).with(Alignment::right()))
        .to_string()
}

/// A ten-cell bar. The value is capped at 100 for drawing only.
pub(crate) fn progress_bar(percentage: i64) -> String {
    let filled = usize::try_from(percentage.clamp(0, 100) / 10).unwrap_or(0);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(10 - filled))
}

pub(crate) fn format_change(change: Option<f64>) -> String {
    match change {
        None => String::new(),
        Some(c) if c == 0.0 => "no change".to_string(),
        Some(c) if c < 0.0 => format!("↓ {:.1} kg", c.abs()),
        Some(c) => format!("↑ {c:.1} kg"),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}
