use anyhow::{Context, Result, bail};

use crate::models::WeightEntry;

pub const EXPORT_FILE_NAME: &str = "weight_tracker_export.csv";

/// Render weight entries as `date,weight_kg` CSV, one row per entry in
/// collection order. Weights use their shortest decimal form (`70`, `70.5`).
/// Rows are newline-separated with no newline after the last one.
pub fn weights_to_csv(entries: &[WeightEntry]) -> Result<String> {
    if entries.is_empty() {
        bail!("No data to export");
    }

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["date", "weight_kg"])?;
    for e in entries {
        wtr.write_record([e.date.format("%Y-%m-%d").to_string(), e.weight.to_string()])?;
    }

    let bytes = wtr.into_inner().context("Failed to flush CSV export")?;
    let mut csv = String::from_utf8(bytes).context("CSV export is not valid UTF-8")?;
    if csv.ends_with('\n') {
        csv.pop();
    }
    Ok(csv)
}
