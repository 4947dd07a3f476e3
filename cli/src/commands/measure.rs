use anyhow::{Result, bail};
use tabled::Tabled;

use heft_core::models::{MeasurementEntry, MeasurementField};

use super::Tracker;
use super::helpers::{
    confirm, overwritten_entry, parse_date, parse_entry_date, print_json, render_table,
};

fn cm(v: Option<f64>) -> String {
    v.map_or("-".into(), |v| format!("{v:.1}"))
}

/// `waist 81.5 cm, arm 32.0 cm`, listing only the recorded values.
fn describe(m: &MeasurementEntry) -> String {
    MeasurementField::ALL
        .iter()
        .filter_map(|&f| m.get(f).map(|v| format!("{f} {v:.1} cm")))
        .collect::<Vec<_>>()
        .join(", ")
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_measure_log(
    tracker: &mut Tracker,
    waist: Option<f64>,
    arm: Option<f64>,
    thigh: Option<f64>,
    date: Option<&str>,
    edit: Option<&str>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let original_date = edit.map(|d| parse_date(Some(d))).transpose()?;
    if let Some(original) = original_date {
        if tracker.measurement_on(original).is_none() {
            bail!("No measurement entry for {}", original.format("%Y-%m-%d"));
        }
    }
    let date = match (date, original_date) {
        (None, Some(original)) => original,
        (d, _) => parse_entry_date(d)?,
    };

    let entry = MeasurementEntry::new(date, waist, arm, thigh)?;

    if original_date.is_some() && !confirm("Are you sure you want to update this entry?", yes)? {
        eprintln!("Cancelled");
        return Ok(());
    }

    if let Some(existing) = overwritten_entry(tracker.measurement_entries(), date, original_date)
    {
        eprintln!(
            "Replacing {} already logged for {}",
            describe(existing),
            date.format("%Y-%m-%d")
        );
    }

    if !tracker.save_measurement(entry, original_date) {
        eprintln!("Measurement was not saved");
        return Ok(());
    }

    let saved = tracker.measurement_on(date);
    if json {
        print_json(&saved)?;
    } else if let Some(m) = saved {
        println!("Logged {} for {}", describe(m), date.format("%Y-%m-%d"));
    }

    Ok(())
}

pub(crate) fn cmd_measure_history(
    tracker: &Tracker,
    field: Option<MeasurementField>,
    json: bool,
) -> Result<()> {
    if let Some(field) = field {
        let mut series = tracker.measurement_series(field);
        series.reverse();

        if json {
            print_json(&series)?;
        } else if series.is_empty() {
            eprintln!("No {field} measurements yet.");
        } else {
            #[derive(Tabled)]
            struct SeriesRow {
                #[tabled(rename = "Date")]
                date: String,
                #[tabled(rename = "cm")]
                value: String,
            }

            let rows: Vec<SeriesRow> = series
                .iter()
                .map(|p| SeriesRow {
                    date: p.date.format("%Y-%m-%d").to_string(),
                    value: format!("{:.1}", p.value),
                })
                .collect();
            println!("{}", render_table(&rows, tracker.theme(), 1..2));
        }
        return Ok(());
    }

    let entries: Vec<&MeasurementEntry> = tracker.measurement_entries().iter().rev().collect();

    if json {
        print_json(&entries)?;
    } else if entries.is_empty() {
        eprintln!("No measurements yet. Use `heft measure log` to record one.");
    } else {
        #[derive(Tabled)]
        struct MeasurementRow {
            #[tabled(rename = "Date")]
            date: String,
            #[tabled(rename = "Waist (cm)")]
            waist: String,
            #[tabled(rename = "Arm (cm)")]
            arm: String,
            #[tabled(rename = "Thigh (cm)")]
            thigh: String,
        }

        let rows: Vec<MeasurementRow> = entries
            .iter()
            .map(|m| MeasurementRow {
                date: m.date.format("%Y-%m-%d").to_string(),
                waist: cm(m.waist),
                arm: cm(m.arm),
                thigh: cm(m.thigh),
            })
            .collect();
        println!("{}", render_table(&rows, tracker.theme(), 1..4));
    }

    Ok(())
}

pub(crate) fn cmd_measure_delete(
    tracker: &mut Tracker,
    date: &str,
    yes: bool,
    json: bool,
) -> Result<()> {
    let date = parse_date(Some(date))?;
    let date_str = date.format("%Y-%m-%d").to_string();

    if tracker.measurement_on(date).is_none() {
        eprintln!("No measurement entry for {date_str}");
        return Ok(());
    }
    if !confirm("Are you sure you want to delete this measurement entry?", yes)? {
        eprintln!("Cancelled");
        return Ok(());
    }

    let deleted = tracker.delete_measurement(date);
    if json {
        println!("{}", serde_json::json!({ "deleted": deleted, "date": date_str }));
    } else if deleted {
        println!("Deleted measurement entry for {date_str}");
    } else {
        eprintln!("Measurement entry was not deleted");
    }

    Ok(())
}
