use anyhow::{Result, bail};
use tabled::Tabled;

use super::Tracker;
use super::helpers::{
    LBS_PER_KG, confirm, format_change, overwritten_entry, parse_date, parse_entry_date,
    print_json, render_table, to_kg,
};

pub(crate) fn cmd_weight_log(
    tracker: &mut Tracker,
    value: f64,
    unit: &str,
    date: Option<&str>,
    edit: Option<&str>,
    yes: bool,
    json: bool,
) -> Result<()> {
    if value <= 0.0 {
        bail!("Weight must be greater than 0");
    }
    let weight = to_kg(value, unit)?;

    let original_date = edit.map(|d| parse_date(Some(d))).transpose()?;
    if let Some(original) = original_date {
        if tracker.weight_on(original).is_none() {
            bail!("No weight entry for {}", original.format("%Y-%m-%d"));
        }
    }
    // Editing keeps the entry's date unless a new one is given.
    let date = match (date, original_date) {
        (None, Some(original)) => original,
        (d, _) => parse_entry_date(d)?,
    };

    if original_date.is_some() && !confirm("Are you sure you want to update this entry?", yes)? {
        eprintln!("Cancelled");
        return Ok(());
    }
    if let Some(existing) = overwritten_entry(tracker.weight_entries(), date, original_date) {
        eprintln!(
            "Replacing {:.1} kg already logged for {}",
            existing.weight,
            date.format("%Y-%m-%d")
        );
    }

    if !tracker.save_weight(date, weight, original_date)? {
        eprintln!("Weight was not saved");
        return Ok(());
    }

    if json {
        print_json(&tracker.weight_on(date))?;
    } else {
        let lbs = weight * LBS_PER_KG;
        println!(
            "Logged {weight:.1} kg ({lbs:.1} lbs) for {}",
            date.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub(crate) fn cmd_weight_show(tracker: &Tracker, date: Option<&str>, json: bool) -> Result<()> {
    let date = parse_date(date)?;

    if let Some(e) = tracker.weight_on(date) {
        if json {
            print_json(e)?;
        } else {
            let lbs = e.weight * LBS_PER_KG;
            println!(
                "{}: {:.1} kg ({:.1} lbs)",
                e.date.format("%Y-%m-%d"),
                e.weight,
                lbs
            );
        }
    } else {
        let date_str = date.format("%Y-%m-%d");
        if json {
            println!(
                "{}",
                serde_json::json!({ "error": format!("No weight entry for {date_str}") })
            );
        } else {
            eprintln!("No weight entry for {date_str}");
        }
    }

    Ok(())
}

pub(crate) fn cmd_weight_history(tracker: &Tracker, days: Option<usize>, json: bool) -> Result<()> {
    // Newest first, each entry compared against the one logged before it.
    let mut changes = tracker.weight_changes();
    changes.reverse();
    if let Some(n) = days {
        changes.truncate(n);
    }

    if json {
        print_json(&changes)?;
    } else if changes.is_empty() {
        eprintln!("No history yet. Use `heft weight log` to record your weight.");
    } else {
        #[derive(Tabled)]
        struct WeightRow {
            #[tabled(rename = "Date")]
            date: String,
            #[tabled(rename = "Weight (kg)")]
            kg: String,
            #[tabled(rename = "Weight (lbs)")]
            lbs: String,
            #[tabled(rename = "Change")]
            change: String,
        }

        let rows: Vec<WeightRow> = changes
            .iter()
            .map(|c| WeightRow {
                date: c.date.format("%Y-%m-%d").to_string(),
                kg: format!("{:.1}", c.weight),
                lbs: format!("{:.1}", c.weight * LBS_PER_KG),
                change: format_change(c.change),
            })
            .collect();

        println!("{}", render_table(&rows, tracker.theme(), 1..4));
    }

    Ok(())
}

pub(crate) fn cmd_weight_delete(
    tracker: &mut Tracker,
    date: &str,
    yes: bool,
    json: bool,
) -> Result<()> {
    let date = parse_date(Some(date))?;
    let date_str = date.format("%Y-%m-%d").to_string();

    if tracker.weight_on(date).is_none() {
        eprintln!("No weight entry for {date_str}");
        return Ok(());
    }
    if !confirm("Are you sure you want to delete this weight entry?", yes)? {
        eprintln!("Cancelled");
        return Ok(());
    }

    let deleted = tracker.delete_weight(date);
    if json {
        println!("{}", serde_json::json!({ "deleted": deleted, "date": date_str }));
    } else if deleted {
        println!("Deleted weight entry for {date_str}");
    } else {
        eprintln!("Weight entry was not deleted");
    }

    Ok(())
}
