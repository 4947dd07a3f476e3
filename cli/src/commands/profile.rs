use anyhow::{Context, Result};
use std::path::Path;

use heft_core::export::EXPORT_FILE_NAME;
use heft_core::models::Theme;

use super::Tracker;
use super::helpers::{LBS_PER_KG, confirm, print_json};

pub(crate) fn cmd_height_set(tracker: &mut Tracker, cm: u32, json: bool) -> Result<()> {
    if !tracker.set_height(cm)? {
        eprintln!("Height was not saved");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::json!({ "height_cm": cm }));
    } else {
        println!("Height set to {cm} cm");
    }
    Ok(())
}

pub(crate) fn cmd_height_show(tracker: &Tracker, json: bool) -> Result<()> {
    let height = tracker.height();
    if json {
        println!("{}", serde_json::json!({ "height_cm": height }));
    } else if let Some(cm) = height {
        println!("Height: {cm} cm");
    } else {
        eprintln!("No height set. Use `heft height set <cm>` to set one.");
    }
    Ok(())
}

pub(crate) fn cmd_stats(tracker: &Tracker, json: bool) -> Result<()> {
    let stats = tracker.stats();

    if json {
        print_json(&serde_json::json!({
            "height_cm": tracker.height(),
            "bmi": tracker.bmi(),
            "stats": stats,
        }))?;
        return Ok(());
    }

    match tracker.height() {
        Some(cm) => println!("Height:  {cm} cm"),
        None => println!("Height:  not set"),
    }

    let Some(s) = stats else {
        eprintln!("No weight logged yet.");
        return Ok(());
    };

    let kg_lbs = |kg: f64| format!("{kg:.1} kg ({:.1} lbs)", kg * LBS_PER_KG);
    println!("Start:   {}", kg_lbs(s.start_weight));
    println!("Highest: {}", kg_lbs(s.highest_weight));
    println!("Lowest:  {}", kg_lbs(s.lowest_weight));
    println!("Change:  {:+.1} kg", s.total_change);
    if let Some(bmi) = tracker.bmi() {
        println!("BMI:     {bmi:.1}");
    }

    Ok(())
}

pub(crate) fn cmd_export(
    tracker: &Tracker,
    output: Option<&Path>,
    stdout: bool,
    json: bool,
) -> Result<()> {
    let csv = match tracker.export_csv() {
        Ok(csv) => csv,
        Err(e) => {
            if json {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            } else {
                eprintln!("{e}");
            }
            return Ok(());
        }
    };

    if stdout {
        println!("{csv}");
        return Ok(());
    }

    let path = output.unwrap_or_else(|| Path::new(EXPORT_FILE_NAME));
    std::fs::write(path, &csv)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    let rows = tracker.weight_entries().len();
    tracing::debug!(path = %path.display(), rows, "exported weight entries");
    if json {
        println!(
            "{}",
            serde_json::json!({ "path": path.display().to_string(), "rows": rows })
        );
    } else {
        println!("Exported {rows} weight entries to {}", path.display());
    }
    Ok(())
}

pub(crate) fn cmd_theme(tracker: &mut Tracker, theme: Option<Theme>, json: bool) -> Result<()> {
    if let Some(theme) = theme {
        if !tracker.set_theme(theme) {
            eprintln!("Theme was not saved");
            return Ok(());
        }
    }

    let theme = tracker.theme();
    if json {
        println!("{}", serde_json::json!({ "theme": theme }));
    } else {
        println!("Theme: {theme}");
    }
    Ok(())
}

pub(crate) fn cmd_clear(tracker: &mut Tracker, yes: bool, json: bool) -> Result<()> {
    if !confirm(
        "Are you sure you want to delete ALL your data? This action cannot be undone.",
        yes,
    )? {
        eprintln!("Cancelled");
        return Ok(());
    }

    let cleared = tracker.clear_all();
    if json {
        println!("{}", serde_json::json!({ "cleared": cleared }));
    } else if cleared {
        println!("All data has been cleared");
    } else {
        eprintln!("Data was not cleared");
    }
    Ok(())
}
