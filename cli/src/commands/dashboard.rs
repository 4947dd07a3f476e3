use anyhow::Result;

use crate::gemini::GeminiClient;

use super::Tracker;
use super::helpers::{LBS_PER_KG, print_json, progress_bar};

/// BMI band used by the dashboard.
fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "underweight"
    } else if bmi < 25.0 {
        "healthy"
    } else if bmi < 30.0 {
        "overweight"
    } else {
        "obese"
    }
}

pub(crate) async fn cmd_dashboard(
    tracker: &Tracker,
    gemini: &GeminiClient,
    no_quote: bool,
    json: bool,
) -> Result<()> {
    let quote = if no_quote {
        None
    } else {
        Some(gemini.fetch_quote().await)
    };

    let latest = tracker.latest_weight();
    let bmi = tracker.bmi();
    let progress = tracker.goal_progress();

    if json {
        print_json(&serde_json::json!({
            "latest_weight": latest,
            "height_cm": tracker.height(),
            "bmi": bmi,
            "goal_weight": tracker.goal_weight(),
            "progress": progress,
            "quote": quote,
        }))?;
        return Ok(());
    }

    if let Some(q) = &quote {
        println!("\"{q}\"\n");
    }

    match latest {
        Some(e) => println!(
            "Latest:  {:.1} kg ({:.1} lbs) on {}",
            e.weight,
            e.weight * LBS_PER_KG,
            e.date.format("%Y-%m-%d")
        ),
        None => println!("Latest:  no weight logged"),
    }

    match (bmi, tracker.height()) {
        (Some(bmi), _) => println!("BMI:     {bmi:.1} ({})", bmi_category(bmi)),
        (None, None) => println!("BMI:     set your height with `heft height set <cm>`"),
        (None, Some(_)) => println!("BMI:     -"),
    }

    match tracker.goal_weight() {
        Some(goal) => println!("Goal:    {goal:.1} kg"),
        None => println!("Goal:    not set"),
    }

    if let Some(p) = progress {
        println!("To go:   {:.1} kg", p.weight_to_go);
        println!(
            "         {} {}%",
            progress_bar(p.progress_percentage),
            p.progress_percentage
        );
    }

    Ok(())
}

pub(crate) async fn cmd_quote(gemini: &GeminiClient, json: bool) -> Result<()> {
    let quote = gemini.fetch_quote().await;
    if json {
        println!("{}", serde_json::json!({ "quote": quote }));
    } else {
        println!("{quote}");
    }
    Ok(())
}
