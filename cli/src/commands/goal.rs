use anyhow::{Result, bail};

use heft_core::metrics::GoalProgress;

use super::Tracker;
use super::helpers::{LBS_PER_KG, print_json, progress_bar, to_kg};

pub(crate) fn cmd_goal_set(tracker: &mut Tracker, value: f64, unit: &str, json: bool) -> Result<()> {
    if value <= 0.0 {
        bail!("Goal weight must be greater than 0");
    }
    let kg = to_kg(value, unit)?;

    if !tracker.set_goal_weight(kg)? {
        eprintln!("Goal weight was not saved");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::json!({ "goal_weight": kg }));
    } else {
        println!("Goal set to {kg:.1} kg ({:.1} lbs)", kg * LBS_PER_KG);
        if tracker.latest_weight().is_none() {
            eprintln!("Log a weight with `heft weight log` to start tracking progress.");
        }
    }

    Ok(())
}

#[allow(clippy::float_cmp)]
fn describe_remaining(progress: &GoalProgress) -> String {
    let to_go = progress.weight_to_go;
    if to_go == 0.0 {
        "Goal reached".to_string()
    } else if progress.total_to_change == 0.0 {
        format!("{:.1} kg from goal", to_go.abs())
    } else if (progress.total_to_change > 0.0) == (to_go > 0.0) {
        format!("{:.1} kg to go", to_go.abs())
    } else {
        format!("Goal surpassed by {:.1} kg", to_go.abs())
    }
}

pub(crate) fn cmd_goal_show(tracker: &Tracker, json: bool) -> Result<()> {
    let Some(goal) = tracker.goal_weight() else {
        if json {
            println!("{}", serde_json::json!({ "goal_weight": null }));
        } else {
            eprintln!("No goal set. Use `heft goal set <weight>` to set one.");
        }
        return Ok(());
    };

    let progress = tracker.goal_progress();
    if json {
        print_json(&serde_json::json!({ "goal_weight": goal, "progress": progress }))?;
        return Ok(());
    }

    println!("Goal: {goal:.1} kg ({:.1} lbs)", goal * LBS_PER_KG);
    match progress {
        Some(p) => {
            println!(
                "Progress: {} {}%",
                progress_bar(p.progress_percentage),
                p.progress_percentage
            );
            println!("  Start:   {:.1} kg", p.start_weight);
            println!("  Current: {:.1} kg", p.current_weight);
            println!("  {}", describe_remaining(&p));
        }
        None => eprintln!("No weight logged yet."),
    }

    Ok(())
}

pub(crate) fn cmd_goal_clear(tracker: &mut Tracker, json: bool) -> Result<()> {
    let cleared = tracker.clear_goal_weight();

    if json {
        println!("{}", serde_json::json!({ "cleared": cleared }));
    } else if cleared {
        println!("Goal cleared");
    } else if tracker.goal_weight().is_none() {
        eprintln!("No goal was set");
    } else {
        eprintln!("Goal was not cleared");
    }
    Ok(())
}
