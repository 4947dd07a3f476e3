//! Values derived from the current profile state. Nothing here is persisted;
//! every read recomputes from the entry collections.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{MeasurementEntry, MeasurementField, WeightEntry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub start_weight: f64,
    pub current_weight: f64,
    pub goal_weight: f64,
    /// Current minus goal, one decimal. Negative once the goal is passed.
    pub weight_to_go: f64,
    pub total_to_change: f64,
    /// Not capped at 100; overshooting the goal reports more.
    pub progress_percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightChange {
    pub date: NaiveDate,
    pub weight: f64,
    /// Difference from the previous entry, `None` for the first one.
    pub change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileStats {
    pub start_weight: f64,
    pub highest_weight: f64,
    pub lowest_weight: f64,
    pub total_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Round to one decimal the way a decimal display would: the exact binary
/// value decides, and exact halfway values round away from zero. `0.15` is
/// stored just below the halfway point and rounds to `0.1`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn round1(v: f64) -> f64 {
    // Only odd multiples of 0.25 sit exactly on a halfway point.
    let quarters = v * 4.0;
    let r = if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        (v * 10.0).round() / 10.0
    } else {
        format!("{v:.1}").parse().unwrap_or(v)
    };
    if r == 0.0 { 0.0 } else { r }
}

#[must_use]
pub fn bmi(latest: Option<&WeightEntry>, height_cm: Option<u32>) -> Option<f64> {
    let latest = latest?;
    let meters = f64::from(height_cm?) / 100.0;
    Some(round1(latest.weight / (meters * meters)))
}

/// Progress from the first entry towards `goal`, measured at the latest entry.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn goal_progress(
    first: Option<&WeightEntry>,
    latest: Option<&WeightEntry>,
    goal: Option<f64>,
) -> Option<GoalProgress> {
    let goal_weight = goal?;
    let start_weight = first?.weight;
    let current_weight = latest?.weight;

    let weight_to_go = round1(current_weight - goal_weight);
    let total_to_change = start_weight - goal_weight;

    let progress_percentage = if total_to_change == 0.0 {
        if current_weight == goal_weight { 100 } else { 0 }
    } else {
        let changed = start_weight - current_weight;
        (((changed / total_to_change) * 100.0).round() as i64).max(0)
    };

    Some(GoalProgress {
        start_weight,
        current_weight,
        goal_weight,
        weight_to_go,
        total_to_change,
        progress_percentage,
    })
}

/// Pair every entry with its change from the preceding entry, in collection
/// order.
#[must_use]
pub fn weight_changes(entries: &[WeightEntry]) -> Vec<WeightChange> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| WeightChange {
            date: e.date,
            weight: e.weight,
            change: i.checked_sub(1).map(|prev| e.weight - entries[prev].weight),
        })
        .collect()
}

#[must_use]
pub fn profile_stats(entries: &[WeightEntry]) -> Option<ProfileStats> {
    let first = entries.first()?;
    let last = entries.last()?;
    let weights = entries.iter().map(|e| e.weight);

    Some(ProfileStats {
        start_weight: first.weight,
        highest_weight: weights.clone().fold(f64::NEG_INFINITY, f64::max),
        lowest_weight: weights.fold(f64::INFINITY, f64::min),
        total_change: last.weight - first.weight,
    })
}

/// Dated values of one measurement, skipping entries that don't record it.
#[must_use]
pub fn measurement_series(entries: &[MeasurementEntry], field: MeasurementField) -> Vec<SeriesPoint> {
    entries
        .iter()
        .filter_map(|e| {
            e.get(field).map(|value| SeriesPoint {
                date: e.date,
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(d: u32, kg: f64) -> WeightEntry {
        WeightEntry {
            date: NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
            weight: kg,
        }
    }

    #[test]
    fn test_bmi_rounds_to_one_decimal() {
        let latest = w(1, 70.0);
        assert_eq!(bmi(Some(&latest), Some(175)), Some(22.9));
    }

    #[test]
    fn test_bmi_requires_weight_and_height() {
        let latest = w(1, 70.0);
        assert_eq!(bmi(None, Some(175)), None);
        assert_eq!(bmi(Some(&latest), None), None);
    }

    #[test]
    fn test_goal_progress_halfway() {
        let (first, latest) = (w(1, 80.0), w(20, 75.0));
        let p = goal_progress(Some(&first), Some(&latest), Some(70.0)).unwrap();
        assert_eq!(p.weight_to_go, 5.0);
        assert_eq!(p.total_to_change, 10.0);
        assert_eq!(p.progress_percentage, 50);
    }

    #[test]
    fn test_goal_progress_start_equals_goal() {
        let first = w(1, 70.0);
        let p = goal_progress(Some(&first), Some(&first), Some(70.0)).unwrap();
        assert_eq!(p.progress_percentage, 100);
        assert_eq!(p.weight_to_go, 0.0);

        let drifted = w(9, 71.0);
        let p = goal_progress(Some(&first), Some(&drifted), Some(70.0)).unwrap();
        assert_eq!(p.progress_percentage, 0);
        assert_eq!(p.weight_to_go, 1.0);
    }

    #[test]
    fn test_goal_progress_wrong_direction_clamps_at_zero() {
        let (first, latest) = (w(1, 80.0), w(5, 83.0));
        let p = goal_progress(Some(&first), Some(&latest), Some(70.0)).unwrap();
        assert_eq!(p.progress_percentage, 0);
        assert_eq!(p.weight_to_go, 13.0);
    }

    #[test]
    fn test_goal_progress_overshoot_is_not_capped() {
        let (first, latest) = (w(1, 80.0), w(30, 68.0));
        let p = goal_progress(Some(&first), Some(&latest), Some(70.0)).unwrap();
        assert_eq!(p.progress_percentage, 120);
        assert_eq!(p.weight_to_go, -2.0);
    }

    #[test]
    fn test_goal_progress_gain_goal() {
        let (first, latest) = (w(1, 60.0), w(30, 63.0));
        let p = goal_progress(Some(&first), Some(&latest), Some(66.0)).unwrap();
        assert_eq!(p.progress_percentage, 50);
        assert_eq!(p.weight_to_go, -3.0);
    }

    #[test]
    fn test_goal_progress_absent_inputs() {
        let e = w(1, 80.0);
        assert!(goal_progress(None, Some(&e), Some(70.0)).is_none());
        assert!(goal_progress(Some(&e), None, Some(70.0)).is_none());
        assert!(goal_progress(Some(&e), Some(&e), None).is_none());
    }

    #[test]
    fn test_weight_changes() {
        let entries = [w(1, 80.0), w(2, 79.5), w(3, 79.5), w(4, 80.25)];
        let changes = weight_changes(&entries);

        assert_eq!(changes.len(), 4);
        assert_eq!(changes[0].change, None);
        assert_eq!(changes[1].change, Some(-0.5));
        assert_eq!(changes[2].change, Some(0.0));
        assert_eq!(changes[3].change, Some(0.75));
        assert!(weight_changes(&[]).is_empty());
    }

    #[test]
    fn test_profile_stats() {
        let entries = [w(1, 80.0), w(2, 82.0), w(3, 77.0), w(4, 78.0)];
        let stats = profile_stats(&entries).unwrap();
        assert_eq!(stats.start_weight, 80.0);
        assert_eq!(stats.highest_weight, 82.0);
        assert_eq!(stats.lowest_weight, 77.0);
        assert_eq!(stats.total_change, -2.0);

        assert!(profile_stats(&[]).is_none());
    }

    #[test]
    fn test_measurement_series_skips_missing_values() {
        let d = |n| NaiveDate::from_ymd_opt(2025, 2, n).unwrap();
        let entries = [
            MeasurementEntry::new(d(1), Some(90.0), Some(33.0), None).unwrap(),
            MeasurementEntry::new(d(8), None, Some(32.5), None).unwrap(),
            MeasurementEntry::new(d(15), Some(88.5), None, Some(55.0)).unwrap(),
        ];

        let waist = measurement_series(&entries, MeasurementField::Waist);
        assert_eq!(
            waist,
            vec![
                SeriesPoint {
                    date: d(1),
                    value: 90.0
                },
                SeriesPoint {
                    date: d(15),
                    value: 88.5
                },
            ]
        );
        assert_eq!(measurement_series(&entries, MeasurementField::Arm).len(), 2);
        assert_eq!(measurement_series(&entries, MeasurementField::Thigh).len(), 1);
    }

    #[test]
    fn test_round1_clears_negative_zero() {
        assert_eq!(round1(-0.04).to_bits(), 0.0_f64.to_bits());
        assert_eq!(round1(22.857), 22.9);
    }

    #[test]
    fn test_round1_follows_exact_decimal_value() {
        assert_eq!(round1(0.15), 0.1);
        assert_eq!(round1(1.45), 1.4);
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(-0.25), -0.3);
        assert_eq!(round1(2.75), 2.8);
        assert_eq!(round1(5.0), 5.0);
        assert_eq!(round1(-2.0), -2.0);
    }
}
