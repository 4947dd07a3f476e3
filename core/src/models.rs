use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_HEIGHT_CM: u32 = 51;
pub const MAX_HEIGHT_CM: u32 = 250;

/// A record keyed by its calendar day. Collections of these hold at most one
/// record per date, sorted ascending.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

// --- Weight tracking types ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    /// Kilograms.
    pub weight: f64,
}

impl WeightEntry {
    pub fn new(date: NaiveDate, weight: f64) -> Result<Self, ValidationError> {
        if !is_positive(weight) {
            return Err(ValidationError::InvalidWeight);
        }
        Ok(WeightEntry { date, weight })
    }
}

impl Dated for WeightEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

// --- Body measurement types ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementEntry {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub waist: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub arm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thigh: Option<f64>,
}

impl MeasurementEntry {
    /// Build a measurement entry from user input. All values are centimeters;
    /// at least one must be given and every given value must be positive.
    pub fn new(
        date: NaiveDate,
        waist: Option<f64>,
        arm: Option<f64>,
        thigh: Option<f64>,
    ) -> Result<Self, ValidationError> {
        if waist.is_none() && arm.is_none() && thigh.is_none() {
            return Err(ValidationError::NoMeasurements);
        }
        for (field, value) in [("waist", waist), ("arm", arm), ("thigh", thigh)] {
            if let Some(v) = value {
                if !is_positive(v) {
                    return Err(ValidationError::InvalidMeasurement { field, value: v });
                }
            }
        }
        Ok(MeasurementEntry {
            date,
            waist,
            arm,
            thigh,
        })
    }

    #[must_use]
    pub fn get(&self, field: MeasurementField) -> Option<f64> {
        match field {
            MeasurementField::Waist => self.waist,
            MeasurementField::Arm => self.arm,
            MeasurementField::Thigh => self.thigh,
        }
    }
}

impl Dated for MeasurementEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementField {
    Waist,
    Arm,
    Thigh,
}

impl MeasurementField {
    pub const ALL: [MeasurementField; 3] = [
        MeasurementField::Waist,
        MeasurementField::Arm,
        MeasurementField::Thigh,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementField::Waist => "waist",
            MeasurementField::Arm => "arm",
            MeasurementField::Thigh => "thigh",
        }
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "waist" => Ok(MeasurementField::Waist),
            "arm" => Ok(MeasurementField::Arm),
            "thigh" => Ok(MeasurementField::Thigh),
            _ => anyhow::bail!("Invalid measurement '{s}'. Use waist, arm, or thigh"),
        }
    }
}

// --- Profile settings ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => anyhow::bail!("Invalid theme '{s}'. Use 'light' or 'dark'"),
        }
    }
}

pub fn validate_height(cm: u32) -> Result<u32, ValidationError> {
    if (MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&cm) {
        Ok(cm)
    } else {
        Err(ValidationError::InvalidHeight)
    }
}

pub fn validate_goal_weight(kg: f64) -> Result<f64, ValidationError> {
    if is_positive(kg) {
        Ok(kg)
    } else {
        Err(ValidationError::InvalidGoalWeight)
    }
}

/// Entries can be logged for today or any earlier day.
pub fn validate_entry_date(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if date > today {
        return Err(ValidationError::FutureDate(
            date.format("%Y-%m-%d").to_string(),
        ));
    }
    Ok(date)
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_weight_entry_rejects_non_positive() {
        assert_eq!(
            WeightEntry::new(day(1), 0.0),
            Err(ValidationError::InvalidWeight)
        );
        assert_eq!(
            WeightEntry::new(day(1), -70.0),
            Err(ValidationError::InvalidWeight)
        );
        assert_eq!(
            WeightEntry::new(day(1), f64::NAN),
            Err(ValidationError::InvalidWeight)
        );
        assert!(WeightEntry::new(day(1), 70.2).is_ok());
    }

    #[test]
    fn test_measurement_requires_one_field() {
        assert_eq!(
            MeasurementEntry::new(day(1), None, None, None),
            Err(ValidationError::NoMeasurements)
        );
        let entry = MeasurementEntry::new(day(1), None, Some(32.0), None).unwrap();
        assert_eq!(entry.arm, Some(32.0));
        assert!(entry.waist.is_none());
    }

    #[test]
    fn test_measurement_rejects_non_positive_field() {
        let err = MeasurementEntry::new(day(1), Some(80.0), None, Some(0.0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidMeasurement {
                field: "thigh",
                value: 0.0
            }
        );
    }

    #[test]
    fn test_measurement_json_omits_absent_fields() {
        let entry = MeasurementEntry::new(day(4), Some(81.5), None, None).unwrap();
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"date":"2025-03-04","waist":81.5}"#);

        let back: MeasurementEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_weight_entry_json_shape() {
        let entry = WeightEntry::new(day(9), 72.4).unwrap();
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"date":"2025-03-09","weight":72.4}"#
        );
    }

    #[test]
    fn test_validate_height_bounds() {
        assert_eq!(validate_height(50), Err(ValidationError::InvalidHeight));
        assert_eq!(validate_height(51), Ok(51));
        assert_eq!(validate_height(250), Ok(250));
        assert_eq!(validate_height(251), Err(ValidationError::InvalidHeight));
    }

    #[test]
    fn test_validate_goal_weight() {
        assert!(validate_goal_weight(68.0).is_ok());
        assert_eq!(
            validate_goal_weight(0.0),
            Err(ValidationError::InvalidGoalWeight)
        );
    }

    #[test]
    fn test_validate_entry_date_rejects_future() {
        assert_eq!(validate_entry_date(day(5), day(5)), Ok(day(5)));
        assert_eq!(validate_entry_date(day(4), day(5)), Ok(day(4)));
        assert_eq!(
            validate_entry_date(day(6), day(5)),
            Err(ValidationError::FutureDate("2025-03-06".to_string()))
        );
    }

    #[test]
    fn test_theme_parse_and_serde() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), r#""light""#);
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_measurement_field_parse() {
        assert_eq!(
            "WAIST".parse::<MeasurementField>().unwrap(),
            MeasurementField::Waist
        );
        assert!("neck".parse::<MeasurementField>().is_err());
    }
}
