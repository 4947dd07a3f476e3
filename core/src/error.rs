use thiserror::Error;

/// Input rejected at the boundary, before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid weight.")]
    InvalidWeight,

    #[error("Please enter a valid goal weight.")]
    InvalidGoalWeight,

    #[error("Please enter a valid height in centimeters (51-250, e.g. 175).")]
    InvalidHeight,

    #[error("Please enter at least one measurement.")]
    NoMeasurements,

    #[error("Please enter valid, positive numbers for measurements ({field}: {value}).")]
    InvalidMeasurement { field: &'static str, value: f64 },

    #[error("Date {0} is in the future.")]
    FutureDate(String),
}
