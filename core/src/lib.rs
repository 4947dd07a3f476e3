pub mod db;
pub mod error;
pub mod export;
pub mod gemini;
pub mod metrics;
pub mod models;
pub mod profile;
pub mod reconcile;
