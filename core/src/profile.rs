use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::db::KeyValueStore;
use crate::error::ValidationError;
use crate::export;
use crate::metrics::{self, GoalProgress, ProfileStats, SeriesPoint, WeightChange};
use crate::models::{
    MeasurementEntry, MeasurementField, Theme, WeightEntry, validate_goal_weight, validate_height,
};
use crate::reconcile;

/// Store keys. Each holds one JSON value.
pub mod keys {
    pub const HEIGHT: &str = "userHeight";
    pub const WEIGHT_ENTRIES: &str = "weightEntries";
    pub const MEASUREMENT_ENTRIES: &str = "measurementEntries";
    pub const GOAL_WEIGHT: &str = "goalWeight";
    pub const THEME: &str = "theme";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Height,
    WeightEntries,
    MeasurementEntries,
    GoalWeight,
    Theme,
}

impl Field {
    fn key(self) -> &'static str {
        match self {
            Field::Height => keys::HEIGHT,
            Field::WeightEntries => keys::WEIGHT_ENTRIES,
            Field::MeasurementEntries => keys::MEASUREMENT_ENTRIES,
            Field::GoalWeight => keys::GOAL_WEIGHT,
            Field::Theme => keys::THEME,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileState {
    pub height_cm: Option<u32>,
    pub weight_entries: Vec<WeightEntry>,
    pub measurement_entries: Vec<MeasurementEntry>,
    pub goal_weight: Option<f64>,
    pub theme: Theme,
}

impl ProfileState {
    /// JSON for one field, `None` when the field is absent and its key should
    /// be removed.
    fn encode(&self, field: Field) -> serde_json::Result<Option<String>> {
        match field {
            Field::Height => self.height_cm.map(|h| serde_json::to_string(&h)).transpose(),
            Field::WeightEntries => serde_json::to_string(&self.weight_entries).map(Some),
            Field::MeasurementEntries => {
                serde_json::to_string(&self.measurement_entries).map(Some)
            }
            Field::GoalWeight => self
                .goal_weight
                .map(|g| serde_json::to_string(&g))
                .transpose(),
            Field::Theme => serde_json::to_string(&self.theme).map(Some),
        }
    }
}

/// Owner of the whole tracker state.
///
/// Every mutation validates its input, builds the next state, and writes the
/// touched keys in full. The in-memory state only moves forward once the
/// write succeeded; a failed write is logged and the mutation reports `false`.
pub struct Profile<S: KeyValueStore> {
    store: S,
    state: ProfileState,
}

impl<S: KeyValueStore> Profile<S> {
    /// Read every key from `store`. Missing or unreadable values fall back to
    /// their defaults.
    pub fn load(store: S) -> Self {
        let state = ProfileState {
            height_cm: read(&store, keys::HEIGHT),
            weight_entries: read(&store, keys::WEIGHT_ENTRIES).unwrap_or_default(),
            measurement_entries: read(&store, keys::MEASUREMENT_ENTRIES).unwrap_or_default(),
            goal_weight: read(&store, keys::GOAL_WEIGHT),
            theme: read(&store, keys::THEME).unwrap_or_default(),
        };
        tracing::debug!(
            weights = state.weight_entries.len(),
            measurements = state.measurement_entries.len(),
            "profile loaded"
        );
        Profile { store, state }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn height(&self) -> Option<u32> {
        self.state.height_cm
    }

    pub fn weight_entries(&self) -> &[WeightEntry] {
        &self.state.weight_entries
    }

    pub fn measurement_entries(&self) -> &[MeasurementEntry] {
        &self.state.measurement_entries
    }

    pub fn goal_weight(&self) -> Option<f64> {
        self.state.goal_weight
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn weight_on(&self, date: NaiveDate) -> Option<&WeightEntry> {
        reconcile::find(&self.state.weight_entries, date)
    }

    pub fn measurement_on(&self, date: NaiveDate) -> Option<&MeasurementEntry> {
        reconcile::find(&self.state.measurement_entries, date)
    }

    pub fn first_weight(&self) -> Option<&WeightEntry> {
        self.state.weight_entries.first()
    }

    pub fn latest_weight(&self) -> Option<&WeightEntry> {
        self.state.weight_entries.last()
    }

    // --- Derived metrics ---

    pub fn bmi(&self) -> Option<f64> {
        metrics::bmi(self.latest_weight(), self.state.height_cm)
    }

    pub fn goal_progress(&self) -> Option<GoalProgress> {
        metrics::goal_progress(
            self.first_weight(),
            self.latest_weight(),
            self.state.goal_weight,
        )
    }

    pub fn weight_changes(&self) -> Vec<WeightChange> {
        metrics::weight_changes(&self.state.weight_entries)
    }

    pub fn stats(&self) -> Option<ProfileStats> {
        metrics::profile_stats(&self.state.weight_entries)
    }

    pub fn measurement_series(&self, field: MeasurementField) -> Vec<SeriesPoint> {
        metrics::measurement_series(&self.state.measurement_entries, field)
    }

    pub fn export_csv(&self) -> Result<String> {
        export::weights_to_csv(&self.state.weight_entries)
    }

    // --- Mutations ---

    pub fn set_height(&mut self, cm: u32) -> Result<bool, ValidationError> {
        let cm = validate_height(cm)?;
        let mut next = self.state.clone();
        next.height_cm = Some(cm);
        Ok(self.commit(next, &[Field::Height]))
    }

    /// Record `weight` for `date`. `original_date` is the date of the entry
    /// being edited, if the edit moves it.
    pub fn save_weight(
        &mut self,
        date: NaiveDate,
        weight: f64,
        original_date: Option<NaiveDate>,
    ) -> Result<bool, ValidationError> {
        let entry = WeightEntry::new(date, weight)?;
        let mut next = self.state.clone();
        reconcile::upsert(&mut next.weight_entries, entry, original_date);
        Ok(self.commit(next, &[Field::WeightEntries]))
    }

    pub fn delete_weight(&mut self, date: NaiveDate) -> bool {
        let mut next = self.state.clone();
        if !reconcile::delete(&mut next.weight_entries, date) {
            return false;
        }
        self.commit(next, &[Field::WeightEntries])
    }

    /// Record a measurement built with [`MeasurementEntry::new`].
    pub fn save_measurement(
        &mut self,
        entry: MeasurementEntry,
        original_date: Option<NaiveDate>,
    ) -> bool {
        let mut next = self.state.clone();
        reconcile::upsert(&mut next.measurement_entries, entry, original_date);
        self.commit(next, &[Field::MeasurementEntries])
    }

    pub fn delete_measurement(&mut self, date: NaiveDate) -> bool {
        let mut next = self.state.clone();
        if !reconcile::delete(&mut next.measurement_entries, date) {
            return false;
        }
        self.commit(next, &[Field::MeasurementEntries])
    }

    pub fn set_goal_weight(&mut self, kg: f64) -> Result<bool, ValidationError> {
        let kg = validate_goal_weight(kg)?;
        let mut next = self.state.clone();
        next.goal_weight = Some(kg);
        Ok(self.commit(next, &[Field::GoalWeight]))
    }

    pub fn clear_goal_weight(&mut self) -> bool {
        if self.state.goal_weight.is_none() {
            return false;
        }
        let mut next = self.state.clone();
        next.goal_weight = None;
        self.commit(next, &[Field::GoalWeight])
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        let mut next = self.state.clone();
        next.theme = theme;
        self.commit(next, &[Field::Theme])
    }

    /// Drop height, goal, and every entry in one write. The theme stays.
    pub fn clear_all(&mut self) -> bool {
        let next = ProfileState {
            theme: self.state.theme,
            ..ProfileState::default()
        };
        self.commit(
            next,
            &[
                Field::WeightEntries,
                Field::MeasurementEntries,
                Field::GoalWeight,
                Field::Height,
            ],
        )
    }

    fn commit(&mut self, next: ProfileState, fields: &[Field]) -> bool {
        let encoded: serde_json::Result<Vec<(&str, Option<String>)>> = fields
            .iter()
            .map(|&f| next.encode(f).map(|v| (f.key(), v)))
            .collect();

        let changes = match encoded {
            Ok(changes) => changes,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize profile state");
                return false;
            }
        };

        if let Err(e) = self.store.write(&changes) {
            let error = format!("{e:#}");
            let keys: Vec<&str> = changes.iter().map(|(k, _)| *k).collect();
            tracing::error!(%error, ?keys, "failed to persist profile state");
            return false;
        }

        self.state = next;
        true
    }
}

fn read<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            let error = format!("{e:#}");
            tracing::warn!(key, %error, "failed to read stored value");
            return None;
        }
    };
    // `null` is accepted as absent.
    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unreadable stored value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::db::Database;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn fresh() -> Profile<Database> {
        Profile::load(Database::open_in_memory().unwrap())
    }

    /// Wraps a real database and fails writes on demand.
    struct FlakyStore {
        inner: Database,
        fail_writes: Cell<bool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn write(&self, changes: &[(&str, Option<String>)]) -> Result<()> {
            if self.fail_writes.get() {
                anyhow::bail!("disk full");
            }
            self.inner.write(changes)
        }
    }

    #[test]
    fn test_load_empty_store_defaults() {
        let profile = fresh();
        assert_eq!(profile.state(), &ProfileState::default());
        assert_eq!(profile.theme(), Theme::Dark);
        assert!(profile.bmi().is_none());
        assert!(profile.goal_progress().is_none());
        assert!(profile.stats().is_none());
    }

    #[test]
    fn test_save_weight_persists_sorted_collection() {
        let mut profile = fresh();
        assert!(profile.save_weight(day(10), 80.0, None).unwrap());
        assert!(profile.save_weight(day(2), 81.0, None).unwrap());

        let dates: Vec<NaiveDate> = profile.weight_entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(2), day(10)]);

        let raw = profile.store().get(keys::WEIGHT_ENTRIES).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"date":"2025-04-02","weight":81.0},{"date":"2025-04-10","weight":80.0}]"#
        );
    }

    #[test]
    fn test_invalid_weight_leaves_state_untouched() {
        let mut profile = fresh();
        profile.save_weight(day(1), 80.0, None).unwrap();
        let before = profile.state().clone();

        assert_eq!(
            profile.save_weight(day(2), -1.0, None),
            Err(ValidationError::InvalidWeight)
        );
        assert_eq!(profile.state(), &before);
    }

    #[test]
    fn test_edit_weight_moves_date() {
        let mut profile = fresh();
        profile.save_weight(day(1), 80.0, None).unwrap();
        profile.save_weight(day(3), 79.0, None).unwrap();

        profile.save_weight(day(5), 79.2, Some(day(3))).unwrap();
        assert!(profile.weight_on(day(3)).is_none());
        assert_eq!(profile.weight_on(day(5)).map(|e| e.weight), Some(79.2));
        assert_eq!(profile.weight_entries().len(), 2);
    }

    #[test]
    fn test_delete_weight_absent_is_noop() {
        let mut profile = fresh();
        profile.save_weight(day(1), 80.0, None).unwrap();
        let raw_before = profile.store().get(keys::WEIGHT_ENTRIES).unwrap();

        assert!(!profile.delete_weight(day(9)));
        assert_eq!(profile.store().get(keys::WEIGHT_ENTRIES).unwrap(), raw_before);

        assert!(profile.delete_weight(day(1)));
        assert!(profile.weight_entries().is_empty());
    }

    #[test]
    fn test_measurements_are_independent_of_weights() {
        let mut profile = fresh();
        profile.save_weight(day(1), 80.0, None).unwrap();
        let m = MeasurementEntry::new(day(1), Some(92.0), None, None).unwrap();
        assert!(profile.save_measurement(m, None));

        assert!(profile.delete_measurement(day(1)));
        assert!(profile.measurement_entries().is_empty());
        assert_eq!(profile.weight_entries().len(), 1);
    }

    #[test]
    fn test_height_validation_and_bmi() {
        let mut profile = fresh();
        assert_eq!(profile.set_height(40), Err(ValidationError::InvalidHeight));
        assert!(profile.height().is_none());

        assert!(profile.set_height(175).unwrap());
        profile.save_weight(day(1), 70.0, None).unwrap();
        assert_eq!(profile.bmi(), Some(22.9));
    }

    #[test]
    fn test_goal_progress_through_profile() {
        let mut profile = fresh();
        profile.save_weight(day(1), 80.0, None).unwrap();
        profile.save_weight(day(20), 75.0, None).unwrap();
        profile.set_goal_weight(70.0).unwrap();

        let progress = profile.goal_progress().unwrap();
        assert_eq!(progress.weight_to_go, 5.0);
        assert_eq!(progress.progress_percentage, 50);

        assert!(profile.clear_goal_weight());
        assert!(!profile.clear_goal_weight());
        assert!(profile.goal_progress().is_none());
    }

    #[test]
    fn test_clear_all_keeps_theme() {
        let mut profile = fresh();
        profile.set_height(180).unwrap();
        profile.save_weight(day(1), 90.0, None).unwrap();
        profile
            .save_measurement(MeasurementEntry::new(day(1), None, Some(35.0), None).unwrap(), None);
        profile.set_goal_weight(82.0).unwrap();
        profile.set_theme(Theme::Light);

        assert!(profile.clear_all());
        assert_eq!(
            profile.state(),
            &ProfileState {
                theme: Theme::Light,
                ..ProfileState::default()
            }
        );
        assert!(profile.store().get(keys::HEIGHT).unwrap().is_none());
        assert!(profile.store().get(keys::GOAL_WEIGHT).unwrap().is_none());
        assert_eq!(
            profile.store().get(keys::WEIGHT_ENTRIES).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_failed_write_keeps_prior_state() {
        let store = FlakyStore {
            inner: Database::open_in_memory().unwrap(),
            fail_writes: Cell::new(false),
        };
        let mut profile = Profile::load(store);
        profile.save_weight(day(1), 80.0, None).unwrap();
        let before = profile.state().clone();

        profile.store().fail_writes.set(true);
        assert_eq!(profile.save_weight(day(2), 79.0, None), Ok(false));
        assert!(!profile.delete_weight(day(1)));
        assert!(!profile.clear_all());
        assert_eq!(profile.state(), &before);

        profile.store().fail_writes.set(false);
        assert_eq!(profile.save_weight(day(2), 79.0, None), Ok(true));
        assert_eq!(profile.weight_entries().len(), 2);
    }

    #[test]
    fn test_unreadable_values_fall_back_to_defaults() {
        let db = Database::open_in_memory().unwrap();
        db.write(&[
            (keys::WEIGHT_ENTRIES, Some("not json".to_string())),
            (keys::HEIGHT, Some("null".to_string())),
            (keys::THEME, Some("\"light\"".to_string())),
            (keys::GOAL_WEIGHT, Some("72.5".to_string())),
        ])
        .unwrap();

        let profile = Profile::load(db);
        assert!(profile.weight_entries().is_empty());
        assert!(profile.height().is_none());
        assert_eq!(profile.theme(), Theme::Light);
        assert_eq!(profile.goal_weight(), Some(72.5));
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heft.db");
        {
            let mut profile = Profile::load(Database::open(&path).unwrap());
            profile.set_height(168).unwrap();
            profile.save_weight(day(3), 64.0, None).unwrap();
            profile.save_measurement(
                MeasurementEntry::new(day(3), Some(71.0), None, Some(52.0)).unwrap(),
                None,
            );
            profile.set_goal_weight(60.0).unwrap();
        }

        let profile = Profile::load(Database::open(&path).unwrap());
        assert_eq!(profile.height(), Some(168));
        assert_eq!(profile.latest_weight().map(|e| e.weight), Some(64.0));
        assert_eq!(profile.measurement_on(day(3)).and_then(|m| m.thigh), Some(52.0));
        assert_eq!(profile.goal_weight(), Some(60.0));
    }

    #[test]
    fn test_export_through_profile() {
        let mut profile = fresh();
        assert!(profile.export_csv().is_err());
        profile.save_weight(day(1), 80.0, None).unwrap();
        assert_eq!(
            profile.export_csv().unwrap(),
            "date,weight_kg\n2025-04-01,80"
        );
    }
}
