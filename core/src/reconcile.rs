//! Upsert and delete over date-keyed collections.
//!
//! Weight and measurement entries live in independent collections that share
//! one invariant: at most one entry per date, sorted ascending by date.

use chrono::NaiveDate;

use crate::models::Dated;

/// Insert `entry` under its own date, or replace the entry already stored
/// there.
///
/// When `original_date` is given and differs from the entry's date (an edit
/// that moved the entry), the entry at `original_date` is removed first. If
/// the new date is already occupied by a different entry, that entry is
/// overwritten.
pub fn upsert<T: Dated>(entries: &mut Vec<T>, entry: T, original_date: Option<NaiveDate>) {
    let target = entry.date();

    if let Some(original) = original_date.filter(|d| *d != target) {
        entries.retain(|e| e.date() != original);
    }

    if let Some(existing) = entries.iter_mut().find(|e| e.date() == target) {
        *existing = entry;
    } else {
        entries.push(entry);
    }

    entries.sort_by_key(|e| e.date());
}

/// Remove the entry stored under `date`. Returns false and leaves the
/// collection untouched if there is none.
pub fn delete<T: Dated>(entries: &mut Vec<T>, date: NaiveDate) -> bool {
    let before = entries.len();
    entries.retain(|e| e.date() != date);
    entries.len() != before
}

#[must_use]
pub fn find<T: Dated>(entries: &[T], date: NaiveDate) -> Option<&T> {
    entries.iter().find(|e| e.date() == date)
}
