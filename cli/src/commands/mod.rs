mod dashboard;
mod goal;
mod helpers;
mod measure;
mod profile;
mod weight;

use heft_core::db::Database;
use heft_core::profile::Profile;

/// Profile state backed by the on-disk store.
pub(crate) type Tracker = Profile<Database>;

pub(crate) use dashboard::{cmd_dashboard, cmd_quote};
pub(crate) use goal::{cmd_goal_clear, cmd_goal_set, cmd_goal_show};
pub(crate) use measure::{cmd_measure_delete, cmd_measure_history, cmd_measure_log};
pub(crate) use profile::{
    cmd_clear, cmd_export, cmd_height_set, cmd_height_show, cmd_stats, cmd_theme,
};
pub(crate) use weight::{cmd_weight_delete, cmd_weight_history, cmd_weight_log, cmd_weight_show};
