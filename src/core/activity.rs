//! Activity log - structured events for every add, change and delete of the
//! four record types an operator edits (LLCs, properties, tenants, payments).
//!
//! Events go to the `property_tracker::activity` tracing target so a subscriber can
//! route them to their own sink.

use crate::config::users::actor_label;
use std::fmt;
use tracing::info;

/// What happened to the record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Record created
    Added,
    /// Record updated
    Changed,
    /// Record removed
    Deleted,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Deleted => "Deleted",
        })
    }
}

/// Emits one activity event.
pub fn record(action: Action, record_type: &str, label: &str, id: i64, acting_user: Option<i64>) {
    let actor = actor_label(acting_user);
    info!(
        target: "property_tracker::activity",
        %action,
        record_type,
        id,
        actor = %actor,
        "User '{actor}' {action} {record_type}: '{label}' (ID: {id})"
    );
}
