//! Change auditor - snapshots property money fields before an update is written.
//!
//! The property update path calls [`record_financial_changes`] inside its own
//! database transaction, right before the new property row is written. The stored
//! row is re-read by id, compared field by field against the pending values, and
//! one [`financial_history`] entry per changed tracked field is inserted in a single
//! batch. Because the batch shares the update's transaction, entries and update
//! commit or roll back together.

use crate::{
    entities::{FinancialHistory, Property, TrackedField, financial_history, property},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Fields audited on every property update, in the order entries are written
pub const TRACKED_FIELDS: [TrackedField; 3] = [
    TrackedField::RentAmount,
    TrackedField::HomePayment,
    TrackedField::LotPayment,
];

impl TrackedField {
    /// Reads this field's value from a property.
    #[must_use]
    pub const fn value_in(self, property: &property::Model) -> Decimal {
        match self {
            Self::RentAmount => property.rent_amount,
            Self::HomePayment => property.home_payment,
            Self::LotPayment => property.lot_payment,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RentAmount => "Rent Amount",
            Self::HomePayment => "Home Payment",
            Self::LotPayment => "Lot Payment",
        }
    }
}

/// A single tracked-field change detected between two property states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinancialChange {
    /// Field that changed
    pub field: TrackedField,
    /// Stored value before the save
    pub old_value: Decimal,
    /// Pending value being saved
    pub new_value: Decimal,
}

/// Compares the tracked fields of two property states with exact equality.
///
/// Returns one change per differing field, in [`TRACKED_FIELDS`] order. Fields
/// outside the tracked set are ignored whatever their values.
#[must_use]
pub fn diff_financial_fields(
    previous: &property::Model,
    pending: &property::Model,
) -> Vec<FinancialChange> {
    TRACKED_FIELDS
        .iter()
        .filter_map(|&field| {
            let old_value = field.value_in(previous);
            let new_value = field.value_in(pending);
            (old_value != new_value).then_some(FinancialChange {
                field,
                old_value,
                new_value,
            })
        })
        .collect()
}

/// Records the financial changes a pending property update is about to make.
///
/// Must be called before the pending state is written, on the connection or
/// transaction that will write it. The stored row is fetched fresh by
/// `pending.id`; if it is gone the audit is skipped and the save is not blocked.
/// Returns the number of history entries written.
pub async fn record_financial_changes<C>(
    db: &C,
    pending: &property::Model,
    acting_user: Option<i64>,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let Some(previous) = Property::find_by_id(pending.id).one(db).await? else {
        debug!(
            property_id = pending.id,
            "No stored state for property; skipping financial audit"
        );
        return Ok(0);
    };

    let changes = diff_financial_fields(&previous, pending);
    if changes.is_empty() {
        return Ok(0);
    }

    for change in &changes {
        debug!(
            property_id = pending.id,
            field = change.field.label(),
            old = %change.old_value,
            new = %change.new_value,
            "Financial field changed"
        );
    }

    let now = chrono::Utc::now();
    let entries: Vec<financial_history::ActiveModel> = changes
        .iter()
        .map(|change| financial_history::ActiveModel {
            property_id: Set(pending.id),
            field_name: Set(change.field),
            old_value: Set(change.old_value),
            new_value: Set(change.new_value),
            date_changed: Set(now),
            changed_by: Set(acting_user),
            ..Default::default()
        })
        .collect();

    let count = entries.len() as u64;
    FinancialHistory::insert_many(entries).exec(db).await?;

    debug!(
        property_id = pending.id,
        count, "Recorded financial history entries"
    );
    Ok(count)
}

/// Retrieves the financial audit trail of a property, most recent first.
pub async fn get_financial_history<C>(
    db: &C,
    property_id: i64,
) -> Result<Vec<financial_history::Model>>
where
    C: ConnectionTrait,
{
    FinancialHistory::find()
        .filter(financial_history::Column::PropertyId.eq(property_id))
        .order_by_desc(financial_history::Column::DateChanged)
        .order_by_desc(financial_history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
