//! Payment business logic - rent and other payments received from tenants.
//!
//! Amounts must be strictly positive and are checked before the database is
//! touched. Both the tenant and the property must exist.

use crate::{
    core::{
        activity::{self, Action},
        money,
    },
    entities::{Payment, Property, Tenant, payment, property, tenant},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Editable fields of a payment, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDraft {
    /// Tenant who paid
    pub tenant_id: i64,
    /// Property paid for
    pub property_id: i64,
    /// Date received
    pub payment_date: NaiveDate,
    /// Amount, strictly positive
    pub amount: Decimal,
    /// Free-text notes
    pub notes: String,
}

impl From<&payment::Model> for PaymentDraft {
    fn from(model: &payment::Model) -> Self {
        Self {
            tenant_id: model.tenant_id,
            property_id: model.property_id,
            payment_date: model.payment_date,
            amount: model.amount,
            notes: model.notes.clone(),
        }
    }
}

/// Amounts must be strictly positive and fit the `DECIMAL(8, 2)` column.
fn check_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }
    money::ensure_money(amount)
}

/// Loads the tenant and property a payment points at, failing if either is gone.
async fn load_references<C>(
    db: &C,
    tenant_id: i64,
    property_id: i64,
) -> Result<(tenant::Model, property::Model)>
where
    C: ConnectionTrait,
{
    let tenant = Tenant::find_by_id(tenant_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Tenant", tenant_id))?;
    let property = Property::find_by_id(property_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Property", property_id))?;
    Ok((tenant, property))
}

/// Activity label, e.g. "$650.00 by Dana Reyes on 2025-01-01 for 12 Elm Ave"
fn label(payment: &payment::Model, tenant: &tenant::Model, property: &property::Model) -> String {
    format!(
        "${} by {} on {} for {}",
        payment.amount,
        tenant.full_name(),
        payment.payment_date,
        property.address()
    )
}

/// Retrieves all payments, most recent first.
pub async fn get_all_payments(db: &DatabaseConnection) -> Result<Vec<payment::Model>> {
    Payment::find()
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_asc(payment::Column::TenantId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the payments made for a property, most recent first.
pub async fn get_payments_for_property(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::PropertyId.eq(property_id))
        .order_by_desc(payment::Column::PaymentDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the payments made by a tenant, most recent first.
pub async fn get_payments_for_tenant(
    db: &DatabaseConnection,
    tenant_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::TenantId.eq(tenant_id))
        .order_by_desc(payment::Column::PaymentDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a payment by its unique ID.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    payment_id: i64,
) -> Result<Option<payment::Model>> {
    Payment::find_by_id(payment_id).one(db).await.map_err(Into::into)
}

/// Records a payment.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] for amounts ≤ 0 before any database access,
/// or [`Error::NotFound`] if the tenant or property does not exist.
pub async fn create_payment(
    db: &DatabaseConnection,
    draft: PaymentDraft,
    acting_user: Option<i64>,
) -> Result<payment::Model> {
    check_amount(draft.amount)?;
    let (tenant, property) = load_references(db, draft.tenant_id, draft.property_id).await?;

    let created = payment::ActiveModel {
        tenant_id: Set(draft.tenant_id),
        property_id: Set(draft.property_id),
        payment_date: Set(draft.payment_date),
        amount: Set(draft.amount),
        notes: Set(draft.notes),
        ..Default::default()
    }
    .insert(db)
    .await?;

    activity::record(
        Action::Added,
        "Payment",
        &label(&created, &tenant, &property),
        created.id,
        acting_user,
    );
    Ok(created)
}

/// Replaces the editable fields of an existing payment.
///
/// The amount is checked first, so a bad amount never costs a query. Moving a
/// payment to another tenant or property requires both to exist.
pub async fn update_payment(
    db: &DatabaseConnection,
    payment_id: i64,
    draft: PaymentDraft,
    acting_user: Option<i64>,
) -> Result<payment::Model> {
    check_amount(draft.amount)?;

    let mut payment: payment::ActiveModel = Payment::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Payment", payment_id))?
        .into();
    let (tenant, property) = load_references(db, draft.tenant_id, draft.property_id).await?;

    payment.tenant_id = Set(draft.tenant_id);
    payment.property_id = Set(draft.property_id);
    payment.payment_date = Set(draft.payment_date);
    payment.amount = Set(draft.amount);
    payment.notes = Set(draft.notes);

    let updated = payment.update(db).await?;
    activity::record(
        Action::Changed,
        "Payment",
        &label(&updated, &tenant, &property),
        updated.id,
        acting_user,
    );
    Ok(updated)
}

/// Deletes a payment. Nothing references payments, so this is never blocked.
pub async fn delete_payment(
    db: &DatabaseConnection,
    payment_id: i64,
    acting_user: Option<i64>,
) -> Result<()> {
    let payment = Payment::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Payment", payment_id))?;

    let (tenant, property) = load_references(db, payment.tenant_id, payment.property_id).await?;
    let text = label(&payment, &tenant, &property);
    payment.delete(db).await?;

    activity::record(Action::Deleted, "Payment", &text, payment_id, acting_user);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn draft(amount: Decimal) -> PaymentDraft {
        PaymentDraft {
            tenant_id: 1,
            property_id: 1,
            payment_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            amount,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_payment_rejects_non_positive_before_writing() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [Decimal::ZERO, Decimal::new(-1, 2), Decimal::new(-500, 0)] {
            let result = create_payment(&db, draft(amount), None).await;
            assert!(matches!(
                result.unwrap_err(),
                Error::InvalidAmount { amount: a } if a == amount
            ));
        }

        // Not a single statement reached the database
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_rejects_unrepresentable_before_writing() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Sub-cent and over-width amounts would be stored rounded
        for amount in [Decimal::new(1, 3), Decimal::new(1_000_000, 0)] {
            let result = create_payment(&db, draft(amount), None).await;
            assert!(matches!(
                result.unwrap_err(),
                Error::InvalidAmount { amount: a } if a == amount
            ));
        }

        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_payment_rejects_non_positive() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = update_payment(&db, 1, draft(Decimal::ZERO), None).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_requires_references() -> Result<()> {
        let (db, property, tenant) = setup_with_tenant().await?;

        let mut bad_tenant = draft(Decimal::new(100, 0));
        bad_tenant.tenant_id = tenant.id + 100;
        bad_tenant.property_id = property.id;
        let result = create_payment(&db, bad_tenant, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "Tenant", .. }
        ));

        let mut bad_property = draft(Decimal::new(100, 0));
        bad_property.tenant_id = tenant.id;
        bad_property.property_id = property.id + 100;
        let result = create_payment(&db, bad_property, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "Property", .. }
        ));

        assert!(get_all_payments(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_smallest_positive_amount_is_accepted() -> Result<()> {
        let (db, property, tenant) = setup_with_tenant().await?;
        let payment = create_test_payment(&db, tenant.id, property.id, Decimal::new(1, 2)).await?;
        assert_eq!(payment.amount, Decimal::new(1, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_listing_most_recent_first() -> Result<()> {
        let (db, property, tenant) = setup_with_tenant().await?;

        for day in [5, 20, 12] {
            let mut d = draft(Decimal::new(600, 0));
            d.tenant_id = tenant.id;
            d.property_id = property.id;
            d.payment_date = NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
            create_payment(&db, d, None).await?;
        }

        let days: Vec<String> = get_all_payments(&db)
            .await?
            .iter()
            .map(|p| p.payment_date.format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["20", "12", "05"]);

        assert_eq!(get_payments_for_property(&db, property.id).await?.len(), 3);
        assert_eq!(get_payments_for_tenant(&db, tenant.id).await?.len(), 3);
        assert!(get_payments_for_tenant(&db, tenant.id + 1).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_activity_label_names_tenant_and_address() -> Result<()> {
        let (db, property, tenant) = setup_with_tenant().await?;
        let amount = Decimal::new(65_000, 2);
        let payment = create_test_payment(&db, tenant.id, property.id, amount).await?;

        let text = label(&payment, &tenant, &property);
        assert!(text.starts_with("$650"));
        assert!(text.ends_with("by Test Tenant on 2025-01-01 for 12 Elm Ave"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_payment() -> Result<()> {
        let (db, property, tenant) = setup_with_tenant().await?;
        let payment = create_test_payment(&db, tenant.id, property.id, Decimal::new(400, 0)).await?;

        let mut d = PaymentDraft::from(&payment);
        d.amount = Decimal::new(45050, 2);
        d.notes = "check #1042".to_string();
        let updated = update_payment(&db, payment.id, d, None).await?;
        assert_eq!(updated.amount, Decimal::new(45050, 2));
        assert_eq!(updated.notes, "check #1042");

        delete_payment(&db, payment.id, None).await?;
        assert!(get_payment_by_id(&db, payment.id).await?.is_none());

        // With its only payment gone the tenant can be removed
        crate::core::tenant::delete_tenant(&db, tenant.id, None).await?;
        Ok(())
    }
}
