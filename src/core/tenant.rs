//! Tenant business logic - people renting properties.
//!
//! A tenant may be placed in at most one property. Tenants with payment history
//! cannot be deleted.

use crate::{
    core::activity::{self, Action},
    entities::{IdentificationType, Payment, Property, Tenant, payment, tenant},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Editable fields of a tenant, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TenantDraft {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact phone
    pub phone_number: String,
    /// Date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Identification document kind
    pub identification_type: Option<IdentificationType>,
    /// Identification document number
    pub identification_number: String,
    /// Passed screening
    pub is_approved: bool,
    /// Approval date
    pub date_approved: Option<NaiveDate>,
    /// Move-in date
    pub move_in_date: Option<NaiveDate>,
    /// Property currently occupied
    pub property_id: Option<i64>,
}

impl TenantDraft {
    /// Draft with only the name set.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }
}

impl From<&tenant::Model> for TenantDraft {
    fn from(model: &tenant::Model) -> Self {
        Self {
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
            phone_number: model.phone_number.clone(),
            date_of_birth: model.date_of_birth,
            identification_type: model.identification_type,
            identification_number: model.identification_number.clone(),
            is_approved: model.is_approved,
            date_approved: model.date_approved,
            move_in_date: model.move_in_date,
            property_id: model.property_id,
        }
    }
}

async fn validate<C>(db: &C, draft: &TenantDraft) -> Result<()>
where
    C: ConnectionTrait,
{
    if draft.first_name.trim().is_empty() || draft.last_name.trim().is_empty() {
        return Err(Error::validation("Tenant first and last name are required"));
    }

    if let Some(property_id) = draft.property_id {
        if Property::find_by_id(property_id).one(db).await?.is_none() {
            return Err(Error::not_found("Property", property_id));
        }
    }

    Ok(())
}

/// Retrieves all tenants ordered by last name, then first name.
pub async fn get_all_tenants(db: &DatabaseConnection) -> Result<Vec<tenant::Model>> {
    Tenant::find()
        .order_by_asc(tenant::Column::LastName)
        .order_by_asc(tenant::Column::FirstName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the tenants currently placed in a property.
///
/// Shown on the property detail page. Tenants whose property was deleted have no
/// link any more and drop out of every property's list.
pub async fn get_tenants_for_property(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<Vec<tenant::Model>> {
    Tenant::find()
        .filter(tenant::Column::PropertyId.eq(property_id))
        .order_by_asc(tenant::Column::LastName)
        .order_by_asc(tenant::Column::FirstName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a tenant by its unique ID.
pub async fn get_tenant_by_id(
    db: &DatabaseConnection,
    tenant_id: i64,
) -> Result<Option<tenant::Model>> {
    Tenant::find_by_id(tenant_id).one(db).await.map_err(Into::into)
}

/// Creates a new tenant.
///
/// Names are trimmed and required. A property link, when given, must point at an
/// existing property; a tenant can also be created unplaced and linked later with
/// [`update_tenant`].
pub async fn create_tenant(
    db: &DatabaseConnection,
    draft: TenantDraft,
    acting_user: Option<i64>,
) -> Result<tenant::Model> {
    validate(db, &draft).await?;

    let created = tenant::ActiveModel {
        first_name: Set(draft.first_name.trim().to_string()),
        last_name: Set(draft.last_name.trim().to_string()),
        phone_number: Set(draft.phone_number),
        date_of_birth: Set(draft.date_of_birth),
        identification_type: Set(draft.identification_type),
        identification_number: Set(draft.identification_number),
        is_approved: Set(draft.is_approved),
        date_approved: Set(draft.date_approved),
        move_in_date: Set(draft.move_in_date),
        property_id: Set(draft.property_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    activity::record(
        Action::Added,
        "Tenant",
        &created.full_name(),
        created.id,
        acting_user,
    );
    Ok(created)
}

/// Replaces the editable fields of an existing tenant.
pub async fn update_tenant(
    db: &DatabaseConnection,
    tenant_id: i64,
    draft: TenantDraft,
    acting_user: Option<i64>,
) -> Result<tenant::Model> {
    validate(db, &draft).await?;

    let mut tenant: tenant::ActiveModel = Tenant::find_by_id(tenant_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Tenant", tenant_id))?
        .into();

    tenant.first_name = Set(draft.first_name.trim().to_string());
    tenant.last_name = Set(draft.last_name.trim().to_string());
    tenant.phone_number = Set(draft.phone_number);
    tenant.date_of_birth = Set(draft.date_of_birth);
    tenant.identification_type = Set(draft.identification_type);
    tenant.identification_number = Set(draft.identification_number);
    tenant.is_approved = Set(draft.is_approved);
    tenant.date_approved = Set(draft.date_approved);
    tenant.move_in_date = Set(draft.move_in_date);
    tenant.property_id = Set(draft.property_id);

    let updated = tenant.update(db).await?;
    activity::record(
        Action::Changed,
        "Tenant",
        &updated.full_name(),
        updated.id,
        acting_user,
    );
    Ok(updated)
}

/// Deletes a tenant with no payment history.
///
/// # Errors
/// Returns [`Error::StillReferenced`] naming `payments` if any payment references
/// the tenant.
pub async fn delete_tenant(
    db: &DatabaseConnection,
    tenant_id: i64,
    acting_user: Option<i64>,
) -> Result<()> {
    let txn = db.begin().await?;

    let tenant = Tenant::find_by_id(tenant_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Tenant", tenant_id))?;

    let payments = Payment::find()
        .filter(payment::Column::TenantId.eq(tenant_id))
        .count(&txn)
        .await?;
    if payments > 0 {
        return Err(Error::StillReferenced {
            entity: "Tenant",
            id: tenant_id,
            relation: "payments",
        });
    }

    let label = tenant.full_name();
    tenant.delete(&txn).await?;
    txn.commit().await?;

    activity::record(Action::Deleted, "Tenant", &label, tenant_id, acting_user);
    Ok(())
}
