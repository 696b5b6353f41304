//! Property business logic - rental properties, their money fields, and bulk
//! status changes.
//!
//! Every update runs through [`crate::core::audit`] inside the update's own
//! transaction, so the financial history and the property row always agree.
//! Deleting a property is blocked while payments reference it; tenant links are
//! cleared and the financial history goes with it.

use crate::{
    core::{
        activity::{self, Action},
        audit, money,
    },
    entities::{
        FinancialHistory, Llc, Payment, Property, PropertyStatus, Tenant, financial_history, llc,
        payment, property, tenant,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Editable fields of a property, used for both create and update.
///
/// Updates replace every field, the way a submitted edit form does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDraft {
    /// Owning LLC
    pub llc_id: i64,
    /// Street number
    pub street_number: String,
    /// Street name
    pub street_name: String,
    /// Acquisition date
    pub date_purchased: Option<NaiveDate>,
    /// Free-text size
    pub size: String,
    /// Occupancy status
    pub status: PropertyStatus,
    /// Monthly rent
    pub rent_amount: Decimal,
    /// Monthly home payment
    pub home_payment: Decimal,
    /// Monthly lot payment
    pub lot_payment: Decimal,
    /// Security deposit
    pub security_deposit: Decimal,
    /// Home manufacturer
    pub make: String,
    /// Year of manufacture
    pub year: Option<i32>,
    /// VIN; blank is treated as absent
    pub vin: Option<String>,
    /// Bedrooms
    pub bedrooms: i32,
    /// Bathrooms, at least 0.5
    pub bathrooms: Decimal,
    /// Electric utility
    pub power_provider: String,
    /// Water utility
    pub water_provider: String,
}

impl PropertyDraft {
    /// Draft for a vacant property at the given address with default values.
    #[must_use]
    pub fn new(
        llc_id: i64,
        street_number: impl Into<String>,
        street_name: impl Into<String>,
    ) -> Self {
        Self {
            llc_id,
            street_number: street_number.into(),
            street_name: street_name.into(),
            date_purchased: None,
            size: String::new(),
            status: PropertyStatus::default(),
            rent_amount: Decimal::ZERO,
            home_payment: Decimal::ZERO,
            lot_payment: Decimal::ZERO,
            security_deposit: Decimal::ZERO,
            make: String::new(),
            year: None,
            vin: None,
            bedrooms: 1,
            bathrooms: Decimal::ONE,
            power_provider: String::new(),
            water_provider: String::new(),
        }
    }

    /// Checks the field rules and normalises text fields.
    fn validated(mut self) -> Result<Self> {
        self.street_number = self.street_number.trim().to_string();
        self.street_name = self.street_name.trim().to_string();
        if self.street_number.is_empty() || self.street_name.is_empty() {
            return Err(Error::validation("Street number and street name are required"));
        }

        for amount in [
            self.rent_amount,
            self.home_payment,
            self.lot_payment,
            self.security_deposit,
        ] {
            if amount < Decimal::ZERO {
                return Err(Error::InvalidAmount { amount });
            }
            money::ensure_money(amount)?;
        }

        if self.bedrooms < 0 {
            return Err(Error::validation("Bedrooms cannot be negative"));
        }
        if self.bathrooms < Decimal::new(5, 1) {
            return Err(Error::validation("Bathrooms must be at least 0.5"));
        }
        if !money::BATHROOMS.fits(self.bathrooms) {
            return Err(Error::InvalidAmount {
                amount: self.bathrooms,
            });
        }
        if self.year.is_some_and(|year| year < 0) {
            return Err(Error::validation("Year cannot be negative"));
        }

        self.vin = self
            .vin
            .map(|vin| vin.trim().to_string())
            .filter(|vin| !vin.is_empty());

        Ok(self)
    }

    fn into_model(self, id: i64) -> property::Model {
        property::Model {
            id,
            llc_id: self.llc_id,
            street_number: self.street_number,
            street_name: self.street_name,
            date_purchased: self.date_purchased,
            size: self.size,
            status: self.status,
            rent_amount: self.rent_amount,
            home_payment: self.home_payment,
            lot_payment: self.lot_payment,
            security_deposit: self.security_deposit,
            make: self.make,
            year: self.year,
            vin: self.vin,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            power_provider: self.power_provider,
            water_provider: self.water_provider,
        }
    }
}

impl From<&property::Model> for PropertyDraft {
    fn from(model: &property::Model) -> Self {
        Self {
            llc_id: model.llc_id,
            street_number: model.street_number.clone(),
            street_name: model.street_name.clone(),
            date_purchased: model.date_purchased,
            size: model.size.clone(),
            status: model.status,
            rent_amount: model.rent_amount,
            home_payment: model.home_payment,
            lot_payment: model.lot_payment,
            security_deposit: model.security_deposit,
            make: model.make.clone(),
            year: model.year,
            vin: model.vin.clone(),
            bedrooms: model.bedrooms,
            bathrooms: model.bathrooms,
            power_provider: model.power_provider.clone(),
            water_provider: model.water_provider.clone(),
        }
    }
}

/// Active model with every column set from `model`; the id is kept as given.
fn active_model_from(model: property::Model, id: ActiveValue<i64>) -> property::ActiveModel {
    property::ActiveModel {
        id,
        llc_id: Set(model.llc_id),
        street_number: Set(model.street_number),
        street_name: Set(model.street_name),
        date_purchased: Set(model.date_purchased),
        size: Set(model.size),
        status: Set(model.status),
        rent_amount: Set(model.rent_amount),
        home_payment: Set(model.home_payment),
        lot_payment: Set(model.lot_payment),
        security_deposit: Set(model.security_deposit),
        make: Set(model.make),
        year: Set(model.year),
        vin: Set(model.vin),
        bedrooms: Set(model.bedrooms),
        bathrooms: Set(model.bathrooms),
        power_provider: Set(model.power_provider),
        water_provider: Set(model.water_provider),
    }
}

/// Optional filters for [`list_properties`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    /// Only properties owned by this LLC
    pub llc_id: Option<i64>,
    /// Only properties with this status
    pub status: Option<PropertyStatus>,
}

/// Lists properties ordered by LLC, street number, then street name.
pub async fn list_properties(
    db: &DatabaseConnection,
    filter: PropertyFilter,
) -> Result<Vec<property::Model>> {
    let mut query = Property::find();
    if let Some(llc_id) = filter.llc_id {
        query = query.filter(property::Column::LlcId.eq(llc_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(property::Column::Status.eq(status));
    }

    query
        .order_by_asc(property::Column::LlcId)
        .order_by_asc(property::Column::StreetNumber)
        .order_by_asc(property::Column::StreetName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a property by its unique ID.
pub async fn get_property_by_id<C>(db: &C, property_id: i64) -> Result<Option<property::Model>>
where
    C: ConnectionTrait,
{
    Property::find_by_id(property_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Checks the owning LLC exists and no other property clashes on address or VIN.
///
/// Returns the owning LLC so callers can label the record with its name.
async fn ensure_writable<C>(
    db: &C,
    draft: &PropertyDraft,
    except_id: Option<i64>,
) -> Result<llc::Model>
where
    C: ConnectionTrait,
{
    let owner = Llc::find_by_id(draft.llc_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("LLC", draft.llc_id))?;

    let mut same_address = Property::find()
        .filter(property::Column::LlcId.eq(draft.llc_id))
        .filter(property::Column::StreetNumber.eq(draft.street_number.as_str()))
        .filter(property::Column::StreetName.eq(draft.street_name.as_str()));
    if let Some(id) = except_id {
        same_address = same_address.filter(property::Column::Id.ne(id));
    }
    if same_address.one(db).await?.is_some() {
        return Err(Error::Conflict {
            message: format!(
                "{} {} already exists for this LLC",
                draft.street_number, draft.street_name
            ),
        });
    }

    if let Some(vin) = &draft.vin {
        let mut same_vin = Property::find().filter(property::Column::Vin.eq(vin.as_str()));
        if let Some(id) = except_id {
            same_vin = same_vin.filter(property::Column::Id.ne(id));
        }
        if same_vin.one(db).await?.is_some() {
            return Err(Error::Conflict {
                message: format!("VIN '{vin}' is already assigned to another property"),
            });
        }
    }

    Ok(owner)
}

/// Activity label, e.g. "12 Elm Ave (Sunrise Holdings LLC)"
fn label(property: &property::Model, owner: &llc::Model) -> String {
    format!("{} ({})", property.address(), owner.name)
}

/// Label for a stored property, looking its LLC up on the given connection.
async fn label_in<C>(db: &C, property: &property::Model) -> Result<String>
where
    C: ConnectionTrait,
{
    let owner = Llc::find_by_id(property.llc_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("LLC", property.llc_id))?;
    Ok(label(property, &owner))
}

/// Creates a new property. No financial history is written for new records.
pub async fn create_property(
    db: &DatabaseConnection,
    draft: PropertyDraft,
    acting_user: Option<i64>,
) -> Result<property::Model> {
    let draft = draft.validated()?;
    let owner = ensure_writable(db, &draft, None).await?;

    let created = active_model_from(draft.into_model(0), ActiveValue::NotSet)
        .insert(db)
        .await
        .map_err(Error::from_write)?;

    activity::record(
        Action::Added,
        "Property",
        &label(&created, &owner),
        created.id,
        acting_user,
    );
    Ok(created)
}

/// Replaces the editable fields of a property, auditing tracked money fields.
///
/// The auditor runs in the same transaction, before the row is written, so
/// history entries and the update commit together or not at all.
pub async fn update_property(
    db: &DatabaseConnection,
    property_id: i64,
    draft: PropertyDraft,
    acting_user: Option<i64>,
) -> Result<property::Model> {
    let draft = draft.validated()?;
    let txn = db.begin().await?;

    if get_property_by_id(&txn, property_id).await?.is_none() {
        return Err(Error::not_found("Property", property_id));
    }
    let owner = ensure_writable(&txn, &draft, Some(property_id)).await?;

    let pending = draft.into_model(property_id);
    audit::record_financial_changes(&txn, &pending, acting_user).await?;

    let updated = active_model_from(pending, ActiveValue::Unchanged(property_id))
        .update(&txn)
        .await
        .map_err(Error::from_write)?;
    txn.commit().await?;

    activity::record(
        Action::Changed,
        "Property",
        &label(&updated, &owner),
        updated.id,
        acting_user,
    );
    Ok(updated)
}

/// Deletes one property on the given connection, enforcing the reference rules.
async fn delete_property_in<C>(db: &C, property: property::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    let payments = Payment::find()
        .filter(payment::Column::PropertyId.eq(property.id))
        .count(db)
        .await?;
    if payments > 0 {
        return Err(Error::StillReferenced {
            entity: "Property",
            id: property.id,
            relation: "payments",
        });
    }

    Tenant::update_many()
        .col_expr(tenant::Column::PropertyId, Expr::value(Option::<i64>::None))
        .filter(tenant::Column::PropertyId.eq(property.id))
        .exec(db)
        .await?;

    FinancialHistory::delete_many()
        .filter(financial_history::Column::PropertyId.eq(property.id))
        .exec(db)
        .await?;

    property.delete(db).await?;
    Ok(())
}

/// Deletes a property.
///
/// # Errors
/// Returns [`Error::StillReferenced`] naming `payments` if any payment references
/// the property; nothing is changed in that case.
pub async fn delete_property(
    db: &DatabaseConnection,
    property_id: i64,
    acting_user: Option<i64>,
) -> Result<()> {
    let txn = db.begin().await?;

    let property = get_property_by_id(&txn, property_id)
        .await?
        .ok_or_else(|| Error::not_found("Property", property_id))?;
    let text = label_in(&txn, &property).await?;

    delete_property_in(&txn, property).await?;
    txn.commit().await?;

    activity::record(Action::Deleted, "Property", &text, property_id, acting_user);
    Ok(())
}

/// Sets the status of every selected property. Status is not a tracked field, so
/// no financial history is written. Returns the number of properties updated.
pub async fn bulk_update_status(
    db: &DatabaseConnection,
    property_ids: &[i64],
    status: PropertyStatus,
    acting_user: Option<i64>,
) -> Result<u64> {
    if property_ids.is_empty() {
        return Err(Error::validation("Select at least one property"));
    }

    let result = Property::update_many()
        .col_expr(property::Column::Status, Expr::value(status.to_value()))
        .filter(property::Column::Id.is_in(property_ids.iter().copied()))
        .exec(db)
        .await?;

    info!(
        target: "property_tracker::activity",
        updated = result.rows_affected,
        status = status.label(),
        actor = %crate::config::users::actor_label(acting_user),
        "Bulk status update"
    );
    Ok(result.rows_affected)
}

/// Deletes every selected property, all or nothing: if any one is still
/// referenced by payments, none are deleted. Returns the number deleted.
pub async fn bulk_delete_properties(
    db: &DatabaseConnection,
    property_ids: &[i64],
    acting_user: Option<i64>,
) -> Result<u64> {
    if property_ids.is_empty() {
        return Err(Error::validation("Select at least one property"));
    }

    let txn = db.begin().await?;
    let properties = Property::find()
        .filter(property::Column::Id.is_in(property_ids.iter().copied()))
        .all(&txn)
        .await?;

    let mut deleted = Vec::with_capacity(properties.len());
    for property in properties {
        deleted.push((property.id, label_in(&txn, &property).await?));
        delete_property_in(&txn, property).await?;
    }
    txn.commit().await?;

    for (id, text) in &deleted {
        activity::record(Action::Deleted, "Property", text, *id, acting_user);
    }
    Ok(deleted.len() as u64)
}

/// Retrieves the financial audit trail of a property, most recent first.
pub async fn get_financial_history(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<Vec<financial_history::Model>> {
    audit::get_financial_history(db, property_id).await
}
