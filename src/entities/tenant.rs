//! Tenant entity - A person renting (or approved to rent) a property.
//!
//! A tenant occupies at most one property at a time. Removing the property clears
//! the link instead of removing the tenant.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of identification document on file
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(4))")]
pub enum IdentificationType {
    /// Driver's license
    #[sea_orm(string_value = "DL")]
    DriversLicense,
    /// Department of Defense ID
    #[sea_orm(string_value = "DOD")]
    DodId,
    /// Social security card
    #[sea_orm(string_value = "SSN")]
    SocialSecurity,
    /// Passport
    #[sea_orm(string_value = "PASS")]
    Passport,
    /// Anything else
    #[sea_orm(string_value = "OTH")]
    Other,
}

/// Tenant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier for the tenant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact phone number
    pub phone_number: String,
    /// Date of birth
    pub date_of_birth: Option<Date>,
    /// Kind of identification on file
    pub identification_type: Option<IdentificationType>,
    /// Number on the identification document
    pub identification_number: String,
    /// Whether the tenant passed screening
    pub is_approved: bool,
    /// When the tenant was approved
    pub date_approved: Option<Date>,
    /// When the tenant moved in
    pub move_in_date: Option<Date>,
    /// Property currently occupied, None when not placed or moved out
    pub property_id: Option<i64>,
}

impl Model {
    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Defines relationships between Tenant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each tenant occupies at most one property; the link is cleared if the property goes away
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "SetNull"
    )]
    Property,
    /// One tenant makes many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
