//! Property entity - A rentable mobile home or lot owned by an LLC.
//!
//! Carries the address, status, physical attributes and the monthly money fields.
//! Changes to `rent_amount`, `home_payment` and `lot_payment` are audited into
//! [`super::financial_history`] by [`crate::core::audit`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Occupancy status of a property
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum PropertyStatus {
    /// A tenant lives here
    #[sea_orm(string_value = "OCC")]
    Occupied,
    /// Home is empty and rentable
    #[default]
    #[sea_orm(string_value = "VAC")]
    Vacant,
    /// Used as the park office
    #[sea_orm(string_value = "OFF")]
    Office,
    /// Lot with no home on it
    #[sea_orm(string_value = "LOT")]
    LotVacant,
    /// Anything else
    #[sea_orm(string_value = "OTH")]
    Other,
}

impl PropertyStatus {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Occupied => "Occupied",
            Self::Vacant => "Vacant",
            Self::Office => "Office",
            Self::LotVacant => "Lot Vacant",
            Self::Other => "Other",
        }
    }
}

/// Property database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    /// Unique identifier for the property
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning LLC
    pub llc_id: i64,
    /// Street number (e.g., "123", "456A")
    pub street_number: String,
    /// Street name (e.g., "Elm Ave Lot 5")
    pub street_name: String,
    /// Date the property was acquired
    pub date_purchased: Option<Date>,
    /// Free-text size description (e.g., "14x60", "Double Wide")
    pub size: String,
    /// Current occupancy status
    pub status: PropertyStatus,
    /// Monthly rent in dollars
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub rent_amount: Decimal,
    /// Monthly home payment in dollars
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub home_payment: Decimal,
    /// Monthly lot payment in dollars
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub lot_payment: Decimal,
    /// Required security deposit in dollars
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub security_deposit: Decimal,
    /// Manufacturer of the home
    pub make: String,
    /// Year the home was manufactured
    pub year: Option<i32>,
    /// Vehicle identification number, unique when present
    #[sea_orm(unique)]
    pub vin: Option<String>,
    /// Number of bedrooms
    pub bedrooms: i32,
    /// Number of bathrooms (1.0, 1.5, ...)
    #[sea_orm(column_type = "Decimal(Some((3, 1)))")]
    pub bathrooms: Decimal,
    /// Electric utility provider
    pub power_provider: String,
    /// Water utility provider
    pub water_provider: String,
}

impl Model {
    /// Street address, e.g. "123 Main St"
    #[must_use]
    pub fn address(&self) -> String {
        format!("{} {}", self.street_number, self.street_name)
    }
}

/// Defines relationships between Property and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each property belongs to one LLC; the LLC cannot be deleted while it owns properties
    #[sea_orm(
        belongs_to = "super::llc::Entity",
        from = "Column::LlcId",
        to = "super::llc::Column::Id",
        on_delete = "Restrict"
    )]
    Llc,
    /// One property houses many tenants
    #[sea_orm(has_many = "super::tenant::Entity")]
    Tenants,
    /// One property receives many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
    /// One property has an audit trail of financial changes
    #[sea_orm(has_many = "super::financial_history::Entity")]
    FinancialHistory,
}

impl Related<super::llc::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Llc.def()
    }
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::financial_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
