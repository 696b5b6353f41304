//! Financial history entity - Immutable before/after snapshot of one tracked
//! money field on a property.
//!
//! Rows are only ever inserted by [`crate::core::audit`]. They go away with their
//! property, and survive the removal of the user who made the change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The property money fields subject to change auditing
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TrackedField {
    /// `properties.rent_amount`
    #[sea_orm(string_value = "rent_amount")]
    RentAmount,
    /// `properties.home_payment`
    #[sea_orm(string_value = "home_payment")]
    HomePayment,
    /// `properties.lot_payment`
    #[sea_orm(string_value = "lot_payment")]
    LotPayment,
}

/// Financial history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "property_financial_history")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Property whose field changed
    pub property_id: i64,
    /// Which field changed
    pub field_name: TrackedField,
    /// Value before the change
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub old_value: Decimal,
    /// Value after the change
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub new_value: Decimal,
    /// When the change was recorded
    pub date_changed: DateTimeUtc,
    /// User who made the change, None for system changes or removed users
    pub changed_by: Option<i64>,
}

/// Defines relationships between financial history and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one property and is removed with it
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
    /// Each entry may name the user who made the change
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ChangedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
