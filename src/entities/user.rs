//! User entity - The acting identity recorded on financial history entries.
//!
//! Users are not authenticated here; the request layer decides who is acting and
//! passes the user id down explicitly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across users
    #[sea_orm(unique)]
    pub username: String,
    /// When the user was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user authored many financial history entries
    #[sea_orm(has_many = "super::financial_history::Entity")]
    FinancialHistory,
}

impl Related<super::financial_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
