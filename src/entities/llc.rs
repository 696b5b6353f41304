//! LLC entity - The ownership entity that holds title to properties.
//!
//! Each LLC has a unique name, a creation date, and an annual filing flag from
//! which the traffic-light filing status is derived on every read.

use crate::core::filing::{FilingStatus, classify_filing_status};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// LLC database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "llcs")]
pub struct Model {
    /// Unique identifier for the LLC
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Legal name of the LLC
    #[sea_orm(unique)]
    pub name: String,
    /// Date the LLC was officially created
    pub creation_date: Date,
    /// Date of the last annual filing, None before the first one
    pub last_filing_date: Option<Date>,
    /// Whether the annual filing for the current year has been completed
    pub filing_current: bool,
}

impl Model {
    /// Filing status as of the given date.
    #[must_use]
    pub fn filing_status_on(&self, today: Date) -> FilingStatus {
        classify_filing_status(self.filing_current, today)
    }

    /// Filing status as of today's local date. Never cached.
    #[must_use]
    pub fn filing_status(&self) -> FilingStatus {
        self.filing_status_on(chrono::Local::now().date_naive())
    }
}

/// Defines relationships between LLC and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One LLC owns many properties
    #[sea_orm(has_many = "super::property::Entity")]
    Properties,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
