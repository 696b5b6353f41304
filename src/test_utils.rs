//! Shared test utilities for the property tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        llc::{self, LlcDraft},
        payment::{self, PaymentDraft},
        property::{self, PropertyDraft},
        tenant::{self, TenantDraft},
    },
    entities,
    entities::PropertyStatus,
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test LLC created on 2020-01-01 with its filing not current.
pub async fn create_test_llc(db: &DatabaseConnection, name: &str) -> Result<entities::llc::Model> {
    let creation_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
    llc::create_llc(db, LlcDraft::new(name, creation_date), None).await
}

/// Creates an occupied test property with money fields filled in.
///
/// # Defaults
/// * `rent_amount`: 1200.00
/// * `home_payment`: 450.00
/// * `lot_payment`: 250.00
/// * `security_deposit`: 500.00
pub async fn create_test_property(
    db: &DatabaseConnection,
    llc_id: i64,
    street_number: &str,
    street_name: &str,
) -> Result<entities::property::Model> {
    let mut draft = PropertyDraft::new(llc_id, street_number, street_name);
    draft.status = PropertyStatus::Occupied;
    draft.rent_amount = Decimal::new(120_000, 2);
    draft.home_payment = Decimal::new(45_000, 2);
    draft.lot_payment = Decimal::new(25_000, 2);
    draft.security_deposit = Decimal::new(50_000, 2);
    draft.bedrooms = 3;
    draft.bathrooms = Decimal::new(20, 1);
    property::create_property(db, draft, None).await
}

/// Creates a test tenant, optionally placed in a property.
pub async fn create_test_tenant(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    property_id: Option<i64>,
) -> Result<entities::tenant::Model> {
    let mut draft = TenantDraft::new(first_name, last_name);
    draft.property_id = property_id;
    tenant::create_tenant(db, draft, None).await
}

/// Creates a test payment dated 2025-01-01.
pub async fn create_test_payment(
    db: &DatabaseConnection,
    tenant_id: i64,
    property_id: i64,
    amount: Decimal,
) -> Result<entities::payment::Model> {
    let draft = PaymentDraft {
        tenant_id,
        property_id,
        payment_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
        amount,
        notes: "Test payment".to_string(),
    };
    payment::create_payment(db, draft, None).await
}

/// Sets up a database with one LLC.
pub async fn setup_with_llc() -> Result<(DatabaseConnection, entities::llc::Model)> {
    let db = setup_test_db().await?;
    let llc = create_test_llc(&db, "Test Holdings LLC").await?;
    Ok((db, llc))
}

/// Sets up a database with one LLC owning one property.
pub async fn setup_with_property() -> Result<(DatabaseConnection, entities::property::Model)> {
    let (db, llc) = setup_with_llc().await?;
    let property = create_test_property(&db, llc.id, "12", "Elm Ave").await?;
    Ok((db, property))
}

/// Sets up a database with an LLC, a property, and a tenant placed in it.
pub async fn setup_with_tenant() -> Result<(
    DatabaseConnection,
    entities::property::Model,
    entities::tenant::Model,
)> {
    let (db, property) = setup_with_property().await?;
    let tenant = create_test_tenant(&db, "Test", "Tenant", Some(property.id)).await?;
    Ok((db, property, tenant))
}
