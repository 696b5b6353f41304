//! Database configuration module for the property tracker.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the foreign-key rules declared on the
//! relations (restrict, cascade, set null) land in the schema without hand-written SQL.

use crate::entities::{FinancialHistory, Llc, Payment, Property, Tenant, User, property};
use crate::errors::Result;
use sea_orm::sea_query::{Index, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/property_tracker.sqlite?mode=rwc";

/// Name of the composite unique index on a property's address within its LLC
pub const ADDRESS_INDEX: &str = "idx_properties_llc_address";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back
/// to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// File path of a file-backed `SQLite` URL, None for in-memory or other backends.
fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty() && !path.starts_with(":memory:")).then(|| Path::new(path))
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);

    // SQLite creates the file with mode=rwc but not its directory
    if let Some(parent) = sqlite_file_path(&database_url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables (if missing) from the entity definitions, plus the address index.
///
/// Parents are created before children so every foreign key resolves.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables: [TableCreateStatement; 6] = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Llc),
        schema.create_table_from_entity(Property),
        schema.create_table_from_entity(Tenant),
        schema.create_table_from_entity(Payment),
        schema.create_table_from_entity(FinancialHistory),
    ];

    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    // Street address is unique per LLC, not globally
    let address_index = Index::create()
        .name(ADDRESS_INDEX)
        .table(Property)
        .col(property::Column::LlcId)
        .col(property::Column::StreetNumber)
        .col(property::Column::StreetName)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&address_index)).await?;

    info!("Database tables ensured");
    Ok(())
}
