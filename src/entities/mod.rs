//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod financial_history;
pub mod llc;
pub mod payment;
pub mod property;
pub mod tenant;
pub mod user;

// Re-export specific types to avoid conflicts
pub use financial_history::{
    Column as FinancialHistoryColumn, Entity as FinancialHistory,
    Model as FinancialHistoryModel, TrackedField,
};
pub use llc::{Column as LlcColumn, Entity as Llc, Model as LlcModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use property::{
    Column as PropertyColumn, Entity as Property, Model as PropertyModel, PropertyStatus,
};
pub use tenant::{
    Column as TenantColumn, Entity as Tenant, IdentificationType, Model as TenantModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
