//! Core business logic - framework-agnostic record operations, the change
//! auditor, and the filing status rules.

/// Structured add/change/delete events
pub mod activity;
/// Financial change auditing for property updates
pub mod audit;
/// Filing status classification and reporting
pub mod filing;
/// Ownership entities and the yearly filing reset
pub mod llc;
/// Decimal column precision checks
pub mod money;
/// Tenant payments
pub mod payment;
/// Rental properties
pub mod property;
/// Tenants
pub mod tenant;
/// Acting users
pub mod user;
