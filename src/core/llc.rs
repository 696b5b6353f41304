//! LLC business logic - ownership entities, their annual filing flag, and the
//! yearly filing reset.
//!
//! An LLC cannot be removed while it still owns properties. All mutating
//! functions take the acting user explicitly and emit an activity event.

use crate::{
    config::llcs::LlcConfig,
    core::activity::{self, Action},
    entities::{Llc, Property, llc, property},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

/// Editable fields of an LLC, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlcDraft {
    /// Legal name, unique across LLCs
    pub name: String,
    /// Date the LLC was created
    pub creation_date: NaiveDate,
    /// Date of the last annual filing
    pub last_filing_date: Option<NaiveDate>,
    /// Whether this year's filing is done
    pub filing_current: bool,
}

impl LlcDraft {
    /// Draft with only the required fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, creation_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            creation_date,
            last_filing_date: None,
            filing_current: false,
        }
    }
}

impl From<&llc::Model> for LlcDraft {
    fn from(model: &llc::Model) -> Self {
        Self {
            name: model.name.clone(),
            creation_date: model.creation_date,
            last_filing_date: model.last_filing_date,
            filing_current: model.filing_current,
        }
    }
}

/// Retrieves all LLCs ordered alphabetically by name.
///
/// This is what the LLC list and the property form's owner choices display. The
/// filing status is not part of the row; derive it per LLC with
/// [`llc::Model::filing_status`] at render time.
pub async fn get_all_llcs(db: &DatabaseConnection) -> Result<Vec<llc::Model>> {
    Llc::find()
        .order_by_asc(llc::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an LLC by its unique ID.
pub async fn get_llc_by_id(db: &DatabaseConnection, llc_id: i64) -> Result<Option<llc::Model>> {
    Llc::find_by_id(llc_id).one(db).await.map_err(Into::into)
}

/// Finds an LLC by its exact name.
///
/// Used for the uniqueness check on create and rename, and by [`seed_llcs`] to
/// skip LLCs that already exist. Matching is exact; callers trim first.
pub async fn get_llc_by_name<C>(db: &C, name: &str) -> Result<Option<llc::Model>>
where
    C: ConnectionTrait,
{
    Llc::find()
        .filter(llc::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

fn validated_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("LLC name cannot be empty"));
    }
    Ok(name.to_string())
}

async fn ensure_name_free<C>(db: &C, name: &str, except_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    match get_llc_by_name(db, name).await? {
        Some(existing) if Some(existing.id) != except_id => Err(Error::Conflict {
            message: format!("An LLC named '{name}' already exists"),
        }),
        _ => Ok(()),
    }
}

/// Creates a new LLC. The name is trimmed and must be unique.
pub async fn create_llc(
    db: &DatabaseConnection,
    draft: LlcDraft,
    acting_user: Option<i64>,
) -> Result<llc::Model> {
    let name = validated_name(&draft.name)?;
    ensure_name_free(db, &name, None).await?;

    let created = llc::ActiveModel {
        name: Set(name),
        creation_date: Set(draft.creation_date),
        last_filing_date: Set(draft.last_filing_date),
        filing_current: Set(draft.filing_current),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Error::from_write)?;

    activity::record(Action::Added, "LLC", &created.name, created.id, acting_user);
    Ok(created)
}

/// Replaces the editable fields of an existing LLC.
pub async fn update_llc(
    db: &DatabaseConnection,
    llc_id: i64,
    draft: LlcDraft,
    acting_user: Option<i64>,
) -> Result<llc::Model> {
    let name = validated_name(&draft.name)?;

    let mut llc: llc::ActiveModel = Llc::find_by_id(llc_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("LLC", llc_id))?
        .into();

    ensure_name_free(db, &name, Some(llc_id)).await?;

    llc.name = Set(name);
    llc.creation_date = Set(draft.creation_date);
    llc.last_filing_date = Set(draft.last_filing_date);
    llc.filing_current = Set(draft.filing_current);

    let updated = llc.update(db).await.map_err(Error::from_write)?;
    activity::record(Action::Changed, "LLC", &updated.name, updated.id, acting_user);
    Ok(updated)
}

/// Marks this year's filing as complete and records the filing date.
///
/// Called once the annual report has been submitted. The LLC turns green until
/// the next [`reset_filing_status`] run clears the flag again.
pub async fn mark_filing_complete(
    db: &DatabaseConnection,
    llc_id: i64,
    filed_on: NaiveDate,
    acting_user: Option<i64>,
) -> Result<llc::Model> {
    let mut llc: llc::ActiveModel = Llc::find_by_id(llc_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("LLC", llc_id))?
        .into();

    llc.filing_current = Set(true);
    llc.last_filing_date = Set(Some(filed_on));

    let updated = llc.update(db).await?;
    activity::record(Action::Changed, "LLC", &updated.name, updated.id, acting_user);
    Ok(updated)
}

/// Deletes an LLC that owns no properties.
///
/// # Errors
/// Returns [`Error::StillReferenced`] naming `properties` if the LLC still owns any;
/// nothing is changed in that case.
pub async fn delete_llc(
    db: &DatabaseConnection,
    llc_id: i64,
    acting_user: Option<i64>,
) -> Result<()> {
    let txn = db.begin().await?;

    let llc = Llc::find_by_id(llc_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("LLC", llc_id))?;

    let owned = Property::find()
        .filter(property::Column::LlcId.eq(llc_id))
        .count(&txn)
        .await?;
    if owned > 0 {
        return Err(Error::StillReferenced {
            entity: "LLC",
            id: llc_id,
            relation: "properties",
        });
    }

    let name = llc.name.clone();
    llc.delete(&txn).await?;
    txn.commit().await?;

    activity::record(Action::Deleted, "LLC", &name, llc_id, acting_user);
    Ok(())
}

/// Yearly filing reset: clears `filing_current` on every LLC, whatever its
/// current value, and returns the number of LLCs affected.
#[instrument(skip(db))]
pub async fn reset_filing_status(db: &DatabaseConnection) -> Result<u64> {
    let result = Llc::update_many()
        .col_expr(llc::Column::FilingCurrent, Expr::value(false))
        .exec(db)
        .await?;

    info!(
        rows_affected = result.rows_affected,
        "Reset filing_current to false for all LLCs"
    );
    Ok(result.rows_affected)
}

/// Creates any configured LLC that does not exist yet. Existing LLCs are left as
/// they are. Returns the number created.
#[instrument(skip(db, configs), fields(configured = configs.len()))]
pub async fn seed_llcs(db: &DatabaseConnection, configs: &[LlcConfig]) -> Result<usize> {
    let mut created = 0;
    for config in configs {
        if get_llc_by_name(db, config.name.trim()).await?.is_some() {
            continue;
        }
        let mut draft = LlcDraft::new(config.name.clone(), config.creation_date);
        draft.filing_current = config.filing_current;
        create_llc(db, draft, None).await?;
        created += 1;
    }

    info!(created, "Seeded LLCs from configuration");
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_llc_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_llc(&db, LlcDraft::new("  ", date(2020, 1, 1)), None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_llc_trims_and_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let llc = create_llc(&db, LlcDraft::new("  Oak Park LLC ", date(2020, 1, 1)), None).await?;
        assert_eq!(llc.name, "Oak Park LLC");
        assert!(!llc.filing_current);
        assert!(llc.last_filing_date.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_llc_name_is_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_llc(&db, "Oak Park LLC").await?;

        let result = create_llc(&db, LlcDraft::new("Oak Park LLC", date(2021, 1, 1)), None).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));
        assert_eq!(get_all_llcs(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_llc_rename_conflict_and_self_rename() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_llc(&db, "First LLC").await?;
        create_test_llc(&db, "Second LLC").await?;

        let mut draft = LlcDraft::from(&first);
        draft.name = "Second LLC".to_string();
        let result = update_llc(&db, first.id, draft, None).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        // Keeping its own name is not a conflict
        let mut draft = LlcDraft::from(&first);
        draft.filing_current = true;
        let updated = update_llc(&db, first.id, draft, Some(1)).await?;
        assert_eq!(updated.name, "First LLC");
        assert!(updated.filing_current);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_llc_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_llc(&db, 99, LlcDraft::new("Ghost", date(2020, 1, 1)), None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "LLC", id: 99 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_llcs_ordered_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_llc(&db, "Zephyr LLC").await?;
        create_test_llc(&db, "Acorn LLC").await?;

        let names: Vec<String> = get_all_llcs(&db).await?.into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Acorn LLC", "Zephyr LLC"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_filing_complete() -> Result<()> {
        let db = setup_test_db().await?;
        let llc = create_test_llc(&db, "Filer LLC").await?;

        let updated = mark_filing_complete(&db, llc.id, date(2025, 3, 10), None).await?;
        assert!(updated.filing_current);
        assert_eq!(updated.last_filing_date, Some(date(2025, 3, 10)));
        assert_eq!(
            updated.filing_status_on(date(2025, 6, 1)),
            crate::core::filing::FilingStatus::Green
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_llc_with_properties_is_blocked() -> Result<()> {
        let (db, property) = setup_with_property().await?;

        let result = delete_llc(&db, property.llc_id, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::StillReferenced {
                entity: "LLC",
                relation: "properties",
                ..
            }
        ));

        // Both records are intact
        assert!(get_llc_by_id(&db, property.llc_id).await?.is_some());
        assert!(
            crate::core::property::get_property_by_id(&db, property.id)
                .await?
                .is_some()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_empty_llc() -> Result<()> {
        let db = setup_test_db().await?;
        let llc = create_test_llc(&db, "Empty LLC").await?;

        delete_llc(&db, llc.id, Some(1)).await?;
        assert!(get_llc_by_id(&db, llc.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_reset_filing_status_resets_all_unconditionally() -> Result<()> {
        let db = setup_test_db().await?;
        for (i, current) in [true, false, true, true, false].into_iter().enumerate() {
            let mut draft = LlcDraft::new(format!("LLC {i}"), date(2020, 1, 1));
            draft.filing_current = current;
            create_llc(&db, draft, None).await?;
        }

        let count = reset_filing_status(&db).await?;
        assert_eq!(count, 5);

        let llcs = get_all_llcs(&db).await?;
        assert_eq!(llcs.len(), 5);
        assert!(llcs.iter().all(|l| !l.filing_current));

        Ok(())
    }

    #[tokio::test]
    async fn test_reset_filing_status_writes_no_users() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_llc(&db, "Quiet LLC").await?;

        reset_filing_status(&db).await?;
        assert_eq!(crate::entities::User::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_reset_filing_status_empty_database() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(reset_filing_status(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_llcs_skips_existing() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_llc(&db, "Existing LLC").await?;

        let configs = vec![
            LlcConfig {
                name: "Existing LLC".to_string(),
                creation_date: date(2018, 1, 1),
                filing_current: true,
            },
            LlcConfig {
                name: "New LLC".to_string(),
                creation_date: date(2022, 5, 5),
                filing_current: true,
            },
        ];

        assert_eq!(seed_llcs(&db, &configs).await?, 1);
        assert_eq!(seed_llcs(&db, &configs).await?, 0);

        let existing = get_llc_by_name(&db, "Existing LLC").await?.unwrap();
        assert!(!existing.filing_current);
        let seeded = get_llc_by_name(&db, "New LLC").await?.unwrap();
        assert!(seeded.filing_current);
        assert_eq!(seeded.creation_date, date(2022, 5, 5));

        Ok(())
    }
}
