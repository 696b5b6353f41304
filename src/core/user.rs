//! User business logic - the acting identities recorded on audit entries.

use crate::{
    entities::{FinancialHistory, User, financial_history, user},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Finds a user by username.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a user, rejecting blank or duplicate usernames.
pub async fn create_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("Username cannot be empty"));
    }

    if get_user_by_username(db, username).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("A user named '{username}' already exists"),
        });
    }

    user::ActiveModel {
        username: Set(username.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Error::from_write)
}

/// Returns the user with this username, creating it on first use.
///
/// Intended for the request layer, which resolves the logged-in name to an id
/// before calling any mutating operation with `acting_user`.
pub async fn get_or_create_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    match get_user_by_username(db, username.trim()).await? {
        Some(existing) => Ok(existing),
        None => create_user(db, username).await,
    }
}

/// Removes a user. Financial history entries they authored are kept with the
/// author cleared.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))?;

    FinancialHistory::update_many()
        .col_expr(
            financial_history::Column::ChangedBy,
            Expr::value(Option::<i64>::None),
        )
        .filter(financial_history::Column::ChangedBy.eq(user_id))
        .exec(&txn)
        .await?;

    let username = user.username.clone();
    user.delete(&txn).await?;
    txn.commit().await?;

    info!(user_id, username = %username, "Removed user");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::audit::get_financial_history;
    use crate::core::property::{PropertyDraft, update_property};
    use crate::test_utils::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_create_user_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_user(&db, "   ").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        create_user(&db, "alice").await?;
        let result = create_user(&db, "alice").await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_or_create_user_reuses_existing() -> Result<()> {
        let db = setup_test_db().await?;

        let first = get_or_create_user(&db, "bob").await?;
        let second = get_or_create_user(&db, " bob ").await?;
        assert_eq!(first.id, second.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_keeps_history_and_clears_author() -> Result<()> {
        let (db, property) = setup_with_property().await?;
        let user = create_user(&db, "carol").await?;

        let mut draft = PropertyDraft::from(&property);
        draft.rent_amount = Decimal::new(1500, 0);
        update_property(&db, property.id, draft, Some(user.id)).await?;

        delete_user(&db, user.id).await?;

        let history = get_financial_history(&db, property.id).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].changed_by, None);
        assert_eq!(history[0].new_value, Decimal::new(1500, 0));
        assert!(get_user_by_username(&db, "carol").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_user(&db, 42).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "User", id: 42 }
        ));
        Ok(())
    }
}
