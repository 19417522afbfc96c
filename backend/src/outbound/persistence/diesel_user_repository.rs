//! PostgreSQL-backed [`UserRepository`] implementation using Diesel.
//!
//! Each method checks out one pooled connection for its duration; mutating
//! statements commit on their own (diesel-async autocommit), matching the
//! one-commit-per-request contract. Insert, update, and delete all use
//! `RETURNING` so the affected row comes back without a second query — the
//! delete path in particular never re-fetches a removed row.

use async_trait::async_trait;
use diesel::OptionalExtension;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, RoleName, User, UserDraft, UserId, UserName};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to the connection variant.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn is_email_unique_violation(
    info: &(dyn diesel::result::DatabaseErrorInformation + Send + Sync),
) -> bool {
    info.constraint_name()
        .map(|name| name.contains("user_email"))
        .unwrap_or_else(|| info.message().contains("user_email"))
}

/// Map Diesel errors to domain persistence errors.
///
/// `email` names the value a write was carrying so a unique violation on
/// the email column can surface as the duplicate-email variant; read paths
/// pass `None`.
fn map_diesel_error(
    error: diesel::result::Error,
    email: Option<&EmailAddress>,
) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match email.filter(|_| is_email_unique_violation(info.as_ref())) {
                Some(email) => UserPersistenceError::duplicate_email(email.as_ref()),
                None => UserPersistenceError::query("unique constraint violation"),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain user.
///
/// Column bounds match the domain invariants, so a failure here means the
/// table holds data this service did not write.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let id = UserId::new(row.user_id);
    let name = UserName::new(row.user_name)
        .map_err(|err| UserPersistenceError::query(format!("invalid user_name in row {id}: {err}")))?;
    let email = EmailAddress::new(row.user_email)
        .map_err(|err| UserPersistenceError::query(format!("invalid user_email in row {id}: {err}")))?;
    let role = RoleName::new(row.user_role)
        .map_err(|err| UserPersistenceError::query(format!("invalid user_role in row {id}: {err}")))?;
    Ok(User::new(id, name, email, role))
}

fn draft_changeset(draft: &UserDraft) -> UserChangeset<'_> {
    UserChangeset {
        user_name: draft.name().as_ref(),
        user_email: draft.email().as_ref(),
        user_role: draft.role().as_ref(),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::user_id.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::user_id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::user_email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(row_to_user).transpose()
    }

    async fn insert(&self, draft: &UserDraft) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow {
                user_name: draft.name().as_ref(),
                user_email: draft.email().as_ref(),
                user_role: draft.role().as_ref(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(draft.email())))?;

        row_to_user(row)
    }

    async fn update(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::update(users::table.filter(users::user_id.eq(id.get())))
            .set(draft_changeset(draft))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, Some(draft.email())))?;

        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::delete(users::table.filter(users::user_id.eq(id.get())))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_map_to_the_connection_variant() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserPersistenceError::connection("timed out"));
    }

    #[test]
    fn generic_diesel_errors_map_to_the_query_variant() {
        let err = map_diesel_error(diesel::result::Error::NotFound, None);
        assert_eq!(err, UserPersistenceError::query("database error"));
    }

    #[test]
    fn corrupt_rows_surface_as_query_errors() {
        let row = UserRow {
            user_id: 3,
            user_name: String::new(),
            user_email: "ann@x.com".to_owned(),
            user_role: "admin".to_owned(),
        };
        let err = row_to_user(row).expect_err("blank name must fail");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
