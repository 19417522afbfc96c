//! Use cases for the user directory.
//!
//! Handlers call into this service; it composes the [`UserRepository`] port
//! and translates persistence failures into transport-agnostic
//! [`DomainError`]s with the messages the HTTP surface promises.

use std::sync::Arc;

use tracing::error;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DomainError, User, UserDraft, UserId};

/// Coordinates the five user directory operations over a repository port.
#[derive(Clone)]
pub struct UserDirectoryService {
    repository: Arc<dyn UserRepository>,
}

/// Map repository failures onto domain errors.
///
/// Raw messages go to the log; responses carry stable generic text so
/// connection strings and SQL never leak to callers.
fn map_persistence_error(error: UserPersistenceError) -> DomainError {
    match error {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            DomainError::service_unavailable("database unavailable")
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            DomainError::internal("database query failed")
        }
        UserPersistenceError::DuplicateEmail { .. } => DomainError::conflict("User already exists"),
    }
}

impl UserDirectoryService {
    /// Create a service over the given repository.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Fetch every user. An empty directory is a valid result.
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.repository
            .list()
            .await
            .map_err(map_persistence_error)
    }

    /// Fetch one user by identifier.
    pub async fn get_user(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    /// Create a user, enforcing email uniqueness.
    ///
    /// The email is pre-checked so the common duplicate case reports
    /// cleanly; a racing insert that slips past the check still maps to the
    /// same conflict via the repository's duplicate-email error.
    pub async fn create_user(&self, draft: UserDraft) -> Result<User, DomainError> {
        let existing = self
            .repository
            .find_by_email(draft.email())
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(DomainError::conflict("User already exists"));
        }

        self.repository
            .insert(&draft)
            .await
            .map_err(map_persistence_error)
    }

    /// Replace the name, email, and role of the user with `id`.
    pub async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<User, DomainError> {
        self.repository
            .update(id, &draft)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| DomainError::not_found("User does not exist"))
    }

    /// Remove the user with `id` and return its last stored state.
    pub async fn delete_user(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| DomainError::not_found("User does not exist"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::InMemoryUserRepository;
    use crate::domain::{EmailAddress, ErrorCode};
    use async_trait::async_trait;
    use rstest::rstest;

    fn service() -> UserDirectoryService {
        UserDirectoryService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn draft(name: &str, email: &str, role: &str) -> UserDraft {
        UserDraft::try_from_strings(name, email, role).expect("valid draft")
    }

    #[tokio::test]
    async fn created_user_is_fetchable_by_returned_id() {
        let service = service();
        let created = service
            .create_user(draft("Ann", "ann@x.com", "admin"))
            .await
            .expect("create");

        let fetched = service.get_user(created.id()).await.expect("fetch");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn duplicate_email_reports_conflict_and_adds_no_row() {
        let service = service();
        service
            .create_user(draft("Ann", "ann@x.com", "admin"))
            .await
            .expect("create");

        let err = service
            .create_user(draft("Other", "ann@x.com", "user"))
            .await
            .expect_err("duplicate email must conflict");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "User already exists");
        assert_eq!(service.list_users().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn get_missing_user_reports_not_found() {
        let err = service()
            .get_user(UserId::new(7))
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User not found");
    }

    #[tokio::test]
    async fn update_writes_role_to_the_role_field() {
        let service = service();
        let created = service
            .create_user(draft("Ann", "ann@x.com", "admin"))
            .await
            .expect("create");

        let updated = service
            .update_user(created.id(), draft("Ann", "ann@x.com", "auditor"))
            .await
            .expect("update");

        assert_eq!(updated.role().as_ref(), "auditor");
        assert_eq!(updated.email().as_ref(), "ann@x.com");

        let fetched = service.get_user(created.id()).await.expect("fetch");
        assert_eq!(fetched.role().as_ref(), "auditor");
    }

    #[rstest]
    #[case::update(true)]
    #[case::delete(false)]
    #[tokio::test]
    async fn mutating_a_missing_user_reports_does_not_exist(#[case] update: bool) {
        let service = service();
        let err = if update {
            service
                .update_user(UserId::new(9), draft("Ann", "ann@x.com", "admin"))
                .await
                .expect_err("missing user")
        } else {
            service.delete_user(UserId::new(9)).await.expect_err("missing user")
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User does not exist");
    }

    #[tokio::test]
    async fn deleted_user_is_gone_from_fetch_and_list() {
        let service = service();
        let keep = service
            .create_user(draft("Ann", "ann@x.com", "admin"))
            .await
            .expect("create");
        let gone = service
            .create_user(draft("Ben", "ben@x.com", "user"))
            .await
            .expect("create");

        let removed = service.delete_user(gone.id()).await.expect("delete");
        assert_eq!(removed.id(), gone.id());

        let err = service.get_user(gone.id()).await.expect_err("deleted user");
        assert_eq!(err.code(), ErrorCode::NotFound);

        let remaining = service.list_users().await.expect("list");
        assert_eq!(remaining, vec![keep]);
    }

    struct FailingRepository(UserPersistenceError);

    #[async_trait]
    impl UserRepository for FailingRepository {
        async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
            Err(self.0.clone())
        }

        async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, UserPersistenceError> {
            Err(self.0.clone())
        }

        async fn find_by_email(
            &self,
            _email: &EmailAddress,
        ) -> Result<Option<User>, UserPersistenceError> {
            Err(self.0.clone())
        }

        async fn insert(&self, _draft: &UserDraft) -> Result<User, UserPersistenceError> {
            Err(self.0.clone())
        }

        async fn update(
            &self,
            _id: UserId,
            _draft: &UserDraft,
        ) -> Result<Option<User>, UserPersistenceError> {
            Err(self.0.clone())
        }

        async fn delete(&self, _id: UserId) -> Result<Option<User>, UserPersistenceError> {
            Err(self.0.clone())
        }
    }

    #[rstest]
    #[case(
        UserPersistenceError::connection("refused"),
        ErrorCode::ServiceUnavailable,
        "database unavailable"
    )]
    #[case(
        UserPersistenceError::query("syntax error"),
        ErrorCode::InternalError,
        "database query failed"
    )]
    #[case(
        UserPersistenceError::duplicate_email("ann@x.com"),
        ErrorCode::Conflict,
        "User already exists"
    )]
    #[tokio::test]
    async fn persistence_failures_map_to_stable_domain_errors(
        #[case] failure: UserPersistenceError,
        #[case] expected_code: ErrorCode,
        #[case] expected_message: &str,
    ) {
        let service = UserDirectoryService::new(Arc::new(FailingRepository(failure)));
        let err = service.list_users().await.expect_err("repository failure");
        assert_eq!(err.code(), expected_code);
        assert_eq!(err.message(), expected_message);
    }
}
