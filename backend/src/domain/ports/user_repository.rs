//! Port abstraction for user persistence adapters and their errors.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A write would duplicate an email that another row already holds.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage seam for user records.
///
/// Mutating operations commit independently; there are no multi-operation
/// transactions. `update` and `delete` report an absent target as `Ok(None)`
/// so the caller decides how missing rows surface.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch every user in insertion order.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new user and return it with its generated identifier.
    async fn insert(&self, draft: &UserDraft) -> Result<User, UserPersistenceError>;

    /// Replace the name/email/role of the user with `id`.
    async fn update(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove the user with `id`, returning the removed record.
    async fn delete(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: i32,
    users: Vec<User>,
}

/// In-memory [`UserRepository`] used when no database is configured and as
/// the test double for handler and service tests.
///
/// Mirrors the relational contract: identifiers are assigned from a
/// monotonically increasing counter starting at 1, insertion order is
/// preserved, and the email uniqueness constraint is enforced on writes.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<InMemoryState>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, UserPersistenceError> {
        self.state
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock()?.users.clone())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn insert(&self, draft: &UserDraft) -> Result<User, UserPersistenceError> {
        let mut state = self.lock()?;
        if state.users.iter().any(|u| u.email() == draft.email()) {
            return Err(UserPersistenceError::duplicate_email(draft.email().as_ref()));
        }
        state.next_id += 1;
        let user = draft.clone().into_user(UserId::new(state.next_id));
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock()?;
        if state
            .users
            .iter()
            .any(|u| u.id() != id && u.email() == draft.email())
        {
            return Err(UserPersistenceError::duplicate_email(draft.email().as_ref()));
        }
        let Some(slot) = state.users.iter_mut().find(|u| u.id() == id) else {
            return Ok(None);
        };
        *slot = draft.clone().into_user(id);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock()?;
        let Some(position) = state.users.iter().position(|u| u.id() == id) else {
            return Ok(None);
        };
        Ok(Some(state.users.remove(position)))
    }
}
