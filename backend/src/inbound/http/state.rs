//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on the domain service and remain testable without a database.

use std::sync::Arc;

use crate::domain::UserDirectoryService;
use crate::domain::ports::UserRepository;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<UserDirectoryService>,
}

impl HttpState {
    /// Construct state over the given repository port.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            users: Arc::new(UserDirectoryService::new(repository)),
        }
    }
}
