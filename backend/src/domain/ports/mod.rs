//! Port abstractions decoupling the domain from its adapters.

mod macros;
pub mod user_repository;

pub(crate) use macros::define_port_error;
pub use user_repository::{InMemoryUserRepository, UserPersistenceError, UserRepository};
