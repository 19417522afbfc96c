//! PostgreSQL persistence adapter using Diesel.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; no business logic lives here. Row structs (`models.rs`) and the
//! table definition (`schema.rs`) stay internal to this module. Connections
//! come from a `bb8` pool with native async support via `diesel-async`, and
//! every database error is mapped to a [`UserPersistenceError`] variant.
//!
//! [`UserPersistenceError`]: crate::domain::ports::UserPersistenceError

mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
