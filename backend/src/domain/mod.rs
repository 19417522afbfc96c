//! Domain primitives and use cases.
//!
//! Purpose: define the strongly typed user entity, its validation
//! invariants, and the transport-agnostic errors shared by the HTTP and
//! persistence adapters. Ports live in [`ports`]; adapters depend on the
//! traits there, never the other way round.

pub mod error;
pub mod ports;
pub mod user;
pub mod users_service;

pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::user::{
    EmailAddress, RoleName, User, UserDraft, UserField, UserId, UserName, UserValidationError,
};
pub use self::users_service::UserDirectoryService;
