//! HTTP inbound adapter exposing the REST endpoints.

pub mod error;
pub mod state;
pub mod status;
pub mod users;

pub use error::{ApiError, ApiResult};
pub use state::HttpState;
