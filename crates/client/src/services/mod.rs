//! Service-facing pipelines over the portal's HTTP microservices.
//!
//! Each client here wraps one service boundary with typed request/response
//! bodies. The HTTP call itself is an opaque primitive (`reqwest`); retries,
//! if any, belong to the consuming UI.

pub mod auth;
pub mod files;
pub mod health;

pub use auth::AuthService;
pub use files::FileTransferService;
pub use health::{HealthPoller, HealthReport, ServiceStatus};
