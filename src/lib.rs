// PolicyPulse client core
//
// Session lifecycle with automatic token refresh, per-service HTTP
// pipelines, the paginated query/filter contract, and the auth UI flows.

pub mod client;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod models;
pub mod query;
pub mod services;
pub mod session;

pub use client::PolicyPulse;
pub use config::ClientConfig;
pub use error::{Error, Result, ValidationErrors};
pub use query::{ListQuery, PaginatedResult};
