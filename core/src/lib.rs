//! Async API client core for the riding-record service.
//!
//! # Overview
//! Thin wrappers over the backend's admin and riding-record endpoints. Every
//! operation builds an `HttpRequest`, sends it through one of two configured
//! dispatchers and returns either the response payload or an `ApiError`
//! carrying a single human-readable message.
//!
//! # Design
//! - Two dispatchers with different budgets: 120 s for admin and query calls,
//!   300 s for record generation, which waits on a slow backend workflow.
//! - Building and parsing are side-effect free; only `Dispatcher::execute`
//!   does I/O, so hosts can run requests themselves.
//! - Failures are normalized by `error::normalize`: server `message` field,
//!   then transport description, then a fixed fallback text.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod http;
pub mod types;

pub use client::RidingClient;
pub use config::{ClientConfig, ConfigError};
pub use dispatcher::Dispatcher;
pub use error::{ApiError, Failure};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    Account, AccountsResponse, CheckAllResponse, CheckRecordResponse, GenerateRecordResponse,
    LoginResponse, RecordDetails, Statistics,
};
