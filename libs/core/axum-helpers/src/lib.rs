//! # Axum Helpers
//!
//! HTTP side of the error pipeline: handlers return classified errors and
//! success values, this crate turns them into the standard JSON envelopes.
//!
//! ## Modules
//!
//! - **[`errors`]**: [`HttpError`] and the 404/405 fallbacks
//! - **[`response`]**: [`ApiResponse`] success envelopes
//! - **[`middleware`]**: request context, request logger, panic recovery
//! - **[`extractors`]**: UUID path and validated JSON extractors
//! - **[`server`]**: [`with_error_pipeline`] router setup
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use axum_helpers::{ApiResponse, HttpResult, UuidPath, with_error_pipeline};
//! use core_errors::factory;
//!
//! async fn get_user(UuidPath(id): UuidPath) -> HttpResult<impl IntoResponse> {
//!     let user = repo.find(id).await.ok_or_else(|| factory::resource_not_found(id, None))?;
//!     Ok(ApiResponse::ok(user))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = with_error_pipeline(Router::new().route("/users/{id}", get(get_user)));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod server;

// Re-export error types
pub use errors::{HttpError, HttpResult, error_response};

// Re-export responses
pub use response::ApiResponse;

// Re-export middleware
pub use middleware::{recovery_layer, request_context_middleware, request_logger};

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};

pub use server::with_error_pipeline;
