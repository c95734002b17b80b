//! # Core Errors
//!
//! Error classification and response envelopes shared by HTTP and gRPC
//! services.
//!
//! A failure goes through one pipeline:
//!
//! 1. **[`factory`]** classifies it into an [`ErrorValue`] of some
//!    [`ErrorKind`] and logs it once at the kind's severity.
//! 2. **[`kind`]** (the status code registry) gives the internal code, message
//!    key, HTTP status and gRPC code of the kind.
//! 3. **[`i18n`]** translates the message key into the caller's locale.
//! 4. **[`envelope`]** builds the response body; the `axum-helpers` and
//!    `grpc-helpers` crates put it on the wire.
//!
//! The request id and locale travel in a task-local [`context`] set up by the
//! transport middleware. [`recovery`] turns panic payloads into errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use core_errors::{context::RequestContext, envelope, factory};
//!
//! let ctx = RequestContext::with_request_id("req-1").with_locale("id");
//! let err = factory::resource_not_found("user-42", None);
//! let (status, body) = envelope::format_error(&ctx, &err);
//!
//! assert_eq!(status.as_u16(), 404);
//! assert_eq!(body.meta.message, "Data tidak ditemukan");
//! ```

pub mod context;
pub mod envelope;
pub mod factory;
pub mod i18n;
pub mod kind;
pub mod logging;
pub mod recovery;
pub mod value;

pub use context::RequestContext;
pub use envelope::{ErrorEnvelope, Meta, PaginatedEnvelope, Pagination, SuccessEnvelope};
pub use i18n::{LocaleCatalog, LocaleError, LocaleSource};
pub use kind::{ErrorKind, KindSpec};
pub use logging::Severity;
pub use recovery::Fault;
pub use value::ErrorValue;
