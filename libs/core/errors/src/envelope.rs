//! Protocol-neutral response envelopes.
//!
//! JSON shapes:
//!
//! ```json
//! { "meta": { "request_id": "…", "code": 200, "message": "Success" }, "data": {…} }
//! { "meta": { "request_id": "…", "code": 404, "message": "Resource not found" }, "error": null }
//! { "meta": {…}, "pagination": { "page": 1, "size": 10, "limit": 10, "total_row": 0 }, "data": [] }
//! ```
//!
//! `meta.code` is the HTTP status number. The HTTP and gRPC adapters both
//! build on these types.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::{self, RequestContext};
use crate::factory;
use crate::i18n;
use crate::value::ErrorValue;

/// Message key used when the caller gives none.
pub const SUCCESS_KEY: &str = "success";
pub const CREATED_KEY: &str = "created";
pub const UPDATED_KEY: &str = "updated";
pub const DELETED_KEY: &str = "deleted";

/// Target of the events emitted by the formatters.
pub const LOG_TARGET: &str = "core_errors::response";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub request_id: String,
    pub code: u16,
    pub message: String,
}

impl Meta {
    /// Meta for `status`, with `message_key` translated into the context locale.
    pub fn new(ctx: &RequestContext, status: StatusCode, message_key: &str) -> Self {
        Self {
            request_id: ctx.request_id().to_string(),
            code: status.as_u16(),
            message: i18n::translate(ctx.locale(), message_key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub meta: Meta,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub meta: Meta,
    /// Data attached by the factory, `null` when there is none.
    pub error: Value,
}

/// Page bookkeeping for list responses.
///
/// `page` is 1-based; `limit` equals `size` unless set with [`Pagination::with_limit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub limit: u32,
    pub total_row: u64,
}

impl Pagination {
    pub fn new(page: u32, size: u32, total_row: u64) -> Self {
        Self {
            page: page.max(1),
            size,
            limit: size,
            total_row,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Number of pages needed for `total_row` at `limit` rows per page.
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total_row.div_ceil(u64::from(self.limit))
        }
    }

    /// Rows to skip for the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedEnvelope<T> {
    pub meta: Meta,
    pub pagination: Pagination,
    pub data: Vec<T>,
}

fn log_success(meta: &Meta, message_key: &str) {
    tracing::info!(
        target: LOG_TARGET,
        request_id = %meta.request_id,
        status = meta.code,
        message_key,
        "{}",
        meta.message
    );
}

/// Success envelope with an explicit status (200, 201, …).
pub fn format_success_with_status<T>(
    ctx: &RequestContext,
    status: StatusCode,
    message_key: &str,
    data: T,
) -> SuccessEnvelope<T> {
    let meta = Meta::new(ctx, status, message_key);
    log_success(&meta, message_key);
    SuccessEnvelope { meta, data }
}

pub fn format_success<T>(ctx: &RequestContext, message_key: &str, data: T) -> SuccessEnvelope<T> {
    format_success_with_status(ctx, StatusCode::OK, message_key, data)
}

pub fn format_created<T>(ctx: &RequestContext, message_key: &str, data: T) -> SuccessEnvelope<T> {
    format_success_with_status(ctx, StatusCode::CREATED, message_key, data)
}

pub fn format_updated<T>(ctx: &RequestContext, message_key: &str, data: T) -> SuccessEnvelope<T> {
    format_success_with_status(ctx, StatusCode::OK, message_key, data)
}

/// Deletion carries no payload.
pub fn format_deleted(ctx: &RequestContext, message_key: &str) -> SuccessEnvelope<Value> {
    format_success_with_status(ctx, StatusCode::OK, message_key, Value::Null)
}

/// Status and envelope for a classified error.
///
/// Does not log: the factory already did when the error was created.
pub fn format_error(ctx: &RequestContext, err: &ErrorValue) -> (StatusCode, ErrorEnvelope) {
    let status = err.http_status();
    let envelope = ErrorEnvelope {
        meta: Meta::new(ctx, status, err.message_key()),
        error: err.data().cloned().unwrap_or(Value::Null),
    };
    (status, envelope)
}

/// Classify any error.
///
/// The first [`ErrorValue`] in the `source()` chain is used as is. Anything
/// else becomes an unknown error whose text stays in the log.
pub fn classify(err: &(dyn std::error::Error + 'static)) -> ErrorValue {
    let classified = std::iter::successors(Some(err), |e| e.source())
        .find_map(|e| e.downcast_ref::<ErrorValue>());
    match classified {
        Some(value) => value.clone(),
        None => factory::unknown_error_with_cause("unclassified", None, err),
    }
}

/// [`format_error`] for errors that may not have gone through the factory.
///
/// Coercion runs under `ctx`, so the log entry and the envelope share a
/// request id.
pub fn format_any_error(
    ctx: &RequestContext,
    err: &(dyn std::error::Error + 'static),
) -> (StatusCode, ErrorEnvelope) {
    let classified = context::sync_scope(ctx.clone(), || classify(err));
    format_error(ctx, &classified)
}

pub fn format_pagination<T>(
    ctx: &RequestContext,
    message_key: &str,
    pagination: Pagination,
    data: Vec<T>,
) -> PaginatedEnvelope<T> {
    let meta = Meta::new(ctx, StatusCode::OK, message_key);
    tracing::info!(
        target: LOG_TARGET,
        request_id = %meta.request_id,
        status = meta.code,
        message_key,
        page = pagination.page,
        limit = pagination.limit,
        total_row = pagination.total_row,
        results = data.len(),
        "{}",
        meta.message
    );
    PaginatedEnvelope {
        meta,
        pagination,
        data,
    }
}
