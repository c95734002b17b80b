//! Error factory.
//!
//! Every constructor classifies the failure, emits exactly one structured log
//! event at the kind's severity and returns the [`ErrorValue`]. Handlers return
//! the value and let the transport layer format it:
//!
//! ```rust
//! use core_errors::factory;
//! use serde_json::json;
//!
//! let err = factory::resource_not_found("user-42", None);
//! assert_eq!(err.internal_code(), 1013);
//!
//! let err = factory::invalid_body("email", Some(json!({"reason": "missing"})));
//! assert_eq!(err.http_status().as_u16(), 400);
//! ```
//!
//! Log fields: `request_id`, `locale`, `internal_code`, `message_key`,
//! `error_kind`, `key`, `data` (with secrets redacted) and, on the recovery
//! path, `cause`.

use std::fmt::Display;

use serde_json::Value;

use crate::context;
use crate::i18n;
use crate::kind::ErrorKind;
use crate::logging::sanitize;
use crate::value::ErrorValue;

/// Target of the events emitted by the factory.
pub const LOG_TARGET: &str = "core_errors";

fn log_message(err: &ErrorValue, key: &str) -> String {
    let catalog = i18n::catalog();
    let message = catalog.translate(catalog.fallback(), err.message_key());
    if key.is_empty() {
        message
    } else {
        format!("{message}: {key}")
    }
}

fn log_data(err: &ErrorValue) -> String {
    err.data()
        .map(|data| sanitize(data).to_string())
        .unwrap_or_else(|| "null".to_string())
}

fn emit(err: &ErrorValue, key: &str, cause: Option<&str>) {
    let ctx = context::current();
    let message = log_message(err, key);
    let data = log_data(err);

    match cause {
        Some(cause) => crate::event_at!(
            err.severity(),
            target: LOG_TARGET,
            request_id = %ctx.request_id(),
            locale = %ctx.locale(),
            internal_code = err.internal_code(),
            message_key = err.message_key(),
            error_kind = err.kind().name(),
            key = %key,
            data = %data,
            cause = %cause,
            "{message}"
        ),
        None => crate::event_at!(
            err.severity(),
            target: LOG_TARGET,
            request_id = %ctx.request_id(),
            locale = %ctx.locale(),
            internal_code = err.internal_code(),
            message_key = err.message_key(),
            error_kind = err.kind().name(),
            key = %key,
            data = %data,
            "{message}"
        ),
    }
}

/// Create an error of any kind.
///
/// `key` identifies what failed (an entity id, a field name) and only goes to
/// the log. `data` is passed through unchanged to the client envelope.
pub fn new_error(kind: ErrorKind, key: impl Display, data: Option<Value>) -> ErrorValue {
    let err = ErrorValue::new(kind, data);
    emit(&err, &key.to_string(), None);
    err
}

/// Unknown error whose underlying cause is kept for the log only.
pub fn unknown_error_with_cause(
    key: impl Display,
    data: Option<Value>,
    cause: impl Display,
) -> ErrorValue {
    let err = ErrorValue::new(ErrorKind::UnknownError, data);
    emit(&err, &key.to_string(), Some(&cause.to_string()));
    err
}

macro_rules! keyed_constructors {
    ($($name:ident => $kind:ident),+ $(,)?) => {
        $(
            pub fn $name(key: impl Display, data: Option<Value>) -> ErrorValue {
                new_error(ErrorKind::$kind, key, data)
            }
        )+
    };
}

macro_rules! keyless_constructors {
    ($($name:ident => $kind:ident),+ $(,)?) => {
        $(
            pub fn $name(data: Option<Value>) -> ErrorValue {
                new_error(ErrorKind::$kind, "", data)
            }
        )+
    };
}

keyed_constructors! {
    unknown_error => UnknownError,
    find_resource_error => FindResourceError,
    create_resource_error => CreateResourceError,
    update_resource_error => UpdateResourceError,
    delete_resource_error => DeleteResourceError,
    resource_not_found => ResourceNotFound,
    general_error => GeneralError,
    timeout_error => TimeoutError,
    method_not_allowed => MethodNotAllowed,

    invalid_body => InvalidBody,
    validation_failed => ValidationFailed,
    already_used => AlreadyUsed,
    invalid_type => InvalidType,
    invalid_format => InvalidFormat,
    invalid_option => InvalidOption,
    value_mismatch => ValueMismatch,
    incomplete_key => IncompleteKey,
    incomplete_value => IncompleteValue,
    invalid_request => InvalidRequest,

    database_connection => DatabaseConnection,
    database_error => DatabaseError,
    transaction_error => TransactionError,
    record_not_found => RecordNotFound,
    duplicate_key => DuplicateKey,

    cache_unavailable => CacheUnavailable,
    cache_read_error => CacheReadError,
    cache_write_error => CacheWriteError,

    external_api_error => ExternalApiError,
    external_timeout_error => ExternalTimeoutError,
    external_parse_error => ExternalParseError,
    external_auth_error => ExternalAuthError,
    external_rate_limit => ExternalRateLimit,

    file_not_found => FileNotFound,
    file_read_error => FileReadError,
    file_write_error => FileWriteError,
    file_format_error => FileFormatError,

    insufficient_balance => InsufficientBalance,
    quota_exceeded => QuotaExceeded,
    payment_failed => PaymentFailed,
    already_processed => AlreadyProcessed,
    invalid_state => InvalidState,
    dependency_failed => DependencyFailed,
}

keyless_constructors! {
    invalid_token => InvalidToken,
    expired_token => ExpiredToken,
    unauthorized => Unauthorized,
    forbidden => Forbidden,
    session_expired => SessionExpired,
}
