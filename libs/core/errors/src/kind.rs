//! Error kinds and the status code registry.
//!
//! Every [`ErrorKind`] owns exactly one [`KindSpec`]: internal code, message
//! key, HTTP status, gRPC code and log severity. The table is a single
//! exhaustive `match`, so adding a kind without registering it fails to
//! compile.
//!
//! Internal codes are grouped by range:
//! - 1000-1099: general, resource lifecycle and request validation
//! - 1100-1199: database
//! - 1200-1299: cache
//! - 1300-1399: external integrations
//! - 1400-1499: file I/O
//! - 1500-1599: authentication and authorization
//! - 1600-1699: business rules
//!
//! # Example
//!
//! ```rust
//! use core_errors::ErrorKind;
//!
//! let kind = ErrorKind::ResourceNotFound;
//! assert_eq!(kind.internal_code(), 1013);
//! assert_eq!(kind.message_key(), "notFoundResource");
//! assert_eq!(kind.http_status().as_u16(), 404);
//! assert_eq!(kind.rpc_code(), tonic::Code::NotFound);
//! ```

use std::str::FromStr;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tonic::Code;

use crate::logging::Severity;

/// Semantic failure category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    strum::Display,
)]
#[non_exhaustive]
pub enum ErrorKind {
    // General (1000-1009, 1013-1019)
    UnknownError,
    FindResourceError,
    CreateResourceError,
    UpdateResourceError,
    DeleteResourceError,
    ResourceNotFound,
    GeneralError,
    TimeoutError,
    MethodNotAllowed,

    // Request validation (1010-1012, 1020-1099)
    InvalidBody,
    ValidationFailed,
    AlreadyUsed,
    InvalidType,
    InvalidFormat,
    InvalidOption,
    ValueMismatch,
    IncompleteKey,
    IncompleteValue,
    InvalidRequest,

    // Database (1100-1199)
    DatabaseConnection,
    DatabaseError,
    TransactionError,
    RecordNotFound,
    DuplicateKey,

    // Cache (1200-1299)
    CacheUnavailable,
    CacheReadError,
    CacheWriteError,

    // External integrations (1300-1399)
    ExternalApiError,
    ExternalTimeoutError,
    ExternalParseError,
    ExternalAuthError,
    ExternalRateLimit,

    // File I/O (1400-1499)
    FileNotFound,
    FileReadError,
    FileWriteError,
    FileFormatError,

    // Auth (1500-1599)
    InvalidToken,
    ExpiredToken,
    Unauthorized,
    Forbidden,
    SessionExpired,

    // Business rules (1600-1699)
    InsufficientBalance,
    QuotaExceeded,
    PaymentFailed,
    AlreadyProcessed,
    InvalidState,
    DependencyFailed,
}

/// Static attributes of an [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
    pub internal_code: i32,
    pub message_key: &'static str,
    pub http_status: StatusCode,
    pub rpc_code: Code,
    pub severity: Severity,
}

const fn entry(
    internal_code: i32,
    message_key: &'static str,
    http_status: StatusCode,
    rpc_code: Code,
    severity: Severity,
) -> KindSpec {
    KindSpec {
        internal_code,
        message_key,
        http_status,
        rpc_code,
        severity,
    }
}

impl ErrorKind {
    /// The kind every unclassified failure collapses into.
    pub const FALLBACK: ErrorKind = ErrorKind::UnknownError;

    #[rustfmt::skip]
    pub const fn spec(self) -> KindSpec {
        use Severity::{Error, Info, Warn};

        match self {
            Self::UnknownError => entry(1000, "somethingWentWrong", StatusCode::INTERNAL_SERVER_ERROR, Code::Internal, Error),
            Self::FindResourceError => entry(1001, "errorFindResource", StatusCode::INTERNAL_SERVER_ERROR, Code::Internal, Error),
            Self::CreateResourceError => entry(1002, "errorCreateResource", StatusCode::INTERNAL_SERVER_ERROR, Code::Internal, Error),
            Self::UpdateResourceError => entry(1003, "errorUpdateResource", StatusCode::INTERNAL_SERVER_ERROR, Code::Internal, Error),
            Self::DeleteResourceError => entry(1004, "errorDeleteResource", StatusCode::INTERNAL_SERVER_ERROR, Code::Internal, Error),
            Self::ResourceNotFound => entry(1013, "notFoundResource", StatusCode::NOT_FOUND, Code::NotFound, Warn),
            Self::GeneralError => entry(1014, "generalRequestErrors", StatusCode::INTERNAL_SERVER_ERROR, Code::Internal, Error),
            Self::TimeoutError => entry(1015, "timeoutError", StatusCode::GATEWAY_TIMEOUT, Code::DeadlineExceeded, Warn),
            Self::MethodNotAllowed => entry(1016, "methodNotAllowed", StatusCode::METHOD_NOT_ALLOWED, Code::Unimplemented, Warn),

            Self::InvalidBody => entry(1010, "invalidBody", StatusCode::BAD_REQUEST, Code::InvalidArgument, Warn),
            Self::ValidationFailed => entry(1011, "validationFailed", StatusCode::BAD_REQUEST, Code::InvalidArgument, Warn),
            Self::AlreadyUsed => entry(1012, "alreadyUsed", StatusCode::CONFLICT, Code::AlreadyExists, Info),
            Self::InvalidType => entry(1020, "invalidType", StatusCode::BAD_REQUEST, Code::InvalidArgument, Warn),
            Self::InvalidFormat => entry(1021, "invalidFormat", StatusCode::BAD_REQUEST, Code::InvalidArgument, Warn),
            Self::InvalidOption => entry(1022, "invalidOption", StatusCode::BAD_REQUEST, Code::InvalidArgument, Warn),
            Self::ValueMismatch => entry(1023, "valueMismatch", StatusCode::UNPROCESSABLE_ENTITY, Code::FailedPrecondition, Warn),
            Self::IncompleteKey => entry(1024, "incompleteKey", StatusCode::BAD_REQUEST, Code::InvalidArgument, Warn),
            Self::IncompleteValue => entry(1025, "incompleteValue", StatusCode::BAD_REQUEST, Code::InvalidArgument, Warn),
            Self::InvalidRequest => entry(1026, "invalidRequest", StatusCode::BAD_REQUEST, Code::InvalidArgument, Warn),

            Self::DatabaseConnection => entry(1101, "databaseConnection", StatusCode::SERVICE_UNAVAILABLE, Code::Unavailable, Error),
            Self::DatabaseError => entry(1102, "databaseError", StatusCode::INTERNAL_SERVER_ERROR, Code::Internal, Error),
            Self::TransactionError => entry(1103, "transactionError", StatusCode::INTERNAL_SERVER_ERROR, Code::Aborted, Error),
            Self::RecordNotFound => entry(1104, "recordNotFound", StatusCode::NOT_FOUND, Code::NotFound, Warn),
            Self::DuplicateKey => entry(1105, "duplicateKey", StatusCode::CONFLICT, Code::AlreadyExists, Info),

            Self::CacheUnavailable => entry(1201, "cacheUnavailable", StatusCode::SERVICE_UNAVAILABLE, Code::Unavailable, Error),
            Self::CacheReadError => entry(1202, "cacheReadError", StatusCode::SERVICE_UNAVAILABLE, Code::Unavailable, Error),
            Self::CacheWriteError => entry(1203, "cacheWriteError", StatusCode::SERVICE_UNAVAILABLE, Code::Unavailable, Error),

            Self::ExternalApiError => entry(1301, "externalAPIError", StatusCode::BAD_GATEWAY, Code::Unavailable, Error),
            Self::ExternalTimeoutError => entry(1302, "externalTimeout", StatusCode::GATEWAY_TIMEOUT, Code::DeadlineExceeded, Warn),
            Self::ExternalParseError => entry(1303, "externalParseError", StatusCode::BAD_GATEWAY, Code::Internal, Error),
            Self::ExternalAuthError => entry(1304, "externalAuthError", StatusCode::BAD_GATEWAY, Code::Unauthenticated, Warn),
            Self::ExternalRateLimit => entry(1305, "externalRateLimit", StatusCode::SERVICE_UNAVAILABLE, Code::ResourceExhausted, Warn),

            Self::FileNotFound => entry(1401, "fileNotFound", StatusCode::NOT_FOUND, Code::NotFound, Warn),
            Self::FileReadError => entry(1402, "fileReadError", StatusCode::INTERNAL_SERVER_ERROR, Code::Internal, Error),
            Self::FileWriteError => entry(1403, "fileWriteError", StatusCode::INTERNAL_SERVER_ERROR, Code::Internal, Error),
            Self::FileFormatError => entry(1404, "fileFormatError", StatusCode::UNPROCESSABLE_ENTITY, Code::InvalidArgument, Warn),

            Self::InvalidToken => entry(1501, "invalidToken", StatusCode::UNAUTHORIZED, Code::Unauthenticated, Warn),
            Self::ExpiredToken => entry(1502, "expired", StatusCode::UNAUTHORIZED, Code::Unauthenticated, Info),
            Self::Unauthorized => entry(1503, "unauthorized", StatusCode::UNAUTHORIZED, Code::Unauthenticated, Warn),
            Self::Forbidden => entry(1504, "forbidden", StatusCode::FORBIDDEN, Code::PermissionDenied, Warn),
            Self::SessionExpired => entry(1505, "sessionExpired", StatusCode::UNAUTHORIZED, Code::Unauthenticated, Info),

            Self::InsufficientBalance => entry(1601, "insufficientBalance", StatusCode::UNPROCESSABLE_ENTITY, Code::FailedPrecondition, Info),
            Self::QuotaExceeded => entry(1602, "quotaExceeded", StatusCode::TOO_MANY_REQUESTS, Code::ResourceExhausted, Warn),
            Self::PaymentFailed => entry(1603, "paymentFailed", StatusCode::PAYMENT_REQUIRED, Code::FailedPrecondition, Warn),
            Self::AlreadyProcessed => entry(1604, "alreadyProcessed", StatusCode::CONFLICT, Code::AlreadyExists, Info),
            Self::InvalidState => entry(1605, "invalidProcess", StatusCode::CONFLICT, Code::FailedPrecondition, Warn),
            Self::DependencyFailed => entry(1606, "dependencyFailed", StatusCode::FAILED_DEPENDENCY, Code::FailedPrecondition, Error),
        }
    }

    pub const fn internal_code(self) -> i32 {
        self.spec().internal_code
    }

    pub const fn message_key(self) -> &'static str {
        self.spec().message_key
    }

    pub const fn http_status(self) -> StatusCode {
        self.spec().http_status
    }

    pub const fn rpc_code(self) -> Code {
        self.spec().rpc_code
    }

    pub const fn severity(self) -> Severity {
        self.spec().severity
    }

    /// Variant name, e.g. `"ResourceNotFound"`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// True for kinds that map to a 5xx status.
    pub fn is_server_fault(self) -> bool {
        self.http_status().is_server_error()
    }
}

// ============================================================================
// Registry lookups
// ============================================================================

pub fn internal_code_of(kind: ErrorKind) -> i32 {
    kind.internal_code()
}

pub fn message_key_of(kind: ErrorKind) -> &'static str {
    kind.message_key()
}

pub fn http_status_of(kind: ErrorKind) -> StatusCode {
    kind.http_status()
}

pub fn rpc_status_of(kind: ErrorKind) -> Code {
    kind.rpc_code()
}

pub fn severity_of(kind: ErrorKind) -> Severity {
    kind.severity()
}

/// Kind registered under an internal code, if any.
pub fn kind_for_code(internal_code: i32) -> Option<ErrorKind> {
    ErrorKind::iter().find(|kind| kind.internal_code() == internal_code)
}

/// Kind registered under a variant name, if any.
pub fn kind_for_name(name: &str) -> Option<ErrorKind> {
    ErrorKind::from_str(name).ok()
}

/// HTTP status for an internal code; unregistered codes map to 500.
pub fn http_status_for_code(internal_code: i32) -> StatusCode {
    kind_for_code(internal_code)
        .unwrap_or(ErrorKind::FALLBACK)
        .http_status()
}

/// gRPC code for an internal code; unregistered codes map to `Internal`.
pub fn rpc_status_for_code(internal_code: i32) -> Code {
    kind_for_code(internal_code)
        .unwrap_or(ErrorKind::FALLBACK)
        .rpc_code()
}

/// HTTP status for a kind name; unknown names map to 500.
pub fn http_status_for_name(name: &str) -> StatusCode {
    kind_for_name(name)
        .unwrap_or(ErrorKind::FALLBACK)
        .http_status()
}

/// gRPC code for a kind name; unknown names map to `Internal`.
pub fn rpc_status_for_name(name: &str) -> Code {
    kind_for_name(name).unwrap_or(ErrorKind::FALLBACK).rpc_code()
}

/// Internal code for a kind name; unknown names map to the unknown-error code.
pub fn internal_code_for_name(name: &str) -> i32 {
    kind_for_name(name)
        .unwrap_or(ErrorKind::FALLBACK)
        .internal_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_kind_has_error_statuses() {
        for kind in ErrorKind::iter() {
            let spec = kind.spec();
            assert!(
                spec.http_status.as_u16() >= 400,
                "{kind} must map to an error HTTP status"
            );
            assert_ne!(spec.rpc_code, Code::Ok, "{kind} must not map to Ok");
            assert!(!spec.message_key.is_empty(), "{kind} needs a message key");
        }
    }

    #[test]
    fn test_internal_codes_are_unique() {
        let mut seen = HashSet::new();
        for kind in ErrorKind::iter() {
            assert!(
                seen.insert(kind.internal_code()),
                "duplicate internal code {} on {kind}",
                kind.internal_code()
            );
        }
    }

    #[test]
    fn test_internal_codes_follow_category_ranges() {
        assert!((1100..1200).contains(&ErrorKind::DuplicateKey.internal_code()));
        assert!((1200..1300).contains(&ErrorKind::CacheReadError.internal_code()));
        assert!((1300..1400).contains(&ErrorKind::ExternalRateLimit.internal_code()));
        assert!((1400..1500).contains(&ErrorKind::FileFormatError.internal_code()));
        assert!((1500..1600).contains(&ErrorKind::Forbidden.internal_code()));
        assert!((1600..1700).contains(&ErrorKind::DependencyFailed.internal_code()));
    }

    #[test]
    fn test_known_mappings() {
        assert_eq!(ErrorKind::ResourceNotFound.internal_code(), 1013);
        assert_eq!(ErrorKind::ResourceNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::InvalidBody.rpc_code(), Code::InvalidArgument);
        assert_eq!(ErrorKind::Forbidden.rpc_code(), Code::PermissionDenied);
        assert_eq!(ErrorKind::ExternalTimeoutError.http_status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ErrorKind::UnknownError.rpc_code(), Code::Internal);
    }

    #[test]
    fn test_canonical_severities() {
        assert_eq!(ErrorKind::ResourceNotFound.severity(), Severity::Warn);
        assert_eq!(ErrorKind::DuplicateKey.severity(), Severity::Info);
        assert_eq!(ErrorKind::ExpiredToken.severity(), Severity::Info);
        assert_eq!(ErrorKind::DatabaseError.severity(), Severity::Error);
        assert_eq!(ErrorKind::UnknownError.severity(), Severity::Error);
    }

    #[test]
    fn test_lookup_by_code_and_name() {
        assert_eq!(kind_for_code(1105), Some(ErrorKind::DuplicateKey));
        assert_eq!(kind_for_name("Forbidden"), Some(ErrorKind::Forbidden));
        assert_eq!(ErrorKind::Forbidden.name(), "Forbidden");
        assert_eq!(kind_for_code(42), None);
        assert_eq!(kind_for_name("NoSuchKind"), None);
    }

    #[test]
    fn test_unknown_lookups_fall_back() {
        assert_eq!(http_status_for_code(9999), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rpc_status_for_code(9999), Code::Internal);
        assert_eq!(http_status_for_name("Bogus"), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rpc_status_for_name("Bogus"), Code::Internal);
        assert_eq!(internal_code_for_name("Bogus"), 1000);
    }

    #[test]
    fn test_free_function_lookups_agree_with_methods() {
        for kind in ErrorKind::iter() {
            assert_eq!(http_status_of(kind), kind.http_status());
            assert_eq!(rpc_status_of(kind), kind.rpc_code());
            assert_eq!(internal_code_of(kind), kind.internal_code());
            assert_eq!(message_key_of(kind), kind.message_key());
            assert_eq!(severity_of(kind), kind.severity());
        }
    }

    #[test]
    fn test_server_fault_classification() {
        assert!(ErrorKind::DatabaseError.is_server_fault());
        assert!(!ErrorKind::InvalidBody.is_server_fault());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::ValidationFailed).unwrap();
        assert_eq!(json, "\"ValidationFailed\"");
        let kind: ErrorKind = serde_json::from_str("\"InvalidToken\"").unwrap();
        assert_eq!(kind, ErrorKind::InvalidToken);
    }
}
