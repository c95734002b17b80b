//! The canonical error value produced by the factory.

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tonic::Code;

use crate::i18n;
use crate::kind::ErrorKind;
use crate::logging::Severity;

/// A classified failure.
///
/// Only the [`factory`](crate::factory) creates these, so code and message key
/// always agree with the kind. Fields are read-only once created.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("[{internal_code}] {message_key}")]
pub struct ErrorValue {
    kind: ErrorKind,
    internal_code: i32,
    message_key: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl ErrorValue {
    pub(crate) fn new(kind: ErrorKind, data: Option<Value>) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            internal_code: spec.internal_code,
            message_key: spec.message_key,
            data,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn internal_code(&self) -> i32 {
        self.internal_code
    }

    pub fn message_key(&self) -> &'static str {
        self.message_key
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn http_status(&self) -> StatusCode {
        self.kind.http_status()
    }

    pub fn rpc_code(&self) -> Code {
        self.kind.rpc_code()
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Message in `locale` from the installed catalog.
    pub fn localized_message(&self, locale: &str) -> String {
        i18n::translate(locale, self.message_key)
    }

    /// Take ownership of the attached data.
    pub fn into_data(self) -> Option<Value> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_come_from_kind() {
        let err = ErrorValue::new(ErrorKind::DuplicateKey, Some(json!({"field": "email"})));
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert_eq!(err.internal_code(), 1105);
        assert_eq!(err.message_key(), "duplicateKey");
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        assert_eq!(err.rpc_code(), Code::AlreadyExists);
        assert_eq!(err.data(), Some(&json!({"field": "email"})));
    }

    #[test]
    fn test_display_shows_code_and_key() {
        let err = ErrorValue::new(ErrorKind::Forbidden, None);
        assert_eq!(err.to_string(), "[1504] forbidden");
    }

    #[test]
    fn test_localized_message() {
        let err = ErrorValue::new(ErrorKind::ResourceNotFound, None);
        assert_eq!(err.localized_message("en"), "Resource not found");
        assert_eq!(err.localized_message("id-ID"), "Data tidak ditemukan");
        assert_eq!(err.localized_message("fr"), "Resource not found");
    }

    #[test]
    fn test_serialization_skips_missing_data() {
        let err = ErrorValue::new(ErrorKind::Unauthorized, None);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            json!({"kind": "Unauthorized", "internal_code": 1503, "message_key": "unauthorized"})
        );
    }
}
