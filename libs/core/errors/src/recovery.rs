//! Panic classification for the recovery boundary.
//!
//! Transport layers catch a panic, turn the payload into a [`Fault`] and then
//! into an [`ErrorValue`]. The client sees the generic unknown-error envelope;
//! the panic text only reaches the log.

use std::any::Any;

use crate::factory;
use crate::value::ErrorValue;

/// What a panicking handler left behind.
#[derive(Debug)]
pub enum Fault {
    /// The handler panicked with an already classified error.
    Classified(ErrorValue),
    /// `panic!("...")` with a string payload.
    Message(String),
    /// The payload was a boxed error.
    Error(String),
    /// Any other payload type.
    Unknown,
}

impl Fault {
    /// Classify a payload from `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let payload = match payload.downcast::<ErrorValue>() {
            Ok(err) => return Self::Classified(*err),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self::Message(*message),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<&'static str>() {
            Ok(message) => return Self::Message((*message).to_string()),
            Err(payload) => payload,
        };
        match payload.downcast::<Box<dyn std::error::Error + Send + Sync>>() {
            Ok(err) => Self::Error(err.to_string()),
            Err(_) => Self::Unknown,
        }
    }

    /// Log key naming the payload shape.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Classified(_) => "panic-classified",
            Self::Message(_) => "panic-string",
            Self::Error(_) => "panic-error",
            Self::Unknown => "panic-unknown",
        }
    }

    /// Raw panic text for the log.
    pub fn cause(&self) -> String {
        match self {
            Self::Classified(err) => err.to_string(),
            Self::Message(message) | Self::Error(message) => message.clone(),
            Self::Unknown => "non-string panic payload".to_string(),
        }
    }

    /// Error to report to the client.
    ///
    /// A classified payload is returned as is (it was logged when created);
    /// everything else goes through the factory as an unknown error.
    pub fn into_error_value(self) -> ErrorValue {
        match self {
            Self::Classified(err) => err,
            other => factory::unknown_error_with_cause(other.key(), None, other.cause()),
        }
    }
}

/// Shorthand for `Fault::from_panic(payload).into_error_value()`.
pub fn error_from_panic(payload: Box<dyn Any + Send + 'static>) -> ErrorValue {
    Fault::from_panic(payload).into_error_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ErrorKind;
    use std::panic;
    use test_utils::LogCapture;

    fn payload_of(f: impl FnOnce() + panic::UnwindSafe) -> Box<dyn Any + Send> {
        let hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let payload = panic::catch_unwind(f).unwrap_err();
        panic::set_hook(hook);
        payload
    }

    #[test]
    fn test_string_payloads() {
        let fault = Fault::from_panic(payload_of(|| panic!("static text")));
        assert!(matches!(fault, Fault::Message(ref m) if m == "static text"));

        let id = 7;
        let fault = Fault::from_panic(payload_of(move || panic!("formatted {id}")));
        assert!(matches!(fault, Fault::Message(ref m) if m == "formatted 7"));
        assert_eq!(fault.key(), "panic-string");
    }

    #[test]
    fn test_error_payload() {
        let payload: Box<dyn Any + Send> = Box::new(Box::<dyn std::error::Error + Send + Sync>::from(
            "connection reset",
        ));
        let fault = Fault::from_panic(payload);
        assert!(matches!(fault, Fault::Error(ref m) if m == "connection reset"));
        assert_eq!(fault.key(), "panic-error");
    }

    #[test]
    fn test_unknown_payload() {
        let fault = Fault::from_panic(Box::new(42_u8));
        assert!(matches!(fault, Fault::Unknown));
        assert_eq!(fault.key(), "panic-unknown");
    }

    #[test]
    fn test_classified_payload_is_returned_unchanged() {
        let err = factory::forbidden(None);
        let fault = Fault::from_panic(Box::new(err.clone()));
        assert_eq!(fault.into_error_value(), err);
    }

    #[test]
    fn test_panic_text_only_reaches_the_log() {
        let capture = LogCapture::new();
        let _guard = capture.set_default();

        let err = error_from_panic(Box::new("secret internals".to_string()));

        assert_eq!(err.kind(), ErrorKind::UnknownError);
        assert_eq!(err.message_key(), "somethingWentWrong");
        assert_eq!(err.rpc_code(), tonic::Code::Internal);
        assert_eq!(err.http_status().as_u16(), 500);
        assert!(err.data().is_none());

        let event = &capture.events_for_target(factory::LOG_TARGET)[0];
        assert_eq!(event.level, tracing::Level::ERROR);
        assert_eq!(event.field("key"), Some("panic-string"));
        assert_eq!(event.field("cause"), Some("secret internals"));
    }
}
