//! Structured logging helpers shared by the error pipeline.
//!
//! `tracing` macros take their level as a compile-time constant, so a level
//! picked at runtime (for example the canonical severity of an
//! [`ErrorKind`](crate::ErrorKind)) goes through [`event_at!`](crate::event_at).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder written over sensitive values before they reach a log sink.
pub const REDACTED: &str = "[REDACTED]";

/// Key fragments that mark a value as sensitive (matched case-insensitively).
pub const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "token",
    "access_token",
    "refresh_token",
    "authorization",
    "secret",
    "client_secret",
    "api_key",
    "jwt",
    "bearer",
];

/// Log severity attached to each error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub const fn as_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emit a `tracing` event at a [`Severity`] chosen at runtime.
///
/// Accepts the same arguments as the `tracing` event macros after the
/// severity:
///
/// ```ignore
/// core_errors::event_at!(Severity::Warn, internal_code = 1013, "not found");
/// ```
#[macro_export]
macro_rules! event_at {
    ($severity:expr, $($arg:tt)+) => {
        match $severity {
            $crate::logging::Severity::Trace => ::tracing::trace!($($arg)+),
            $crate::logging::Severity::Debug => ::tracing::debug!($($arg)+),
            $crate::logging::Severity::Info => ::tracing::info!($($arg)+),
            $crate::logging::Severity::Warn => ::tracing::warn!($($arg)+),
            $crate::logging::Severity::Error => ::tracing::error!($($arg)+),
        }
    };
}

/// Returns true when `key` names a credential or secret.
pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|fragment| key.contains(fragment))
}

/// Copy of `value` with every sensitive object entry replaced by [`REDACTED`].
///
/// Recurses through nested objects and arrays.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| {
                    let inner = if is_sensitive_key(key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        sanitize(inner)
                    };
                    (key.clone(), inner)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        other => other.clone(),
    }
}
