//! JSON extractor with automatic validation using the validator crate.

use std::collections::BTreeMap;

use axum::extract::{FromRequest, Json, Request, rejection::JsonRejection};
use core_errors::{ErrorValue, context, factory, i18n};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::HttpError;

/// Template used when a validator code has no message of its own.
const INVALID_TEMPLATE: &str = "invalid";

/// JSON extractor with automatic validation.
///
/// Malformed bodies are rejected with `InvalidBody` (400), a missing JSON
/// content type with `InvalidRequest` (400), and failed validation with
/// `ValidationFailed` (400) whose envelope `error` maps each field to its
/// localized messages:
///
/// ```json
/// { "email": ["Email must be a valid email address"] }
/// ```
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(length(min = 3, max = 50))]
///     username: String,
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> String {
///     format!("Creating user: {}", payload.username)
/// }
///
/// let app = Router::new().route("/users", post(create_user));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;

        data.validate().map_err(validation_error)?;

        Ok(ValidatedJson(data))
    }
}

fn rejection_error(rejection: JsonRejection) -> HttpError {
    let err = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            factory::invalid_request(rejection.body_text(), None)
        }
        _ => factory::invalid_body(rejection.body_text(), None),
    };
    HttpError(err)
}

fn validation_error(errors: ValidationErrors) -> HttpError {
    let locale = context::current_locale();
    let fields = field_messages(&errors, &locale);
    let key = fields.keys().cloned().collect::<Vec<_>>().join(",");
    let err: ErrorValue = factory::validation_failed(key, Some(serde_json::json!(fields)));
    HttpError(err)
}

/// Localized messages per field, in field order.
pub fn field_messages(errors: &ValidationErrors, locale: &str) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|err| validation_message(&field, err, locale))
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Human-readable field label: `first_name` becomes `First name`.
pub fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn template_key(err: &ValidationError) -> &str {
    let code = err.code.as_ref();
    if code == "length" {
        match (err.params.contains_key("min"), err.params.contains_key("max")) {
            (true, false) => return "length_min",
            (false, true) => return "length_max",
            _ => {}
        }
    }
    code
}

fn validation_message(field: &str, err: &ValidationError, locale: &str) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }

    let catalog = i18n::catalog();
    let key = template_key(err);
    let template = catalog
        .lookup(locale, key)
        .or_else(|| catalog.lookup(catalog.fallback(), key))
        .map(str::to_string)
        .unwrap_or_else(|| catalog.translate(locale, INVALID_TEMPLATE));

    let label = field_label(field);
    let values: Vec<(String, String)> = err
        .params
        .iter()
        .filter(|(name, _)| name.as_ref() != "value")
        .map(|(name, value)| (name.to_string(), param_text(value)))
        .collect();

    let mut params: Vec<(&str, &str)> = vec![("field", label.as_str())];
    params.extend(values.iter().map(|(name, value)| (name.as_str(), value.as_str())));
    i18n::format_message(&template, &params)
}
