//! UUID path parameter extractor with automatic validation.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use core_errors::factory;
use serde_json::json;
use uuid::Uuid;

use crate::errors::HttpError;

/// Extractor for UUID path parameters.
///
/// A missing segment is an `InvalidRequest`, a segment that is not a UUID an
/// `InvalidFormat` error; both answer 400 with the standard envelope.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::UuidPath;
///
/// async fn get_user(UuidPath(id): UuidPath) -> String {
///     format!("User ID: {}", id)
/// }
///
/// let app = Router::new().route("/users/{id}", get(get_user));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| HttpError(factory::invalid_request(e.body_text(), None)))?;

        Uuid::parse_str(&id).map(UuidPath).map_err(|_| {
            HttpError(factory::invalid_format(
                &id,
                Some(json!({ "id": id, "expected": "uuid" })),
            ))
        })
    }
}
