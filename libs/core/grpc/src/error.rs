use bytes::Bytes;
use core_errors::context::{self, REQUEST_ID_HEADER, RequestContext};
use core_errors::envelope::{self, ErrorEnvelope};
use core_errors::{ErrorValue, factory};
use std::fmt::Display;
use tonic::metadata::MetadataMap;
use tonic::Status;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// gRPC wrapper around a classified [`ErrorValue`].
///
/// Converts into a [`tonic::Status`] whose code comes from the registry and
/// whose details carry the JSON error envelope.
#[derive(Debug, Clone)]
pub struct GrpcError(pub ErrorValue);

impl From<ErrorValue> for GrpcError {
  fn from(err: ErrorValue) -> Self {
    Self(err)
  }
}

impl Display for GrpcError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

impl std::error::Error for GrpcError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(&self.0)
  }
}

impl From<GrpcError> for Status {
  fn from(err: GrpcError) -> Self {
    into_status(&err.0)
  }
}

/// Status for a classified error, under the current request context.
///
/// - code: the kind's registered gRPC code
/// - message: `"[<request_id>] <localized message>"`
/// - metadata: `x-request-id`
/// - details: the JSON error envelope (`meta` + `error`)
pub fn into_status(err: &ErrorValue) -> Status {
  into_status_with(&context::current(), err)
}

/// [`into_status`] with an explicit context.
pub fn into_status_with(ctx: &RequestContext, err: &ErrorValue) -> Status {
  let (_, envelope) = envelope::format_error(ctx, err);
  let message = format!("[{}] {}", ctx.request_id(), envelope.meta.message);

  let mut metadata = MetadataMap::new();
  if let Ok(value) = ctx.request_id().parse() {
    metadata.insert(REQUEST_ID_HEADER, value);
  }

  let details = match serde_json::to_vec(&envelope) {
    Ok(json) => Bytes::from(json),
    Err(e) => {
      tracing::warn!(error = %e, "Failed to encode error envelope for status details");
      Bytes::new()
    }
  };

  Status::with_details_and_metadata(err.rpc_code(), message, details, metadata)
}

/// Status for any error, classified or not.
///
/// Errors that did not come from the factory become `Internal`; their text
/// is logged and never sent to the caller.
pub fn status_from_error(err: &(dyn std::error::Error + 'static)) -> Status {
  into_status(&envelope::classify(err))
}

/// Error envelope carried in the details of a status built by [`into_status`].
pub fn error_envelope(status: &Status) -> Option<ErrorEnvelope> {
  serde_json::from_slice(status.details()).ok()
}

// ============================================================================
// Generic Error Conversion Traits
// ============================================================================

/// Extension trait for Result types to convert errors to tonic::Status
///
/// # Example
/// ```ignore
/// use grpc_helpers::error::ToTonicResult;
///
/// async fn get_user(&self, request: Request<GetUserRequest>) -> Result<Response<User>, Status> {
///   let user = self.repo.find(&request.get_ref().id).await.to_tonic()?;
///   Ok(Response::new(user))
/// }
/// ```
pub trait ToTonicResult<T> {
  /// Convert the error in this Result to a tonic::Status
  fn to_tonic(self) -> Result<T, Status>;
}

impl<T> ToTonicResult<T> for Result<T, ErrorValue> {
  fn to_tonic(self) -> Result<T, Status> {
    self.map_err(|e| into_status(&e))
  }
}

impl<T> ToTonicResult<T> for Result<T, GrpcError> {
  fn to_tonic(self) -> Result<T, Status> {
    self.map_err(Status::from)
  }
}

/// Extension trait for Option types to convert None to tonic::Status errors
///
/// `key` names what was missing; it goes to the log, not to the caller.
///
/// # Example
/// ```ignore
/// use grpc_helpers::error::ToTonicOption;
///
/// let user = users.get(&id).ok_or_not_found(&id)?;
/// ```
pub trait ToTonicOption<T> {
  /// Convert None to a `ResourceNotFound` status (NOT_FOUND)
  fn ok_or_not_found(self, key: impl Display) -> Result<T, Status>;

  /// Convert None to an `InvalidRequest` status (INVALID_ARGUMENT)
  fn ok_or_invalid(self, key: impl Display) -> Result<T, Status>;
}

impl<T> ToTonicOption<T> for Option<T> {
  fn ok_or_not_found(self, key: impl Display) -> Result<T, Status> {
    self.ok_or_else(|| into_status(&factory::resource_not_found(key, None)))
  }

  fn ok_or_invalid(self, key: impl Display) -> Result<T, Status> {
    self.ok_or_else(|| into_status(&factory::invalid_request(key, None)))
  }
}
