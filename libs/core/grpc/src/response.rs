//! Success messages in the standard envelope.
//!
//! gRPC services that return a generic envelope instead of a typed message
//! use these prost messages. `results` holds the JSON encoding of the data,
//! `meta.code` mirrors the HTTP status of the equivalent REST response.

use core_errors::context::{self, RequestContext};
use core_errors::envelope::{
  self, CREATED_KEY, DELETED_KEY, Pagination, SUCCESS_KEY, UPDATED_KEY,
};
use core_errors::factory;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tonic::Status;

use crate::error::into_status_with;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Meta {
  #[prost(string, tag = "1")]
  pub request_id: String,
  #[prost(int32, tag = "2")]
  pub code: i32,
  #[prost(string, tag = "3")]
  pub message: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StandardResponse {
  #[prost(message, optional, tag = "1")]
  pub meta: Option<Meta>,
  /// JSON-encoded data.
  #[prost(bytes = "vec", tag = "2")]
  pub results: Vec<u8>,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct PaginationMeta {
  #[prost(uint32, tag = "1")]
  pub page: u32,
  #[prost(uint32, tag = "2")]
  pub size: u32,
  #[prost(uint32, tag = "3")]
  pub limit: u32,
  #[prost(uint64, tag = "4")]
  pub total_row: u64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PaginationResponse {
  #[prost(message, optional, tag = "1")]
  pub meta: Option<Meta>,
  #[prost(message, optional, tag = "2")]
  pub pagination: Option<PaginationMeta>,
  /// JSON-encoded array of items.
  #[prost(bytes = "vec", tag = "3")]
  pub results: Vec<u8>,
}

impl From<envelope::Meta> for Meta {
  fn from(meta: envelope::Meta) -> Self {
    Self {
      request_id: meta.request_id,
      code: i32::from(meta.code),
      message: meta.message,
    }
  }
}

impl From<Pagination> for PaginationMeta {
  fn from(pagination: Pagination) -> Self {
    Self {
      page: pagination.page,
      size: pagination.size,
      limit: pagination.limit,
      total_row: pagination.total_row,
    }
  }
}

impl StandardResponse {
  /// Decode `results` into `T`.
  pub fn results_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
    serde_json::from_slice(&self.results)
  }
}

impl PaginationResponse {
  /// Decode `results` into a list of `T`.
  pub fn results_as<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
    serde_json::from_slice(&self.results)
  }
}

fn encode_results<T: Serialize>(ctx: &RequestContext, data: &T) -> Result<Vec<u8>, Status> {
  serde_json::to_vec(data).map_err(|e| {
    let err = factory::unknown_error_with_cause("encode-results", None, e);
    into_status_with(ctx, &err)
  })
}

fn standard<T: Serialize>(
  ctx: &RequestContext,
  envelope: envelope::SuccessEnvelope<T>,
) -> Result<StandardResponse, Status> {
  let results = encode_results(ctx, &envelope.data)?;
  Ok(StandardResponse {
    meta: Some(envelope.meta.into()),
    results,
  })
}

/// Success with the default message.
pub fn success<T: Serialize>(data: T) -> Result<StandardResponse, Status> {
  success_with_message(SUCCESS_KEY, data)
}

/// Success with a caller-chosen message key.
pub fn success_with_message<T: Serialize>(
  message_key: &str,
  data: T,
) -> Result<StandardResponse, Status> {
  let ctx = context::current();
  let envelope = envelope::format_success(&ctx, message_key, data);
  standard(&ctx, envelope)
}

pub fn created<T: Serialize>(data: T) -> Result<StandardResponse, Status> {
  let ctx = context::current();
  let envelope = envelope::format_created(&ctx, CREATED_KEY, data);
  standard(&ctx, envelope)
}

pub fn updated<T: Serialize>(data: T) -> Result<StandardResponse, Status> {
  let ctx = context::current();
  let envelope = envelope::format_updated(&ctx, UPDATED_KEY, data);
  standard(&ctx, envelope)
}

/// Deletion carries `null` results.
pub fn deleted() -> StandardResponse {
  let envelope = envelope::format_deleted(&context::current(), DELETED_KEY);
  StandardResponse {
    meta: Some(envelope.meta.into()),
    results: b"null".to_vec(),
  }
}

pub fn pagination_success<T: Serialize>(
  pagination: Pagination,
  data: Vec<T>,
) -> Result<PaginationResponse, Status> {
  let ctx = context::current();
  let envelope = envelope::format_pagination(&ctx, SUCCESS_KEY, pagination, data);
  let results = encode_results(&ctx, &envelope.data)?;
  Ok(PaginationResponse {
    meta: Some(envelope.meta.into()),
    pagination: Some(envelope.pagination.into()),
    results,
  })
}
