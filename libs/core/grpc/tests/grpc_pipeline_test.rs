use std::convert::Infallible;

use core_errors::context::{self, REQUEST_ID_HEADER, RequestContext};
use core_errors::envelope::Pagination;
use core_errors::{ErrorValue, factory};
use grpc_helpers::interceptors::Interceptor;
use grpc_helpers::{
  ContextPropagationInterceptor, RecoveryLayer, RequestContextLayer, StandardResponse,
  ToTonicResult, error_envelope, response,
};
use http::{Request, Response};
use prost::Message;
use serde_json::{Value, json};
use tonic::{Code, Status};
use tower::{ServiceBuilder, ServiceExt, service_fn};

fn find_user(id: &str) -> Result<Value, ErrorValue> {
  match id {
    "42" => Ok(json!({"id": 42, "name": "Ada"})),
    other => Err(factory::resource_not_found(other, None)),
  }
}

/// Minimal stand-in for a generated tonic server: routes on the path and
/// encodes the reply or the status.
async fn users_service(request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, Infallible> {
  let id = String::from_utf8(request.into_body()).unwrap_or_default();
  let reply: Result<StandardResponse, Status> = match id.as_str() {
    "panic" => panic!("users cache corrupted"),
    id => find_user(id).to_tonic().and_then(response::success),
  };
  Ok(match reply {
    Ok(message) => Response::new(message.encode_to_vec()),
    Err(status) => status.into_http(),
  })
}

/// Outgoing call from a scoped client context, turned into an HTTP request.
fn outgoing(ctx: RequestContext, body: &str) -> Request<Vec<u8>> {
  let request = context::sync_scope(ctx, || {
    ContextPropagationInterceptor::new()
      .call(tonic::Request::new(()))
      .unwrap()
  });
  let (metadata, _, ()) = request.into_parts();

  let mut http_request = Request::builder()
    .uri("/users.v1.UsersService/GetUser")
    .body(body.as_bytes().to_vec())
    .unwrap();
  *http_request.headers_mut() = metadata.into_headers();
  http_request
}

async fn call(request: Request<Vec<u8>>) -> Response<Vec<u8>> {
  ServiceBuilder::new()
    .layer(RequestContextLayer)
    .layer(RecoveryLayer)
    .service(service_fn(users_service))
    .oneshot(request)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_success_reply_carries_caller_request_id() {
  let response = call(outgoing(RequestContext::with_request_id("chain-1"), "42")).await;

  assert_eq!(response.headers()[REQUEST_ID_HEADER], "chain-1");
  let message = StandardResponse::decode(response.body().as_slice()).unwrap();
  let meta = message.meta.clone().unwrap();
  assert_eq!(meta.request_id, "chain-1");
  assert_eq!(meta.code, 200);
  assert_eq!(message.results_as::<Value>().unwrap()["name"], "Ada");
}

#[tokio::test]
async fn test_not_found_status_is_localized_for_caller() {
  let ctx = RequestContext::with_request_id("chain-2").with_locale("id");
  let response = call(outgoing(ctx, "7")).await;

  let status = Status::from_header_map(response.headers()).unwrap();
  assert_eq!(status.code(), Code::NotFound);
  assert_eq!(status.message(), "[chain-2] Data tidak ditemukan");

  let envelope = error_envelope(&status).unwrap();
  assert_eq!(envelope.meta.code, 404);
  assert_eq!(envelope.meta.request_id, "chain-2");
}

#[tokio::test]
async fn test_panic_is_internal_with_request_id() {
  let response = call(outgoing(RequestContext::with_request_id("chain-3"), "panic")).await;

  let status = Status::from_header_map(response.headers()).unwrap();
  assert_eq!(status.code(), Code::Internal);
  assert_eq!(status.message(), "[chain-3] Something went wrong");
  assert!(!status.message().contains("corrupted"));
}

#[test]
fn test_pagination_message_round_trips_on_the_wire() {
  let ctx = RequestContext::with_request_id("chain-4");
  let reply = context::sync_scope(ctx, || {
    response::pagination_success(Pagination::new(2, 5, 11), vec![json!({"id": 6})])
  })
  .unwrap();

  let decoded =
    grpc_helpers::PaginationResponse::decode(reply.encode_to_vec().as_slice()).unwrap();
  let pagination = decoded.pagination.unwrap();
  assert_eq!((pagination.page, pagination.limit, pagination.total_row), (2, 5, 11));
  assert_eq!(decoded.results_as::<Value>().unwrap().len(), 1);
}

#[test]
fn test_status_from_foreign_error_in_blocking_code() {
  let status = tokio_test::block_on(context::scope(
    RequestContext::with_request_id("chain-5"),
    async { grpc_helpers::status_from_error(&std::fmt::Error) },
  ));

  assert_eq!(status.code(), Code::Internal);
  assert!(status.message().starts_with("[chain-5]"));
}
