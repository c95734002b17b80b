use std::task::{Context, Poll};

use core_errors::context::{self, REQUEST_ID_HEADER};
use futures::future::BoxFuture;
use http::{HeaderValue, Request, Response};
use tower::{Layer, Service};

/// Server layer that scopes the request context around each call.
///
/// Reads `x-request-id` and `accept-language` from the request metadata,
/// exposes the [`RequestContext`](core_errors::RequestContext) as a request
/// extension (`request.extensions().get::<RequestContext>()` in a tonic
/// handler) and echoes `x-request-id` on the response.
///
/// # Example
/// ```ignore
/// use grpc_helpers::layers::{RecoveryLayer, RequestContextLayer};
///
/// Server::builder()
///     .layer(RequestContextLayer)
///     .layer(RecoveryLayer)
///     .add_service(UsersServiceServer::new(service))
///     .serve(addr)
///     .await?;
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestContextLayer;

impl<S> Layer<S> for RequestContextLayer {
  type Service = RequestContextService<S>;

  fn layer(&self, inner: S) -> Self::Service {
    RequestContextService { inner }
  }
}

#[derive(Clone, Debug)]
pub struct RequestContextService<S> {
  inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestContextService<S>
where
  S: Service<Request<ReqBody>, Response = Response<ResBody>>,
  S::Future: Send + 'static,
  S::Error: Send + 'static,
  ResBody: Send + 'static,
{
  type Response = S::Response;
  type Error = S::Error;
  type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

  fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
    self.inner.poll_ready(cx)
  }

  fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
    let ctx = context::from_headers(request.headers());
    request.extensions_mut().insert(ctx.clone());

    let inner = &mut self.inner;
    let future = context::sync_scope(ctx.clone(), || inner.call(request));

    Box::pin(async move {
      let mut response = context::scope(ctx.clone(), future).await?;
      if let Ok(value) = HeaderValue::from_str(ctx.request_id()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
      }
      Ok(response)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use core_errors::RequestContext;
  use core_errors::context::ACCEPT_LANGUAGE_HEADER;
  use std::convert::Infallible;
  use tower::{ServiceExt, service_fn};

  async fn echo(request: Request<String>) -> Result<Response<String>, Infallible> {
    let current = context::current();
    let extension = request.extensions().get::<RequestContext>().cloned();
    assert_eq!(
      extension.map(|ctx| ctx.request_id().to_string()),
      Some(current.request_id().to_string())
    );
    Ok(Response::new(format!("{}|{}", current.request_id(), current.locale())))
  }

  #[tokio::test]
  async fn test_metadata_becomes_context() {
    let service = RequestContextLayer.layer(service_fn(echo));
    let request = Request::builder()
      .uri("/users.v1.UsersService/GetUser")
      .header(REQUEST_ID_HEADER, "grpc-req-1")
      .header(ACCEPT_LANGUAGE_HEADER, "id")
      .body(String::new())
      .unwrap();

    let response = service.oneshot(request).await.unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "grpc-req-1");
    assert_eq!(response.body(), "grpc-req-1|id");
  }

  #[tokio::test]
  async fn test_request_id_generated_when_missing() {
    let service = RequestContextLayer.layer(service_fn(echo));
    let request = Request::builder().body(String::new()).unwrap();

    let response = service.oneshot(request).await.unwrap();

    let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&header).is_ok());
    assert_eq!(response.body(), &format!("{header}|en"));
  }
}
