use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::task::{Context, Poll};

use core_errors::recovery;
use futures::FutureExt;
use futures::future::BoxFuture;
use http::{Request, Response};
use tower::{Layer, Service};

use crate::error::into_status;

/// Server layer turning panics into an `Internal` status.
///
/// Panics raised while building the call future and while polling it are
/// both caught. The payload is classified and logged once; the caller gets
/// the standard status with the error envelope in its details. Place it
/// inside [`RequestContextLayer`](super::RequestContextLayer) so the
/// status carries the caller's request id.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecoveryLayer;

impl<S> Layer<S> for RecoveryLayer {
  type Service = RecoveryService<S>;

  fn layer(&self, inner: S) -> Self::Service {
    RecoveryService { inner }
  }
}

#[derive(Clone, Debug)]
pub struct RecoveryService<S> {
  inner: S,
}

/// Trailers-only gRPC response for a panic payload.
pub fn panic_response<B: Default>(payload: Box<dyn Any + Send + 'static>) -> Response<B> {
  let err = recovery::error_from_panic(payload);
  into_status(&err).into_http()
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RecoveryService<S>
where
  S: Service<Request<ReqBody>, Response = Response<ResBody>>,
  S::Future: Send + 'static,
  S::Error: Send + 'static,
  ResBody: Default + Send + 'static,
{
  type Response = S::Response;
  type Error = S::Error;
  type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

  fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
    self.inner.poll_ready(cx)
  }

  fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
    let inner = &mut self.inner;
    match std::panic::catch_unwind(AssertUnwindSafe(|| inner.call(request))) {
      Ok(future) => Box::pin(async move {
        match AssertUnwindSafe(future).catch_unwind().await {
          Ok(result) => result,
          Err(payload) => Ok(panic_response(payload)),
        }
      }),
      Err(payload) => {
        let response = panic_response(payload);
        Box::pin(async move { Ok(response) })
      }
    }
  }
}
