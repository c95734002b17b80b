use core_errors::context::{self, ACCEPT_LANGUAGE_HEADER, REQUEST_ID_HEADER};
use tonic::{Request, Status};

/// Client interceptor propagating the request context downstream.
///
/// Copies the current request id and locale into the outgoing metadata
/// (`x-request-id`, `accept-language`), so the callee's
/// [`RequestContextLayer`](crate::layers::RequestContextLayer) sees the same
/// values. Outside a request scope a fresh request id is generated.
///
/// # Example
/// ```ignore
/// use grpc_helpers::interceptors::ContextPropagationInterceptor;
/// use rpc::tasks::tasks_service_client::TasksServiceClient;
///
/// let channel = Channel::from_static("http://[::1]:50051").connect().await?;
/// let client = TasksServiceClient::with_interceptor(channel, ContextPropagationInterceptor::new());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ContextPropagationInterceptor;

impl ContextPropagationInterceptor {
  pub fn new() -> Self {
    Self
  }
}

impl tonic::service::Interceptor for ContextPropagationInterceptor {
  fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
    let ctx = context::current();

    // Metadata set explicitly by the caller wins
    let metadata = request.metadata_mut();
    if !metadata.contains_key(REQUEST_ID_HEADER) {
      let value = ctx
        .request_id()
        .parse()
        .map_err(|_| Status::internal("Failed to encode request ID"))?;
      metadata.insert(REQUEST_ID_HEADER, value);
    }
    if !metadata.contains_key(ACCEPT_LANGUAGE_HEADER) {
      if let Ok(value) = ctx.locale().parse() {
        metadata.insert(ACCEPT_LANGUAGE_HEADER, value);
      }
    }

    tracing::debug!(
      target: "grpc_helpers",
      request_id = %ctx.request_id(),
      locale = %ctx.locale(),
      "Outgoing gRPC request"
    );

    Ok(request)
  }
}
