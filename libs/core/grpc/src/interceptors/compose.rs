use tonic::{Request, Status};

/// Compose two interceptors into a single interceptor
///
/// Interceptors are called in order: first, then second. This allows you
/// to chain multiple interceptors together.
///
/// # Example
/// ```ignore
/// use grpc_helpers::interceptors::{ContextPropagationInterceptor, compose_interceptors};
///
/// let auth = |mut req: Request<()>| {
///   req.metadata_mut().insert("authorization", token.clone());
///   Ok(req)
/// };
/// let composed = compose_interceptors(ContextPropagationInterceptor::new(), auth);
///
/// let client = TasksServiceClient::with_interceptor(channel, composed);
/// ```
pub fn compose_interceptors<A, B>(first: A, second: B) -> ComposedInterceptor<A, B>
where
  A: tonic::service::Interceptor,
  B: tonic::service::Interceptor,
{
  ComposedInterceptor { first, second }
}

/// A composed interceptor that applies two interceptors in sequence
///
/// This is the return type of `compose_interceptors()`. You typically
/// don't need to construct this directly.
#[derive(Clone, Debug)]
pub struct ComposedInterceptor<A, B> {
  first: A,
  second: B,
}

impl<A, B> tonic::service::Interceptor for ComposedInterceptor<A, B>
where
  A: tonic::service::Interceptor,
  B: tonic::service::Interceptor,
{
  fn call(&mut self, request: Request<()>) -> Result<Request<()>, Status> {
    let request = self.first.call(request)?;
    self.second.call(request)
  }
}
