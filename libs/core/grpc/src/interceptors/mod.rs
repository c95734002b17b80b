/// Re-export tonic's Interceptor trait for convenience
pub use tonic::service::Interceptor;

pub mod compose;
pub mod context;

pub use compose::{compose_interceptors, ComposedInterceptor};
pub use context::ContextPropagationInterceptor;
