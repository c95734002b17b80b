//! # gRPC Helpers
//!
//! gRPC side of the error pipeline: classified errors become
//! [`tonic::Status`] values with the error envelope in their details, success
//! values become prost envelopes, and tower layers carry the request context
//! and recover from panics.
//!
//! ## Quick Start
//!
//! ### Server
//! ```ignore
//! use grpc_helpers::layers::{RecoveryLayer, RequestContextLayer};
//! use grpc_helpers::{ToTonicResult, response};
//!
//! async fn get_user(&self, request: Request<GetUserRequest>) -> Result<Response<StandardResponse>, Status> {
//!     let user = self.repo.find(&request.get_ref().id).await.to_tonic()?;
//!     Ok(Response::new(response::success(user)?))
//! }
//!
//! Server::builder()
//!     .layer(RequestContextLayer)
//!     .layer(RecoveryLayer)
//!     .add_service(UsersServiceServer::new(service))
//!     .serve(addr)
//!     .await?;
//! ```
//!
//! ### Client
//! ```ignore
//! use grpc_helpers::interceptors::ContextPropagationInterceptor;
//!
//! let client = TasksServiceClient::with_interceptor(channel, ContextPropagationInterceptor::new());
//! ```

pub mod error;
pub mod interceptors;
pub mod layers;
pub mod response;

pub use error::{
  GrpcError, GrpcResult, ToTonicOption, ToTonicResult, error_envelope, into_status,
  into_status_with, status_from_error,
};
pub use interceptors::{ComposedInterceptor, ContextPropagationInterceptor, compose_interceptors};
pub use layers::{RecoveryLayer, RequestContextLayer};
pub use response::{PaginationMeta, PaginationResponse, StandardResponse};
