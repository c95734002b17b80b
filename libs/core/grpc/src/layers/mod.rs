//! Server-side tower layers.
//!
//! Order, outermost first: [`RequestContextLayer`], then [`RecoveryLayer`].

pub mod context;
pub mod recovery;

pub use context::{RequestContextLayer, RequestContextService};
pub use recovery::{RecoveryLayer, RecoveryService, panic_response};
