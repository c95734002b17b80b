//! Error pipeline middleware.
//!
//! Layer order, outermost first:
//!
//! 1. [`request_context_middleware`]: request id and locale scope
//! 2. [`request_logger`]: trace-level request events
//! 3. [`recovery_layer`]: panics to error envelopes

pub mod context;
pub mod logger;
pub mod recovery;

pub use context::request_context_middleware;
pub use logger::request_logger;
pub use recovery::{handle_panic, recovery_layer};
