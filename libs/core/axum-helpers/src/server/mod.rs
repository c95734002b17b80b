//! Router setup.

pub mod app;

pub use app::with_error_pipeline;
