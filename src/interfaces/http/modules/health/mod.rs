//! Service probes: welcome document and health check

pub mod handlers;

pub use handlers::*;
