//! HTTP REST API
//!
//! - `common`: error envelope, domain error mapping, extractors
//! - `middleware`: bearer-token authentication
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiServices};
