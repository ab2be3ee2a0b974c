//! # Coworking Service
//!
//! Room booking backend for a coworking space: a room registry, a booking
//! ledger that never double-books a room, availability timelines and
//! server-side pricing.
//!
//! ## Architecture
//!
//! - **domain**: rooms, bookings, users, scheduling rules, access checks
//! - **application**: services orchestrating the domain over a repository provider
//! - **infrastructure**: SeaORM persistence, in-memory store, JWT and bcrypt
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime wiring shared by the binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

pub use interfaces::http::{create_api_router, ApiServices};
