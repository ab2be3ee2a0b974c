//! In-memory repositories for development and testing

mod memory;

pub use memory::InMemoryRepositoryProvider;
