//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`.
//! This crate contains the document store adapter, the repositories built on it,
//! and in-memory fallbacks used when no store is configured and in tests.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `mongo` - MongoDB document store via the official driver
//! - `auth` - JWT identity token verification

pub mod authors;
pub mod database;
pub mod posts;
pub mod visits;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use authors::InMemoryAuthorDirectory;
pub use database::StoreConfig;
pub use posts::InMemoryPostRepository;
pub use visits::InMemoryVisitRepository;

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

// Re-exports - MongoDB
#[cfg(feature = "mongo")]
pub use authors::MongoAuthorDirectory;
#[cfg(feature = "mongo")]
pub use database::DocumentStore;
#[cfg(feature = "mongo")]
pub use posts::MongoPostRepository;
#[cfg(feature = "mongo")]
pub use visits::MongoVisitRepository;

#[cfg(test)]
mod tests;
