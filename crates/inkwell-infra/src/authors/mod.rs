//! Author profile lookups - MongoDB and in-memory fallback.

mod memory;

#[cfg(feature = "mongo")]
mod mongo;

pub use memory::InMemoryAuthorDirectory;

#[cfg(feature = "mongo")]
pub use mongo::MongoAuthorDirectory;
