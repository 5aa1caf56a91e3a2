//! Visit counters - MongoDB and in-memory fallback.

mod memory;

#[cfg(feature = "mongo")]
mod mongo;

pub use memory::InMemoryVisitRepository;

#[cfg(feature = "mongo")]
pub use mongo::MongoVisitRepository;
