//! Post repositories - MongoDB and in-memory fallback.

mod memory;

#[cfg(feature = "mongo")]
mod mongo;

pub use memory::InMemoryPostRepository;

#[cfg(feature = "mongo")]
pub use mongo::MongoPostRepository;
