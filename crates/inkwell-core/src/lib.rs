//! # Inkwell Core
//!
//! The domain layer of the Inkwell blogging backend.
//! Posts live nested inside per-author documents but are served as one flat,
//! reverse-chronological feed; visits are counted once per visitor per day.
//! This crate holds the business rules and the ports infrastructure must implement.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
