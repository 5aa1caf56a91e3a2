//! # Inkwell Shared
//!
//! Wire types shared between the HTTP host and its clients.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
