//! Wire types and business error codes shared across the spay gateway crates.

pub mod error;
pub mod protocol;

pub use error::{BusinessError, ErrorCode};
