//! Client for the Spay payment gateway.
//!
//! Requests are serialised to JSON, wrapped in a 3DES-CBC envelope keyed by
//! bit-string configuration, sent over HTTP, and the replies classified into
//! transport failures, business failures and typed successes.
//!
//! ```no_run
//! # async fn run() -> Result<(), spay::SpayError> {
//! let client = spay::SpayClient::new(spay::ClientConfig::from_env()?)?;
//! match client.list_banks().await {
//!     Ok(banks) => println!("{} banks", banks.len()),
//!     Err(e) if e.is_insufficient_funds() => println!("top up first"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod bitstring;
pub mod classify;
pub mod client;
pub mod config;
pub mod crypto;
pub mod error;

pub use bitstring::{BitString, BitStringError};
pub use classify::{classify, ClassifiedOutcome};
pub use client::{Endpoint, HttpTransport, SpayClient, SuccessGate, Transport};
pub use crate::config::ClientConfig;
pub use crypto::{CipherError, SharedSecret};
pub use error::SpayError;

pub use common::protocol;
pub use common::{BusinessError, ErrorCode};
