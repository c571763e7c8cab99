//! Triple-DES CBC envelope for gateway payloads.
//!
//! This module is free of HTTP dependencies. It provides the padding, cipher
//! and base64 steps plus the [`SharedSecret`] that holds the client's key
//! material.
//!
//! # Envelope format
//!
//! ```text
//! base64-std( 3DES-EDE3-CBC( plaintext || pad ) )
//! ```
//!
//! where `pad` is 1..=8 bytes, each equal to the pad length.

pub mod cipher;
pub mod secret;

pub use cipher::{decrypt, encrypt, unpadded, CipherError, BLOCK_SIZE, IV_LEN, KEY_LEN};
pub use secret::SharedSecret;
