//! Triple-DES (EDE3) CBC encryption of request and response payloads.
//!
//! **Padding asymmetry:** [`encrypt`] always appends PKCS#7-style padding
//! (one to eight bytes, each equal to the pad length), while [`decrypt`]
//! returns the full decrypted buffer *including* those pad bytes. Callers that
//! decode JSON from a decrypted buffer must ignore the trailing bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use des::TdesEde3;
use thiserror::Error;

/// DES block size in bytes.
pub const BLOCK_SIZE: usize = 8;

/// Byte length of a three-key (EDE3) Triple-DES key.
pub const KEY_LEN: usize = 24;

/// Byte length of the CBC initialisation vector.
pub const IV_LEN: usize = BLOCK_SIZE;

type Encryptor = cbc::Encryptor<TdesEde3>;
type Decryptor = cbc::Decryptor<TdesEde3>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("invalid 3DES key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("invalid CBC IV length: expected {IV_LEN} bytes, got {0}")]
    InvalidIvLength(usize),

    /// The ciphertext is not valid standard base64.
    #[error("ciphertext is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("ciphertext too short: {0} bytes")]
    CiphertextTooShort(usize),

    #[error("ciphertext is not a multiple of the block size: {0} bytes")]
    NotBlockAligned(usize),
}

/// Number of pad bytes [`encrypt`] appends to a plaintext of `len` bytes.
///
/// Always in `1..=BLOCK_SIZE`: an already block-aligned plaintext receives a
/// full block of padding.
pub fn pad_len(len: usize) -> usize {
    BLOCK_SIZE - len % BLOCK_SIZE
}

/// Copy `plaintext` and append the pad bytes.
pub fn pad(plaintext: &[u8]) -> Vec<u8> {
    let pad = pad_len(plaintext.len());
    let mut data = Vec::with_capacity(plaintext.len() + pad);
    data.extend_from_slice(plaintext);
    data.resize(plaintext.len() + pad, pad as u8);
    data
}

/// `data` without its trailing pad, or `None` when the tail is not a valid
/// pad of 1..=8 bytes each equal to the pad length.
pub fn unpadded(data: &[u8]) -> Option<&[u8]> {
    let &last = data.last()?;
    let pad = usize::from(last);
    if !(1..=BLOCK_SIZE).contains(&pad) || pad > data.len() {
        return None;
    }
    let (body, tail) = data.split_at(data.len() - pad);
    tail.iter().all(|&b| b == last).then_some(body)
}

/// Pad, encrypt with 3DES-CBC and encode as standard base64.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] or [`CipherError::InvalidIvLength`]
/// for malformed key material.
pub fn encrypt(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<String, CipherError> {
    check_key_material(key, iv)?;

    let mut data = pad(plaintext);
    let len = data.len();
    let ciphertext = Encryptor::new_from_slices(key, iv)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
        .encrypt_padded_mut::<NoPadding>(&mut data, len)
        .map_err(|_| CipherError::NotBlockAligned(len))?;

    Ok(STANDARD.encode(ciphertext))
}

/// Decode standard base64 and decrypt with 3DES-CBC.
///
/// The returned buffer is the same length as the decoded ciphertext; pad
/// bytes are **not** stripped.
///
/// # Errors
///
/// - [`CipherError::Base64`] if `payload` is not valid base64.
/// - [`CipherError::InvalidKeyLength`] / [`CipherError::InvalidIvLength`] for
///   malformed key material.
/// - [`CipherError::CiphertextTooShort`] / [`CipherError::NotBlockAligned`]
///   if the ciphertext is not a whole, non-zero number of blocks.
pub fn decrypt(payload: &str, key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    let mut data = STANDARD.decode(payload)?;
    check_key_material(key, iv)?;

    let total = data.len();
    if total < BLOCK_SIZE {
        return Err(CipherError::CiphertextTooShort(total));
    }
    if total % BLOCK_SIZE != 0 {
        return Err(CipherError::NotBlockAligned(total));
    }

    let len = Decryptor::new_from_slices(key, iv)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
        .decrypt_padded_mut::<NoPadding>(&mut data)
        .map_err(|_| CipherError::NotBlockAligned(total))?
        .len();
    data.truncate(len);

    Ok(data)
}

fn check_key_material(key: &[u8], iv: &[u8]) -> Result<(), CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    if iv.len() != IV_LEN {
        return Err(CipherError::InvalidIvLength(iv.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_KEY: [u8; KEY_LEN] = [0u8; KEY_LEN];
    const ZERO_IV: [u8; IV_LEN] = [0u8; IV_LEN];

    const KEY: [u8; KEY_LEN] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32,
        0x10, 0x89, 0xab, 0xcd, 0xef, 0x01, 0x23, 0x45, 0x67,
    ];
    const IV: [u8; IV_LEN] = [0x12, 0x34, 0x56, 0x78, 0x90, 0xab, 0xcd, 0xef];

    fn padded(plaintext: &[u8]) -> Vec<u8> {
        let n = pad_len(plaintext.len());
        let mut v = plaintext.to_vec();
        v.extend(std::iter::repeat(n as u8).take(n));
        v
    }

    #[test]
    fn pad_len_never_zero() {
        assert_eq!(pad_len(0), 8);
        assert_eq!(pad_len(4), 4);
        assert_eq!(pad_len(7), 1);
        assert_eq!(pad_len(8), 8);
        assert_eq!(pad_len(9), 7);
    }

    #[test]
    fn ping_with_zero_key_matches_golden_value() {
        let ct = encrypt(b"PING", &ZERO_KEY, &ZERO_IV).unwrap();
        assert_eq!(ct, "mBkVgqkKA1s=");
        assert_eq!(STANDARD.decode(&ct).unwrap().len(), BLOCK_SIZE);
    }

    #[test]
    fn empty_plaintext_encrypts_to_one_block() {
        let ct = encrypt(b"", &ZERO_KEY, &ZERO_IV).unwrap();
        assert_eq!(ct, "fkIoInc2ZsA=");
        assert_eq!(STANDARD.decode(&ct).unwrap().len(), BLOCK_SIZE);
    }

    #[test]
    fn three_key_golden_values() {
        assert_eq!(encrypt(b"PING", &KEY, &IV).unwrap(), "rtz4e57H+Xs=");
        // Block-aligned input gains a whole block of padding.
        assert_eq!(
            encrypt(b"ABCDEFGH", &KEY, &IV).unwrap(),
            "1O+efIBLMaiw9KHqSHd/Nw=="
        );
        assert_eq!(
            encrypt(br#"{"Referenceid":"1","RequestType":152}"#, &KEY, &IV).unwrap(),
            "W5vcb2QbpBk43Wn4GCIy8hjTMiZH1ZpR5UAa+LU6EwJYp8HISfvwzQ=="
        );
    }

    #[test]
    fn decrypt_keeps_pad_bytes() {
        for plaintext in [&b""[..], b"PING", b"ABCDEFGH", b"a longer payload of 29 bytes."] {
            let ct = encrypt(plaintext, &KEY, &IV).unwrap();
            let pt = decrypt(&ct, &KEY, &IV).unwrap();
            assert_ne!(pt, plaintext);
            assert_eq!(pt, padded(plaintext));
            assert_eq!(pt.len() % BLOCK_SIZE, 0);
        }
    }

    #[test]
    fn decrypt_golden_value() {
        let pt = decrypt("rtz4e57H+Xs=", &KEY, &IV).unwrap();
        assert_eq!(pt, b"PING\x04\x04\x04\x04");
    }

    #[test]
    fn unpadded_strips_only_well_formed_pad() {
        let pt = decrypt("rtz4e57H+Xs=", &KEY, &IV).unwrap();
        assert_eq!(unpadded(&pt), Some(&b"PING"[..]));
        assert_eq!(unpadded(&[8u8; 8]), Some(&b""[..]));
        assert_eq!(unpadded(b"PING\x03\x04"), None);
        assert_eq!(unpadded(b"PING\x00"), None);
        assert_eq!(unpadded(b"PING\x09"), None);
        assert_eq!(unpadded(b"\x02"), None);
        assert_eq!(unpadded(b""), None);
    }

    #[test]
    fn wrong_key_length_rejected() {
        let err = encrypt(b"x", &[0u8; 16], &ZERO_IV).unwrap_err();
        assert!(matches!(err, CipherError::InvalidKeyLength(16)));
        let err = decrypt("mBkVgqkKA1s=", &[0u8; 8], &ZERO_IV).unwrap_err();
        assert!(matches!(err, CipherError::InvalidKeyLength(8)));
    }

    #[test]
    fn wrong_iv_length_rejected() {
        let err = encrypt(b"x", &ZERO_KEY, &[0u8; 16]).unwrap_err();
        assert!(matches!(err, CipherError::InvalidIvLength(16)));
    }

    #[test]
    fn bad_base64_rejected() {
        let err = decrypt("!!!not base64!!!", &KEY, &IV).unwrap_err();
        assert!(matches!(err, CipherError::Base64(_)));
    }

    #[test]
    fn short_ciphertext_rejected() {
        // 4 bytes
        let err = decrypt("AAAAAA==", &KEY, &IV).unwrap_err();
        assert!(matches!(err, CipherError::CiphertextTooShort(4)));
        let err = decrypt("", &KEY, &IV).unwrap_err();
        assert!(matches!(err, CipherError::CiphertextTooShort(0)));
    }

    #[test]
    fn unaligned_ciphertext_rejected() {
        // 12 bytes
        let err = decrypt("AAAAAAAAAAAAAAAA", &KEY, &IV).unwrap_err();
        assert!(matches!(err, CipherError::NotBlockAligned(12)));
    }

    #[test]
    fn iv_changes_ciphertext() {
        let a = encrypt(b"PING", &KEY, &IV).unwrap();
        let b = encrypt(b"PING", &KEY, &ZERO_IV).unwrap();
        assert_ne!(a, b);
    }
}
