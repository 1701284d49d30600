//! c32check address codec.
//!
//! Addresses are `S` + version character + c32(hash160 ‖ checksum), where the
//! checksum is the first four bytes of SHA-256(SHA-256(version ‖ hash160)).

use sha2::{Digest, Sha256};
use thiserror::Error;

const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

pub const MAINNET_SINGLE_SIG: u8 = 22;
pub const MAINNET_MULTI_SIG: u8 = 20;
pub const TESTNET_SINGLE_SIG: u8 = 26;
pub const TESTNET_MULTI_SIG: u8 = 21;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum C32Error {
    #[error("invalid c32 character `{0}`")]
    InvalidCharacter(char),

    #[error("address must start with `S`: {0}")]
    MissingPrefix(String),

    #[error("address too short: {0}")]
    TooShort(String),

    #[error("address checksum mismatch: {0}")]
    ChecksumMismatch(String),

    #[error("address version {0} out of range")]
    InvalidVersion(u8),

    #[error("address payload must be 20 bytes, got {0}")]
    InvalidHashLength(usize),
}

fn c32_value(ch: char) -> Result<u8, C32Error> {
    // Crockford-style normalization: O → 0, I/L → 1, case-insensitive.
    let normalized = match ch.to_ascii_uppercase() {
        'O' => '0',
        'I' | 'L' => '1',
        other => other,
    };
    C32_ALPHABET
        .iter()
        .position(|c| *c as char == normalized)
        .map(|pos| pos as u8)
        .ok_or(C32Error::InvalidCharacter(ch))
}

/// Encode bytes as a big-endian base-32 number; each leading zero byte
/// becomes one leading `0` character.
pub fn c32_encode(data: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 8 / 5 + 1);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for byte in data.iter().rev() {
        acc |= (*byte as u32) << bits;
        bits += 8;
        while bits >= 5 {
            digits.push(C32_ALPHABET[(acc & 0x1f) as usize]);
            acc >>= 5;
            bits -= 5;
        }
    }
    if bits > 0 {
        digits.push(C32_ALPHABET[(acc & 0x1f) as usize]);
    }
    while digits.last() == Some(&b'0') {
        digits.pop();
    }
    let leading_zeros = data.iter().take_while(|b| **b == 0).count();
    digits.extend(std::iter::repeat(b'0').take(leading_zeros));
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

pub fn c32_decode(input: &str) -> Result<Vec<u8>, C32Error> {
    let values = input
        .chars()
        .map(c32_value)
        .collect::<Result<Vec<u8>, _>>()?;
    let leading_zeros = values.iter().take_while(|v| **v == 0).count();

    let mut bytes: Vec<u8> = Vec::with_capacity(values.len() * 5 / 8 + 1);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for value in values.iter().rev() {
        acc |= (*value as u32) << bits;
        bits += 5;
        while bits >= 8 {
            bytes.push((acc & 0xff) as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 && acc != 0 {
        bytes.push(acc as u8);
    }
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    bytes.extend(std::iter::repeat(0).take(leading_zeros));
    bytes.reverse();
    Ok(bytes)
}

fn checksum(version: u8, hash160: &[u8]) -> [u8; 4] {
    let mut first = Sha256::new();
    first.update([version]);
    first.update(hash160);
    let second = Sha256::digest(first.finalize());
    let mut out = [0u8; 4];
    out.copy_from_slice(&second[..4]);
    out
}

pub fn encode_address(version: u8, hash160: &[u8; 20]) -> Result<String, C32Error> {
    if version >= 32 {
        return Err(C32Error::InvalidVersion(version));
    }
    let mut payload = hash160.to_vec();
    payload.extend_from_slice(&checksum(version, hash160));
    Ok(format!(
        "S{}{}",
        C32_ALPHABET[version as usize] as char,
        c32_encode(&payload)
    ))
}

/// Decode a standard address into `(version, hash160)`.
pub fn decode_address(address: &str) -> Result<(u8, [u8; 20]), C32Error> {
    let mut chars = address.chars();
    if chars.next() != Some('S') {
        return Err(C32Error::MissingPrefix(address.to_string()));
    }
    let version_char = chars
        .next()
        .ok_or_else(|| C32Error::TooShort(address.to_string()))?;
    let version = c32_value(version_char)?;

    let payload = c32_decode(chars.as_str())?;
    if payload.len() < 4 {
        return Err(C32Error::TooShort(address.to_string()));
    }
    let (hash, check) = payload.split_at(payload.len() - 4);
    if hash.len() != 20 {
        return Err(C32Error::InvalidHashLength(hash.len()));
    }
    if checksum(version, hash) != check {
        return Err(C32Error::ChecksumMismatch(address.to_string()));
    }

    let mut hash160 = [0u8; 20];
    hash160.copy_from_slice(hash);
    Ok((version, hash160))
}
