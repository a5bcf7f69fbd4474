//! Short codes for roadmap identifiers
//!
//! A code is a number in `[0, MAX_CODE]` written in base 64 over a URL-safe
//! alphabet, most significant symbol first, with leading zero symbols dropped:
//!
//! - `0` encodes to the empty string
//! - `1` encodes to `"1"`
//! - `63` encodes to `"~"`
//!
//! Codes are at most 10 symbols long and need no length prefix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Largest number representable as a code
pub const MAX_CODE: u64 = 0xfff_ffff_ffff;

/// Symbols in order of their numeric value
pub const ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_~";

const WIDTH: usize = 10;
const BITS_PER_SYMBOL: usize = 6;
const MAX_BITS: usize = 44;

#[derive(Debug, Error, PartialEq)]
pub enum CodeError {
    #[error("Invalid character '{character}' in code: {code}")]
    InvalidCharacter { character: char, code: String },

    #[error("Code is out of bounds: {0}")]
    OutOfBounds(String),
}

/// Returns the symbol -> value table, built on first use
fn symbol_values() -> &'static HashMap<char, u64> {
    static VALUES: OnceLock<HashMap<char, u64>> = OnceLock::new();

    VALUES.get_or_init(|| {
        ALPHABET
            .chars()
            .enumerate()
            .map(|(value, symbol)| (symbol, value as u64))
            .collect()
    })
}

/// Encodes a number as a short code
///
/// # Panics
///
/// Panics if `n` is larger than [`MAX_CODE`].
pub fn encode(n: u64) -> String {
    assert!(n <= MAX_CODE, "code out of bounds: {}", n);

    let symbols = ALPHABET.as_bytes();
    let encoded: String = (0..WIDTH)
        .map(|i| {
            let shift = (WIDTH - 1 - i) * BITS_PER_SYMBOL;
            symbols[((n >> shift) & 0x3f) as usize] as char
        })
        .collect();

    encoded.trim_start_matches('0').to_string()
}

/// Decodes a short code back into its number
pub fn decode(code: &str) -> Result<u64, CodeError> {
    let values = symbol_values();
    let mut n: u64 = 0;

    for (position, character) in code.chars().rev().enumerate() {
        let digit = *values.get(&character).ok_or_else(|| CodeError::InvalidCharacter {
            character,
            code: code.to_string(),
        })?;

        if digit == 0 {
            continue;
        }

        let shift = position * BITS_PER_SYMBOL;
        if shift >= MAX_BITS {
            return Err(CodeError::OutOfBounds(code.to_string()));
        }

        n += digit << shift;
    }

    if n > MAX_CODE {
        return Err(CodeError::OutOfBounds(code.to_string()));
    }

    Ok(n)
}

/// Public identifier of a roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(u64);

impl Code {
    /// Creates a code from a numeric id, rejecting ids above [`MAX_CODE`]
    pub fn from_id(id: u64) -> Result<Self, CodeError> {
        if id > MAX_CODE {
            return Err(CodeError::OutOfBounds(id.to_string()));
        }

        Ok(Self(id))
    }

    /// Derives a pseudo-random code in `[0, MAX_CODE)` from a seed and a timestamp
    ///
    /// The same seed at different times produces different codes.
    pub fn generate(seed: &str, at: DateTime<Utc>) -> Self {
        let input = format!("{}{}", seed, at.timestamp_nanos_opt().unwrap_or(0));
        let hash = blake3::hash(input.as_bytes());

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);

        Self(u64::from_le_bytes(bytes) % MAX_CODE)
    }

    /// Returns the numeric id behind this code
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self.0))
    }
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(Self)
    }
}

impl TryFrom<String> for Code {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}
