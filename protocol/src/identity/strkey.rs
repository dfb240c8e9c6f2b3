//! # StrKey Address Encoding
//!
//! Human-readable form of every key-like value on the ledger:
//!
//! ```text
//! base32( version_byte || payload || crc16_xmodem(version_byte || payload) )
//! ```
//!
//! The version byte decides the leading character (`G` for accounts, `C` for
//! contracts, `M` for muxed accounts, ...). The checksum is CRC16-XModem,
//! appended little-endian. Base32 is RFC 4648 without padding.
//!
//! Decoding is strict: the version byte must match what the caller asked
//! for, the checksum must verify, and the string must be the canonical
//! encoding of its bytes (no stray trailing bits).

use crc::{Crc, CRC_16_XMODEM};
use data_encoding::{DecodeError, DecodeKind, BASE32_NOPAD};
use thiserror::Error;

/// Errors from parsing StrKey text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrKeyError {
    #[error("invalid strkey length: {0} characters")]
    InvalidLength(usize),

    #[error("invalid base32 character '{0}'")]
    InvalidCharacter(char),

    #[error("wrong strkey version: expected '{expected}', got '{got}'")]
    WrongVersion { expected: char, got: char },

    #[error("strkey checksum mismatch")]
    InvalidChecksum,

    #[error("strkey is not canonically encoded")]
    NonCanonical,

    #[error("invalid strkey payload length: {0} bytes")]
    InvalidPayloadLength(usize),
}

/// Version bytes, named by what they encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VersionByte {
    /// `G…`
    AccountId = 6 << 3,
    /// `S…`
    SecretSeed = 18 << 3,
    /// `M…`
    MuxedAccount = 12 << 3,
    /// `T…`
    PreAuthTx = 19 << 3,
    /// `X…`
    Sha256Hash = 23 << 3,
    /// `P…`
    SignedPayload = 15 << 3,
    /// `C…`
    Contract = 2 << 3,
    /// `B…`
    ClaimableBalance = 1 << 3,
    /// `L…`
    LiquidityPool = 11 << 3,
}

impl VersionByte {
    /// The leading character every encoding with this version starts with.
    pub fn prefix(self) -> char {
        BASE32_NOPAD.encode(&[self as u8]).chars().next().unwrap_or('?')
    }
}

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Encodes `payload` under `version`.
pub fn encode(version: VersionByte, payload: &[u8]) -> String {
    let mut raw = Vec::with_capacity(payload.len() + 3);
    raw.push(version as u8);
    raw.extend_from_slice(payload);
    let crc = CRC16.checksum(&raw);
    raw.extend_from_slice(&crc.to_le_bytes());
    BASE32_NOPAD.encode(&raw)
}

/// Decodes `s`, requiring the given version, and returns the payload.
pub fn decode(version: VersionByte, s: &str) -> Result<Vec<u8>, StrKeyError> {
    let raw = BASE32_NOPAD
        .decode(s.as_bytes())
        .map_err(|e| base32_error(s, e))?;
    if raw.len() < 3 {
        return Err(StrKeyError::InvalidLength(s.len()));
    }
    if raw[0] != version as u8 {
        return Err(StrKeyError::WrongVersion {
            expected: version.prefix(),
            got: s.chars().next().unwrap_or('?'),
        });
    }
    let (body, checksum) = raw.split_at(raw.len() - 2);
    if CRC16.checksum(body).to_le_bytes() != [checksum[0], checksum[1]] {
        return Err(StrKeyError::InvalidChecksum);
    }
    Ok(body[1..].to_vec())
}

/// Decodes a fixed 32-byte payload (accounts, contracts, hashes, seeds).
pub fn decode_32(version: VersionByte, s: &str) -> Result<[u8; 32], StrKeyError> {
    let payload = decode(version, s)?;
    payload
        .as_slice()
        .try_into()
        .map_err(|_| StrKeyError::InvalidPayloadLength(payload.len()))
}

fn base32_error(s: &str, err: DecodeError) -> StrKeyError {
    match err.kind {
        DecodeKind::Symbol => StrKeyError::InvalidCharacter(s.as_bytes()[err.position] as char),
        DecodeKind::Trailing => StrKeyError::NonCanonical,
        DecodeKind::Length | DecodeKind::Padding => StrKeyError::InvalidLength(s.len()),
    }
}
