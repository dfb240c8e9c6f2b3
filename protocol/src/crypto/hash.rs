//! # Hashing
//!
//! The ledger uses exactly one hash function: SHA-256. Network IDs, pool
//! IDs, contract IDs, TTL keys and authorization payloads are all the
//! SHA-256 of some canonical byte string (usually an XDR preimage).
//!
//! [`Hash`] is the 32-byte digest type that flows through the whole model.
//! Its text form is lowercase hex.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::xdr::{XdrCodec, XdrReader, XdrResult, XdrWriter};

/// A 32-byte SHA-256 digest (XDR `Hash` / `uint256`).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Hash(pub [u8; 32]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Self(out))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<Hash> for String {
    fn from(h: Hash) -> Self {
        h.to_hex()
    }
}

impl TryFrom<String> for Hash {
    type Error = hex::FromHexError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl XdrCodec for Hash {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_fixed_opaque(&self.0);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self(r.read_fixed_opaque::<32>()?))
    }
}

/// SHA-256 of `data`.
///
/// # Example
///
/// ```
/// use ledger_xdr::crypto::sha256;
///
/// let digest = sha256(b"");
/// assert_eq!(
///     digest.to_hex(),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Hash(hasher.finalize().into())
}
