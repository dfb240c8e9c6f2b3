//! Signer keys and weighted signers attached to accounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::account::AccountId;
use super::strkey::{self, StrKeyError, VersionByte};
use crate::config::{MAX_SIGNED_PAYLOAD_LENGTH, MAX_SIGNER_WEIGHT};
use crate::crypto::hash::Hash;
use crate::xdr::serde_support::serde_via_string;
use crate::xdr::writer::padding_for;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

const SIGNER_KEY_TYPE_ED25519: i32 = 0;
const SIGNER_KEY_TYPE_PRE_AUTH_TX: i32 = 1;
const SIGNER_KEY_TYPE_HASH_X: i32 = 2;
const SIGNER_KEY_TYPE_ED25519_SIGNED_PAYLOAD: i32 = 3;

// ---------------------------------------------------------------------------
// SignerKey
// ---------------------------------------------------------------------------

/// Something that can authorize on behalf of an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignerKey {
    /// An ed25519 key (`G…`).
    Ed25519(AccountId),
    /// Hash of a pre-authorized transaction (`T…`).
    PreAuthTx(Hash),
    /// Hash whose preimage must be revealed (`X…`).
    HashX(Hash),
    /// An ed25519 key that signs a specific payload (`P…`).
    Ed25519SignedPayload { ed25519: AccountId, payload: Vec<u8> },
}

impl SignerKey {
    /// Builds a signed-payload signer, enforcing the 64-byte payload bound.
    pub fn signed_payload(ed25519: AccountId, payload: Vec<u8>) -> XdrResult<Self> {
        let key = Self::Ed25519SignedPayload { ed25519, payload };
        key.validate()?;
        Ok(key)
    }

    pub fn validate(&self) -> XdrResult<()> {
        if let Self::Ed25519SignedPayload { payload, .. } = self {
            if payload.len() > MAX_SIGNED_PAYLOAD_LENGTH as usize {
                return Err(XdrError::validation(
                    "signed_payload",
                    format!(
                        "{} bytes exceeds maximum of {}",
                        payload.len(),
                        MAX_SIGNED_PAYLOAD_LENGTH
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn to_strkey(&self) -> String {
        match self {
            Self::Ed25519(account) => account.to_strkey(),
            Self::PreAuthTx(hash) => strkey::encode(VersionByte::PreAuthTx, hash.as_bytes()),
            Self::HashX(hash) => strkey::encode(VersionByte::Sha256Hash, hash.as_bytes()),
            Self::Ed25519SignedPayload { ed25519, payload } => {
                let mut raw = Vec::with_capacity(36 + payload.len() + 3);
                raw.extend_from_slice(ed25519.as_bytes());
                raw.extend_from_slice(&(payload.len() as u32).to_be_bytes());
                raw.extend_from_slice(payload);
                raw.resize(raw.len() + padding_for(payload.len()), 0);
                strkey::encode(VersionByte::SignedPayload, &raw)
            }
        }
    }
}

impl fmt::Display for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl FromStr for SignerKey {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().next() {
            Some('T') => strkey::decode_32(VersionByte::PreAuthTx, s).map(|b| Self::PreAuthTx(Hash(b))),
            Some('X') => strkey::decode_32(VersionByte::Sha256Hash, s).map(|b| Self::HashX(Hash(b))),
            Some('P') => {
                let raw = strkey::decode(VersionByte::SignedPayload, s)?;
                if raw.len() < 36 {
                    return Err(StrKeyError::InvalidPayloadLength(raw.len()));
                }
                let len = u32::from_be_bytes([raw[32], raw[33], raw[34], raw[35]]) as usize;
                if len > MAX_SIGNED_PAYLOAD_LENGTH as usize || raw.len() != 36 + len + padding_for(len) {
                    return Err(StrKeyError::InvalidPayloadLength(raw.len()));
                }
                let mut key = [0u8; 32];
                key.copy_from_slice(&raw[..32]);
                Ok(Self::Ed25519SignedPayload {
                    ed25519: AccountId::from_bytes(key),
                    payload: raw[36..36 + len].to_vec(),
                })
            }
            _ => s.parse().map(Self::Ed25519),
        }
    }
}

serde_via_string!(SignerKey);

impl XdrCodec for SignerKey {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::Ed25519(account) => {
                w.write_discriminant(SIGNER_KEY_TYPE_ED25519);
                w.write_fixed_opaque(account.as_bytes());
            }
            Self::PreAuthTx(hash) => {
                w.write_discriminant(SIGNER_KEY_TYPE_PRE_AUTH_TX);
                hash.encode(w)?;
            }
            Self::HashX(hash) => {
                w.write_discriminant(SIGNER_KEY_TYPE_HASH_X);
                hash.encode(w)?;
            }
            Self::Ed25519SignedPayload { ed25519, payload } => {
                w.write_discriminant(SIGNER_KEY_TYPE_ED25519_SIGNED_PAYLOAD);
                w.write_fixed_opaque(ed25519.as_bytes());
                w.write_var_opaque(payload, MAX_SIGNED_PAYLOAD_LENGTH, "signed_payload")?;
            }
        }
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            SIGNER_KEY_TYPE_ED25519 => Ok(Self::Ed25519(AccountId::from_bytes(r.read_fixed_opaque()?))),
            SIGNER_KEY_TYPE_PRE_AUTH_TX => Ok(Self::PreAuthTx(Hash::decode(r)?)),
            SIGNER_KEY_TYPE_HASH_X => Ok(Self::HashX(Hash::decode(r)?)),
            SIGNER_KEY_TYPE_ED25519_SIGNED_PAYLOAD => {
                let ed25519 = AccountId::from_bytes(r.read_fixed_opaque()?);
                let payload = r.read_var_opaque(MAX_SIGNED_PAYLOAD_LENGTH, "signed_payload")?;
                Ok(Self::Ed25519SignedPayload { ed25519, payload })
            }
            v => Err(XdrError::unknown("SignerKeyType", v)),
        }
    }
}

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// A signer key with its voting weight (0–255; 0 removes the signer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signer {
    pub key: SignerKey,
    pub weight: u32,
}

impl Signer {
    pub fn new(key: SignerKey, weight: u32) -> XdrResult<Self> {
        let signer = Self { key, weight };
        signer.validate()?;
        Ok(signer)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.key.validate()?;
        check_weight("signer_weight", self.weight)
    }
}

/// Weights and thresholds are single bytes on the ledger.
pub(crate) fn check_weight(field: &'static str, weight: u32) -> XdrResult<()> {
    if weight > MAX_SIGNER_WEIGHT {
        return Err(XdrError::validation(
            field,
            format!("{} is outside 0..={}", weight, MAX_SIGNER_WEIGHT),
        ));
    }
    Ok(())
}

impl XdrCodec for Signer {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.key.encode(w)?;
        w.write_u32(self.weight);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            key: SignerKey::decode(r)?,
            weight: r.read_u32()?,
        })
    }
}
