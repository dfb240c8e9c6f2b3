//! # Key Management
//!
//! Ed25519 keypairs for ledger accounts.
//!
//! The codec itself never signs anything. This module exists so callers
//! (and our own tests) can produce account ids, secret seeds and detached
//! signatures over the hashes the model derives, such as an authorization
//! entry's signature payload.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (ed25519-dalek does this for us).
//! - Generation uses `OsRng`. Nothing here accepts a seeded generator.
//! - Secret material never shows up in `Debug` output.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::identity::strkey::{self, StrKeyError, VersionByte};
use crate::identity::AccountId;

/// Errors that can occur during key operations.
///
/// Deliberately vague about why a secret failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid secret seed")]
    InvalidSecretSeed(#[from] StrKeyError),

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// An account keypair.
///
/// # Examples
///
/// ```
/// use ledger_xdr::crypto::KeyPair;
///
/// let kp = KeyPair::generate();
/// let sig = kp.sign(b"payload");
/// assert!(kp.verify(b"payload", &sig));
/// assert!(kp.account_id().to_string().starts_with('G'));
/// ```
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parses an `S…` secret seed.
    pub fn from_secret_seed(secret: &str) -> Result<Self, KeyError> {
        let seed = strkey::decode_32(VersionByte::SecretSeed, secret)?;
        Ok(Self::from_seed(&seed))
    }

    /// The `S…` text form of the seed. Handle with care.
    pub fn secret_seed(&self) -> String {
        strkey::encode(VersionByte::SecretSeed, &self.signing_key.to_bytes())
    }

    pub fn account_id(&self) -> AccountId {
        AccountId::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Detached ed25519 signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        verify(&self.account_id(), message, signature).unwrap_or(false)
    }
}

/// Verifies `signature` against the public key behind `account`.
///
/// Returns `Err` only when the account bytes are not a curve point; a bad
/// signature is `Ok(false)`.
pub fn verify(account: &AccountId, message: &[u8], signature: &[u8; 64]) -> Result<bool, KeyError> {
    let key = VerifyingKey::from_bytes(account.as_bytes()).map_err(|_| KeyError::InvalidPublicKey)?;
    Ok(key.verify(message, &Signature::from_bytes(signature)).is_ok())
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Public half only.
        write!(f, "KeyPair({})", self.account_id())
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.account_id() == other.account_id()
    }
}

impl Eq for KeyPair {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let kp = KeyPair::generate();
        let sig = kp.sign(b"hello");
        assert!(kp.verify(b"hello", &sig));
        assert!(!kp.verify(b"hellO", &sig));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = KeyPair::from_seed(&[7u8; 32]);
        let b = KeyPair::from_seed(&[7u8; 32]);
        assert_eq!(a, b);
        assert_eq!(a.sign(b"x"), b.sign(b"x"));
    }

    #[test]
    fn test_secret_seed_round_trip() {
        let kp = KeyPair::generate();
        let secret = kp.secret_seed();
        assert!(secret.starts_with('S'));
        let restored = KeyPair::from_secret_seed(&secret).unwrap();
        assert_eq!(restored.account_id(), kp.account_id());
    }

    #[test]
    fn test_account_id_is_not_a_secret_seed() {
        let kp = KeyPair::generate();
        let result = KeyPair::from_secret_seed(&kp.account_id().to_string());
        assert!(matches!(result, Err(KeyError::InvalidSecretSeed(_))));
    }

    #[test]
    fn test_debug_hides_secret() {
        let kp = KeyPair::generate();
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(&kp.secret_seed()));
        assert!(debug.contains(&kp.account_id().to_string()));
    }

    #[test]
    fn test_verify_with_other_account_fails() {
        let signer = KeyPair::generate();
        let other = KeyPair::generate();
        let sig = signer.sign(b"msg");
        assert_eq!(verify(&other.account_id(), b"msg", &sig), Ok(false));
    }
}
