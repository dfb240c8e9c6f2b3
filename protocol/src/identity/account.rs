//! Account identities: plain ed25519 accounts and their muxed form.
//!
//! An [`AccountId`] is an ed25519 public key (`G…`). A [`MuxedAccount`] is
//! either a plain account or an account plus a 64-bit sub-account id
//! (`M…`), used wherever an operation names a source or destination.

use std::fmt;
use std::str::FromStr;

use super::strkey::{self, StrKeyError, VersionByte};
use crate::xdr::serde_support::serde_via_string;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

/// `PUBLIC_KEY_TYPE_ED25519`
const PUBLIC_KEY_TYPE_ED25519: i32 = 0;
/// `KEY_TYPE_ED25519`
const KEY_TYPE_ED25519: i32 = 0;
/// `KEY_TYPE_MUXED_ED25519`
const KEY_TYPE_MUXED_ED25519: i32 = 0x100;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// An account on the ledger, identified by its ed25519 public key.
///
/// # Examples
///
/// ```
/// use ledger_xdr::identity::AccountId;
///
/// let id: AccountId = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ"
///     .parse()
///     .unwrap();
/// assert_eq!(id.to_string().len(), 56);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId([u8; 32]);

impl AccountId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw ed25519 public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `G…` address.
    pub fn to_strkey(&self) -> String {
        strkey::encode(VersionByte::AccountId, &self.0)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_strkey())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl FromStr for AccountId {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        strkey::decode_32(VersionByte::AccountId, s).map(Self)
    }
}

serde_via_string!(AccountId);

impl XdrCodec for AccountId {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_discriminant(PUBLIC_KEY_TYPE_ED25519);
        w.write_fixed_opaque(&self.0);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            PUBLIC_KEY_TYPE_ED25519 => Ok(Self(r.read_fixed_opaque::<32>()?)),
            v => Err(XdrError::unknown("PublicKeyType", v)),
        }
    }
}

// ---------------------------------------------------------------------------
// MuxedAccount
// ---------------------------------------------------------------------------

/// A plain account or a multiplexed sub-account of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MuxedAccount {
    Ed25519(AccountId),
    MuxedEd25519 { id: u64, account: AccountId },
}

impl MuxedAccount {
    /// The underlying ledger account, ignoring any mux id.
    pub fn account_id(&self) -> AccountId {
        match self {
            Self::Ed25519(account) | Self::MuxedEd25519 { account, .. } => *account,
        }
    }

    /// The mux id, if this is a muxed address.
    pub fn mux_id(&self) -> Option<u64> {
        match self {
            Self::Ed25519(_) => None,
            Self::MuxedEd25519 { id, .. } => Some(*id),
        }
    }

    /// `G…` for plain accounts, `M…` for muxed ones.
    pub fn to_strkey(&self) -> String {
        match self {
            Self::Ed25519(account) => account.to_strkey(),
            Self::MuxedEd25519 { id, account } => {
                let mut payload = [0u8; 40];
                payload[..32].copy_from_slice(account.as_bytes());
                payload[32..].copy_from_slice(&id.to_be_bytes());
                strkey::encode(VersionByte::MuxedAccount, &payload)
            }
        }
    }
}

impl From<AccountId> for MuxedAccount {
    fn from(account: AccountId) -> Self {
        Self::Ed25519(account)
    }
}

impl fmt::Display for MuxedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl FromStr for MuxedAccount {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(VersionByte::MuxedAccount.prefix()) {
            let payload = strkey::decode(VersionByte::MuxedAccount, s)?;
            if payload.len() != 40 {
                return Err(StrKeyError::InvalidPayloadLength(payload.len()));
            }
            let mut key = [0u8; 32];
            key.copy_from_slice(&payload[..32]);
            let mut id = [0u8; 8];
            id.copy_from_slice(&payload[32..]);
            Ok(Self::MuxedEd25519 {
                id: u64::from_be_bytes(id),
                account: AccountId(key),
            })
        } else {
            s.parse().map(Self::Ed25519)
        }
    }
}

serde_via_string!(MuxedAccount);

impl XdrCodec for MuxedAccount {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::Ed25519(account) => {
                w.write_discriminant(KEY_TYPE_ED25519);
                w.write_fixed_opaque(account.as_bytes());
            }
            Self::MuxedEd25519 { id, account } => {
                w.write_discriminant(KEY_TYPE_MUXED_ED25519);
                w.write_u64(*id);
                w.write_fixed_opaque(account.as_bytes());
            }
        }
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            KEY_TYPE_ED25519 => Ok(Self::Ed25519(AccountId(r.read_fixed_opaque::<32>()?))),
            KEY_TYPE_MUXED_ED25519 => {
                let id = r.read_u64()?;
                let account = AccountId(r.read_fixed_opaque::<32>()?);
                Ok(Self::MuxedEd25519 { id, account })
            }
            v => Err(XdrError::unknown("CryptoKeyType", v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";

    #[test]
    fn account_id_xdr_layout() {
        let id: AccountId = G.parse().unwrap();
        let bytes = id.to_xdr().unwrap();
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(AccountId::from_xdr(&bytes).unwrap(), id);
    }

    #[test]
    fn account_id_unknown_key_type() {
        let mut bytes = vec![0, 0, 0, 1];
        bytes.extend_from_slice(&[0u8; 32]);
        assert_eq!(
            AccountId::from_xdr(&bytes),
            Err(XdrError::unknown("PublicKeyType", 1))
        );
    }

    #[test]
    fn muxed_strkey_round_trip() {
        let account: AccountId = G.parse().unwrap();
        let muxed = MuxedAccount::MuxedEd25519 { id: 420, account };
        let text = muxed.to_string();
        assert!(text.starts_with('M'));
        assert_eq!(text.len(), 69);
        let parsed: MuxedAccount = text.parse().unwrap();
        assert_eq!(parsed, muxed);
        assert_eq!(parsed.account_id(), account);
        assert_eq!(parsed.mux_id(), Some(420));
    }

    #[test]
    fn plain_address_parses_as_ed25519() {
        let parsed: MuxedAccount = G.parse().unwrap();
        assert!(matches!(parsed, MuxedAccount::Ed25519(_)));
        assert_eq!(parsed.mux_id(), None);
    }

    #[test]
    fn muxed_xdr_round_trip() {
        let account: AccountId = G.parse().unwrap();
        for muxed in [
            MuxedAccount::Ed25519(account),
            MuxedAccount::MuxedEd25519 { id: u64::MAX, account },
        ] {
            let bytes = muxed.to_xdr().unwrap();
            assert_eq!(MuxedAccount::from_xdr(&bytes).unwrap(), muxed);
        }
    }

    #[test]
    fn serde_uses_address_text() {
        let id: AccountId = G.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", G));
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
