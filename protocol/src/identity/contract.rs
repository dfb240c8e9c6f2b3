//! Contract identities and the address type contracts see.

use std::fmt;
use std::str::FromStr;

use super::account::AccountId;
use super::strkey::{self, StrKeyError, VersionByte};
use crate::crypto::hash::Hash;
use crate::xdr::serde_support::serde_via_string;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

const SC_ADDRESS_TYPE_ACCOUNT: i32 = 0;
const SC_ADDRESS_TYPE_CONTRACT: i32 = 1;

/// A deployed contract, named by the hash of its id preimage (`C…`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractId(pub Hash);

impl ContractId {
    pub fn to_strkey(&self) -> String {
        strkey::encode(VersionByte::Contract, self.0.as_bytes())
    }
}

impl fmt::Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractId({})", self.to_strkey())
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl FromStr for ContractId {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        strkey::decode_32(VersionByte::Contract, s).map(|b| Self(Hash(b)))
    }
}

impl From<Hash> for ContractId {
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

serde_via_string!(ContractId);

impl XdrCodec for ContractId {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.0.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Hash::decode(r).map(Self)
    }
}

/// Who a contract is talking to: an account or another contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScAddress {
    Account(AccountId),
    Contract(ContractId),
}

impl fmt::Display for ScAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(a) => fmt::Display::fmt(a, f),
            Self::Contract(c) => fmt::Display::fmt(c, f),
        }
    }
}

impl FromStr for ScAddress {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(VersionByte::Contract.prefix()) {
            s.parse().map(Self::Contract)
        } else {
            s.parse().map(Self::Account)
        }
    }
}

impl From<AccountId> for ScAddress {
    fn from(account: AccountId) -> Self {
        Self::Account(account)
    }
}

impl From<ContractId> for ScAddress {
    fn from(contract: ContractId) -> Self {
        Self::Contract(contract)
    }
}

serde_via_string!(ScAddress);

impl XdrCodec for ScAddress {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::Account(account) => {
                w.write_discriminant(SC_ADDRESS_TYPE_ACCOUNT);
                account.encode(w)
            }
            Self::Contract(contract) => {
                w.write_discriminant(SC_ADDRESS_TYPE_CONTRACT);
                contract.encode(w)
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            SC_ADDRESS_TYPE_ACCOUNT => AccountId::decode(r).map(Self::Account),
            SC_ADDRESS_TYPE_CONTRACT => ContractId::decode(r).map(Self::Contract),
            v => Err(XdrError::unknown("ScAddressType", v)),
        }
    }
}
