//! # Authorization Entries
//!
//! A contract call that touches someone else's assets carries one
//! [`SorobanAuthorizationEntry`] per authorizing party: a credential plus
//! the tree of invocations that credential approves.
//!
//! ```text
//! SorobanAuthorizationEntry
//! ├── credentials: SourceAccount | Address { address, nonce, expiration, signature }
//! └── root_invocation
//!     ├── function: ContractFn | CreateContractHostFn | CreateContractV2HostFn
//!     └── sub_invocations: [SorobanAuthorizedInvocation, ...]
//! ```
//!
//! The tree has no depth cap of its own. Decoding nests through the reader's
//! depth guard, which is the only limit applied here.

use serde::{Deserialize, Serialize};

use super::host_function::{CreateContractArgs, CreateContractArgsV2, InvokeContractArgs};
use super::scval::{ScMapEntry, ScVal};
use crate::config::{Network, ENVELOPE_TYPE_SOROBAN_AUTHORIZATION, UNBOUNDED};
use crate::crypto::hash::{sha256, Hash};
use crate::crypto::keys::KeyPair;
use crate::identity::ScAddress;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

const AUTHORIZED_FUNCTION_CONTRACT_FN: i32 = 0;
const AUTHORIZED_FUNCTION_CREATE_CONTRACT_HOST_FN: i32 = 1;
const AUTHORIZED_FUNCTION_CREATE_CONTRACT_V2_HOST_FN: i32 = 2;

const CREDENTIALS_SOURCE_ACCOUNT: i32 = 0;
const CREDENTIALS_ADDRESS: i32 = 1;

/// The function an authorization approves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SorobanAuthorizedFunction {
    ContractFn(InvokeContractArgs),
    CreateContractHostFn(CreateContractArgs),
    CreateContractV2HostFn(CreateContractArgsV2),
}

impl XdrCodec for SorobanAuthorizedFunction {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::ContractFn(args) => {
                w.write_discriminant(AUTHORIZED_FUNCTION_CONTRACT_FN);
                args.encode(w)
            }
            Self::CreateContractHostFn(args) => {
                w.write_discriminant(AUTHORIZED_FUNCTION_CREATE_CONTRACT_HOST_FN);
                args.encode(w)
            }
            Self::CreateContractV2HostFn(args) => {
                w.write_discriminant(AUTHORIZED_FUNCTION_CREATE_CONTRACT_V2_HOST_FN);
                args.encode(w)
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            AUTHORIZED_FUNCTION_CONTRACT_FN => InvokeContractArgs::decode(r).map(Self::ContractFn),
            AUTHORIZED_FUNCTION_CREATE_CONTRACT_HOST_FN => {
                CreateContractArgs::decode(r).map(Self::CreateContractHostFn)
            }
            AUTHORIZED_FUNCTION_CREATE_CONTRACT_V2_HOST_FN => {
                CreateContractArgsV2::decode(r).map(Self::CreateContractV2HostFn)
            }
            v => Err(XdrError::unknown("SorobanAuthorizedFunctionType", v)),
        }
    }
}

/// One node of the authorized call tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SorobanAuthorizedInvocation {
    pub function: SorobanAuthorizedFunction,
    pub sub_invocations: Vec<SorobanAuthorizedInvocation>,
}

impl SorobanAuthorizedInvocation {
    pub fn new(function: SorobanAuthorizedFunction) -> Self {
        Self {
            function,
            sub_invocations: Vec::new(),
        }
    }

    pub fn with_sub_invocation(mut self, child: SorobanAuthorizedInvocation) -> Self {
        self.sub_invocations.push(child);
        self
    }

    /// Longest root-to-leaf path, counting the root as 1.
    pub fn depth(&self) -> usize {
        1 + self.sub_invocations.iter().map(Self::depth).max().unwrap_or(0)
    }
}

impl XdrCodec for SorobanAuthorizedInvocation {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.function.encode(w)?;
        w.write_array(&self.sub_invocations, UNBOUNDED, "sub_invocations")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.nested(|r| {
            Ok(Self {
                function: SorobanAuthorizedFunction::decode(r)?,
                sub_invocations: r.read_array(UNBOUNDED, "SorobanAuthorizedInvocation.subInvocations")?,
            })
        })
    }
}

/// An explicit credential: `address` signs for this tree until
/// `signature_expiration_ledger`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SorobanAddressCredentials {
    pub address: ScAddress,
    pub nonce: i64,
    pub signature_expiration_ledger: u32,
    pub signature: ScVal,
}

impl XdrCodec for SorobanAddressCredentials {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.address.encode(w)?;
        w.write_i64(self.nonce);
        w.write_u32(self.signature_expiration_ledger);
        self.signature.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            address: ScAddress::decode(r)?,
            nonce: r.read_i64()?,
            signature_expiration_ledger: r.read_u32()?,
            signature: ScVal::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SorobanCredentials {
    /// Authorized by the enclosing transaction's source signature.
    SourceAccount,
    Address(SorobanAddressCredentials),
}

impl XdrCodec for SorobanCredentials {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::SourceAccount => {
                w.write_discriminant(CREDENTIALS_SOURCE_ACCOUNT);
                Ok(())
            }
            Self::Address(credentials) => {
                w.write_discriminant(CREDENTIALS_ADDRESS);
                credentials.encode(w)
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            CREDENTIALS_SOURCE_ACCOUNT => Ok(Self::SourceAccount),
            CREDENTIALS_ADDRESS => SorobanAddressCredentials::decode(r).map(Self::Address),
            v => Err(XdrError::unknown("SorobanCredentialsType", v)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SorobanAuthorizationEntry {
    pub credentials: SorobanCredentials,
    pub root_invocation: SorobanAuthorizedInvocation,
}

impl SorobanAuthorizationEntry {
    /// The hash an address credential signs:
    ///
    /// `sha256(ENVELOPE_TYPE_SOROBAN_AUTHORIZATION || network_id || nonce || expiration || root_invocation)`
    ///
    /// Source-account credentials have nothing to sign and fail validation.
    pub fn signature_payload(&self, network: &Network) -> XdrResult<Hash> {
        let SorobanCredentials::Address(credentials) = &self.credentials else {
            return Err(XdrError::validation(
                "credentials",
                "source-account credentials carry no signature payload",
            ));
        };
        let mut w = XdrWriter::new();
        w.write_discriminant(ENVELOPE_TYPE_SOROBAN_AUTHORIZATION);
        network.network_id().encode(&mut w)?;
        w.write_i64(credentials.nonce);
        w.write_u32(credentials.signature_expiration_ledger);
        self.root_invocation.encode(&mut w)?;
        Ok(sha256(&w.into_bytes()))
    }

    /// Signs an address credential with an account key.
    ///
    /// Sets the expiration ledger, then stores the signature in the form the
    /// account contract expects: a vector holding one map with `public_key`
    /// and `signature` byte entries.
    pub fn sign(&mut self, key: &KeyPair, signature_expiration_ledger: u32, network: &Network) -> XdrResult<()> {
        match &mut self.credentials {
            SorobanCredentials::Address(credentials) => {
                credentials.signature_expiration_ledger = signature_expiration_ledger;
            }
            SorobanCredentials::SourceAccount => {
                return Err(XdrError::validation(
                    "credentials",
                    "source-account credentials cannot be signed",
                ))
            }
        }
        let payload = self.signature_payload(network)?;
        let signature = key.sign(payload.as_bytes());
        let entry = ScVal::map(vec![
            ScMapEntry {
                key: ScVal::symbol("public_key")?,
                val: ScVal::Bytes(key.account_id().as_bytes().to_vec()),
            },
            ScMapEntry {
                key: ScVal::symbol("signature")?,
                val: ScVal::Bytes(signature.to_vec()),
            },
        ]);
        if let SorobanCredentials::Address(credentials) = &mut self.credentials {
            credentials.signature = ScVal::vec(vec![entry]);
        }
        Ok(())
    }
}

impl XdrCodec for SorobanAuthorizationEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.credentials.encode(w)?;
        self.root_invocation.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            credentials: SorobanCredentials::decode(r)?,
            root_invocation: SorobanAuthorizedInvocation::decode(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::verify;
    use crate::identity::{AccountId, ContractId};

    fn contract() -> ScAddress {
        ScAddress::Contract(ContractId(Hash([7; 32])))
    }

    fn call(name: &str) -> SorobanAuthorizedInvocation {
        SorobanAuthorizedInvocation::new(SorobanAuthorizedFunction::ContractFn(
            InvokeContractArgs::new(contract(), name, vec![ScVal::I64(-5)]).unwrap(),
        ))
    }

    fn address_entry(address: ScAddress) -> SorobanAuthorizationEntry {
        SorobanAuthorizationEntry {
            credentials: SorobanCredentials::Address(SorobanAddressCredentials {
                address,
                nonce: 42,
                signature_expiration_ledger: 0,
                signature: ScVal::Void,
            }),
            root_invocation: call("swap").with_sub_invocation(call("transfer").with_sub_invocation(call("burn"))),
        }
    }

    #[test]
    fn nested_tree_round_trips() {
        let entry = address_entry(contract());
        assert_eq!(entry.root_invocation.depth(), 3);
        let bytes = entry.to_xdr().unwrap();
        assert_eq!(SorobanAuthorizationEntry::from_xdr(&bytes).unwrap(), entry);

        let source = SorobanAuthorizationEntry {
            credentials: SorobanCredentials::SourceAccount,
            root_invocation: call("mint"),
        };
        let b64 = source.to_xdr_base64().unwrap();
        assert_eq!(SorobanAuthorizationEntry::from_xdr_base64(&b64).unwrap(), source);
    }

    /// Deep trees recurse once per level.
    fn on_big_stack(f: impl FnOnce() + Send + 'static) {
        std::thread::Builder::new()
            .stack_size(64 << 20)
            .spawn(f)
            .unwrap()
            .join()
            .unwrap();
    }

    #[test]
    fn deep_tree_below_guard_decodes() {
        on_big_stack(|| {
            let mut node = call("leaf");
            for _ in 0..200 {
                node = call("step").with_sub_invocation(node);
            }
            let bytes = node.to_xdr().unwrap();
            assert_eq!(SorobanAuthorizedInvocation::from_xdr(&bytes).unwrap().depth(), 201);
        });
    }

    #[test]
    fn tree_past_depth_guard_is_rejected() {
        on_big_stack(|| {
            let mut node = call("leaf");
            for _ in 0..600 {
                node = call("step").with_sub_invocation(node);
            }
            let bytes = node.to_xdr().unwrap();
            assert!(matches!(
                SorobanAuthorizedInvocation::from_xdr(&bytes),
                Err(XdrError::DepthLimitExceeded(_))
            ));
        });
    }

    #[test]
    fn unknown_credentials_type() {
        assert_eq!(
            SorobanCredentials::from_xdr(&[0, 0, 0, 2]),
            Err(XdrError::unknown("SorobanCredentialsType", 2))
        );
    }

    #[test]
    fn payload_binds_network_and_expiration() {
        let mut entry = address_entry(contract());
        let testnet = entry.signature_payload(&Network::Testnet).unwrap();
        assert_ne!(testnet, entry.signature_payload(&Network::Public).unwrap());
        if let SorobanCredentials::Address(c) = &mut entry.credentials {
            c.signature_expiration_ledger = 1;
        }
        assert_ne!(testnet, entry.signature_payload(&Network::Testnet).unwrap());
    }

    #[test]
    fn source_account_has_no_payload() {
        let entry = SorobanAuthorizationEntry {
            credentials: SorobanCredentials::SourceAccount,
            root_invocation: call("mint"),
        };
        assert!(entry.signature_payload(&Network::Testnet).is_err());
    }

    #[test]
    fn signed_entry_verifies_against_payload() {
        let key = KeyPair::from_seed(&[5; 32]);
        let account: AccountId = key.account_id();
        let mut entry = address_entry(account.into());
        entry.sign(&key, 1_000, &Network::Testnet).unwrap();

        let payload = entry.signature_payload(&Network::Testnet).unwrap();
        let SorobanCredentials::Address(credentials) = &entry.credentials else {
            panic!("expected address credentials");
        };
        assert_eq!(credentials.signature_expiration_ledger, 1_000);
        let ScVal::Vec(Some(items)) = &credentials.signature else {
            panic!("expected signature vector");
        };
        let ScVal::Map(Some(fields)) = &items[0] else {
            panic!("expected signature map");
        };
        let ScVal::Bytes(sig) = &fields[1].val else {
            panic!("expected signature bytes");
        };
        let sig: [u8; 64] = sig.as_slice().try_into().unwrap();
        assert!(verify(&account, payload.as_bytes(), &sig).unwrap());
    }
}
