//! Contract operations. The keys they act on travel separately, in the
//! transaction's `SorobanTransactionData` footprint.

use serde::{Deserialize, Serialize};

use crate::config::UNBOUNDED;
use crate::soroban::auth::SorobanAuthorizationEntry;
use crate::soroban::host_function::HostFunction;
use crate::xdr::{ExtensionPoint, XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvokeHostFunctionOp {
    pub host_function: HostFunction,
    /// Authorizations for the call tree, one per authorizing party.
    pub auth: Vec<SorobanAuthorizationEntry>,
}

impl InvokeHostFunctionOp {
    pub fn new(host_function: HostFunction) -> Self {
        Self {
            host_function,
            auth: Vec::new(),
        }
    }

    pub fn with_auth(mut self, auth: Vec<SorobanAuthorizationEntry>) -> Self {
        self.auth = auth;
        self
    }
}

impl XdrCodec for InvokeHostFunctionOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.host_function.encode(w)?;
        w.write_array(&self.auth, UNBOUNDED, "auth")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            host_function: HostFunction::decode(r)?,
            auth: r.read_array(UNBOUNDED, "InvokeHostFunctionOp.auth")?,
        })
    }
}

/// Extends the TTL of every read-only footprint entry to at least
/// `extend_to` ledgers from now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtendFootprintTtlOp {
    pub ext: ExtensionPoint,
    pub extend_to: u32,
}

impl ExtendFootprintTtlOp {
    pub fn new(extend_to: u32) -> XdrResult<Self> {
        let op = Self {
            ext: ExtensionPoint,
            extend_to,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        if self.extend_to == 0 {
            return Err(XdrError::validation("extend_to", "must be at least one ledger"));
        }
        Ok(())
    }
}

impl XdrCodec for ExtendFootprintTtlOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.ext.encode(w)?;
        w.write_u32(self.extend_to);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: ExtensionPoint::decode(r)?,
            extend_to: r.read_u32()?,
        })
    }
}

/// Restores the archived entries of the read-write footprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestoreFootprintOp {
    pub ext: ExtensionPoint,
}

impl XdrCodec for RestoreFootprintOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.ext.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::Hash;
    use crate::identity::{ContractId, ScAddress};
    use crate::soroban::auth::{SorobanAuthorizedFunction, SorobanAuthorizedInvocation, SorobanCredentials};
    use crate::soroban::host_function::InvokeContractArgs;
    use crate::soroban::scval::ScVal;

    #[test]
    fn invoke_with_auth_round_trips() {
        let args = InvokeContractArgs::new(
            ScAddress::Contract(ContractId(Hash([1; 32]))),
            "increment",
            vec![ScVal::U32(3)],
        )
        .unwrap();
        let op = InvokeHostFunctionOp::new(HostFunction::InvokeContract(args.clone())).with_auth(vec![
            SorobanAuthorizationEntry {
                credentials: SorobanCredentials::SourceAccount,
                root_invocation: SorobanAuthorizedInvocation::new(SorobanAuthorizedFunction::ContractFn(args)),
            },
        ]);
        assert_eq!(InvokeHostFunctionOp::from_xdr(&op.to_xdr().unwrap()).unwrap(), op);
    }

    #[test]
    fn extend_ttl_requires_a_ledger() {
        assert!(ExtendFootprintTtlOp::new(0).is_err());
        let op = ExtendFootprintTtlOp::new(535_679).unwrap();
        assert_eq!(op.to_xdr().unwrap(), vec![0, 0, 0, 0, 0, 0x08, 0x2c, 0x7f]);
    }

    #[test]
    fn restore_is_just_an_extension_point() {
        assert_eq!(RestoreFootprintOp::default().to_xdr().unwrap(), vec![0; 4]);
    }
}
