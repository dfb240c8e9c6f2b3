//! # Host Functions
//!
//! What an `InvokeHostFunction` operation asks the contract host to do, and
//! how new contract IDs are derived.
//!
//! A contract ID is never chosen directly. It is the sha256 of a preimage
//! that binds the network to either a deployer address plus a 32-byte salt,
//! or to a classic asset (for the built-in asset contract):
//!
//! ```text
//! contract_id = sha256( ENVELOPE_TYPE_CONTRACT_ID || network_id || ContractIdPreimage )
//! ```

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::scval::{read_symbol, write_symbol, ContractExecutable, ScVal};
use crate::config::{Network, ENVELOPE_TYPE_CONTRACT_ID, UNBOUNDED};
use crate::crypto::hash::{sha256, Hash};
use crate::identity::{ContractId, ScAddress};
use crate::ledger::asset::Asset;
use crate::xdr::serde_support::{hex_array, hex_bytes};
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

const HOST_FUNCTION_INVOKE_CONTRACT: i32 = 0;
const HOST_FUNCTION_CREATE_CONTRACT: i32 = 1;
const HOST_FUNCTION_UPLOAD_CONTRACT_WASM: i32 = 2;
const HOST_FUNCTION_CREATE_CONTRACT_V2: i32 = 3;

const CONTRACT_ID_PREIMAGE_FROM_ADDRESS: i32 = 0;
const CONTRACT_ID_PREIMAGE_FROM_ASSET: i32 = 1;

// ---------------------------------------------------------------------------
// Contract ID preimages
// ---------------------------------------------------------------------------

/// A deployer address and the salt that makes its contract IDs distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractIdAddressPreimage {
    pub address: ScAddress,
    #[serde(with = "hex_array")]
    pub salt: [u8; 32],
}

impl ContractIdAddressPreimage {
    /// Uses the given salt. Deterministic; the same inputs give the same ID.
    pub fn new(address: ScAddress, salt: [u8; 32]) -> Self {
        Self { address, salt }
    }

    /// Draws the salt from the operating system's CSPRNG.
    pub fn random(address: ScAddress) -> Self {
        Self::with_rng(address, &mut OsRng)
    }

    /// Draws the salt from a caller-supplied cryptographic RNG.
    pub fn with_rng<R: RngCore + CryptoRng>(address: ScAddress, rng: &mut R) -> Self {
        let mut salt = [0u8; 32];
        rng.fill_bytes(&mut salt);
        Self { address, salt }
    }
}

impl XdrCodec for ContractIdAddressPreimage {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.address.encode(w)?;
        w.write_fixed_opaque(&self.salt);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            address: ScAddress::decode(r)?,
            salt: r.read_fixed_opaque::<32>()?,
        })
    }
}

/// The input a contract ID is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractIdPreimage {
    FromAddress(ContractIdAddressPreimage),
    FromAsset(Asset),
}

impl ContractIdPreimage {
    pub fn from_address(address: ScAddress, salt: [u8; 32]) -> Self {
        Self::FromAddress(ContractIdAddressPreimage::new(address, salt))
    }

    pub fn from_asset(asset: Asset) -> XdrResult<Self> {
        asset.validate()?;
        Ok(Self::FromAsset(asset))
    }

    /// The ID of the contract this preimage deploys on `network`.
    pub fn contract_id(&self, network: &Network) -> XdrResult<ContractId> {
        let mut w = XdrWriter::new();
        w.write_discriminant(ENVELOPE_TYPE_CONTRACT_ID);
        network.network_id().encode(&mut w)?;
        self.encode(&mut w)?;
        Ok(ContractId(sha256(&w.into_bytes())))
    }
}

impl XdrCodec for ContractIdPreimage {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::FromAddress(preimage) => {
                w.write_discriminant(CONTRACT_ID_PREIMAGE_FROM_ADDRESS);
                preimage.encode(w)
            }
            Self::FromAsset(asset) => {
                w.write_discriminant(CONTRACT_ID_PREIMAGE_FROM_ASSET);
                asset.encode(w)
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            CONTRACT_ID_PREIMAGE_FROM_ADDRESS => ContractIdAddressPreimage::decode(r).map(Self::FromAddress),
            CONTRACT_ID_PREIMAGE_FROM_ASSET => Asset::decode(r).map(Self::FromAsset),
            v => Err(XdrError::unknown("ContractIdPreimageType", v)),
        }
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// A call to one function of a deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvokeContractArgs {
    pub contract_address: ScAddress,
    pub function_name: String,
    pub args: Vec<ScVal>,
}

impl InvokeContractArgs {
    pub fn new(contract_address: ScAddress, function_name: impl Into<String>, args: Vec<ScVal>) -> XdrResult<Self> {
        let function_name = function_name.into();
        super::scval::validate_symbol(&function_name)?;
        Ok(Self {
            contract_address,
            function_name,
            args,
        })
    }
}

impl XdrCodec for InvokeContractArgs {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.contract_address.encode(w)?;
        write_symbol(w, &self.function_name)?;
        w.write_array(&self.args, UNBOUNDED, "args")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            contract_address: ScAddress::decode(r)?,
            function_name: read_symbol(r)?,
            args: r.read_array(UNBOUNDED, "InvokeContractArgs.args")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreateContractArgs {
    pub contract_id_preimage: ContractIdPreimage,
    pub executable: ContractExecutable,
}

impl XdrCodec for CreateContractArgs {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.contract_id_preimage.encode(w)?;
        self.executable.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            contract_id_preimage: ContractIdPreimage::decode(r)?,
            executable: ContractExecutable::decode(r)?,
        })
    }
}

/// Like [`CreateContractArgs`], with arguments for the contract's constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreateContractArgsV2 {
    pub contract_id_preimage: ContractIdPreimage,
    pub executable: ContractExecutable,
    pub constructor_args: Vec<ScVal>,
}

impl XdrCodec for CreateContractArgsV2 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.contract_id_preimage.encode(w)?;
        self.executable.encode(w)?;
        w.write_array(&self.constructor_args, UNBOUNDED, "constructor_args")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            contract_id_preimage: ContractIdPreimage::decode(r)?,
            executable: ContractExecutable::decode(r)?,
            constructor_args: r.read_array(UNBOUNDED, "CreateContractArgsV2.constructorArgs")?,
        })
    }
}

// ---------------------------------------------------------------------------
// HostFunction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostFunction {
    InvokeContract(InvokeContractArgs),
    CreateContract(CreateContractArgs),
    UploadContractWasm(#[serde(with = "hex_bytes")] Vec<u8>),
    CreateContractV2(CreateContractArgsV2),
}

impl HostFunction {
    /// For upload: the hash the wasm will be stored under.
    pub fn wasm_hash(&self) -> Option<Hash> {
        match self {
            Self::UploadContractWasm(code) => Some(sha256(code)),
            _ => None,
        }
    }
}

impl XdrCodec for HostFunction {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::InvokeContract(args) => {
                w.write_discriminant(HOST_FUNCTION_INVOKE_CONTRACT);
                args.encode(w)
            }
            Self::CreateContract(args) => {
                w.write_discriminant(HOST_FUNCTION_CREATE_CONTRACT);
                args.encode(w)
            }
            Self::UploadContractWasm(code) => {
                w.write_discriminant(HOST_FUNCTION_UPLOAD_CONTRACT_WASM);
                w.write_var_opaque(code, UNBOUNDED, "wasm")
            }
            Self::CreateContractV2(args) => {
                w.write_discriminant(HOST_FUNCTION_CREATE_CONTRACT_V2);
                args.encode(w)
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            HOST_FUNCTION_INVOKE_CONTRACT => InvokeContractArgs::decode(r).map(Self::InvokeContract),
            HOST_FUNCTION_CREATE_CONTRACT => CreateContractArgs::decode(r).map(Self::CreateContract),
            HOST_FUNCTION_UPLOAD_CONTRACT_WASM => r
                .read_var_opaque(UNBOUNDED, "HostFunction.wasm")
                .map(Self::UploadContractWasm),
            HOST_FUNCTION_CREATE_CONTRACT_V2 => CreateContractArgsV2::decode(r).map(Self::CreateContractV2),
            v => Err(XdrError::unknown("HostFunctionType", v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AccountId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn account() -> AccountId {
        "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ"
            .parse()
            .unwrap()
    }

    #[test]
    fn random_salts_differ() {
        let a = ContractIdAddressPreimage::random(account().into());
        let b = ContractIdAddressPreimage::random(account().into());
        assert_ne!(a.salt, b.salt);
    }

    #[test]
    fn seeded_rng_gives_reproducible_salt() {
        let a = ContractIdAddressPreimage::with_rng(account().into(), &mut StdRng::seed_from_u64(7));
        let b = ContractIdAddressPreimage::with_rng(account().into(), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn contract_id_depends_on_network_and_salt() {
        let p1 = ContractIdPreimage::from_address(account().into(), [1; 32]);
        let p2 = ContractIdPreimage::from_address(account().into(), [2; 32]);
        let id = p1.contract_id(&Network::Testnet).unwrap();
        assert_eq!(id, p1.contract_id(&Network::Testnet).unwrap());
        assert_ne!(id, p1.contract_id(&Network::Public).unwrap());
        assert_ne!(id, p2.contract_id(&Network::Testnet).unwrap());
    }

    #[test]
    fn contract_id_hashes_the_documented_preimage() {
        let preimage = ContractIdPreimage::from_asset(Asset::Native).unwrap();
        let network = Network::Testnet;
        let mut expected = vec![0, 0, 0, 8];
        expected.extend_from_slice(network.network_id().as_bytes());
        expected.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(preimage.contract_id(&network).unwrap(), ContractId(sha256(&expected)));
    }

    #[test]
    fn host_functions_round_trip() {
        let contract = ScAddress::Contract(ContractId(Hash([9; 32])));
        let preimage = ContractIdPreimage::from_address(account().into(), [3; 32]);
        let functions = vec![
            HostFunction::InvokeContract(
                InvokeContractArgs::new(contract, "transfer", vec![ScVal::U32(1), ScVal::Address(contract)]).unwrap(),
            ),
            HostFunction::CreateContract(CreateContractArgs {
                contract_id_preimage: preimage.clone(),
                executable: ContractExecutable::Wasm(Hash([4; 32])),
            }),
            HostFunction::UploadContractWasm(vec![0, 0x61, 0x73, 0x6d, 1]),
            HostFunction::CreateContractV2(CreateContractArgsV2 {
                contract_id_preimage: ContractIdPreimage::FromAsset(Asset::Native),
                executable: ContractExecutable::StellarAsset,
                constructor_args: vec![ScVal::Void],
            }),
        ];
        for f in functions {
            assert_eq!(HostFunction::from_xdr(&f.to_xdr().unwrap()).unwrap(), f);
            let json = serde_json::to_string(&f).unwrap();
            assert_eq!(serde_json::from_str::<HostFunction>(&json).unwrap(), f);
        }
    }

    #[test]
    fn invalid_function_name_is_rejected() {
        let contract = ScAddress::Contract(ContractId(Hash([9; 32])));
        assert!(InvokeContractArgs::new(contract, "not-a-symbol", vec![]).is_err());
    }

    #[test]
    fn wasm_hash_is_sha256_of_code() {
        let f = HostFunction::UploadContractWasm(b"wasm".to_vec());
        assert_eq!(f.wasm_hash(), Some(sha256(b"wasm")));
    }
}
