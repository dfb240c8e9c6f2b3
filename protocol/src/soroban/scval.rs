//! # Contract Values
//!
//! [`ScVal`] is the one value type smart contracts exchange with the host:
//! invocation arguments, storage keys and values, auth nonces. It is a
//! 22-arm union, recursive through vectors, maps and contract instances.
//!
//! Vectors and maps are *optional* on the wire (`SCVec*`, `SCMap*`), so a
//! present-but-empty vector and an absent one are different values. We keep
//! that distinction with `Option<Vec<_>>`.

use serde::{Deserialize, Serialize};

use crate::config::{MAX_SYMBOL_LENGTH, UNBOUNDED};
use crate::crypto::hash::Hash;
use crate::identity::ScAddress;
use crate::xdr::serde_support::hex_bytes;
use crate::xdr::{xdr_enum, XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

const SCV_BOOL: i32 = 0;
const SCV_VOID: i32 = 1;
const SCV_ERROR: i32 = 2;
const SCV_U32: i32 = 3;
const SCV_I32: i32 = 4;
const SCV_U64: i32 = 5;
const SCV_I64: i32 = 6;
const SCV_TIMEPOINT: i32 = 7;
const SCV_DURATION: i32 = 8;
const SCV_U128: i32 = 9;
const SCV_I128: i32 = 10;
const SCV_U256: i32 = 11;
const SCV_I256: i32 = 12;
const SCV_BYTES: i32 = 13;
const SCV_STRING: i32 = 14;
const SCV_SYMBOL: i32 = 15;
const SCV_VEC: i32 = 16;
const SCV_MAP: i32 = 17;
const SCV_ADDRESS: i32 = 18;
const SCV_CONTRACT_INSTANCE: i32 = 19;
const SCV_LEDGER_KEY_CONTRACT_INSTANCE: i32 = 20;
const SCV_LEDGER_KEY_NONCE: i32 = 21;

const CONTRACT_EXECUTABLE_WASM: i32 = 0;
const CONTRACT_EXECUTABLE_STELLAR_ASSET: i32 = 1;

// ---------------------------------------------------------------------------
// Symbols
// ---------------------------------------------------------------------------

/// Symbols are at most 32 characters from `[A-Za-z0-9_]`.
pub fn validate_symbol(symbol: &str) -> XdrResult<()> {
    if symbol.len() > MAX_SYMBOL_LENGTH as usize {
        return Err(XdrError::validation(
            "symbol",
            format!("'{}' is longer than {} characters", symbol, MAX_SYMBOL_LENGTH),
        ));
    }
    if let Some(c) = symbol.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(XdrError::validation(
            "symbol",
            format!("'{}' contains invalid character {:?}", symbol, c),
        ));
    }
    Ok(())
}

pub(crate) fn write_symbol(w: &mut XdrWriter, symbol: &str) -> XdrResult<()> {
    validate_symbol(symbol)?;
    w.write_string(symbol, MAX_SYMBOL_LENGTH, "symbol")
}

pub(crate) fn read_symbol(r: &mut XdrReader<'_>) -> XdrResult<String> {
    let symbol = r.read_string(MAX_SYMBOL_LENGTH, "ScSymbol")?;
    validate_symbol(&symbol).map_err(|e| XdrError::malformed("ScSymbol", e.to_string()))?;
    Ok(symbol)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

xdr_enum! {
    /// Which subsystem raised a contract error.
    pub enum ScErrorType {
        Contract = 0,
        WasmVm = 1,
        Context = 2,
        Storage = 3,
        Object = 4,
        Crypto = 5,
        Events = 6,
        Budget = 7,
        Value = 8,
        Auth = 9,
    }
}

xdr_enum! {
    /// Host error codes shared by every non-contract error type.
    pub enum ScErrorCode {
        ArithDomain = 0,
        IndexBounds = 1,
        InvalidInput = 2,
        MissingValue = 3,
        ExistingValue = 4,
        ExceededLimit = 5,
        InvalidAction = 6,
        InternalError = 7,
        UnexpectedType = 8,
        UnexpectedSize = 9,
    }
}

/// An error value: either a contract-defined code or a host error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScError {
    Contract(u32),
    Host(ScErrorType, ScErrorCode),
}

impl XdrCodec for ScError {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::Contract(code) => {
                ScErrorType::Contract.encode(w)?;
                w.write_u32(*code);
            }
            Self::Host(ScErrorType::Contract, _) => {
                return Err(XdrError::validation(
                    "sc_error",
                    "contract errors carry a numeric code, not a host code",
                ));
            }
            Self::Host(kind, code) => {
                kind.encode(w)?;
                code.encode(w)?;
            }
        }
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match ScErrorType::decode(r)? {
            ScErrorType::Contract => r.read_u32().map(Self::Contract),
            kind => Ok(Self::Host(kind, ScErrorCode::decode(r)?)),
        }
    }
}

// ---------------------------------------------------------------------------
// Wide integers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UInt128Parts {
    pub hi: u64,
    pub lo: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Int128Parts {
    pub hi: i64,
    pub lo: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UInt256Parts {
    pub hi_hi: u64,
    pub hi_lo: u64,
    pub lo_hi: u64,
    pub lo_lo: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Int256Parts {
    pub hi_hi: i64,
    pub hi_lo: u64,
    pub lo_hi: u64,
    pub lo_lo: u64,
}

impl From<u128> for UInt128Parts {
    fn from(v: u128) -> Self {
        Self {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

impl From<UInt128Parts> for u128 {
    fn from(p: UInt128Parts) -> Self {
        (u128::from(p.hi) << 64) | u128::from(p.lo)
    }
}

impl From<i128> for Int128Parts {
    fn from(v: i128) -> Self {
        Self {
            hi: (v >> 64) as i64,
            lo: v as u64,
        }
    }
}

impl From<Int128Parts> for i128 {
    fn from(p: Int128Parts) -> Self {
        (i128::from(p.hi) << 64) | i128::from(p.lo)
    }
}

impl XdrCodec for UInt128Parts {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_u64(self.hi);
        w.write_u64(self.lo);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            hi: r.read_u64()?,
            lo: r.read_u64()?,
        })
    }
}

impl XdrCodec for Int128Parts {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_i64(self.hi);
        w.write_u64(self.lo);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            hi: r.read_i64()?,
            lo: r.read_u64()?,
        })
    }
}

impl XdrCodec for UInt256Parts {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_u64(self.hi_hi);
        w.write_u64(self.hi_lo);
        w.write_u64(self.lo_hi);
        w.write_u64(self.lo_lo);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            hi_hi: r.read_u64()?,
            hi_lo: r.read_u64()?,
            lo_hi: r.read_u64()?,
            lo_lo: r.read_u64()?,
        })
    }
}

impl XdrCodec for Int256Parts {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_i64(self.hi_hi);
        w.write_u64(self.hi_lo);
        w.write_u64(self.lo_hi);
        w.write_u64(self.lo_lo);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            hi_hi: r.read_i64()?,
            hi_lo: r.read_u64()?,
            lo_hi: r.read_u64()?,
            lo_lo: r.read_u64()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Contract instances
// ---------------------------------------------------------------------------

/// The code behind a contract: uploaded wasm, or the built-in asset contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractExecutable {
    Wasm(Hash),
    StellarAsset,
}

impl XdrCodec for ContractExecutable {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::Wasm(hash) => {
                w.write_discriminant(CONTRACT_EXECUTABLE_WASM);
                hash.encode(w)
            }
            Self::StellarAsset => {
                w.write_discriminant(CONTRACT_EXECUTABLE_STELLAR_ASSET);
                Ok(())
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            CONTRACT_EXECUTABLE_WASM => Hash::decode(r).map(Self::Wasm),
            CONTRACT_EXECUTABLE_STELLAR_ASSET => Ok(Self::StellarAsset),
            v => Err(XdrError::unknown("ContractExecutableType", v)),
        }
    }
}

/// One key/value pair of a contract map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScMapEntry {
    pub key: ScVal,
    pub val: ScVal,
}

impl XdrCodec for ScMapEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.key.encode(w)?;
        self.val.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            key: ScVal::decode(r)?,
            val: ScVal::decode(r)?,
        })
    }
}

/// A contract instance: its executable plus instance storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScContractInstance {
    pub executable: ContractExecutable,
    pub storage: Option<Vec<ScMapEntry>>,
}

impl XdrCodec for ScContractInstance {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.executable.encode(w)?;
        write_optional_array(w, self.storage.as_deref(), "contract_instance_storage")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            executable: ContractExecutable::decode(r)?,
            storage: read_optional_array(r, "ScMap")?,
        })
    }
}

fn write_optional_array<T: XdrCodec>(
    w: &mut XdrWriter,
    items: Option<&[T]>,
    field: &'static str,
) -> XdrResult<()> {
    match items {
        Some(items) => {
            w.write_bool(true);
            w.write_array(items, UNBOUNDED, field)
        }
        None => {
            w.write_bool(false);
            Ok(())
        }
    }
}

fn read_optional_array<T: XdrCodec>(r: &mut XdrReader<'_>, kind: &'static str) -> XdrResult<Option<Vec<T>>> {
    if r.read_bool()? {
        r.read_array(UNBOUNDED, kind).map(Some)
    } else {
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// ScVal
// ---------------------------------------------------------------------------

/// A contract value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScVal {
    Bool(bool),
    Void,
    Error(ScError),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    /// Seconds since the Unix epoch.
    Timepoint(u64),
    /// Seconds.
    Duration(u64),
    U128(UInt128Parts),
    I128(Int128Parts),
    U256(UInt256Parts),
    I256(Int256Parts),
    Bytes(#[serde(with = "hex_bytes")] Vec<u8>),
    /// Usually UTF-8, but the ledger does not require it.
    String(#[serde(with = "hex_bytes")] Vec<u8>),
    Symbol(String),
    Vec(Option<Vec<ScVal>>),
    Map(Option<Vec<ScMapEntry>>),
    Address(ScAddress),
    ContractInstance(ScContractInstance),
    LedgerKeyContractInstance,
    LedgerKeyNonce(i64),
}

impl ScVal {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into().into_bytes())
    }

    /// The text of a `String` value, if it is valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        match self {
            Self::String(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// A symbol, validated.
    pub fn symbol(s: impl Into<String>) -> XdrResult<Self> {
        let s = s.into();
        validate_symbol(&s)?;
        Ok(Self::Symbol(s))
    }

    /// A present vector.
    pub fn vec(items: Vec<ScVal>) -> Self {
        Self::Vec(Some(items))
    }

    /// A present map.
    pub fn map(entries: Vec<ScMapEntry>) -> Self {
        Self::Map(Some(entries))
    }

    pub fn discriminant(&self) -> i32 {
        match self {
            Self::Bool(_) => SCV_BOOL,
            Self::Void => SCV_VOID,
            Self::Error(_) => SCV_ERROR,
            Self::U32(_) => SCV_U32,
            Self::I32(_) => SCV_I32,
            Self::U64(_) => SCV_U64,
            Self::I64(_) => SCV_I64,
            Self::Timepoint(_) => SCV_TIMEPOINT,
            Self::Duration(_) => SCV_DURATION,
            Self::U128(_) => SCV_U128,
            Self::I128(_) => SCV_I128,
            Self::U256(_) => SCV_U256,
            Self::I256(_) => SCV_I256,
            Self::Bytes(_) => SCV_BYTES,
            Self::String(_) => SCV_STRING,
            Self::Symbol(_) => SCV_SYMBOL,
            Self::Vec(_) => SCV_VEC,
            Self::Map(_) => SCV_MAP,
            Self::Address(_) => SCV_ADDRESS,
            Self::ContractInstance(_) => SCV_CONTRACT_INSTANCE,
            Self::LedgerKeyContractInstance => SCV_LEDGER_KEY_CONTRACT_INSTANCE,
            Self::LedgerKeyNonce(_) => SCV_LEDGER_KEY_NONCE,
        }
    }
}

impl From<bool> for ScVal {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u32> for ScVal {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<i32> for ScVal {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<u64> for ScVal {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<i64> for ScVal {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u128> for ScVal {
    fn from(v: u128) -> Self {
        Self::U128(v.into())
    }
}

impl From<i128> for ScVal {
    fn from(v: i128) -> Self {
        Self::I128(v.into())
    }
}

impl From<ScAddress> for ScVal {
    fn from(v: ScAddress) -> Self {
        Self::Address(v)
    }
}

impl XdrCodec for ScVal {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_discriminant(self.discriminant());
        match self {
            Self::Bool(v) => w.write_bool(*v),
            Self::Void | Self::LedgerKeyContractInstance => {}
            Self::Error(e) => e.encode(w)?,
            Self::U32(v) => w.write_u32(*v),
            Self::I32(v) => w.write_i32(*v),
            Self::U64(v) | Self::Timepoint(v) | Self::Duration(v) => w.write_u64(*v),
            Self::I64(v) | Self::LedgerKeyNonce(v) => w.write_i64(*v),
            Self::U128(v) => v.encode(w)?,
            Self::I128(v) => v.encode(w)?,
            Self::U256(v) => v.encode(w)?,
            Self::I256(v) => v.encode(w)?,
            Self::Bytes(b) => w.write_var_opaque(b, UNBOUNDED, "sc_bytes")?,
            Self::String(s) => w.write_var_opaque(s, UNBOUNDED, "sc_string")?,
            Self::Symbol(s) => write_symbol(w, s)?,
            Self::Vec(items) => write_optional_array(w, items.as_deref(), "sc_vec")?,
            Self::Map(entries) => write_optional_array(w, entries.as_deref(), "sc_map")?,
            Self::Address(a) => a.encode(w)?,
            Self::ContractInstance(i) => i.encode(w)?,
        }
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.nested(|r| {
            Ok(match r.read_discriminant()? {
                SCV_BOOL => Self::Bool(r.read_bool()?),
                SCV_VOID => Self::Void,
                SCV_ERROR => Self::Error(ScError::decode(r)?),
                SCV_U32 => Self::U32(r.read_u32()?),
                SCV_I32 => Self::I32(r.read_i32()?),
                SCV_U64 => Self::U64(r.read_u64()?),
                SCV_I64 => Self::I64(r.read_i64()?),
                SCV_TIMEPOINT => Self::Timepoint(r.read_u64()?),
                SCV_DURATION => Self::Duration(r.read_u64()?),
                SCV_U128 => Self::U128(UInt128Parts::decode(r)?),
                SCV_I128 => Self::I128(Int128Parts::decode(r)?),
                SCV_U256 => Self::U256(UInt256Parts::decode(r)?),
                SCV_I256 => Self::I256(Int256Parts::decode(r)?),
                SCV_BYTES => Self::Bytes(r.read_var_opaque(UNBOUNDED, "ScBytes")?),
                SCV_STRING => Self::String(r.read_var_opaque(UNBOUNDED, "ScString")?),
                SCV_SYMBOL => Self::Symbol(read_symbol(r)?),
                SCV_VEC => Self::Vec(read_optional_array(r, "ScVec")?),
                SCV_MAP => Self::Map(read_optional_array(r, "ScMap")?),
                SCV_ADDRESS => Self::Address(ScAddress::decode(r)?),
                SCV_CONTRACT_INSTANCE => Self::ContractInstance(ScContractInstance::decode(r)?),
                SCV_LEDGER_KEY_CONTRACT_INSTANCE => Self::LedgerKeyContractInstance,
                SCV_LEDGER_KEY_NONCE => Self::LedgerKeyNonce(r.read_i64()?),
                v => return Err(XdrError::unknown("ScValType", v)),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ContractId;

    fn round_trip(v: &ScVal) {
        let bytes = v.to_xdr().unwrap();
        assert_eq!(&ScVal::from_xdr(&bytes).unwrap(), v, "{:?}", v);
    }

    #[test]
    fn every_arm_round_trips() {
        let values = vec![
            ScVal::Bool(true),
            ScVal::Void,
            ScVal::Error(ScError::Contract(7)),
            ScVal::Error(ScError::Host(ScErrorType::Budget, ScErrorCode::ExceededLimit)),
            ScVal::U32(u32::MAX),
            ScVal::I32(i32::MIN),
            ScVal::U64(0),
            ScVal::I64(-1),
            ScVal::Timepoint(1_700_000_000),
            ScVal::Duration(60),
            ScVal::from(u128::MAX),
            ScVal::from(i128::MIN),
            ScVal::U256(UInt256Parts { hi_hi: 1, hi_lo: 2, lo_hi: 3, lo_lo: 4 }),
            ScVal::I256(Int256Parts { hi_hi: -1, hi_lo: 2, lo_hi: 3, lo_lo: 4 }),
            ScVal::Bytes(vec![1, 2, 3]),
            ScVal::string("hello"),
            ScVal::symbol("transfer").unwrap(),
            ScVal::Vec(None),
            ScVal::vec(vec![]),
            ScVal::vec(vec![ScVal::U32(1), ScVal::vec(vec![ScVal::Void])]),
            ScVal::map(vec![ScMapEntry {
                key: ScVal::symbol("k").unwrap(),
                val: ScVal::I64(5),
            }]),
            ScVal::Address(ScAddress::Contract(ContractId(Hash([1; 32])))),
            ScVal::ContractInstance(ScContractInstance {
                executable: ContractExecutable::StellarAsset,
                storage: None,
            }),
            ScVal::LedgerKeyContractInstance,
            ScVal::LedgerKeyNonce(42),
        ];
        for v in &values {
            round_trip(v);
        }
    }

    #[test]
    fn absent_and_empty_vec_differ_on_the_wire() {
        assert_eq!(ScVal::Vec(None).to_xdr().unwrap(), vec![0, 0, 0, 16, 0, 0, 0, 0]);
        assert_eq!(
            ScVal::vec(vec![]).to_xdr().unwrap(),
            vec![0, 0, 0, 16, 0, 0, 0, 1, 0, 0, 0, 0]
        );
    }

    #[test]
    fn non_utf8_string_decodes() {
        let bytes = [0, 0, 0, 14, 0, 0, 0, 2, 0xFF, 0xFE, 0, 0];
        let v = ScVal::from_xdr(&bytes).unwrap();
        assert_eq!(v, ScVal::String(vec![0xFF, 0xFE]));
        assert_eq!(v.to_str(), None);
        assert_eq!(v.to_xdr().unwrap(), bytes);
        assert_eq!(ScVal::string("hi").to_str(), Some("hi"));
        assert_eq!(ScVal::U32(1).to_str(), None);
    }

    #[test]
    fn symbol_validation() {
        assert!(ScVal::symbol("a_b_C9").is_ok());
        assert!(ScVal::symbol("has space").is_err());
        assert!(ScVal::symbol("x".repeat(33)).is_err());
        // Bypassing the constructor is caught at encode time.
        assert!(ScVal::Symbol("bad-symbol".into()).to_xdr().is_err());
    }

    #[test]
    fn decoded_symbol_with_bad_chars_is_malformed() {
        let bytes = [0, 0, 0, 15, 0, 0, 0, 1, b'-', 0, 0, 0];
        assert!(matches!(ScVal::from_xdr(&bytes), Err(XdrError::Malformed { .. })));
    }

    #[test]
    fn int128_parts_conversion() {
        for v in [0i128, -1, i128::MAX, i128::MIN, 1 << 70] {
            assert_eq!(i128::from(Int128Parts::from(v)), v);
        }
        assert_eq!(u128::from(UInt128Parts::from(u128::MAX)), u128::MAX);
    }

    #[test]
    fn contract_error_cannot_carry_host_code() {
        let bad = ScVal::Error(ScError::Host(ScErrorType::Contract, ScErrorCode::ArithDomain));
        assert!(bad.to_xdr().is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert_eq!(ScVal::from_xdr(&[0, 0, 0, 99]), Err(XdrError::unknown("ScValType", 99)));
    }

    #[test]
    fn serde_json_shape() {
        let v = ScVal::Bytes(vec![0xde, 0xad]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"bytes":"dead"}"#);
        let back: ScVal = serde_json::from_str(r#"{"u32":5}"#).unwrap();
        assert_eq!(back, ScVal::U32(5));
    }
}
