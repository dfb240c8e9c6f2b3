//! # Assets
//!
//! Three closely related unions, because the wire format restricts where
//! pool shares may appear:
//!
//! | type               | native | alphanum4 | alphanum12 | pool share          |
//! |--------------------|--------|-----------|------------|---------------------|
//! | [`Asset`]          | yes    | yes       | yes        | no                  |
//! | [`ChangeTrustAsset`] | yes  | yes       | yes        | pool parameters     |
//! | [`TrustLineAsset`] | yes    | yes       | yes        | pool id             |
//!
//! All three share one total order: native < alphanum4 < alphanum12 < pool
//! share, then by code, then by issuer address. Liquidity pools rely on it
//! to name their asset pair canonically.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::config::LIQUIDITY_POOL_FEE_V18;
use crate::crypto::hash::{sha256, Hash};
use crate::identity::strkey::{self, VersionByte};
use crate::identity::AccountId;
use crate::xdr::serde_support::serde_via_string;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

const ASSET_TYPE_NATIVE: i32 = 0;
const ASSET_TYPE_CREDIT_ALPHANUM4: i32 = 1;
const ASSET_TYPE_CREDIT_ALPHANUM12: i32 = 2;
const ASSET_TYPE_POOL_SHARE: i32 = 3;

const LIQUIDITY_POOL_CONSTANT_PRODUCT: i32 = 0;

/// Fees are basis points of a trade; 100% is not a fee.
const MAX_POOL_FEE_BPS: i32 = 10_000;

// ---------------------------------------------------------------------------
// Asset codes
// ---------------------------------------------------------------------------

fn check_code(code: &str, min: usize, max: usize) -> XdrResult<()> {
    if code.len() < min || code.len() > max {
        return Err(XdrError::validation(
            "asset_code",
            format!("'{}' must be {}-{} characters", code, min, max),
        ));
    }
    if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(XdrError::validation(
            "asset_code",
            format!("'{}' must be ASCII letters and digits", code),
        ));
    }
    Ok(())
}

fn write_code(w: &mut XdrWriter, code: &str, width: usize) {
    let mut raw = [0u8; 12];
    raw[..code.len()].copy_from_slice(code.as_bytes());
    w.write_fixed_opaque(&raw[..width]);
}

/// Codes are right-padded with NULs; anything after the first NUL must be
/// padding too.
fn read_code(raw: &[u8], min: usize, max: usize) -> XdrResult<String> {
    let len = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    if raw[len..].iter().any(|&b| b != 0) {
        return Err(XdrError::malformed("AssetCode", "non-zero byte after padding"));
    }
    let code = String::from_utf8(raw[..len].to_vec())
        .map_err(|_| XdrError::malformed("AssetCode", "not ASCII"))?;
    check_code(&code, min, max).map_err(|e| XdrError::malformed("AssetCode", e.to_string()))?;
    Ok(code)
}

/// A credit asset with a 1–4 character code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlphaNum4 {
    pub code: String,
    pub issuer: AccountId,
}

/// A credit asset with a 5–12 character code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlphaNum12 {
    pub code: String,
    pub issuer: AccountId,
}

impl AlphaNum4 {
    pub fn new(code: impl Into<String>, issuer: AccountId) -> XdrResult<Self> {
        let asset = Self {
            code: code.into(),
            issuer,
        };
        asset.validate()?;
        Ok(asset)
    }

    pub fn validate(&self) -> XdrResult<()> {
        check_code(&self.code, 1, 4)
    }
}

impl AlphaNum12 {
    pub fn new(code: impl Into<String>, issuer: AccountId) -> XdrResult<Self> {
        let asset = Self {
            code: code.into(),
            issuer,
        };
        asset.validate()?;
        Ok(asset)
    }

    pub fn validate(&self) -> XdrResult<()> {
        check_code(&self.code, 5, 12)
    }
}

impl XdrCodec for AlphaNum4 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        write_code(w, &self.code, 4);
        self.issuer.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        let code = read_code(&r.read_fixed_opaque::<4>()?, 1, 4)?;
        Ok(Self {
            code,
            issuer: AccountId::decode(r)?,
        })
    }
}

impl XdrCodec for AlphaNum12 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        write_code(w, &self.code, 12);
        self.issuer.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        let code = read_code(&r.read_fixed_opaque::<12>()?, 5, 12)?;
        Ok(Self {
            code,
            issuer: AccountId::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// An asset that can be held, paid, or traded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asset {
    Native,
    CreditAlphanum4(AlphaNum4),
    CreditAlphanum12(AlphaNum12),
}

impl Asset {
    /// A credit asset; the variant is picked from the code length.
    pub fn credit(code: &str, issuer: AccountId) -> XdrResult<Self> {
        if code.len() <= 4 {
            AlphaNum4::new(code, issuer).map(Self::CreditAlphanum4)
        } else {
            AlphaNum12::new(code, issuer).map(Self::CreditAlphanum12)
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Native => None,
            Self::CreditAlphanum4(a) => Some(&a.code),
            Self::CreditAlphanum12(a) => Some(&a.code),
        }
    }

    pub fn issuer(&self) -> Option<&AccountId> {
        match self {
            Self::Native => None,
            Self::CreditAlphanum4(a) => Some(&a.issuer),
            Self::CreditAlphanum12(a) => Some(&a.issuer),
        }
    }

    pub fn validate(&self) -> XdrResult<()> {
        match self {
            Self::Native => Ok(()),
            Self::CreditAlphanum4(a) => a.validate(),
            Self::CreditAlphanum12(a) => a.validate(),
        }
    }

    fn rank(&self) -> i32 {
        match self {
            Self::Native => ASSET_TYPE_NATIVE,
            Self::CreditAlphanum4(_) => ASSET_TYPE_CREDIT_ALPHANUM4,
            Self::CreditAlphanum12(_) => ASSET_TYPE_CREDIT_ALPHANUM12,
        }
    }
}

impl Ord for Asset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.code().cmp(&other.code()))
            .then_with(|| {
                let issuer = |a: &Asset| a.issuer().map(AccountId::to_strkey);
                issuer(self).cmp(&issuer(other))
            })
    }
}

impl PartialOrd for Asset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code(), self.issuer()) {
            (Some(code), Some(issuer)) => write!(f, "{}:{}", code, issuer),
            _ => f.write_str("native"),
        }
    }
}

impl FromStr for Asset {
    type Err = XdrError;

    /// `native`, or `CODE:ISSUER`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "native" {
            return Ok(Self::Native);
        }
        let (code, issuer) = s
            .split_once(':')
            .ok_or_else(|| XdrError::validation("asset", format!("expected CODE:ISSUER, got '{}'", s)))?;
        let issuer = issuer
            .parse()
            .map_err(|e| XdrError::validation("asset_issuer", format!("{}", e)))?;
        Self::credit(code, issuer)
    }
}

serde_via_string!(Asset);

impl XdrCodec for Asset {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_discriminant(self.rank());
        match self {
            Self::Native => Ok(()),
            Self::CreditAlphanum4(a) => a.encode(w),
            Self::CreditAlphanum12(a) => a.encode(w),
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            ASSET_TYPE_NATIVE => Ok(Self::Native),
            ASSET_TYPE_CREDIT_ALPHANUM4 => AlphaNum4::decode(r).map(Self::CreditAlphanum4),
            ASSET_TYPE_CREDIT_ALPHANUM12 => AlphaNum12::decode(r).map(Self::CreditAlphanum12),
            v => Err(XdrError::unknown("AssetType", v)),
        }
    }
}

// ---------------------------------------------------------------------------
// Liquidity pools
// ---------------------------------------------------------------------------

/// The identifier of a liquidity pool: sha256 of its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub Hash);

impl PoolId {
    /// `L…` text form.
    pub fn to_strkey(&self) -> String {
        strkey::encode(VersionByte::LiquidityPool, self.0.as_bytes())
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for PoolId {
    type Err = XdrError;

    /// Hex, or the `L…` strkey.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(VersionByte::LiquidityPool.prefix()) {
            return strkey::decode_32(VersionByte::LiquidityPool, s)
                .map(|b| Self(Hash(b)))
                .map_err(|e| XdrError::validation("pool_id", e.to_string()));
        }
        Hash::from_hex(s)
            .map(Self)
            .map_err(|e| XdrError::validation("pool_id", e.to_string()))
    }
}

serde_via_string!(PoolId);

impl XdrCodec for PoolId {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.0.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Hash::decode(r).map(Self)
    }
}

/// Constant-product pool parameters. `asset_a` must sort strictly before
/// `asset_b`; out-of-order pairs are rejected, not swapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiquidityPoolParameters {
    pub asset_a: Asset,
    pub asset_b: Asset,
    /// Basis points.
    pub fee: i32,
}

impl LiquidityPoolParameters {
    /// Parameters with the protocol's standard 30 bp fee.
    pub fn new(asset_a: Asset, asset_b: Asset) -> XdrResult<Self> {
        Self::with_fee(asset_a, asset_b, LIQUIDITY_POOL_FEE_V18)
    }

    pub fn with_fee(asset_a: Asset, asset_b: Asset, fee: i32) -> XdrResult<Self> {
        let params = Self {
            asset_a,
            asset_b,
            fee,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.asset_a.validate()?;
        self.asset_b.validate()?;
        if self.asset_a >= self.asset_b {
            return Err(XdrError::validation(
                "liquidity_pool_assets",
                format!(
                    "{} must sort before {}",
                    self.asset_a, self.asset_b
                ),
            ));
        }
        if self.fee < 0 || self.fee >= MAX_POOL_FEE_BPS {
            return Err(XdrError::validation(
                "liquidity_pool_fee",
                format!("{} is outside 0..{}", self.fee, MAX_POOL_FEE_BPS),
            ));
        }
        Ok(())
    }

    /// sha256 of the parameters' wire form.
    pub fn pool_id(&self) -> XdrResult<PoolId> {
        Ok(PoolId(sha256(&self.to_xdr()?)))
    }
}

impl Ord for LiquidityPoolParameters {
    fn cmp(&self, other: &Self) -> Ordering {
        self.asset_a
            .cmp(&other.asset_a)
            .then_with(|| self.asset_b.cmp(&other.asset_b))
            .then_with(|| self.fee.cmp(&other.fee))
    }
}

impl PartialOrd for LiquidityPoolParameters {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl XdrCodec for LiquidityPoolParameters {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        w.write_discriminant(LIQUIDITY_POOL_CONSTANT_PRODUCT);
        self.asset_a.encode(w)?;
        self.asset_b.encode(w)?;
        w.write_i32(self.fee);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            LIQUIDITY_POOL_CONSTANT_PRODUCT => Ok(Self {
                asset_a: Asset::decode(r)?,
                asset_b: Asset::decode(r)?,
                fee: r.read_i32()?,
            }),
            v => Err(XdrError::unknown("LiquidityPoolType", v)),
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeTrustAsset / TrustLineAsset
// ---------------------------------------------------------------------------

/// What a change-trust operation establishes trust in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTrustAsset {
    Native,
    CreditAlphanum4(AlphaNum4),
    CreditAlphanum12(AlphaNum12),
    PoolShare(LiquidityPoolParameters),
}

impl ChangeTrustAsset {
    /// The plain asset, if this is not a pool share.
    pub fn as_asset(&self) -> Option<Asset> {
        match self {
            Self::Native => Some(Asset::Native),
            Self::CreditAlphanum4(a) => Some(Asset::CreditAlphanum4(a.clone())),
            Self::CreditAlphanum12(a) => Some(Asset::CreditAlphanum12(a.clone())),
            Self::PoolShare(_) => None,
        }
    }

    pub fn validate(&self) -> XdrResult<()> {
        match self {
            Self::Native => Ok(()),
            Self::CreditAlphanum4(a) => a.validate(),
            Self::CreditAlphanum12(a) => a.validate(),
            Self::PoolShare(p) => p.validate(),
        }
    }
}

impl From<Asset> for ChangeTrustAsset {
    fn from(asset: Asset) -> Self {
        match asset {
            Asset::Native => Self::Native,
            Asset::CreditAlphanum4(a) => Self::CreditAlphanum4(a),
            Asset::CreditAlphanum12(a) => Self::CreditAlphanum12(a),
        }
    }
}

impl Ord for ChangeTrustAsset {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::PoolShare(a), Self::PoolShare(b)) => a.cmp(b),
            (Self::PoolShare(_), _) => Ordering::Greater,
            (_, Self::PoolShare(_)) => Ordering::Less,
            _ => self.as_asset().cmp(&other.as_asset()),
        }
    }
}

impl PartialOrd for ChangeTrustAsset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl XdrCodec for ChangeTrustAsset {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::PoolShare(params) => {
                w.write_discriminant(ASSET_TYPE_POOL_SHARE);
                params.encode(w)
            }
            Self::Native => Asset::Native.encode(w),
            Self::CreditAlphanum4(a) => {
                w.write_discriminant(ASSET_TYPE_CREDIT_ALPHANUM4);
                a.encode(w)
            }
            Self::CreditAlphanum12(a) => {
                w.write_discriminant(ASSET_TYPE_CREDIT_ALPHANUM12);
                a.encode(w)
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            ASSET_TYPE_NATIVE => Ok(Self::Native),
            ASSET_TYPE_CREDIT_ALPHANUM4 => AlphaNum4::decode(r).map(Self::CreditAlphanum4),
            ASSET_TYPE_CREDIT_ALPHANUM12 => AlphaNum12::decode(r).map(Self::CreditAlphanum12),
            ASSET_TYPE_POOL_SHARE => LiquidityPoolParameters::decode(r).map(Self::PoolShare),
            v => Err(XdrError::unknown("AssetType", v)),
        }
    }
}

/// The asset side of a trust line key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLineAsset {
    Native,
    CreditAlphanum4(AlphaNum4),
    CreditAlphanum12(AlphaNum12),
    PoolShare(PoolId),
}

impl TrustLineAsset {
    pub fn as_asset(&self) -> Option<Asset> {
        match self {
            Self::Native => Some(Asset::Native),
            Self::CreditAlphanum4(a) => Some(Asset::CreditAlphanum4(a.clone())),
            Self::CreditAlphanum12(a) => Some(Asset::CreditAlphanum12(a.clone())),
            Self::PoolShare(_) => None,
        }
    }
}

impl From<Asset> for TrustLineAsset {
    fn from(asset: Asset) -> Self {
        match asset {
            Asset::Native => Self::Native,
            Asset::CreditAlphanum4(a) => Self::CreditAlphanum4(a),
            Asset::CreditAlphanum12(a) => Self::CreditAlphanum12(a),
        }
    }
}

impl Ord for TrustLineAsset {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::PoolShare(a), Self::PoolShare(b)) => a.cmp(b),
            (Self::PoolShare(_), _) => Ordering::Greater,
            (_, Self::PoolShare(_)) => Ordering::Less,
            _ => self.as_asset().cmp(&other.as_asset()),
        }
    }
}

impl PartialOrd for TrustLineAsset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl XdrCodec for TrustLineAsset {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::PoolShare(id) => {
                w.write_discriminant(ASSET_TYPE_POOL_SHARE);
                id.encode(w)
            }
            Self::Native => Asset::Native.encode(w),
            Self::CreditAlphanum4(a) => {
                w.write_discriminant(ASSET_TYPE_CREDIT_ALPHANUM4);
                a.encode(w)
            }
            Self::CreditAlphanum12(a) => {
                w.write_discriminant(ASSET_TYPE_CREDIT_ALPHANUM12);
                a.encode(w)
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            ASSET_TYPE_NATIVE => Ok(Self::Native),
            ASSET_TYPE_CREDIT_ALPHANUM4 => AlphaNum4::decode(r).map(Self::CreditAlphanum4),
            ASSET_TYPE_CREDIT_ALPHANUM12 => AlphaNum12::decode(r).map(Self::CreditAlphanum12),
            ASSET_TYPE_POOL_SHARE => PoolId::decode(r).map(Self::PoolShare),
            v => Err(XdrError::unknown("AssetType", v)),
        }
    }
}
