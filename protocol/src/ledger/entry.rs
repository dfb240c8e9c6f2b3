//! # Ledger Entries
//!
//! Every object stored on the ledger, one struct per [`LedgerEntryType`].
//!
//! ## Extension chains
//!
//! Several entries grew fields over time without breaking old readers. Each
//! growth step is a union on an integer version:
//!
//! ```text
//! AccountEntry.ext   0 | 1 -> AccountEntryExtensionV1
//!   V1.ext           0 | 2 -> AccountEntryExtensionV2
//!     V2.ext         0 | 3 -> AccountEntryExtensionV3
//! ```
//!
//! Discriminant 0 means "the chain stops here", never "a version-0 payload
//! follows". We model each link as an `Option`, so an entry with only V1
//! encodes V1's own link as 0 and decodes back with `ext: None` there.

use serde::{Deserialize, Serialize};

use super::asset::{Asset, LiquidityPoolParameters, PoolId, TrustLineAsset};
use super::claim::{check_claimants, ClaimableBalanceId, Claimant};
use super::config_setting::ConfigSettingEntry;
use super::key::{check_data_name, ContractDataDurability, LedgerEntryType, LedgerKey};
use crate::amount::{Amount, Price};
use crate::config::{
    MAX_CLAIMANTS, MAX_DATA_NAME_LENGTH, MAX_DATA_VALUE_LENGTH, MAX_HOME_DOMAIN_LENGTH, MAX_SIGNERS, UNBOUNDED,
};
use crate::crypto::hash::Hash;
use crate::identity::{AccountId, ScAddress, Signer};
use crate::soroban::scval::ScVal;
use crate::xdr::serde_support::hex_bytes;
use crate::xdr::{
    read_extension, write_extension, ExtensionPoint, XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter,
};

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// Amounts committed to open offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Liabilities {
    pub buying: Amount,
    pub selling: Amount,
}

impl XdrCodec for Liabilities {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.buying.encode(w)?;
        self.selling.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            buying: Amount::decode(r)?,
            selling: Amount::decode(r)?,
        })
    }
}

/// Master key weight plus the three threshold levels, packed in 4 bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thresholds {
    pub master_weight: u8,
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

impl XdrCodec for Thresholds {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_fixed_opaque(&[self.master_weight, self.low, self.medium, self.high]);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        let [master_weight, low, medium, high] = r.read_fixed_opaque::<4>()?;
        Ok(Self {
            master_weight,
            low,
            medium,
            high,
        })
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountEntry {
    pub account_id: AccountId,
    pub balance: Amount,
    pub seq_num: i64,
    pub num_sub_entries: u32,
    pub inflation_dest: Option<AccountId>,
    pub flags: u32,
    pub home_domain: String,
    pub thresholds: Thresholds,
    pub signers: Vec<Signer>,
    pub ext: Option<AccountEntryExtensionV1>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountEntryExtensionV1 {
    pub liabilities: Liabilities,
    pub ext: Option<AccountEntryExtensionV2>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountEntryExtensionV2 {
    pub num_sponsored: u32,
    pub num_sponsoring: u32,
    /// One slot per signer: who sponsors it, if anyone.
    pub signer_sponsoring_ids: Vec<Option<AccountId>>,
    pub ext: Option<AccountEntryExtensionV3>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountEntryExtensionV3 {
    pub ext: ExtensionPoint,
    /// Ledger in which the sequence number was last bumped.
    pub seq_ledger: u32,
    /// Close time of that ledger.
    pub seq_time: u64,
}

impl AccountEntry {
    /// A fresh account: master weight 1, zero thresholds, no signers.
    pub fn new(account_id: AccountId, balance: Amount, seq_num: i64) -> XdrResult<Self> {
        let entry = Self {
            account_id,
            balance,
            seq_num,
            num_sub_entries: 0,
            inflation_dest: None,
            flags: 0,
            home_domain: String::new(),
            thresholds: Thresholds {
                master_weight: 1,
                ..Thresholds::default()
            },
            signers: Vec::new(),
            ext: None,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn with_home_domain(mut self, home_domain: impl Into<String>) -> XdrResult<Self> {
        self.home_domain = home_domain.into();
        self.validate()?;
        Ok(self)
    }

    pub fn with_signers(mut self, signers: Vec<Signer>) -> XdrResult<Self> {
        self.signers = signers;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.balance.require_non_negative("balance")?;
        if self.home_domain.len() > MAX_HOME_DOMAIN_LENGTH as usize {
            return Err(XdrError::validation(
                "home_domain",
                format!("{} bytes exceeds maximum of {}", self.home_domain.len(), MAX_HOME_DOMAIN_LENGTH),
            ));
        }
        if self.signers.len() > MAX_SIGNERS as usize {
            return Err(XdrError::validation(
                "signers",
                format!("{} signers exceeds maximum of {}", self.signers.len(), MAX_SIGNERS),
            ));
        }
        self.signers.iter().try_for_each(Signer::validate)
    }
}

impl XdrCodec for AccountEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.account_id.encode(w)?;
        self.balance.encode(w)?;
        w.write_i64(self.seq_num);
        w.write_u32(self.num_sub_entries);
        w.write_optional(self.inflation_dest.as_ref())?;
        w.write_u32(self.flags);
        w.write_string(&self.home_domain, MAX_HOME_DOMAIN_LENGTH, "home_domain")?;
        self.thresholds.encode(w)?;
        w.write_array(&self.signers, MAX_SIGNERS, "signers")?;
        write_extension(w, 1, self.ext.as_ref())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            account_id: AccountId::decode(r)?,
            balance: Amount::decode(r)?,
            seq_num: r.read_i64()?,
            num_sub_entries: r.read_u32()?,
            inflation_dest: r.read_optional()?,
            flags: r.read_u32()?,
            home_domain: r.read_string(MAX_HOME_DOMAIN_LENGTH, "HomeDomain")?,
            thresholds: Thresholds::decode(r)?,
            signers: r.read_array(MAX_SIGNERS, "AccountEntry.signers")?,
            ext: read_extension(r, 1, "AccountEntry.ext")?,
        })
    }
}

impl XdrCodec for AccountEntryExtensionV1 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.liabilities.encode(w)?;
        write_extension(w, 2, self.ext.as_ref())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            liabilities: Liabilities::decode(r)?,
            ext: read_extension(r, 2, "AccountEntryExtensionV1.ext")?,
        })
    }
}

/// `SponsorshipDescriptor` is `AccountID*`: a presence flag per slot.
struct SponsorshipDescriptor(Option<AccountId>);

impl XdrCodec for SponsorshipDescriptor {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_optional(self.0.as_ref())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.read_optional().map(Self)
    }
}

impl XdrCodec for AccountEntryExtensionV2 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_u32(self.num_sponsored);
        w.write_u32(self.num_sponsoring);
        let slots: Vec<SponsorshipDescriptor> = self
            .signer_sponsoring_ids
            .iter()
            .map(|id| SponsorshipDescriptor(*id))
            .collect();
        w.write_array(&slots, MAX_SIGNERS, "signer_sponsoring_ids")?;
        write_extension(w, 3, self.ext.as_ref())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        let num_sponsored = r.read_u32()?;
        let num_sponsoring = r.read_u32()?;
        let slots: Vec<SponsorshipDescriptor> = r.read_array(MAX_SIGNERS, "signerSponsoringIDs")?;
        Ok(Self {
            num_sponsored,
            num_sponsoring,
            signer_sponsoring_ids: slots.into_iter().map(|s| s.0).collect(),
            ext: read_extension(r, 3, "AccountEntryExtensionV2.ext")?,
        })
    }
}

impl XdrCodec for AccountEntryExtensionV3 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.ext.encode(w)?;
        w.write_u32(self.seq_ledger);
        w.write_u64(self.seq_time);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: ExtensionPoint::decode(r)?,
            seq_ledger: r.read_u32()?,
            seq_time: r.read_u64()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Trust line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrustLineEntry {
    pub account_id: AccountId,
    pub asset: TrustLineAsset,
    pub balance: Amount,
    pub limit: Amount,
    pub flags: u32,
    pub ext: Option<TrustLineEntryV1>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrustLineEntryV1 {
    pub liabilities: Liabilities,
    pub ext: Option<TrustLineEntryExtensionV2>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrustLineEntryExtensionV2 {
    pub liquidity_pool_use_count: i32,
    pub ext: ExtensionPoint,
}

impl XdrCodec for TrustLineEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.account_id.encode(w)?;
        self.asset.encode(w)?;
        self.balance.encode(w)?;
        self.limit.encode(w)?;
        w.write_u32(self.flags);
        write_extension(w, 1, self.ext.as_ref())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            account_id: AccountId::decode(r)?,
            asset: TrustLineAsset::decode(r)?,
            balance: Amount::decode(r)?,
            limit: Amount::decode(r)?,
            flags: r.read_u32()?,
            ext: read_extension(r, 1, "TrustLineEntry.ext")?,
        })
    }
}

impl XdrCodec for TrustLineEntryV1 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.liabilities.encode(w)?;
        write_extension(w, 2, self.ext.as_ref())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            liabilities: Liabilities::decode(r)?,
            ext: read_extension(r, 2, "TrustLineEntryV1.ext")?,
        })
    }
}

impl XdrCodec for TrustLineEntryExtensionV2 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_i32(self.liquidity_pool_use_count);
        self.ext.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            liquidity_pool_use_count: r.read_i32()?,
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Offer, data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferEntry {
    pub seller_id: AccountId,
    pub offer_id: i64,
    pub selling: Asset,
    pub buying: Asset,
    pub amount: Amount,
    pub price: Price,
    pub flags: u32,
    pub ext: ExtensionPoint,
}

impl XdrCodec for OfferEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.seller_id.encode(w)?;
        w.write_i64(self.offer_id);
        self.selling.encode(w)?;
        self.buying.encode(w)?;
        self.amount.encode(w)?;
        self.price.encode(w)?;
        w.write_u32(self.flags);
        self.ext.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            seller_id: AccountId::decode(r)?,
            offer_id: r.read_i64()?,
            selling: Asset::decode(r)?,
            buying: Asset::decode(r)?,
            amount: Amount::decode(r)?,
            price: Price::decode(r)?,
            flags: r.read_u32()?,
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataEntry {
    pub account_id: AccountId,
    pub data_name: String,
    #[serde(with = "hex_bytes")]
    pub data_value: Vec<u8>,
    pub ext: ExtensionPoint,
}

impl DataEntry {
    pub fn new(account_id: AccountId, data_name: impl Into<String>, data_value: Vec<u8>) -> XdrResult<Self> {
        let entry = Self {
            account_id,
            data_name: data_name.into(),
            data_value,
            ext: ExtensionPoint,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> XdrResult<()> {
        check_data_name(&self.data_name)?;
        if self.data_value.len() > MAX_DATA_VALUE_LENGTH as usize {
            return Err(XdrError::validation(
                "data_value",
                format!("{} bytes exceeds maximum of {}", self.data_value.len(), MAX_DATA_VALUE_LENGTH),
            ));
        }
        Ok(())
    }
}

impl XdrCodec for DataEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.account_id.encode(w)?;
        w.write_string(&self.data_name, MAX_DATA_NAME_LENGTH, "data_name")?;
        w.write_var_opaque(&self.data_value, MAX_DATA_VALUE_LENGTH, "data_value")?;
        self.ext.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            account_id: AccountId::decode(r)?,
            data_name: r.read_string(MAX_DATA_NAME_LENGTH, "DataName")?,
            data_value: r.read_var_opaque(MAX_DATA_VALUE_LENGTH, "DataValue")?,
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Claimable balance, liquidity pool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimableBalanceEntry {
    pub balance_id: ClaimableBalanceId,
    pub claimants: Vec<Claimant>,
    pub asset: Asset,
    pub amount: Amount,
    pub ext: Option<ClaimableBalanceEntryExtensionV1>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimableBalanceEntryExtensionV1 {
    pub ext: ExtensionPoint,
    pub flags: u32,
}

impl ClaimableBalanceEntry {
    pub fn new(
        balance_id: ClaimableBalanceId,
        claimants: Vec<Claimant>,
        asset: Asset,
        amount: Amount,
    ) -> XdrResult<Self> {
        let entry = Self {
            balance_id,
            claimants,
            asset,
            amount,
            ext: None,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.asset.validate()?;
        self.amount.require_positive("amount")?;
        check_claimants(&self.claimants)
    }
}

impl XdrCodec for ClaimableBalanceEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.balance_id.encode(w)?;
        w.write_array(&self.claimants, MAX_CLAIMANTS, "claimants")?;
        self.asset.encode(w)?;
        self.amount.encode(w)?;
        write_extension(w, 1, self.ext.as_ref())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            balance_id: ClaimableBalanceId::decode(r)?,
            claimants: r.read_array(MAX_CLAIMANTS, "ClaimableBalanceEntry.claimants")?,
            asset: Asset::decode(r)?,
            amount: Amount::decode(r)?,
            ext: read_extension(r, 1, "ClaimableBalanceEntry.ext")?,
        })
    }
}

impl XdrCodec for ClaimableBalanceEntryExtensionV1 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.ext.encode(w)?;
        w.write_u32(self.flags);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: ExtensionPoint::decode(r)?,
            flags: r.read_u32()?,
        })
    }
}

/// A constant-product pool and its reserves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiquidityPoolEntry {
    pub liquidity_pool_id: PoolId,
    pub params: LiquidityPoolParameters,
    pub reserve_a: Amount,
    pub reserve_b: Amount,
    pub total_pool_shares: Amount,
    pub pool_shares_trust_line_count: i64,
}

impl XdrCodec for LiquidityPoolEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.liquidity_pool_id.encode(w)?;
        // The body union shares its discriminant with the parameters' own.
        self.params.encode(w)?;
        self.reserve_a.encode(w)?;
        self.reserve_b.encode(w)?;
        self.total_pool_shares.encode(w)?;
        w.write_i64(self.pool_shares_trust_line_count);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            liquidity_pool_id: PoolId::decode(r)?,
            params: LiquidityPoolParameters::decode(r)?,
            reserve_a: Amount::decode(r)?,
            reserve_b: Amount::decode(r)?,
            total_pool_shares: Amount::decode(r)?,
            pool_shares_trust_line_count: r.read_i64()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Contract data and code, TTL
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractDataEntry {
    pub ext: ExtensionPoint,
    pub contract: ScAddress,
    pub key: ScVal,
    pub durability: ContractDataDurability,
    pub val: ScVal,
}

impl XdrCodec for ContractDataEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.ext.encode(w)?;
        self.contract.encode(w)?;
        self.key.encode(w)?;
        self.durability.encode(w)?;
        self.val.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: ExtensionPoint::decode(r)?,
            contract: ScAddress::decode(r)?,
            key: ScVal::decode(r)?,
            durability: ContractDataDurability::decode(r)?,
            val: ScVal::decode(r)?,
        })
    }
}

/// Static measurements of a wasm module, used to price instantiation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractCodeCostInputs {
    pub ext: ExtensionPoint,
    pub n_instructions: u32,
    pub n_functions: u32,
    pub n_globals: u32,
    pub n_table_entries: u32,
    pub n_types: u32,
    pub n_data_segments: u32,
    pub n_elem_segments: u32,
    pub n_imports: u32,
    pub n_exports: u32,
    pub n_data_segment_bytes: u32,
}

impl XdrCodec for ContractCodeCostInputs {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.ext.encode(w)?;
        for v in [
            self.n_instructions,
            self.n_functions,
            self.n_globals,
            self.n_table_entries,
            self.n_types,
            self.n_data_segments,
            self.n_elem_segments,
            self.n_imports,
            self.n_exports,
            self.n_data_segment_bytes,
        ] {
            w.write_u32(v);
        }
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: ExtensionPoint::decode(r)?,
            n_instructions: r.read_u32()?,
            n_functions: r.read_u32()?,
            n_globals: r.read_u32()?,
            n_table_entries: r.read_u32()?,
            n_types: r.read_u32()?,
            n_data_segments: r.read_u32()?,
            n_elem_segments: r.read_u32()?,
            n_imports: r.read_u32()?,
            n_exports: r.read_u32()?,
            n_data_segment_bytes: r.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractCodeEntryV1 {
    pub ext: ExtensionPoint,
    pub cost_inputs: ContractCodeCostInputs,
}

impl XdrCodec for ContractCodeEntryV1 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.ext.encode(w)?;
        self.cost_inputs.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: ExtensionPoint::decode(r)?,
            cost_inputs: ContractCodeCostInputs::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractCodeEntry {
    pub ext: Option<ContractCodeEntryV1>,
    pub hash: Hash,
    #[serde(with = "hex_bytes")]
    pub code: Vec<u8>,
}

impl XdrCodec for ContractCodeEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        write_extension(w, 1, self.ext.as_ref())?;
        self.hash.encode(w)?;
        w.write_var_opaque(&self.code, UNBOUNDED, "code")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: read_extension(r, 1, "ContractCodeEntry.ext")?,
            hash: Hash::decode(r)?,
            code: r.read_var_opaque(UNBOUNDED, "ContractCodeEntry.code")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TtlEntry {
    /// sha256 of the contract data or code key this TTL belongs to.
    pub key_hash: Hash,
    pub live_until_ledger_seq: u32,
}

impl XdrCodec for TtlEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.key_hash.encode(w)?;
        w.write_u32(self.live_until_ledger_seq);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            key_hash: Hash::decode(r)?,
            live_until_ledger_seq: r.read_u32()?,
        })
    }
}

// ---------------------------------------------------------------------------
// LedgerEntry
// ---------------------------------------------------------------------------

/// The typed body of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryData {
    Account(AccountEntry),
    Trustline(TrustLineEntry),
    Offer(OfferEntry),
    Data(DataEntry),
    ClaimableBalance(ClaimableBalanceEntry),
    LiquidityPool(LiquidityPoolEntry),
    ContractData(ContractDataEntry),
    ContractCode(ContractCodeEntry),
    ConfigSetting(ConfigSettingEntry),
    Ttl(TtlEntry),
}

impl LedgerEntryData {
    pub fn entry_type(&self) -> LedgerEntryType {
        match self {
            Self::Account(_) => LedgerEntryType::Account,
            Self::Trustline(_) => LedgerEntryType::Trustline,
            Self::Offer(_) => LedgerEntryType::Offer,
            Self::Data(_) => LedgerEntryType::Data,
            Self::ClaimableBalance(_) => LedgerEntryType::ClaimableBalance,
            Self::LiquidityPool(_) => LedgerEntryType::LiquidityPool,
            Self::ContractData(_) => LedgerEntryType::ContractData,
            Self::ContractCode(_) => LedgerEntryType::ContractCode,
            Self::ConfigSetting(_) => LedgerEntryType::ConfigSetting,
            Self::Ttl(_) => LedgerEntryType::Ttl,
        }
    }

    /// The key identifying this entry.
    pub fn ledger_key(&self) -> LedgerKey {
        match self {
            Self::Account(e) => LedgerKey::account(e.account_id),
            Self::Trustline(e) => LedgerKey::trustline(e.account_id, e.asset.clone()),
            Self::Offer(e) => LedgerKey::offer(e.seller_id, e.offer_id),
            Self::Data(e) => LedgerKey::Data {
                account_id: e.account_id,
                data_name: e.data_name.clone(),
            },
            Self::ClaimableBalance(e) => LedgerKey::claimable_balance(e.balance_id),
            Self::LiquidityPool(e) => LedgerKey::liquidity_pool(e.liquidity_pool_id),
            Self::ContractData(e) => LedgerKey::contract_data(e.contract, e.key.clone(), e.durability),
            Self::ContractCode(e) => LedgerKey::contract_code(e.hash),
            Self::ConfigSetting(e) => LedgerKey::config_setting(e.id()),
            Self::Ttl(e) => LedgerKey::ttl(e.key_hash),
        }
    }
}

impl XdrCodec for LedgerEntryData {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.entry_type().encode(w)?;
        match self {
            Self::Account(e) => e.encode(w),
            Self::Trustline(e) => e.encode(w),
            Self::Offer(e) => e.encode(w),
            Self::Data(e) => e.encode(w),
            Self::ClaimableBalance(e) => e.encode(w),
            Self::LiquidityPool(e) => e.encode(w),
            Self::ContractData(e) => e.encode(w),
            Self::ContractCode(e) => e.encode(w),
            Self::ConfigSetting(e) => e.encode(w),
            Self::Ttl(e) => e.encode(w),
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(match LedgerEntryType::decode(r)? {
            LedgerEntryType::Account => Self::Account(XdrCodec::decode(r)?),
            LedgerEntryType::Trustline => Self::Trustline(XdrCodec::decode(r)?),
            LedgerEntryType::Offer => Self::Offer(XdrCodec::decode(r)?),
            LedgerEntryType::Data => Self::Data(XdrCodec::decode(r)?),
            LedgerEntryType::ClaimableBalance => Self::ClaimableBalance(XdrCodec::decode(r)?),
            LedgerEntryType::LiquidityPool => Self::LiquidityPool(XdrCodec::decode(r)?),
            LedgerEntryType::ContractData => Self::ContractData(XdrCodec::decode(r)?),
            LedgerEntryType::ContractCode => Self::ContractCode(XdrCodec::decode(r)?),
            LedgerEntryType::ConfigSetting => Self::ConfigSetting(XdrCodec::decode(r)?),
            LedgerEntryType::Ttl => Self::Ttl(XdrCodec::decode(r)?),
        })
    }
}

/// Who pays the reserve for an entry, when it is sponsored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerEntryExtensionV1 {
    pub sponsoring_id: Option<AccountId>,
    pub ext: ExtensionPoint,
}

impl XdrCodec for LedgerEntryExtensionV1 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_optional(self.sponsoring_id.as_ref())?;
        self.ext.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            sponsoring_id: r.read_optional()?,
            ext: ExtensionPoint::decode(r)?,
        })
    }
}

/// An object on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub last_modified_ledger_seq: u32,
    pub data: LedgerEntryData,
    pub ext: Option<LedgerEntryExtensionV1>,
}

impl LedgerEntry {
    pub fn new(last_modified_ledger_seq: u32, data: LedgerEntryData) -> Self {
        Self {
            last_modified_ledger_seq,
            data,
            ext: None,
        }
    }

    pub fn ledger_key(&self) -> LedgerKey {
        self.data.ledger_key()
    }
}

impl XdrCodec for LedgerEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_u32(self.last_modified_ledger_seq);
        self.data.encode(w)?;
        write_extension(w, 1, self.ext.as_ref())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            last_modified_ledger_seq: r.read_u32()?,
            data: LedgerEntryData::decode(r)?,
            ext: read_extension(r, 1, "LedgerEntry.ext")?,
        })
    }
}
