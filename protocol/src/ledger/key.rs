//! # Ledger Keys
//!
//! A [`LedgerKey`] is the identity-only projection of a ledger entry: just
//! enough fields to find it. Footprints are lists of these.

use serde::{Deserialize, Serialize};

use super::asset::{PoolId, TrustLineAsset};
use super::claim::ClaimableBalanceId;
use super::config_setting::ConfigSettingId;
use crate::config::MAX_DATA_NAME_LENGTH;
use crate::crypto::hash::{sha256, Hash};
use crate::identity::{AccountId, ScAddress};
use crate::soroban::scval::ScVal;
use crate::xdr::{xdr_enum, XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

xdr_enum! {
    /// The kind of object a ledger entry or key refers to.
    pub enum LedgerEntryType {
        Account = 0,
        Trustline = 1,
        Offer = 2,
        Data = 3,
        ClaimableBalance = 4,
        LiquidityPool = 5,
        ContractData = 6,
        ContractCode = 7,
        ConfigSetting = 8,
        Ttl = 9,
    }
}

xdr_enum! {
    /// Temporary entries may be dropped when their TTL lapses; persistent
    /// ones are archived instead.
    pub enum ContractDataDurability {
        Temporary = 0,
        Persistent = 1,
    }
}

/// Data entry names are 1–64 bytes.
pub(crate) fn check_data_name(name: &str) -> XdrResult<()> {
    if name.is_empty() || name.len() > MAX_DATA_NAME_LENGTH as usize {
        return Err(XdrError::validation(
            "data_name",
            format!("{} bytes, expected 1..={}", name.len(), MAX_DATA_NAME_LENGTH),
        ));
    }
    Ok(())
}

/// The key of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKey {
    Account {
        account_id: AccountId,
    },
    Trustline {
        account_id: AccountId,
        asset: TrustLineAsset,
    },
    Offer {
        seller_id: AccountId,
        offer_id: i64,
    },
    Data {
        account_id: AccountId,
        data_name: String,
    },
    ClaimableBalance {
        balance_id: ClaimableBalanceId,
    },
    LiquidityPool {
        liquidity_pool_id: PoolId,
    },
    ContractData {
        contract: ScAddress,
        key: ScVal,
        durability: ContractDataDurability,
    },
    ContractCode {
        hash: Hash,
    },
    ConfigSetting {
        config_setting_id: ConfigSettingId,
    },
    Ttl {
        key_hash: Hash,
    },
}

impl LedgerKey {
    pub fn account(account_id: AccountId) -> Self {
        Self::Account { account_id }
    }

    pub fn trustline(account_id: AccountId, asset: TrustLineAsset) -> Self {
        Self::Trustline { account_id, asset }
    }

    pub fn offer(seller_id: AccountId, offer_id: i64) -> Self {
        Self::Offer { seller_id, offer_id }
    }

    pub fn data(account_id: AccountId, data_name: impl Into<String>) -> XdrResult<Self> {
        let data_name = data_name.into();
        check_data_name(&data_name)?;
        Ok(Self::Data {
            account_id,
            data_name,
        })
    }

    pub fn claimable_balance(balance_id: ClaimableBalanceId) -> Self {
        Self::ClaimableBalance { balance_id }
    }

    pub fn liquidity_pool(liquidity_pool_id: PoolId) -> Self {
        Self::LiquidityPool { liquidity_pool_id }
    }

    pub fn contract_data(contract: ScAddress, key: ScVal, durability: ContractDataDurability) -> Self {
        Self::ContractData {
            contract,
            key,
            durability,
        }
    }

    /// The key of a contract's instance entry.
    pub fn contract_instance(contract: ScAddress) -> Self {
        Self::contract_data(
            contract,
            ScVal::LedgerKeyContractInstance,
            ContractDataDurability::Persistent,
        )
    }

    pub fn contract_code(hash: Hash) -> Self {
        Self::ContractCode { hash }
    }

    pub fn config_setting(config_setting_id: ConfigSettingId) -> Self {
        Self::ConfigSetting { config_setting_id }
    }

    pub fn ttl(key_hash: Hash) -> Self {
        Self::Ttl { key_hash }
    }

    pub fn entry_type(&self) -> LedgerEntryType {
        match self {
            Self::Account { .. } => LedgerEntryType::Account,
            Self::Trustline { .. } => LedgerEntryType::Trustline,
            Self::Offer { .. } => LedgerEntryType::Offer,
            Self::Data { .. } => LedgerEntryType::Data,
            Self::ClaimableBalance { .. } => LedgerEntryType::ClaimableBalance,
            Self::LiquidityPool { .. } => LedgerEntryType::LiquidityPool,
            Self::ContractData { .. } => LedgerEntryType::ContractData,
            Self::ContractCode { .. } => LedgerEntryType::ContractCode,
            Self::ConfigSetting { .. } => LedgerEntryType::ConfigSetting,
            Self::Ttl { .. } => LedgerEntryType::Ttl,
        }
    }

    /// The TTL entry key tracking this contract data or code entry:
    /// `sha256` of this key's wire form.
    pub fn ttl_key(&self) -> XdrResult<LedgerKey> {
        match self {
            Self::ContractData { .. } | Self::ContractCode { .. } => {
                Ok(Self::ttl(sha256(&self.to_xdr()?)))
            }
            other => Err(XdrError::validation(
                "ttl_key",
                format!("{:?} entries have no TTL", other.entry_type()),
            )),
        }
    }
}

impl XdrCodec for LedgerKey {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.entry_type().encode(w)?;
        match self {
            Self::Account { account_id } => account_id.encode(w),
            Self::Trustline { account_id, asset } => {
                account_id.encode(w)?;
                asset.encode(w)
            }
            Self::Offer { seller_id, offer_id } => {
                seller_id.encode(w)?;
                w.write_i64(*offer_id);
                Ok(())
            }
            Self::Data {
                account_id,
                data_name,
            } => {
                check_data_name(data_name)?;
                account_id.encode(w)?;
                w.write_string(data_name, MAX_DATA_NAME_LENGTH, "data_name")
            }
            Self::ClaimableBalance { balance_id } => balance_id.encode(w),
            Self::LiquidityPool { liquidity_pool_id } => liquidity_pool_id.encode(w),
            Self::ContractData {
                contract,
                key,
                durability,
            } => {
                contract.encode(w)?;
                key.encode(w)?;
                durability.encode(w)
            }
            Self::ContractCode { hash } => hash.encode(w),
            Self::ConfigSetting { config_setting_id } => config_setting_id.encode(w),
            Self::Ttl { key_hash } => key_hash.encode(w),
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(match LedgerEntryType::decode(r)? {
            LedgerEntryType::Account => Self::Account {
                account_id: AccountId::decode(r)?,
            },
            LedgerEntryType::Trustline => Self::Trustline {
                account_id: AccountId::decode(r)?,
                asset: TrustLineAsset::decode(r)?,
            },
            LedgerEntryType::Offer => Self::Offer {
                seller_id: AccountId::decode(r)?,
                offer_id: r.read_i64()?,
            },
            LedgerEntryType::Data => Self::Data {
                account_id: AccountId::decode(r)?,
                data_name: r.read_string(MAX_DATA_NAME_LENGTH, "DataName")?,
            },
            LedgerEntryType::ClaimableBalance => Self::ClaimableBalance {
                balance_id: ClaimableBalanceId::decode(r)?,
            },
            LedgerEntryType::LiquidityPool => Self::LiquidityPool {
                liquidity_pool_id: PoolId::decode(r)?,
            },
            LedgerEntryType::ContractData => Self::ContractData {
                contract: ScAddress::decode(r)?,
                key: ScVal::decode(r)?,
                durability: ContractDataDurability::decode(r)?,
            },
            LedgerEntryType::ContractCode => Self::ContractCode {
                hash: Hash::decode(r)?,
            },
            LedgerEntryType::ConfigSetting => Self::ConfigSetting {
                config_setting_id: ConfigSettingId::decode(r)?,
            },
            LedgerEntryType::Ttl => Self::Ttl {
                key_hash: Hash::decode(r)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ContractId;
    use crate::ledger::asset::Asset;

    fn account() -> AccountId {
        "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ"
            .parse()
            .unwrap()
    }

    fn contract() -> ScAddress {
        ScAddress::Contract(ContractId(Hash([4; 32])))
    }

    #[test]
    fn every_key_round_trips() {
        let keys = vec![
            LedgerKey::account(account()),
            LedgerKey::trustline(account(), Asset::credit("USD", account()).unwrap().into()),
            LedgerKey::trustline(account(), TrustLineAsset::PoolShare(PoolId(Hash([1; 32])))),
            LedgerKey::offer(account(), i64::MAX),
            LedgerKey::data(account(), "config").unwrap(),
            LedgerKey::claimable_balance(ClaimableBalanceId(Hash([2; 32]))),
            LedgerKey::liquidity_pool(PoolId(Hash([3; 32]))),
            LedgerKey::contract_data(contract(), ScVal::symbol("COUNTER").unwrap(), ContractDataDurability::Temporary),
            LedgerKey::contract_instance(contract()),
            LedgerKey::contract_code(Hash([5; 32])),
            LedgerKey::config_setting(ConfigSettingId::StateArchival),
            LedgerKey::ttl(Hash([6; 32])),
        ];
        for key in keys {
            let bytes = key.to_xdr().unwrap();
            assert_eq!(LedgerKey::from_xdr(&bytes).unwrap(), key);
        }
    }

    #[test]
    fn data_name_bounds() {
        assert!(LedgerKey::data(account(), "").is_err());
        assert!(LedgerKey::data(account(), "n".repeat(64)).is_ok());
        assert!(matches!(
            LedgerKey::data(account(), "n".repeat(65)),
            Err(XdrError::Validation { field: "data_name", .. })
        ));
    }

    #[test]
    fn ttl_key_hashes_the_key() {
        let key = LedgerKey::contract_code(Hash([5; 32]));
        let ttl = key.ttl_key().unwrap();
        assert_eq!(ttl, LedgerKey::ttl(sha256(&key.to_xdr().unwrap())));
        assert!(LedgerKey::account(account()).ttl_key().is_err());
    }

    #[test]
    fn unknown_entry_type() {
        assert_eq!(
            LedgerKey::from_xdr(&[0, 0, 0, 10]),
            Err(XdrError::unknown("LedgerEntryType", 10))
        );
    }
}
