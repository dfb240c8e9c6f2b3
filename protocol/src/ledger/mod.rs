//! # Ledger Objects
//!
//! Assets, claim predicates, network config settings, and the entries and
//! keys that make up ledger state.

pub mod asset;
pub mod claim;
pub mod config_setting;
pub mod entry;
pub mod key;

pub use asset::{AlphaNum12, AlphaNum4, Asset, ChangeTrustAsset, LiquidityPoolParameters, PoolId, TrustLineAsset};
pub use claim::{ClaimPredicate, ClaimableBalanceId, Claimant};
pub use config_setting::{ConfigSettingEntry, ConfigSettingId};
pub use entry::{LedgerEntry, LedgerEntryData, LedgerEntryExtensionV1};
pub use key::{ContractDataDurability, LedgerEntryType, LedgerKey};
