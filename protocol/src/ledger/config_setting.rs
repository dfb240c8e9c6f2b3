//! # Network Configuration Settings
//!
//! Contract-execution tunables live on the ledger as `ConfigSetting`
//! entries, one per [`ConfigSettingId`]. Every arm is a flat record: no
//! extension chains, no recursion, dispatch purely by discriminant.

use serde::{Deserialize, Serialize};

use crate::config::{MAX_CONTRACT_COST_PARAMS, UNBOUNDED};
use crate::xdr::{xdr_enum, ExtensionPoint, XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

xdr_enum! {
    /// Which setting a `ConfigSetting` entry (or key) holds.
    pub enum ConfigSettingId {
        ContractMaxSizeBytes = 0,
        ContractComputeV0 = 1,
        ContractLedgerCostV0 = 2,
        ContractHistoricalDataV0 = 3,
        ContractEventsV0 = 4,
        ContractBandwidthV0 = 5,
        ContractCostParamsCpuInstructions = 6,
        ContractCostParamsMemoryBytes = 7,
        ContractDataKeySizeBytes = 8,
        ContractDataEntrySizeBytes = 9,
        StateArchival = 10,
        ContractExecutionLanes = 11,
        BucketListSizeWindow = 12,
        EvictionIterator = 13,
        ContractParallelComputeV0 = 14,
        ContractLedgerCostExtV0 = 15,
        ScpTiming = 16,
    }
}

/// Writes each named field in order with the matching writer call.
macro_rules! flat_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* pub $field:ident : $ty:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty ),+
        }

        impl XdrCodec for $name {
            fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
                $( self.$field.encode(w)?; )+
                Ok(())
            }

            fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
                Ok(Self {
                    $( $field: <$ty as XdrCodec>::decode(r)?, )+
                })
            }
        }
    };
}

flat_record! {
    /// Instruction limits and pricing.
    pub struct ConfigSettingContractComputeV0 {
        pub ledger_max_instructions: i64,
        pub tx_max_instructions: i64,
        /// Fee per 10,000 instructions.
        pub fee_rate_per_instructions_increment: i64,
        pub tx_memory_limit: u32,
    }
}

flat_record! {
    /// Ledger read/write limits and fees.
    pub struct ConfigSettingContractLedgerCostV0 {
        pub ledger_max_read_ledger_entries: u32,
        pub ledger_max_read_bytes: u32,
        pub ledger_max_write_ledger_entries: u32,
        pub ledger_max_write_bytes: u32,
        pub tx_max_read_ledger_entries: u32,
        pub tx_max_read_bytes: u32,
        pub tx_max_write_ledger_entries: u32,
        pub tx_max_write_bytes: u32,
        pub fee_read_ledger_entry: i64,
        pub fee_write_ledger_entry: i64,
        pub fee_read_1kb: i64,
        pub bucket_list_target_size_bytes: i64,
        pub write_fee_1kb_bucket_list_low: i64,
        pub write_fee_1kb_bucket_list_high: i64,
        pub bucket_list_write_fee_growth_factor: u32,
    }
}

flat_record! {
    pub struct ConfigSettingContractHistoricalDataV0 {
        pub fee_historical_1kb: i64,
    }
}

flat_record! {
    pub struct ConfigSettingContractEventsV0 {
        pub tx_max_contract_events_size_bytes: u32,
        pub fee_contract_events_1kb: i64,
    }
}

flat_record! {
    pub struct ConfigSettingContractBandwidthV0 {
        pub ledger_max_txs_size_bytes: u32,
        pub tx_max_size_bytes: u32,
        pub fee_tx_size_1kb: i64,
    }
}

flat_record! {
    /// How often (and how much) expired state is archived.
    pub struct StateArchivalSettings {
        pub max_entry_ttl: u32,
        pub min_temporary_ttl: u32,
        pub min_persistent_ttl: u32,
        pub persistent_rent_rate_denominator: i64,
        pub temp_rent_rate_denominator: i64,
        pub max_entries_to_archive: u32,
        pub bucket_list_size_window_sample_size: u32,
        pub bucket_list_window_sample_period: u32,
        pub eviction_scan_size: u32,
        pub starting_eviction_scan_level: u32,
    }
}

flat_record! {
    pub struct ConfigSettingContractExecutionLanesV0 {
        pub ledger_max_tx_count: u32,
    }
}

flat_record! {
    /// Where the eviction scan left off.
    pub struct EvictionIterator {
        pub bucket_list_level: u32,
        pub is_curr_bucket: bool,
        pub bucket_file_offset: u64,
    }
}

flat_record! {
    pub struct ConfigSettingContractParallelComputeV0 {
        pub ledger_max_dependent_tx_clusters: u32,
    }
}

flat_record! {
    pub struct ConfigSettingContractLedgerCostExtV0 {
        pub tx_max_footprint_entries: u32,
        pub fee_write_1kb: i64,
    }
}

flat_record! {
    /// Consensus round timing, in milliseconds.
    pub struct ConfigSettingScpTiming {
        pub ledger_target_close_time_milliseconds: u32,
        pub nomination_timeout_initial_milliseconds: u32,
        pub nomination_timeout_increment_milliseconds: u32,
        pub ballot_timeout_initial_milliseconds: u32,
        pub ballot_timeout_increment_milliseconds: u32,
    }
}

/// One linear cost model term: `const_term + linear_term * input`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractCostParamEntry {
    pub ext: ExtensionPoint,
    pub const_term: i64,
    pub linear_term: i64,
}

impl XdrCodec for ContractCostParamEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.ext.encode(w)?;
        w.write_i64(self.const_term);
        w.write_i64(self.linear_term);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: ExtensionPoint::decode(r)?,
            const_term: r.read_i64()?,
            linear_term: r.read_i64()?,
        })
    }
}

// ---------------------------------------------------------------------------
// ConfigSettingEntry
// ---------------------------------------------------------------------------

/// A single network setting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSettingEntry {
    ContractMaxSizeBytes(u32),
    ContractComputeV0(ConfigSettingContractComputeV0),
    ContractLedgerCostV0(ConfigSettingContractLedgerCostV0),
    ContractHistoricalDataV0(ConfigSettingContractHistoricalDataV0),
    ContractEventsV0(ConfigSettingContractEventsV0),
    ContractBandwidthV0(ConfigSettingContractBandwidthV0),
    ContractCostParamsCpuInstructions(Vec<ContractCostParamEntry>),
    ContractCostParamsMemoryBytes(Vec<ContractCostParamEntry>),
    ContractDataKeySizeBytes(u32),
    ContractDataEntrySizeBytes(u32),
    StateArchival(StateArchivalSettings),
    ContractExecutionLanes(ConfigSettingContractExecutionLanesV0),
    BucketListSizeWindow(Vec<u64>),
    EvictionIterator(EvictionIterator),
    ContractParallelComputeV0(ConfigSettingContractParallelComputeV0),
    ContractLedgerCostExtV0(ConfigSettingContractLedgerCostExtV0),
    ScpTiming(ConfigSettingScpTiming),
}

impl ConfigSettingEntry {
    pub fn id(&self) -> ConfigSettingId {
        match self {
            Self::ContractMaxSizeBytes(_) => ConfigSettingId::ContractMaxSizeBytes,
            Self::ContractComputeV0(_) => ConfigSettingId::ContractComputeV0,
            Self::ContractLedgerCostV0(_) => ConfigSettingId::ContractLedgerCostV0,
            Self::ContractHistoricalDataV0(_) => ConfigSettingId::ContractHistoricalDataV0,
            Self::ContractEventsV0(_) => ConfigSettingId::ContractEventsV0,
            Self::ContractBandwidthV0(_) => ConfigSettingId::ContractBandwidthV0,
            Self::ContractCostParamsCpuInstructions(_) => ConfigSettingId::ContractCostParamsCpuInstructions,
            Self::ContractCostParamsMemoryBytes(_) => ConfigSettingId::ContractCostParamsMemoryBytes,
            Self::ContractDataKeySizeBytes(_) => ConfigSettingId::ContractDataKeySizeBytes,
            Self::ContractDataEntrySizeBytes(_) => ConfigSettingId::ContractDataEntrySizeBytes,
            Self::StateArchival(_) => ConfigSettingId::StateArchival,
            Self::ContractExecutionLanes(_) => ConfigSettingId::ContractExecutionLanes,
            Self::BucketListSizeWindow(_) => ConfigSettingId::BucketListSizeWindow,
            Self::EvictionIterator(_) => ConfigSettingId::EvictionIterator,
            Self::ContractParallelComputeV0(_) => ConfigSettingId::ContractParallelComputeV0,
            Self::ContractLedgerCostExtV0(_) => ConfigSettingId::ContractLedgerCostExtV0,
            Self::ScpTiming(_) => ConfigSettingId::ScpTiming,
        }
    }
}

impl XdrCodec for ConfigSettingEntry {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.id().encode(w)?;
        match self {
            Self::ContractMaxSizeBytes(v)
            | Self::ContractDataKeySizeBytes(v)
            | Self::ContractDataEntrySizeBytes(v) => w.write_u32(*v),
            Self::ContractComputeV0(v) => v.encode(w)?,
            Self::ContractLedgerCostV0(v) => v.encode(w)?,
            Self::ContractHistoricalDataV0(v) => v.encode(w)?,
            Self::ContractEventsV0(v) => v.encode(w)?,
            Self::ContractBandwidthV0(v) => v.encode(w)?,
            Self::ContractCostParamsCpuInstructions(p) | Self::ContractCostParamsMemoryBytes(p) => {
                w.write_array(p, MAX_CONTRACT_COST_PARAMS, "contract_cost_params")?
            }
            Self::StateArchival(v) => v.encode(w)?,
            Self::ContractExecutionLanes(v) => v.encode(w)?,
            Self::BucketListSizeWindow(v) => w.write_array(v, UNBOUNDED, "bucket_list_size_window")?,
            Self::EvictionIterator(v) => v.encode(w)?,
            Self::ContractParallelComputeV0(v) => v.encode(w)?,
            Self::ContractLedgerCostExtV0(v) => v.encode(w)?,
            Self::ScpTiming(v) => v.encode(w)?,
        }
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        let value = r.read_discriminant()?;
        let id = ConfigSettingId::from_i32(value).ok_or_else(|| XdrError::unknown("ConfigSettingId", value))?;
        Ok(match id {
            ConfigSettingId::ContractMaxSizeBytes => Self::ContractMaxSizeBytes(r.read_u32()?),
            ConfigSettingId::ContractComputeV0 => Self::ContractComputeV0(XdrCodec::decode(r)?),
            ConfigSettingId::ContractLedgerCostV0 => Self::ContractLedgerCostV0(XdrCodec::decode(r)?),
            ConfigSettingId::ContractHistoricalDataV0 => Self::ContractHistoricalDataV0(XdrCodec::decode(r)?),
            ConfigSettingId::ContractEventsV0 => Self::ContractEventsV0(XdrCodec::decode(r)?),
            ConfigSettingId::ContractBandwidthV0 => Self::ContractBandwidthV0(XdrCodec::decode(r)?),
            ConfigSettingId::ContractCostParamsCpuInstructions => Self::ContractCostParamsCpuInstructions(
                r.read_array(MAX_CONTRACT_COST_PARAMS, "ContractCostParams")?,
            ),
            ConfigSettingId::ContractCostParamsMemoryBytes => Self::ContractCostParamsMemoryBytes(
                r.read_array(MAX_CONTRACT_COST_PARAMS, "ContractCostParams")?,
            ),
            ConfigSettingId::ContractDataKeySizeBytes => Self::ContractDataKeySizeBytes(r.read_u32()?),
            ConfigSettingId::ContractDataEntrySizeBytes => Self::ContractDataEntrySizeBytes(r.read_u32()?),
            ConfigSettingId::StateArchival => Self::StateArchival(XdrCodec::decode(r)?),
            ConfigSettingId::ContractExecutionLanes => Self::ContractExecutionLanes(XdrCodec::decode(r)?),
            ConfigSettingId::BucketListSizeWindow => {
                Self::BucketListSizeWindow(r.read_array(UNBOUNDED, "BucketListSizeWindow")?)
            }
            ConfigSettingId::EvictionIterator => Self::EvictionIterator(XdrCodec::decode(r)?),
            ConfigSettingId::ContractParallelComputeV0 => Self::ContractParallelComputeV0(XdrCodec::decode(r)?),
            ConfigSettingId::ContractLedgerCostExtV0 => Self::ContractLedgerCostExtV0(XdrCodec::decode(r)?),
            ConfigSettingId::ScpTiming => Self::ScpTiming(XdrCodec::decode(r)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<ConfigSettingEntry> {
        vec![
            ConfigSettingEntry::ContractMaxSizeBytes(65_536),
            ConfigSettingEntry::ContractComputeV0(ConfigSettingContractComputeV0 {
                ledger_max_instructions: 100_000_000,
                tx_max_instructions: i64::MAX,
                fee_rate_per_instructions_increment: 25,
                tx_memory_limit: 41_943_040,
            }),
            ConfigSettingEntry::ContractLedgerCostV0(ConfigSettingContractLedgerCostV0 {
                bucket_list_write_fee_growth_factor: 1000,
                fee_read_1kb: 1786,
                ..Default::default()
            }),
            ConfigSettingEntry::ContractHistoricalDataV0(ConfigSettingContractHistoricalDataV0 {
                fee_historical_1kb: 16_235,
            }),
            ConfigSettingEntry::ContractEventsV0(Default::default()),
            ConfigSettingEntry::ContractBandwidthV0(Default::default()),
            ConfigSettingEntry::ContractCostParamsCpuInstructions(vec![
                ContractCostParamEntry {
                    ext: ExtensionPoint,
                    const_term: 4,
                    linear_term: 0,
                };
                3
            ]),
            ConfigSettingEntry::ContractCostParamsMemoryBytes(vec![]),
            ConfigSettingEntry::ContractDataKeySizeBytes(250),
            ConfigSettingEntry::ContractDataEntrySizeBytes(65_536),
            ConfigSettingEntry::StateArchival(StateArchivalSettings {
                max_entry_ttl: 3_110_400,
                min_temporary_ttl: 17_280,
                min_persistent_ttl: 2_073_600,
                ..Default::default()
            }),
            ConfigSettingEntry::ContractExecutionLanes(ConfigSettingContractExecutionLanesV0 {
                ledger_max_tx_count: 100,
            }),
            ConfigSettingEntry::BucketListSizeWindow(vec![0, u64::MAX, 12_345]),
            ConfigSettingEntry::EvictionIterator(EvictionIterator {
                bucket_list_level: 6,
                is_curr_bucket: true,
                bucket_file_offset: 1 << 40,
            }),
            ConfigSettingEntry::ContractParallelComputeV0(Default::default()),
            ConfigSettingEntry::ContractLedgerCostExtV0(ConfigSettingContractLedgerCostExtV0 {
                tx_max_footprint_entries: 100,
                fee_write_1kb: 3_500,
            }),
            ConfigSettingEntry::ScpTiming(ConfigSettingScpTiming {
                ledger_target_close_time_milliseconds: 5_000,
                nomination_timeout_initial_milliseconds: 1_000,
                nomination_timeout_increment_milliseconds: 1_000,
                ballot_timeout_initial_milliseconds: 1_000,
                ballot_timeout_increment_milliseconds: 1_000,
            }),
        ]
    }

    #[test]
    fn every_setting_round_trips() {
        let all = samples();
        assert_eq!(all.len(), ConfigSettingId::VARIANTS.len());
        for entry in all {
            let bytes = entry.to_xdr().unwrap();
            assert_eq!(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), entry.id().as_i32());
            assert_eq!(ConfigSettingEntry::from_xdr(&bytes).unwrap(), entry);
        }
    }

    #[test]
    fn unknown_setting_id() {
        assert_eq!(
            ConfigSettingEntry::from_xdr(&[0, 0, 0, 17]),
            Err(XdrError::unknown("ConfigSettingId", 17))
        );
    }

    #[test]
    fn eviction_iterator_bool_must_be_strict() {
        let bytes = [0, 0, 0, 13, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            ConfigSettingEntry::from_xdr(&bytes),
            Err(XdrError::Malformed { kind: "bool", .. })
        ));
    }

    #[test]
    fn cost_params_are_bounded() {
        let too_many = ConfigSettingEntry::ContractCostParamsCpuInstructions(vec![
            ContractCostParamEntry::default();
            MAX_CONTRACT_COST_PARAMS as usize + 1
        ]);
        assert!(matches!(too_many.to_xdr(), Err(XdrError::Validation { .. })));
    }
}
