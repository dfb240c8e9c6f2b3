//! Resource declarations attached to a contract transaction: which ledger
//! keys it reads and writes, and the limits it pays for.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::config::UNBOUNDED;
use crate::ledger::key::LedgerKey;
use crate::xdr::{read_extension, write_extension, XdrCodec, XdrReader, XdrResult, XdrWriter};

/// The keys an invocation touches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerFootprint {
    pub read_only: Vec<LedgerKey>,
    pub read_write: Vec<LedgerKey>,
}

impl LedgerFootprint {
    pub fn contains(&self, key: &LedgerKey) -> bool {
        self.read_only.contains(key) || self.read_write.contains(key)
    }
}

impl XdrCodec for LedgerFootprint {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_array(&self.read_only, UNBOUNDED, "read_only")?;
        w.write_array(&self.read_write, UNBOUNDED, "read_write")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            read_only: r.read_array(UNBOUNDED, "LedgerFootprint.readOnly")?,
            read_write: r.read_array(UNBOUNDED, "LedgerFootprint.readWrite")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SorobanResources {
    pub footprint: LedgerFootprint,
    pub instructions: u32,
    pub disk_read_bytes: u32,
    pub write_bytes: u32,
}

impl XdrCodec for SorobanResources {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.footprint.encode(w)?;
        w.write_u32(self.instructions);
        w.write_u32(self.disk_read_bytes);
        w.write_u32(self.write_bytes);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            footprint: LedgerFootprint::decode(r)?,
            instructions: r.read_u32()?,
            disk_read_bytes: r.read_u32()?,
            write_bytes: r.read_u32()?,
        })
    }
}

/// Indices into the read-write footprint of archived entries to restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SorobanResourcesExtV0 {
    pub archived_soroban_entries: Vec<u32>,
}

impl XdrCodec for SorobanResourcesExtV0 {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_array(&self.archived_soroban_entries, UNBOUNDED, "archived_soroban_entries")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            archived_soroban_entries: r.read_array(UNBOUNDED, "SorobanResourcesExtV0.archivedSorobanEntries")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SorobanTransactionData {
    pub ext: Option<SorobanResourcesExtV0>,
    pub resources: SorobanResources,
    /// Fee reserved for resources, in stroops of the native asset.
    pub resource_fee: Amount,
}

impl XdrCodec for SorobanTransactionData {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        write_extension(w, 1, self.ext.as_ref())?;
        self.resources.encode(w)?;
        self.resource_fee.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            ext: read_extension(r, 1, "SorobanTransactionData.ext")?,
            resources: SorobanResources::decode(r)?,
            resource_fee: Amount::decode(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::Hash;
    use crate::identity::{ContractId, ScAddress};

    #[test]
    fn transaction_data_round_trips() {
        let contract = ScAddress::Contract(ContractId(Hash([1; 32])));
        let instance = LedgerKey::contract_instance(contract);
        let data = SorobanTransactionData {
            ext: Some(SorobanResourcesExtV0 {
                archived_soroban_entries: vec![0],
            }),
            resources: SorobanResources {
                footprint: LedgerFootprint {
                    read_only: vec![LedgerKey::contract_code(Hash([2; 32]))],
                    read_write: vec![instance.clone()],
                },
                instructions: 5_000_000,
                disk_read_bytes: 2_048,
                write_bytes: 1_024,
            },
            resource_fee: Amount::from_stroops(90_000),
        };
        assert!(data.resources.footprint.contains(&instance));
        let b64 = data.to_xdr_base64().unwrap();
        assert_eq!(SorobanTransactionData::from_xdr_base64(&b64).unwrap(), data);
    }

    #[test]
    fn empty_data_is_minimal() {
        let bytes = SorobanTransactionData::default().to_xdr().unwrap();
        // ext 0, two empty arrays, three u32s, one i64
        assert_eq!(bytes.len(), 4 + 8 + 12 + 8);
        assert!(bytes.iter().all(|b| *b == 0));
    }
}
