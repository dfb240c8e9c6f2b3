//! Account lifecycle and settings: creation, options, data entries,
//! sequence bumps and reserve sponsorship.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::config::{MAX_DATA_NAME_LENGTH, MAX_DATA_VALUE_LENGTH, MAX_HOME_DOMAIN_LENGTH};
use crate::identity::signer::check_weight;
use crate::identity::{AccountId, Signer, SignerKey};
use crate::ledger::key::{check_data_name, LedgerKey};
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

/// Account flags, as set and cleared by [`SetOptionsOp`].
pub mod flags {
    pub const AUTH_REQUIRED: u32 = 0x1;
    pub const AUTH_REVOCABLE: u32 = 0x2;
    pub const AUTH_IMMUTABLE: u32 = 0x4;
    pub const AUTH_CLAWBACK_ENABLED: u32 = 0x8;

    pub const MASK: u32 = AUTH_REQUIRED | AUTH_REVOCABLE | AUTH_IMMUTABLE | AUTH_CLAWBACK_ENABLED;
}

// ---------------------------------------------------------------------------
// CreateAccount, BumpSequence, sponsorship
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreateAccountOp {
    pub destination: AccountId,
    pub starting_balance: Amount,
}

impl CreateAccountOp {
    pub fn new(destination: AccountId, starting_balance: Amount) -> XdrResult<Self> {
        let op = Self {
            destination,
            starting_balance,
        };
        op.validate()?;
        Ok(op)
    }

    /// A zero starting balance is allowed when the reserve is sponsored.
    pub fn validate(&self) -> XdrResult<()> {
        self.starting_balance.require_non_negative("starting_balance")
    }
}

impl XdrCodec for CreateAccountOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.destination.encode(w)?;
        self.starting_balance.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            destination: AccountId::decode(r)?,
            starting_balance: Amount::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BumpSequenceOp {
    pub bump_to: i64,
}

impl BumpSequenceOp {
    pub fn new(bump_to: i64) -> XdrResult<Self> {
        let op = Self { bump_to };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        if self.bump_to < 0 {
            return Err(XdrError::validation("bump_to", format!("{} is negative", self.bump_to)));
        }
        Ok(())
    }
}

impl XdrCodec for BumpSequenceOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        w.write_i64(self.bump_to);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self { bump_to: r.read_i64()? })
    }
}

/// Starts paying reserves for entries `sponsored_id` creates, until a
/// matching `EndSponsoringFutureReserves`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeginSponsoringFutureReservesOp {
    pub sponsored_id: AccountId,
}

impl BeginSponsoringFutureReservesOp {
    pub fn new(sponsored_id: AccountId) -> Self {
        Self { sponsored_id }
    }
}

impl XdrCodec for BeginSponsoringFutureReservesOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.sponsored_id.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            sponsored_id: AccountId::decode(r)?,
        })
    }
}

const REVOKE_SPONSORSHIP_LEDGER_ENTRY: i32 = 0;
const REVOKE_SPONSORSHIP_SIGNER: i32 = 1;

/// Transfers or removes sponsorship of a ledger entry or a signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevokeSponsorshipOp {
    LedgerEntry(LedgerKey),
    Signer {
        account_id: AccountId,
        signer_key: SignerKey,
    },
}

impl RevokeSponsorshipOp {
    pub fn ledger_entry(key: LedgerKey) -> XdrResult<Self> {
        let op = Self::LedgerEntry(key);
        op.validate()?;
        Ok(op)
    }

    pub fn signer(account_id: AccountId, signer_key: SignerKey) -> XdrResult<Self> {
        let op = Self::Signer {
            account_id,
            signer_key,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        match self {
            Self::LedgerEntry(LedgerKey::Data { data_name, .. }) => check_data_name(data_name),
            Self::LedgerEntry(_) => Ok(()),
            Self::Signer { signer_key, .. } => signer_key.validate(),
        }
    }
}

impl XdrCodec for RevokeSponsorshipOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        match self {
            Self::LedgerEntry(key) => {
                w.write_discriminant(REVOKE_SPONSORSHIP_LEDGER_ENTRY);
                key.encode(w)
            }
            Self::Signer {
                account_id,
                signer_key,
            } => {
                w.write_discriminant(REVOKE_SPONSORSHIP_SIGNER);
                account_id.encode(w)?;
                signer_key.encode(w)
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            REVOKE_SPONSORSHIP_LEDGER_ENTRY => LedgerKey::decode(r).map(Self::LedgerEntry),
            REVOKE_SPONSORSHIP_SIGNER => Ok(Self::Signer {
                account_id: AccountId::decode(r)?,
                signer_key: SignerKey::decode(r)?,
            }),
            v => Err(XdrError::unknown("RevokeSponsorshipType", v)),
        }
    }
}

// ---------------------------------------------------------------------------
// SetOptions
// ---------------------------------------------------------------------------

/// Changes account settings. Every field is optional; unset fields are left
/// as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetOptionsOp {
    pub inflation_dest: Option<AccountId>,
    pub clear_flags: Option<u32>,
    pub set_flags: Option<u32>,
    pub master_weight: Option<u32>,
    pub low_threshold: Option<u32>,
    pub med_threshold: Option<u32>,
    pub high_threshold: Option<u32>,
    /// Up to 32 bytes; an empty string clears it.
    pub home_domain: Option<String>,
    /// Adds, updates, or (with weight 0) removes a signer.
    pub signer: Option<Signer>,
}

impl SetOptionsOp {
    /// An op that changes nothing. Each `with_*` setter checks its input.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inflation_dest(mut self, dest: AccountId) -> Self {
        self.inflation_dest = Some(dest);
        self
    }

    pub fn with_clear_flags(mut self, bits: u32) -> XdrResult<Self> {
        self.clear_flags = Some(bits);
        self.validate()?;
        Ok(self)
    }

    pub fn with_set_flags(mut self, bits: u32) -> XdrResult<Self> {
        self.set_flags = Some(bits);
        self.validate()?;
        Ok(self)
    }

    pub fn with_master_weight(mut self, weight: u32) -> XdrResult<Self> {
        self.master_weight = Some(weight);
        self.validate()?;
        Ok(self)
    }

    pub fn with_thresholds(mut self, low: u32, med: u32, high: u32) -> XdrResult<Self> {
        self.low_threshold = Some(low);
        self.med_threshold = Some(med);
        self.high_threshold = Some(high);
        self.validate()?;
        Ok(self)
    }

    pub fn with_home_domain(mut self, domain: impl Into<String>) -> XdrResult<Self> {
        self.home_domain = Some(domain.into());
        self.validate()?;
        Ok(self)
    }

    pub fn with_signer(mut self, signer: Signer) -> XdrResult<Self> {
        self.signer = Some(signer);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> XdrResult<()> {
        for (field, bits) in [("clear_flags", self.clear_flags), ("set_flags", self.set_flags)] {
            if let Some(v) = bits {
                if v & !flags::MASK != 0 {
                    return Err(XdrError::validation(field, format!("unknown flag bits {:#x}", v)));
                }
            }
        }
        for (field, weight) in [
            ("master_weight", self.master_weight),
            ("low_threshold", self.low_threshold),
            ("med_threshold", self.med_threshold),
            ("high_threshold", self.high_threshold),
        ] {
            if let Some(w) = weight {
                check_weight(field, w)?;
            }
        }
        if let Some(domain) = &self.home_domain {
            if domain.len() > MAX_HOME_DOMAIN_LENGTH as usize {
                return Err(XdrError::validation(
                    "home_domain",
                    format!("{} bytes, at most {}", domain.len(), MAX_HOME_DOMAIN_LENGTH),
                ));
            }
        }
        if let Some(signer) = &self.signer {
            signer.validate()?;
        }
        Ok(())
    }
}

impl XdrCodec for SetOptionsOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        w.write_optional(self.inflation_dest.as_ref())?;
        w.write_optional(self.clear_flags.as_ref())?;
        w.write_optional(self.set_flags.as_ref())?;
        w.write_optional(self.master_weight.as_ref())?;
        w.write_optional(self.low_threshold.as_ref())?;
        w.write_optional(self.med_threshold.as_ref())?;
        w.write_optional(self.high_threshold.as_ref())?;
        match &self.home_domain {
            Some(domain) => {
                w.write_bool(true);
                w.write_string(domain, MAX_HOME_DOMAIN_LENGTH, "home_domain")?;
            }
            None => w.write_bool(false),
        }
        w.write_optional(self.signer.as_ref())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            inflation_dest: r.read_optional()?,
            clear_flags: r.read_optional()?,
            set_flags: r.read_optional()?,
            master_weight: r.read_optional()?,
            low_threshold: r.read_optional()?,
            med_threshold: r.read_optional()?,
            high_threshold: r.read_optional()?,
            home_domain: if r.read_bool()? {
                Some(r.read_string(MAX_HOME_DOMAIN_LENGTH, "HomeDomain")?)
            } else {
                None
            },
            signer: r.read_optional()?,
        })
    }
}

// ---------------------------------------------------------------------------
// ManageData
// ---------------------------------------------------------------------------

/// Sets, or with no value deletes, a named data entry on the account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManageDataOp {
    pub data_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_hex")]
    pub data_value: Option<Vec<u8>>,
}

impl ManageDataOp {
    pub fn new(data_name: impl Into<String>, data_value: Option<Vec<u8>>) -> XdrResult<Self> {
        let op = Self {
            data_name: data_name.into(),
            data_value,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        check_data_name(&self.data_name)?;
        if let Some(value) = &self.data_value {
            if value.len() > MAX_DATA_VALUE_LENGTH as usize {
                return Err(XdrError::validation(
                    "data_value",
                    format!("{} bytes, at most {}", value.len(), MAX_DATA_VALUE_LENGTH),
                ));
            }
        }
        Ok(())
    }
}

impl XdrCodec for ManageDataOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        w.write_string(&self.data_name, MAX_DATA_NAME_LENGTH, "data_name")?;
        match &self.data_value {
            Some(value) => {
                w.write_bool(true);
                w.write_var_opaque(value, MAX_DATA_VALUE_LENGTH, "data_value")
            }
            None => {
                w.write_bool(false);
                Ok(())
            }
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            data_name: r.read_string(MAX_DATA_NAME_LENGTH, "DataName")?,
            data_value: if r.read_bool()? {
                Some(r.read_var_opaque(MAX_DATA_VALUE_LENGTH, "DataValue")?)
            } else {
                None
            },
        })
    }
}

mod optional_hex {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        value.as_ref().map(hex::encode).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(hex::decode)
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
