//! Trust lines: opening and limiting them, issuer authorization flags, and
//! clawback.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::identity::{AccountId, MuxedAccount};
use crate::ledger::asset::{Asset, ChangeTrustAsset};
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

/// Trust line flags, as set and cleared by [`SetTrustLineFlagsOp`].
pub mod flags {
    pub const AUTHORIZED: u32 = 0x1;
    pub const AUTHORIZED_TO_MAINTAIN_LIABILITIES: u32 = 0x2;
    pub const CLAWBACK_ENABLED: u32 = 0x4;

    pub const MASK: u32 = AUTHORIZED | AUTHORIZED_TO_MAINTAIN_LIABILITIES | CLAWBACK_ENABLED;
}

fn require_credit(field: &'static str, asset: &Asset) -> XdrResult<()> {
    if *asset == Asset::Native {
        return Err(XdrError::validation(field, "the native asset has no issuer"));
    }
    asset.validate()
}

// ---------------------------------------------------------------------------
// ChangeTrust
// ---------------------------------------------------------------------------

/// Creates, updates or (with limit 0) removes a trust line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeTrustOp {
    pub line: ChangeTrustAsset,
    pub limit: Amount,
}

impl ChangeTrustOp {
    /// Trust with the maximum limit.
    pub fn new(line: impl Into<ChangeTrustAsset>) -> XdrResult<Self> {
        Self::with_limit(line, Amount::MAX)
    }

    pub fn with_limit(line: impl Into<ChangeTrustAsset>, limit: Amount) -> XdrResult<Self> {
        let op = Self {
            line: line.into(),
            limit,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        if self.line == ChangeTrustAsset::Native {
            return Err(XdrError::validation("line", "cannot trust the native asset"));
        }
        self.line.validate()?;
        self.limit.require_non_negative("limit")
    }
}

impl XdrCodec for ChangeTrustOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.line.encode(w)?;
        self.limit.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            line: ChangeTrustAsset::decode(r)?,
            limit: Amount::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// SetTrustLineFlags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetTrustLineFlagsOp {
    pub trustor: AccountId,
    pub asset: Asset,
    pub clear_flags: u32,
    pub set_flags: u32,
}

impl SetTrustLineFlagsOp {
    pub fn new(trustor: AccountId, asset: Asset, clear_flags: u32, set_flags: u32) -> XdrResult<Self> {
        let op = Self {
            trustor,
            asset,
            clear_flags,
            set_flags,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        require_credit("asset", &self.asset)?;
        for (field, bits) in [("clear_flags", self.clear_flags), ("set_flags", self.set_flags)] {
            if bits & !flags::MASK != 0 {
                return Err(XdrError::validation(field, format!("unknown flag bits {:#x}", bits)));
            }
        }
        if self.clear_flags & self.set_flags != 0 {
            return Err(XdrError::validation("set_flags", "a flag cannot be both set and cleared"));
        }
        Ok(())
    }
}

impl XdrCodec for SetTrustLineFlagsOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.trustor.encode(w)?;
        self.asset.encode(w)?;
        w.write_u32(self.clear_flags);
        w.write_u32(self.set_flags);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            trustor: AccountId::decode(r)?,
            asset: Asset::decode(r)?,
            clear_flags: r.read_u32()?,
            set_flags: r.read_u32()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Clawback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClawbackOp {
    pub asset: Asset,
    pub from: MuxedAccount,
    pub amount: Amount,
}

impl ClawbackOp {
    pub fn new(asset: Asset, from: impl Into<MuxedAccount>, amount: Amount) -> XdrResult<Self> {
        let op = Self {
            asset,
            from: from.into(),
            amount,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        require_credit("asset", &self.asset)?;
        self.amount.require_positive("amount")
    }
}

impl XdrCodec for ClawbackOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.asset.encode(w)?;
        self.from.encode(w)?;
        self.amount.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            asset: Asset::decode(r)?,
            from: MuxedAccount::decode(r)?,
            amount: Amount::decode(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::asset::LiquidityPoolParameters;

    fn account() -> AccountId {
        "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ"
            .parse()
            .unwrap()
    }

    fn usd() -> Asset {
        Asset::credit("USD", account()).unwrap()
    }

    #[test]
    fn change_trust_defaults_to_max_limit() {
        let op = ChangeTrustOp::new(usd()).unwrap();
        assert_eq!(op.limit, Amount::MAX);
        assert_eq!(ChangeTrustOp::from_xdr(&op.to_xdr().unwrap()).unwrap(), op);
    }

    #[test]
    fn change_trust_in_pool_shares() {
        let params = LiquidityPoolParameters::new(Asset::Native, usd()).unwrap();
        let op = ChangeTrustOp::with_limit(ChangeTrustAsset::PoolShare(params), Amount::parse("1000").unwrap()).unwrap();
        assert_eq!(ChangeTrustOp::from_xdr(&op.to_xdr().unwrap()).unwrap(), op);
    }

    #[test]
    fn native_is_rejected() {
        assert!(ChangeTrustOp::new(Asset::Native).is_err());
        assert!(ClawbackOp::new(Asset::Native, account(), Amount::from_stroops(1)).is_err());
        assert!(SetTrustLineFlagsOp::new(account(), Asset::Native, 0, flags::AUTHORIZED).is_err());
    }

    #[test]
    fn trust_line_flags() {
        let op = SetTrustLineFlagsOp::new(account(), usd(), flags::CLAWBACK_ENABLED, flags::AUTHORIZED).unwrap();
        assert_eq!(SetTrustLineFlagsOp::from_xdr(&op.to_xdr().unwrap()).unwrap(), op);
        assert!(SetTrustLineFlagsOp::new(account(), usd(), flags::AUTHORIZED, flags::AUTHORIZED).is_err());
        assert!(SetTrustLineFlagsOp::new(account(), usd(), 0, 0x8).is_err());
    }

    #[test]
    fn clawback_round_trips() {
        let op = ClawbackOp::new(usd(), account(), Amount::from_stroops(5)).unwrap();
        assert_eq!(ClawbackOp::from_xdr(&op.to_xdr().unwrap()).unwrap(), op);
        assert!(ClawbackOp::new(usd(), account(), Amount::ZERO).is_err());
    }
}
