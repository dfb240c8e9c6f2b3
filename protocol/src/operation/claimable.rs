//! Claimable balances: create, claim, claw back.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::config::MAX_CLAIMANTS;
use crate::ledger::asset::Asset;
use crate::ledger::claim::{check_claimants, ClaimableBalanceId, Claimant};
use crate::xdr::{XdrCodec, XdrReader, XdrResult, XdrWriter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreateClaimableBalanceOp {
    pub asset: Asset,
    pub amount: Amount,
    /// One to ten claimants.
    pub claimants: Vec<Claimant>,
}

impl CreateClaimableBalanceOp {
    pub fn new(asset: Asset, amount: Amount, claimants: Vec<Claimant>) -> XdrResult<Self> {
        let op = Self {
            asset,
            amount,
            claimants,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.asset.validate()?;
        self.amount.require_positive("amount")?;
        check_claimants(&self.claimants)
    }
}

impl XdrCodec for CreateClaimableBalanceOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.asset.encode(w)?;
        self.amount.encode(w)?;
        w.write_array(&self.claimants, MAX_CLAIMANTS, "claimants")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            asset: Asset::decode(r)?,
            amount: Amount::decode(r)?,
            claimants: r.read_array(MAX_CLAIMANTS, "CreateClaimableBalanceOp.claimants")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimClaimableBalanceOp {
    pub balance_id: ClaimableBalanceId,
}

impl XdrCodec for ClaimClaimableBalanceOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.balance_id.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            balance_id: ClaimableBalanceId::decode(r)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClawbackClaimableBalanceOp {
    pub balance_id: ClaimableBalanceId,
}

impl XdrCodec for ClawbackClaimableBalanceOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.balance_id.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            balance_id: ClaimableBalanceId::decode(r)?,
        })
    }
}
