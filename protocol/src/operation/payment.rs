//! Payments: direct, and path payments through the order books.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::config::MAX_PATH_LENGTH;
use crate::identity::MuxedAccount;
use crate::ledger::asset::Asset;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

fn check_path(path: &[Asset]) -> XdrResult<()> {
    if path.len() > MAX_PATH_LENGTH as usize {
        return Err(XdrError::validation(
            "path",
            format!("{} hops, at most {} allowed", path.len(), MAX_PATH_LENGTH),
        ));
    }
    path.iter().try_for_each(Asset::validate)
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentOp {
    pub destination: MuxedAccount,
    pub asset: Asset,
    pub amount: Amount,
}

impl PaymentOp {
    pub fn new(destination: impl Into<MuxedAccount>, asset: Asset, amount: Amount) -> XdrResult<Self> {
        let op = Self {
            destination: destination.into(),
            asset,
            amount,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.asset.validate()?;
        self.amount.require_positive("amount")
    }
}

impl XdrCodec for PaymentOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.destination.encode(w)?;
        self.asset.encode(w)?;
        self.amount.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            destination: MuxedAccount::decode(r)?,
            asset: Asset::decode(r)?,
            amount: Amount::decode(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Path payments
// ---------------------------------------------------------------------------

/// Deliver exactly `dest_amount`, spending at most `send_max`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathPaymentStrictReceiveOp {
    pub send_asset: Asset,
    pub send_max: Amount,
    pub destination: MuxedAccount,
    pub dest_asset: Asset,
    pub dest_amount: Amount,
    /// Intermediate assets, at most five.
    pub path: Vec<Asset>,
}

impl PathPaymentStrictReceiveOp {
    pub fn new(
        send_asset: Asset,
        send_max: Amount,
        destination: impl Into<MuxedAccount>,
        dest_asset: Asset,
        dest_amount: Amount,
        path: Vec<Asset>,
    ) -> XdrResult<Self> {
        let op = Self {
            send_asset,
            send_max,
            destination: destination.into(),
            dest_asset,
            dest_amount,
            path,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.send_asset.validate()?;
        self.dest_asset.validate()?;
        self.send_max.require_positive("send_max")?;
        self.dest_amount.require_positive("dest_amount")?;
        check_path(&self.path)
    }
}

impl XdrCodec for PathPaymentStrictReceiveOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.send_asset.encode(w)?;
        self.send_max.encode(w)?;
        self.destination.encode(w)?;
        self.dest_asset.encode(w)?;
        self.dest_amount.encode(w)?;
        w.write_array(&self.path, MAX_PATH_LENGTH, "path")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            send_asset: Asset::decode(r)?,
            send_max: Amount::decode(r)?,
            destination: MuxedAccount::decode(r)?,
            dest_asset: Asset::decode(r)?,
            dest_amount: Amount::decode(r)?,
            path: r.read_array(MAX_PATH_LENGTH, "PathPaymentStrictReceiveOp.path")?,
        })
    }
}

/// Spend exactly `send_amount`, delivering at least `dest_min`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathPaymentStrictSendOp {
    pub send_asset: Asset,
    pub send_amount: Amount,
    pub destination: MuxedAccount,
    pub dest_asset: Asset,
    pub dest_min: Amount,
    pub path: Vec<Asset>,
}

impl PathPaymentStrictSendOp {
    pub fn new(
        send_asset: Asset,
        send_amount: Amount,
        destination: impl Into<MuxedAccount>,
        dest_asset: Asset,
        dest_min: Amount,
        path: Vec<Asset>,
    ) -> XdrResult<Self> {
        let op = Self {
            send_asset,
            send_amount,
            destination: destination.into(),
            dest_asset,
            dest_min,
            path,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.send_asset.validate()?;
        self.dest_asset.validate()?;
        self.send_amount.require_positive("send_amount")?;
        self.dest_min.require_positive("dest_min")?;
        check_path(&self.path)
    }
}

impl XdrCodec for PathPaymentStrictSendOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.send_asset.encode(w)?;
        self.send_amount.encode(w)?;
        self.destination.encode(w)?;
        self.dest_asset.encode(w)?;
        self.dest_min.encode(w)?;
        w.write_array(&self.path, MAX_PATH_LENGTH, "path")
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            send_asset: Asset::decode(r)?,
            send_amount: Amount::decode(r)?,
            destination: MuxedAccount::decode(r)?,
            dest_asset: Asset::decode(r)?,
            dest_min: Amount::decode(r)?,
            path: r.read_array(MAX_PATH_LENGTH, "PathPaymentStrictSendOp.path")?,
        })
    }
}
