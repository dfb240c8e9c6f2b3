//! Liquidity pool deposits and withdrawals.

use serde::{Deserialize, Serialize};

use crate::amount::{Amount, Price};
use crate::ledger::asset::PoolId;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

/// Deposits up to `max_amount_a` / `max_amount_b`, provided the pool's
/// price (a per b) lies within `[min_price, max_price]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiquidityPoolDepositOp {
    pub liquidity_pool_id: PoolId,
    pub max_amount_a: Amount,
    pub max_amount_b: Amount,
    pub min_price: Price,
    pub max_price: Price,
}

impl LiquidityPoolDepositOp {
    pub fn new(
        liquidity_pool_id: PoolId,
        max_amount_a: Amount,
        max_amount_b: Amount,
        min_price: Price,
        max_price: Price,
    ) -> XdrResult<Self> {
        let op = Self {
            liquidity_pool_id,
            max_amount_a,
            max_amount_b,
            min_price,
            max_price,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.max_amount_a.require_positive("max_amount_a")?;
        self.max_amount_b.require_positive("max_amount_b")?;
        self.min_price.validate()?;
        self.max_price.validate()?;
        // n1/d1 > n2/d2  <=>  n1*d2 > n2*d1, exact in i64
        let lhs = i64::from(self.min_price.n) * i64::from(self.max_price.d);
        let rhs = i64::from(self.max_price.n) * i64::from(self.min_price.d);
        if lhs > rhs {
            return Err(XdrError::validation("min_price", "exceeds max_price"));
        }
        Ok(())
    }
}

impl XdrCodec for LiquidityPoolDepositOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.liquidity_pool_id.encode(w)?;
        self.max_amount_a.encode(w)?;
        self.max_amount_b.encode(w)?;
        self.min_price.encode(w)?;
        self.max_price.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            liquidity_pool_id: PoolId::decode(r)?,
            max_amount_a: Amount::decode(r)?,
            max_amount_b: Amount::decode(r)?,
            min_price: Price::decode(r)?,
            max_price: Price::decode(r)?,
        })
    }
}

/// Redeems `amount` pool shares for at least the given minimum of each
/// reserve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiquidityPoolWithdrawOp {
    pub liquidity_pool_id: PoolId,
    pub amount: Amount,
    pub min_amount_a: Amount,
    pub min_amount_b: Amount,
}

impl LiquidityPoolWithdrawOp {
    pub fn new(liquidity_pool_id: PoolId, amount: Amount, min_amount_a: Amount, min_amount_b: Amount) -> XdrResult<Self> {
        let op = Self {
            liquidity_pool_id,
            amount,
            min_amount_a,
            min_amount_b,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        self.amount.require_positive("amount")?;
        self.min_amount_a.require_non_negative("min_amount_a")?;
        self.min_amount_b.require_non_negative("min_amount_b")
    }
}

impl XdrCodec for LiquidityPoolWithdrawOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.liquidity_pool_id.encode(w)?;
        self.amount.encode(w)?;
        self.min_amount_a.encode(w)?;
        self.min_amount_b.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            liquidity_pool_id: PoolId::decode(r)?,
            amount: Amount::decode(r)?,
            min_amount_a: Amount::decode(r)?,
            min_amount_b: Amount::decode(r)?,
        })
    }
}
