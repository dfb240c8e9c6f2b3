//! Order book offers.
//!
//! `offer_id` 0 creates a new offer; a non-zero id updates that offer, and
//! an amount of 0 deletes it.

use serde::{Deserialize, Serialize};

use crate::amount::{Amount, Price};
use crate::ledger::asset::Asset;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

fn check_offer_id(offer_id: i64) -> XdrResult<()> {
    if offer_id < 0 {
        return Err(XdrError::validation("offer_id", format!("{} is negative", offer_id)));
    }
    Ok(())
}

fn check_pair(selling: &Asset, buying: &Asset) -> XdrResult<()> {
    selling.validate()?;
    buying.validate()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManageSellOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    /// Amount of `selling` offered.
    pub amount: Amount,
    /// Price of one unit of `selling` in terms of `buying`.
    pub price: Price,
    pub offer_id: i64,
}

impl ManageSellOfferOp {
    /// A new offer (`offer_id` 0).
    pub fn new(selling: Asset, buying: Asset, amount: Amount, price: Price) -> XdrResult<Self> {
        Self::update(selling, buying, amount, price, 0)
    }

    pub fn update(selling: Asset, buying: Asset, amount: Amount, price: Price, offer_id: i64) -> XdrResult<Self> {
        let op = Self {
            selling,
            buying,
            amount,
            price,
            offer_id,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        check_pair(&self.selling, &self.buying)?;
        self.amount.require_non_negative("amount")?;
        self.price.validate()?;
        check_offer_id(self.offer_id)
    }
}

impl XdrCodec for ManageSellOfferOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.selling.encode(w)?;
        self.buying.encode(w)?;
        self.amount.encode(w)?;
        self.price.encode(w)?;
        w.write_i64(self.offer_id);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            selling: Asset::decode(r)?,
            buying: Asset::decode(r)?,
            amount: Amount::decode(r)?,
            price: Price::decode(r)?,
            offer_id: r.read_i64()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManageBuyOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    /// Amount of `buying` wanted.
    pub buy_amount: Amount,
    /// Price of one unit of `buying` in terms of `selling`.
    pub price: Price,
    pub offer_id: i64,
}

impl ManageBuyOfferOp {
    pub fn new(selling: Asset, buying: Asset, buy_amount: Amount, price: Price) -> XdrResult<Self> {
        Self::update(selling, buying, buy_amount, price, 0)
    }

    pub fn update(selling: Asset, buying: Asset, buy_amount: Amount, price: Price, offer_id: i64) -> XdrResult<Self> {
        let op = Self {
            selling,
            buying,
            buy_amount,
            price,
            offer_id,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        check_pair(&self.selling, &self.buying)?;
        self.buy_amount.require_non_negative("buy_amount")?;
        self.price.validate()?;
        check_offer_id(self.offer_id)
    }
}

impl XdrCodec for ManageBuyOfferOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.selling.encode(w)?;
        self.buying.encode(w)?;
        self.buy_amount.encode(w)?;
        self.price.encode(w)?;
        w.write_i64(self.offer_id);
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            selling: Asset::decode(r)?,
            buying: Asset::decode(r)?,
            buy_amount: Amount::decode(r)?,
            price: Price::decode(r)?,
            offer_id: r.read_i64()?,
        })
    }
}

/// An offer that does not take offers crossing it at the same price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatePassiveSellOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    pub amount: Amount,
    pub price: Price,
}

impl CreatePassiveSellOfferOp {
    pub fn new(selling: Asset, buying: Asset, amount: Amount, price: Price) -> XdrResult<Self> {
        let op = Self {
            selling,
            buying,
            amount,
            price,
        };
        op.validate()?;
        Ok(op)
    }

    pub fn validate(&self) -> XdrResult<()> {
        check_pair(&self.selling, &self.buying)?;
        self.amount.require_positive("amount")?;
        self.price.validate()
    }
}

impl XdrCodec for CreatePassiveSellOfferOp {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.validate()?;
        self.selling.encode(w)?;
        self.buying.encode(w)?;
        self.amount.encode(w)?;
        self.price.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            selling: Asset::decode(r)?,
            buying: Asset::decode(r)?,
            amount: Amount::decode(r)?,
            price: Price::decode(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AccountId;

    fn usd() -> Asset {
        let issuer: AccountId = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ"
            .parse()
            .unwrap();
        Asset::credit("USD", issuer).unwrap()
    }

    #[test]
    fn zero_amount_deletes_existing_offer() {
        let op = ManageSellOfferOp::update(Asset::Native, usd(), Amount::ZERO, Price::new(1, 2).unwrap(), 77).unwrap();
        assert_eq!(ManageSellOfferOp::from_xdr(&op.to_xdr().unwrap()).unwrap(), op);
    }

    #[test]
    fn price_from_decimal_feeds_offer() {
        let price: Price = "1.25".parse().unwrap();
        let op = ManageBuyOfferOp::new(usd(), Asset::Native, Amount::parse("10").unwrap(), price).unwrap();
        assert_eq!(op.price, Price { n: 5, d: 4 });
        assert_eq!(op.offer_id, 0);
        assert_eq!(ManageBuyOfferOp::from_xdr(&op.to_xdr().unwrap()).unwrap(), op);
    }

    #[test]
    fn invalid_inputs_rejected() {
        let one = Price::new(1, 1).unwrap();
        assert!(ManageSellOfferOp::update(Asset::Native, usd(), Amount::ZERO, one, -1).is_err());
        assert!(CreatePassiveSellOfferOp::new(Asset::Native, usd(), Amount::ZERO, one).is_err());
        let bad_price = Price { n: 1, d: 0 };
        assert!(ManageBuyOfferOp::new(Asset::Native, usd(), Amount::from_stroops(1), bad_price).is_err());
    }
}
