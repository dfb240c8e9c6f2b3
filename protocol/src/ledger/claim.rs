//! # Claimable Balances: Predicates, Claimants, Balance IDs
//!
//! A claimable balance is parked value that named claimants may take once
//! their predicate holds. Predicates are a small boolean tree over time:
//!
//! ```text
//! Unconditional
//! Not(p)
//! And(p1, p2)   exactly two children, always
//! Or(p1, p2)    exactly two children, always
//! BeforeAbsoluteTime(unix seconds)
//! BeforeRelativeTime(seconds since the balance was created)
//! ```
//!
//! Time values are raw integer seconds. This module does not evaluate
//! predicates; that happens at ledger close, which is not our problem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::MAX_CLAIMANTS;
use crate::crypto::hash::Hash;
use crate::identity::strkey::{self, VersionByte};
use crate::identity::AccountId;
use crate::xdr::serde_support::serde_via_string;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

const CLAIM_PREDICATE_UNCONDITIONAL: i32 = 0;
const CLAIM_PREDICATE_AND: i32 = 1;
const CLAIM_PREDICATE_OR: i32 = 2;
const CLAIM_PREDICATE_NOT: i32 = 3;
const CLAIM_PREDICATE_BEFORE_ABSOLUTE_TIME: i32 = 4;
const CLAIM_PREDICATE_BEFORE_RELATIVE_TIME: i32 = 5;

const CLAIMANT_TYPE_V0: i32 = 0;
const CLAIMABLE_BALANCE_ID_TYPE_V0: i32 = 0;

// ---------------------------------------------------------------------------
// ClaimPredicate
// ---------------------------------------------------------------------------

/// A condition under which a claimant may claim a balance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPredicate {
    Unconditional,
    And(Box<ClaimPredicate>, Box<ClaimPredicate>),
    Or(Box<ClaimPredicate>, Box<ClaimPredicate>),
    Not(Box<ClaimPredicate>),
    /// Claimable while close time is before this Unix timestamp.
    BeforeAbsoluteTime(i64),
    /// Claimable for this many seconds after the balance is created.
    BeforeRelativeTime(i64),
}

impl ClaimPredicate {
    pub fn and(left: ClaimPredicate, right: ClaimPredicate) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: ClaimPredicate, right: ClaimPredicate) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: ClaimPredicate) -> Self {
        Self::Not(Box::new(inner))
    }

    /// `BeforeAbsoluteTime` from a wall-clock instant.
    pub fn before(deadline: DateTime<Utc>) -> Self {
        Self::BeforeAbsoluteTime(deadline.timestamp())
    }

    /// The absolute deadline as a timestamp, when this is that variant and
    /// the value is representable.
    pub fn absolute_deadline(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::BeforeAbsoluteTime(secs) => DateTime::from_timestamp(*secs, 0),
            _ => None,
        }
    }

    fn discriminant(&self) -> i32 {
        match self {
            Self::Unconditional => CLAIM_PREDICATE_UNCONDITIONAL,
            Self::And(..) => CLAIM_PREDICATE_AND,
            Self::Or(..) => CLAIM_PREDICATE_OR,
            Self::Not(_) => CLAIM_PREDICATE_NOT,
            Self::BeforeAbsoluteTime(_) => CLAIM_PREDICATE_BEFORE_ABSOLUTE_TIME,
            Self::BeforeRelativeTime(_) => CLAIM_PREDICATE_BEFORE_RELATIVE_TIME,
        }
    }
}

/// Reads the `<2>` child array of an `And`/`Or`, which must hold exactly two.
fn read_pair(r: &mut XdrReader<'_>) -> XdrResult<(Box<ClaimPredicate>, Box<ClaimPredicate>)> {
    let count = r.read_u32()?;
    if count != 2 {
        return Err(XdrError::malformed(
            "ClaimPredicate",
            format!("binary predicate has {} children, expected 2", count),
        ));
    }
    let left = ClaimPredicate::decode(r)?;
    let right = ClaimPredicate::decode(r)?;
    Ok((Box::new(left), Box::new(right)))
}

impl XdrCodec for ClaimPredicate {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_discriminant(self.discriminant());
        match self {
            Self::Unconditional => {}
            Self::And(left, right) | Self::Or(left, right) => {
                w.write_u32(2);
                left.encode(w)?;
                right.encode(w)?;
            }
            Self::Not(inner) => {
                w.write_bool(true);
                inner.encode(w)?;
            }
            Self::BeforeAbsoluteTime(t) | Self::BeforeRelativeTime(t) => w.write_i64(*t),
        }
        Ok(())
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        r.nested(|r| match r.read_discriminant()? {
            CLAIM_PREDICATE_UNCONDITIONAL => Ok(Self::Unconditional),
            CLAIM_PREDICATE_AND => read_pair(r).map(|(a, b)| Self::And(a, b)),
            CLAIM_PREDICATE_OR => read_pair(r).map(|(a, b)| Self::Or(a, b)),
            CLAIM_PREDICATE_NOT => match r.read_optional::<ClaimPredicate>()? {
                Some(inner) => Ok(Self::Not(Box::new(inner))),
                None => Err(XdrError::malformed("ClaimPredicate", "Not without a child")),
            },
            CLAIM_PREDICATE_BEFORE_ABSOLUTE_TIME => r.read_i64().map(Self::BeforeAbsoluteTime),
            CLAIM_PREDICATE_BEFORE_RELATIVE_TIME => r.read_i64().map(Self::BeforeRelativeTime),
            v => Err(XdrError::unknown("ClaimPredicateType", v)),
        })
    }
}

// ---------------------------------------------------------------------------
// Claimant
// ---------------------------------------------------------------------------

/// An account that may claim a balance, and under what condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claimant {
    pub destination: AccountId,
    pub predicate: ClaimPredicate,
}

impl Claimant {
    pub fn new(destination: AccountId, predicate: ClaimPredicate) -> Self {
        Self {
            destination,
            predicate,
        }
    }

    /// A claimant that can claim at any time.
    pub fn unconditional(destination: AccountId) -> Self {
        Self::new(destination, ClaimPredicate::Unconditional)
    }
}

impl XdrCodec for Claimant {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_discriminant(CLAIMANT_TYPE_V0);
        self.destination.encode(w)?;
        self.predicate.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            CLAIMANT_TYPE_V0 => Ok(Self {
                destination: AccountId::decode(r)?,
                predicate: ClaimPredicate::decode(r)?,
            }),
            v => Err(XdrError::unknown("ClaimantType", v)),
        }
    }
}

/// Claimant lists are non-empty and bounded.
pub(crate) fn check_claimants(claimants: &[Claimant]) -> XdrResult<()> {
    if claimants.is_empty() || claimants.len() > MAX_CLAIMANTS as usize {
        return Err(XdrError::validation(
            "claimants",
            format!("{} claimants, expected 1..={}", claimants.len(), MAX_CLAIMANTS),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ClaimableBalanceId
// ---------------------------------------------------------------------------

/// Identifies a claimable balance.
///
/// On the wire and in canonical text it is 36 bytes: a 4-byte type (always
/// V0) followed by the 32-byte hash. Older tooling handed out just the
/// hash; those 32-byte forms are accepted and zero-expanded, so both
/// spellings decode to the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClaimableBalanceId(pub Hash);

impl ClaimableBalanceId {
    /// Accepts the 36-byte typed form or a bare 32-byte hash.
    pub fn from_bytes(bytes: &[u8]) -> XdrResult<Self> {
        match bytes.len() {
            32 => {
                let mut hash = [0u8; 32];
                hash.copy_from_slice(bytes);
                Ok(Self(Hash(hash)))
            }
            36 => Self::from_xdr(bytes),
            n => Err(XdrError::malformed(
                "ClaimableBalanceId",
                format!("{} bytes, expected 32 or 36", n),
            )),
        }
    }

    /// Accepts 72 or 64 hex characters.
    pub fn from_hex(s: &str) -> XdrResult<Self> {
        let bytes = hex::decode(s).map_err(|e| XdrError::validation("balance_id", e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Canonical 72-character hex.
    pub fn to_hex(&self) -> String {
        let mut raw = [0u8; 36];
        raw[4..].copy_from_slice(self.0.as_bytes());
        hex::encode(raw)
    }

    /// `B…` text form: one type byte then the hash.
    pub fn to_strkey(&self) -> String {
        let mut raw = [0u8; 33];
        raw[1..].copy_from_slice(self.0.as_bytes());
        strkey::encode(VersionByte::ClaimableBalance, &raw)
    }
}

impl fmt::Display for ClaimableBalanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ClaimableBalanceId {
    type Err = XdrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Hex forms are 64 or 72 characters; the strkey is 58.
        if !s.starts_with(VersionByte::ClaimableBalance.prefix()) || s.len() != 58 {
            return Self::from_hex(s);
        }
        let raw = strkey::decode(VersionByte::ClaimableBalance, s)
            .map_err(|e| XdrError::validation("balance_id", e.to_string()))?;
        match raw.split_first() {
            Some((&0, hash)) if hash.len() == 32 => Self::from_bytes(hash),
            Some((&t, _)) if t != 0 => Err(XdrError::unknown("ClaimableBalanceIdType", i32::from(t))),
            _ => Err(XdrError::validation(
                "balance_id",
                format!("{} byte payload, expected 33", raw.len()),
            )),
        }
    }
}

serde_via_string!(ClaimableBalanceId);

impl XdrCodec for ClaimableBalanceId {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_discriminant(CLAIMABLE_BALANCE_ID_TYPE_V0);
        self.0.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        match r.read_discriminant()? {
            CLAIMABLE_BALANCE_ID_TYPE_V0 => Hash::decode(r).map(Self),
            v => Err(XdrError::unknown("ClaimableBalanceIdType", v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_of_unconditional_and_not_round_trips() {
        let p = ClaimPredicate::or(
            ClaimPredicate::Unconditional,
            ClaimPredicate::not(ClaimPredicate::Unconditional),
        );
        let bytes = p.to_xdr().unwrap();
        assert_eq!(
            bytes,
            vec![
                0, 0, 0, 2, // Or
                0, 0, 0, 2, // two children
                0, 0, 0, 0, // Unconditional
                0, 0, 0, 3, // Not
                0, 0, 0, 1, // present
                0, 0, 0, 0, // Unconditional
            ]
        );
        assert_eq!(ClaimPredicate::from_xdr(&bytes).unwrap(), p);
    }

    #[test]
    fn and_with_wrong_child_count_is_malformed() {
        // one child
        let one = [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0];
        assert!(matches!(
            ClaimPredicate::from_xdr(&one),
            Err(XdrError::Malformed { kind: "ClaimPredicate", .. })
        ));
        // three children
        let three = [
            0, 0, 0, 1, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        assert!(matches!(
            ClaimPredicate::from_xdr(&three),
            Err(XdrError::Malformed { kind: "ClaimPredicate", .. })
        ));
    }

    #[test]
    fn not_without_child_is_malformed() {
        assert!(matches!(
            ClaimPredicate::from_xdr(&[0, 0, 0, 3, 0, 0, 0, 0]),
            Err(XdrError::Malformed { .. })
        ));
    }

    #[test]
    fn time_predicates_store_raw_seconds() {
        let abs = ClaimPredicate::BeforeAbsoluteTime(1_700_000_000);
        let rel = ClaimPredicate::BeforeRelativeTime(3600);
        for p in [abs.clone(), rel] {
            assert_eq!(ClaimPredicate::from_xdr(&p.to_xdr().unwrap()).unwrap(), p);
        }
        let deadline = abs.absolute_deadline().unwrap();
        assert_eq!(ClaimPredicate::before(deadline), abs);
    }

    #[test]
    fn hostile_nesting_hits_depth_limit() {
        let mut bytes = Vec::new();
        for _ in 0..600 {
            bytes.extend_from_slice(&[0, 0, 0, 3, 0, 0, 0, 1]);
        }
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        // 500 levels of recursion before the guard trips.
        let result = std::thread::Builder::new()
            .stack_size(32 << 20)
            .spawn(move || ClaimPredicate::from_xdr(&bytes))
            .unwrap()
            .join()
            .unwrap();
        assert!(matches!(result, Err(XdrError::DepthLimitExceeded(_))));
    }

    #[test]
    fn claimant_round_trip() {
        let dest: AccountId = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ"
            .parse()
            .unwrap();
        let c = Claimant::new(
            dest,
            ClaimPredicate::and(
                ClaimPredicate::BeforeRelativeTime(60),
                ClaimPredicate::not(ClaimPredicate::BeforeAbsoluteTime(0)),
            ),
        );
        assert_eq!(Claimant::from_xdr(&c.to_xdr().unwrap()).unwrap(), c);
    }

    #[test]
    fn legacy_balance_id_expands_to_typed_form() {
        let hash = [0xAB; 32];
        let legacy = ClaimableBalanceId::from_bytes(&hash).unwrap();
        let mut typed = vec![0, 0, 0, 0];
        typed.extend_from_slice(&hash);
        let expanded = ClaimableBalanceId::from_bytes(&typed).unwrap();
        assert_eq!(legacy, expanded);
        assert_eq!(
            ClaimableBalanceId::from_hex(&hex::encode(hash)).unwrap(),
            ClaimableBalanceId::from_hex(&hex::encode(&typed)).unwrap()
        );
        assert_eq!(legacy.to_hex(), hex::encode(&typed));
    }

    #[test]
    fn balance_id_bad_lengths() {
        assert!(ClaimableBalanceId::from_bytes(&[0; 31]).is_err());
        assert!(ClaimableBalanceId::from_bytes(&[0; 40]).is_err());
        let mut wrong_type = vec![0, 0, 0, 1];
        wrong_type.extend_from_slice(&[0; 32]);
        assert_eq!(
            ClaimableBalanceId::from_bytes(&wrong_type),
            Err(XdrError::unknown("ClaimableBalanceIdType", 1))
        );
    }

    #[test]
    fn balance_id_strkey_round_trip() {
        let id = ClaimableBalanceId(Hash([0x42; 32]));
        let text = id.to_strkey();
        assert!(text.starts_with('B'));
        assert_eq!(text.parse::<ClaimableBalanceId>().unwrap(), id);
        assert_eq!(id.to_string().parse::<ClaimableBalanceId>().unwrap(), id);
    }
}
