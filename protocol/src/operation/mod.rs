//! # Operations
//!
//! The 27 operation kinds a transaction can carry, as one closed union.
//!
//! ## Construction
//!
//! Every payload struct has a `new` constructor that validates its
//! invariants up front (positive amounts, bounded paths and names, weights
//! in 0..=255). `encode` runs the same checks again, so a value assembled
//! field by field can never reach the wire in an invalid state.
//!
//! ## Retired kinds
//!
//! `ALLOW_TRUST` (7) and `INFLATION` (9) still have wire discriminants but
//! no longer exist in the protocol. They have no [`OperationBody`] variant;
//! decoding either yields [`XdrError::Unsupported`] rather than guessing at
//! a layout.
//!
//! ## Thresholds
//!
//! Each kind requires signatures meeting one of the source account's three
//! thresholds. The mapping is fixed per kind; see
//! [`OperationType::threshold`].

pub mod account;
pub mod claimable;
pub mod offer;
pub mod payment;
pub mod pool;
pub mod soroban;
pub mod trust;

use serde::{Deserialize, Serialize};

use crate::identity::MuxedAccount;
use crate::xdr::{xdr_enum, XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

pub use account::{
    BeginSponsoringFutureReservesOp, BumpSequenceOp, CreateAccountOp, ManageDataOp, RevokeSponsorshipOp, SetOptionsOp,
};
pub use claimable::{ClaimClaimableBalanceOp, ClawbackClaimableBalanceOp, CreateClaimableBalanceOp};
pub use offer::{CreatePassiveSellOfferOp, ManageBuyOfferOp, ManageSellOfferOp};
pub use payment::{PathPaymentStrictReceiveOp, PathPaymentStrictSendOp, PaymentOp};
pub use pool::{LiquidityPoolDepositOp, LiquidityPoolWithdrawOp};
pub use soroban::{ExtendFootprintTtlOp, InvokeHostFunctionOp, RestoreFootprintOp};
pub use trust::{ChangeTrustOp, ClawbackOp, SetTrustLineFlagsOp};

// ---------------------------------------------------------------------------
// Kinds and thresholds
// ---------------------------------------------------------------------------

/// Which of the source account's thresholds an operation must meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdLevel {
    Low,
    Medium,
    High,
}

xdr_enum! {
    /// Wire discriminant of every operation kind, retired ones included.
    pub enum OperationType {
        CreateAccount = 0,
        Payment = 1,
        PathPaymentStrictReceive = 2,
        ManageSellOffer = 3,
        CreatePassiveSellOffer = 4,
        SetOptions = 5,
        ChangeTrust = 6,
        AllowTrust = 7,
        AccountMerge = 8,
        Inflation = 9,
        ManageData = 10,
        BumpSequence = 11,
        ManageBuyOffer = 12,
        PathPaymentStrictSend = 13,
        CreateClaimableBalance = 14,
        ClaimClaimableBalance = 15,
        BeginSponsoringFutureReserves = 16,
        EndSponsoringFutureReserves = 17,
        RevokeSponsorship = 18,
        Clawback = 19,
        ClawbackClaimableBalance = 20,
        SetTrustLineFlags = 21,
        LiquidityPoolDeposit = 22,
        LiquidityPoolWithdraw = 23,
        InvokeHostFunction = 24,
        ExtendFootprintTtl = 25,
        RestoreFootprint = 26,
    }
}

impl OperationType {
    pub fn threshold(self) -> ThresholdLevel {
        match self {
            Self::AllowTrust
            | Self::BumpSequence
            | Self::SetTrustLineFlags
            | Self::ClaimClaimableBalance
            | Self::ExtendFootprintTtl
            | Self::RestoreFootprint
            | Self::Inflation => ThresholdLevel::Low,
            Self::AccountMerge | Self::SetOptions => ThresholdLevel::High,
            _ => ThresholdLevel::Medium,
        }
    }

    /// Kinds that exist on the wire but can no longer be built or parsed.
    pub fn is_retired(self) -> bool {
        matches!(self, Self::AllowTrust | Self::Inflation)
    }

    fn retired_name(self) -> &'static str {
        match self {
            Self::AllowTrust => "ALLOW_TRUST (use SET_TRUST_LINE_FLAGS)",
            _ => "INFLATION",
        }
    }
}

// ---------------------------------------------------------------------------
// OperationBody
// ---------------------------------------------------------------------------

/// The kind-specific payload of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
    Payment(PaymentOp),
    PathPaymentStrictReceive(PathPaymentStrictReceiveOp),
    ManageSellOffer(ManageSellOfferOp),
    CreatePassiveSellOffer(CreatePassiveSellOfferOp),
    SetOptions(SetOptionsOp),
    ChangeTrust(ChangeTrustOp),
    AccountMerge(MuxedAccount),
    ManageData(ManageDataOp),
    BumpSequence(BumpSequenceOp),
    ManageBuyOffer(ManageBuyOfferOp),
    PathPaymentStrictSend(PathPaymentStrictSendOp),
    CreateClaimableBalance(CreateClaimableBalanceOp),
    ClaimClaimableBalance(ClaimClaimableBalanceOp),
    BeginSponsoringFutureReserves(BeginSponsoringFutureReservesOp),
    EndSponsoringFutureReserves,
    RevokeSponsorship(RevokeSponsorshipOp),
    Clawback(ClawbackOp),
    ClawbackClaimableBalance(ClawbackClaimableBalanceOp),
    SetTrustLineFlags(SetTrustLineFlagsOp),
    LiquidityPoolDeposit(LiquidityPoolDepositOp),
    LiquidityPoolWithdraw(LiquidityPoolWithdrawOp),
    InvokeHostFunction(InvokeHostFunctionOp),
    ExtendFootprintTtl(ExtendFootprintTtlOp),
    RestoreFootprint(RestoreFootprintOp),
}

impl OperationBody {
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::CreateAccount(_) => OperationType::CreateAccount,
            Self::Payment(_) => OperationType::Payment,
            Self::PathPaymentStrictReceive(_) => OperationType::PathPaymentStrictReceive,
            Self::ManageSellOffer(_) => OperationType::ManageSellOffer,
            Self::CreatePassiveSellOffer(_) => OperationType::CreatePassiveSellOffer,
            Self::SetOptions(_) => OperationType::SetOptions,
            Self::ChangeTrust(_) => OperationType::ChangeTrust,
            Self::AccountMerge(_) => OperationType::AccountMerge,
            Self::ManageData(_) => OperationType::ManageData,
            Self::BumpSequence(_) => OperationType::BumpSequence,
            Self::ManageBuyOffer(_) => OperationType::ManageBuyOffer,
            Self::PathPaymentStrictSend(_) => OperationType::PathPaymentStrictSend,
            Self::CreateClaimableBalance(_) => OperationType::CreateClaimableBalance,
            Self::ClaimClaimableBalance(_) => OperationType::ClaimClaimableBalance,
            Self::BeginSponsoringFutureReserves(_) => OperationType::BeginSponsoringFutureReserves,
            Self::EndSponsoringFutureReserves => OperationType::EndSponsoringFutureReserves,
            Self::RevokeSponsorship(_) => OperationType::RevokeSponsorship,
            Self::Clawback(_) => OperationType::Clawback,
            Self::ClawbackClaimableBalance(_) => OperationType::ClawbackClaimableBalance,
            Self::SetTrustLineFlags(_) => OperationType::SetTrustLineFlags,
            Self::LiquidityPoolDeposit(_) => OperationType::LiquidityPoolDeposit,
            Self::LiquidityPoolWithdraw(_) => OperationType::LiquidityPoolWithdraw,
            Self::InvokeHostFunction(_) => OperationType::InvokeHostFunction,
            Self::ExtendFootprintTtl(_) => OperationType::ExtendFootprintTtl,
            Self::RestoreFootprint(_) => OperationType::RestoreFootprint,
        }
    }

    pub fn threshold(&self) -> ThresholdLevel {
        self.operation_type().threshold()
    }
}

impl XdrCodec for OperationBody {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        self.operation_type().encode(w)?;
        match self {
            Self::CreateAccount(op) => op.encode(w),
            Self::Payment(op) => op.encode(w),
            Self::PathPaymentStrictReceive(op) => op.encode(w),
            Self::ManageSellOffer(op) => op.encode(w),
            Self::CreatePassiveSellOffer(op) => op.encode(w),
            Self::SetOptions(op) => op.encode(w),
            Self::ChangeTrust(op) => op.encode(w),
            Self::AccountMerge(destination) => destination.encode(w),
            Self::ManageData(op) => op.encode(w),
            Self::BumpSequence(op) => op.encode(w),
            Self::ManageBuyOffer(op) => op.encode(w),
            Self::PathPaymentStrictSend(op) => op.encode(w),
            Self::CreateClaimableBalance(op) => op.encode(w),
            Self::ClaimClaimableBalance(op) => op.encode(w),
            Self::BeginSponsoringFutureReserves(op) => op.encode(w),
            Self::EndSponsoringFutureReserves => Ok(()),
            Self::RevokeSponsorship(op) => op.encode(w),
            Self::Clawback(op) => op.encode(w),
            Self::ClawbackClaimableBalance(op) => op.encode(w),
            Self::SetTrustLineFlags(op) => op.encode(w),
            Self::LiquidityPoolDeposit(op) => op.encode(w),
            Self::LiquidityPoolWithdraw(op) => op.encode(w),
            Self::InvokeHostFunction(op) => op.encode(w),
            Self::ExtendFootprintTtl(op) => op.encode(w),
            Self::RestoreFootprint(op) => op.encode(w),
        }
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        let kind = OperationType::decode(r)?;
        Ok(match kind {
            OperationType::CreateAccount => Self::CreateAccount(XdrCodec::decode(r)?),
            OperationType::Payment => Self::Payment(XdrCodec::decode(r)?),
            OperationType::PathPaymentStrictReceive => Self::PathPaymentStrictReceive(XdrCodec::decode(r)?),
            OperationType::ManageSellOffer => Self::ManageSellOffer(XdrCodec::decode(r)?),
            OperationType::CreatePassiveSellOffer => Self::CreatePassiveSellOffer(XdrCodec::decode(r)?),
            OperationType::SetOptions => Self::SetOptions(XdrCodec::decode(r)?),
            OperationType::ChangeTrust => Self::ChangeTrust(XdrCodec::decode(r)?),
            OperationType::AllowTrust | OperationType::Inflation => {
                return Err(XdrError::Unsupported(kind.retired_name()))
            }
            OperationType::AccountMerge => Self::AccountMerge(XdrCodec::decode(r)?),
            OperationType::ManageData => Self::ManageData(XdrCodec::decode(r)?),
            OperationType::BumpSequence => Self::BumpSequence(XdrCodec::decode(r)?),
            OperationType::ManageBuyOffer => Self::ManageBuyOffer(XdrCodec::decode(r)?),
            OperationType::PathPaymentStrictSend => Self::PathPaymentStrictSend(XdrCodec::decode(r)?),
            OperationType::CreateClaimableBalance => Self::CreateClaimableBalance(XdrCodec::decode(r)?),
            OperationType::ClaimClaimableBalance => Self::ClaimClaimableBalance(XdrCodec::decode(r)?),
            OperationType::BeginSponsoringFutureReserves => {
                Self::BeginSponsoringFutureReserves(XdrCodec::decode(r)?)
            }
            OperationType::EndSponsoringFutureReserves => Self::EndSponsoringFutureReserves,
            OperationType::RevokeSponsorship => Self::RevokeSponsorship(XdrCodec::decode(r)?),
            OperationType::Clawback => Self::Clawback(XdrCodec::decode(r)?),
            OperationType::ClawbackClaimableBalance => Self::ClawbackClaimableBalance(XdrCodec::decode(r)?),
            OperationType::SetTrustLineFlags => Self::SetTrustLineFlags(XdrCodec::decode(r)?),
            OperationType::LiquidityPoolDeposit => Self::LiquidityPoolDeposit(XdrCodec::decode(r)?),
            OperationType::LiquidityPoolWithdraw => Self::LiquidityPoolWithdraw(XdrCodec::decode(r)?),
            OperationType::InvokeHostFunction => Self::InvokeHostFunction(XdrCodec::decode(r)?),
            OperationType::ExtendFootprintTtl => Self::ExtendFootprintTtl(XdrCodec::decode(r)?),
            OperationType::RestoreFootprint => Self::RestoreFootprint(XdrCodec::decode(r)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// One operation of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    /// Overrides the transaction's source account for this operation only.
    pub source_account: Option<MuxedAccount>,
    pub body: OperationBody,
}

impl Operation {
    pub fn new(body: OperationBody) -> Self {
        Self {
            source_account: None,
            body,
        }
    }

    pub fn with_source(mut self, source: impl Into<MuxedAccount>) -> Self {
        self.source_account = Some(source.into());
        self
    }

    pub fn operation_type(&self) -> OperationType {
        self.body.operation_type()
    }

    pub fn threshold(&self) -> ThresholdLevel {
        self.body.threshold()
    }
}

impl From<OperationBody> for Operation {
    fn from(body: OperationBody) -> Self {
        Self::new(body)
    }
}

impl XdrCodec for Operation {
    fn encode(&self, w: &mut XdrWriter) -> XdrResult<()> {
        w.write_optional(self.source_account.as_ref())?;
        self.body.encode(w)
    }

    fn decode(r: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            source_account: r.read_optional()?,
            body: OperationBody::decode(r)?,
        })
    }
}
