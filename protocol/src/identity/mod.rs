//! # Identity Module
//!
//! Every party the ledger model refers to, and the text encoding humans use
//! for them.
//!
//! 1. **StrKey**: base32 + CRC16 address text (`G…`, `M…`, `C…`, ...).
//! 2. **Accounts**: `AccountId` and its muxed form.
//! 3. **Signers**: keys that can authorize for an account, with weights.
//! 4. **Contracts**: `ContractId` and `ScAddress`.
//!
//! All of these serialize through serde as their address string, so JSON
//! output reads the way users paste addresses.

pub mod account;
pub mod contract;
pub mod signer;
pub mod strkey;

pub use account::{AccountId, MuxedAccount};
pub use contract::{ContractId, ScAddress};
pub use signer::{Signer, SignerKey};
pub use strkey::StrKeyError;
