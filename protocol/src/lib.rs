// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ledger-xdr: Core Library
//!
//! Typed ledger and transaction objects, and the canonical XDR codec that
//! turns them into bytes and back. Every value here is an immutable value
//! object: build it through a validating constructor, encode it, ship it.
//! Inbound bytes decode into the same types, strictly.
//!
//! ## Architecture
//!
//! Leaf-first:
//!
//! - **xdr**: Wire primitives (reader, writer, the `XdrCodec` trait and its error type).
//! - **config**: Protocol constants, wire bounds, network passphrases.
//! - **crypto**: sha256 and ed25519 keys. Hashing preimages, signing auth payloads.
//! - **identity**: Account, muxed, signer and contract addresses in strkey form.
//! - **amount**: Fixed-point amounts (7 decimals) and rational prices.
//! - **ledger**: Assets, claim predicates, config settings, entries and keys.
//! - **soroban**: Contract values, host functions, authorization trees, footprints.
//! - **operation**: The 27 operation kinds, with thresholds.
//!
//! ## Ground Rules
//!
//! 1. Invalid values fail at construction and again at encode. Never silently truncated.
//! 2. Decoding is strict. Anything the model does not recognize is an error, never a guess.
//! 3. Recursive types decode under a depth guard.
//! 4. The library never logs. Callers decide what a failure means.

pub mod amount;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod ledger;
pub mod operation;
pub mod soroban;
pub mod xdr;

pub use amount::{Amount, Price};
pub use config::Network;
pub use operation::{Operation, OperationBody, OperationType, ThresholdLevel};
pub use xdr::{XdrCodec, XdrError, XdrResult};
