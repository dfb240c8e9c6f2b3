//! # Cryptographic Primitives
//!
//! Two things, both thin wrappers around audited crates:
//!
//! - **SHA-256** (`sha2`) for every content-addressed identifier the model
//!   derives: network ids, pool ids, contract ids, TTL keys, auth payloads.
//! - **Ed25519** (`ed25519-dalek`) keypairs for accounts.
//!
//! We don't roll our own. If you're tempted to, don't.

pub mod hash;
pub mod keys;

pub use hash::{sha256, Hash};
pub use keys::{verify, KeyError, KeyPair};
