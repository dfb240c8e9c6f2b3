//! # Protocol Configuration & Constants
//!
//! Every bound and magic number the codec enforces lives here. If you're
//! hardcoding a length limit somewhere else, move it here first.
//!
//! Most of these are fixed by the ledger protocol's XDR definitions. Changing
//! one means this crate no longer speaks the same wire format as everybody
//! else, so think twice.

use std::fmt;
use std::str::FromStr;

use crate::crypto::hash::{sha256, Hash};

/// Newest ledger protocol version whose XDR this crate models
/// (config settings up to `ScpTiming`).
pub const LEDGER_PROTOCOL_VERSION: u32 = 23;

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Number of fractional digits in a decimal amount.
pub const AMOUNT_DECIMALS: usize = 7;

/// Stroops per whole unit of any asset (10^7).
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

// ---------------------------------------------------------------------------
// Wire Bounds
// ---------------------------------------------------------------------------

/// Maximum intermediate hops in a path payment.
pub const MAX_PATH_LENGTH: u32 = 5;

/// Maximum bytes in a data entry name (`string64`).
pub const MAX_DATA_NAME_LENGTH: u32 = 64;

/// Maximum bytes in a data entry value (`DataValue`).
pub const MAX_DATA_VALUE_LENGTH: u32 = 64;

/// Maximum bytes in an account's home domain (`string32`).
pub const MAX_HOME_DOMAIN_LENGTH: u32 = 32;

/// Signer weights and account thresholds are bytes on the ledger.
pub const MAX_SIGNER_WEIGHT: u32 = 255;

/// Maximum signers attached to one account.
pub const MAX_SIGNERS: u32 = 20;

/// Maximum claimants on one claimable balance.
pub const MAX_CLAIMANTS: u32 = 10;

/// Maximum payload carried by an ed25519 signed-payload signer.
pub const MAX_SIGNED_PAYLOAD_LENGTH: u32 = 64;

/// Maximum bytes in a contract symbol.
pub const MAX_SYMBOL_LENGTH: u32 = 32;

/// Maximum entries in a contract cost parameter table.
pub const MAX_CONTRACT_COST_PARAMS: u32 = 1024;

/// Unbounded XDR arrays and opaques (`<>`) are capped only by the length prefix.
pub const UNBOUNDED: u32 = u32::MAX;

/// Default depth limit for decoding recursive values. Deep enough for any
/// legitimate predicate or authorization tree, shallow enough that hostile
/// input cannot exhaust the stack.
pub const DEFAULT_DEPTH_LIMIT: u32 = 500;

// ---------------------------------------------------------------------------
// Liquidity Pools
// ---------------------------------------------------------------------------

/// The only constant-product pool fee the protocol accepts, in basis points.
pub const LIQUIDITY_POOL_FEE_V18: i32 = 30;

// ---------------------------------------------------------------------------
// Hash Preimage Envelope Types
// ---------------------------------------------------------------------------

/// Envelope tag for contract ID derivation preimages.
pub const ENVELOPE_TYPE_CONTRACT_ID: i32 = 8;

/// Envelope tag for authorization entry signature payloads.
pub const ENVELOPE_TYPE_SOROBAN_AUTHORIZATION: i32 = 9;

// ---------------------------------------------------------------------------
// Networks
// ---------------------------------------------------------------------------

/// Passphrase of the public production network.
pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Passphrase of the public test network.
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Passphrase of the futurenet preview network.
pub const FUTURENET_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";

/// A ledger network, identified by its passphrase.
///
/// The network ID (`sha256(passphrase)`) is mixed into every hash preimage
/// that must not be replayable across networks: contract IDs and
/// authorization payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Public,
    Testnet,
    Futurenet,
    /// A private or standalone network.
    Custom(String),
}

impl Network {
    pub fn passphrase(&self) -> &str {
        match self {
            Self::Public => PUBLIC_NETWORK_PASSPHRASE,
            Self::Testnet => TESTNET_PASSPHRASE,
            Self::Futurenet => FUTURENET_PASSPHRASE,
            Self::Custom(passphrase) => passphrase,
        }
    }

    /// `sha256(passphrase)`.
    pub fn network_id(&self) -> Hash {
        sha256(self.passphrase().as_bytes())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Testnet => write!(f, "testnet"),
            Self::Futurenet => write!(f, "futurenet"),
            Self::Custom(passphrase) => write!(f, "custom({})", passphrase),
        }
    }
}

impl FromStr for Network {
    type Err = std::convert::Infallible;

    /// Accepts the well-known names (case-insensitive); anything else is
    /// taken as a custom passphrase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "public" | "mainnet" | "pubnet" => Self::Public,
            "testnet" => Self::Testnet,
            "futurenet" => Self::Futurenet,
            _ => Self::Custom(s.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroop_scale_matches_decimals() {
        assert_eq!(STROOPS_PER_UNIT, 10i64.pow(AMOUNT_DECIMALS as u32));
    }

    #[test]
    fn test_network_ids_are_distinct() {
        assert_ne!(Network::Public.network_id(), Network::Testnet.network_id());
        assert_ne!(Network::Testnet.network_id(), Network::Futurenet.network_id());
    }

    #[test]
    fn test_testnet_network_id() {
        assert_eq!(
            Network::Testnet.network_id().to_string(),
            "cee0302d59844d32bdca915c8203dd44b33fbb7edc19051ea37abedf28ecd472"
        );
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("TESTNET".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Public);
        assert_eq!(
            "Standalone Network ; February 2017".parse::<Network>().unwrap(),
            Network::Custom("Standalone Network ; February 2017".into())
        );
    }

    #[test]
    fn test_custom_network_uses_its_passphrase() {
        let net = Network::Custom("my net".into());
        assert_eq!(net.passphrase(), "my net");
        assert_eq!(net.network_id(), sha256(b"my net"));
    }
}
