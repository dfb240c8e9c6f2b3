//! # CLI Interface
//!
//! Defines the command-line argument structure for `lxdr` using `clap`
//! derive. Global flags carry the network and log format; everything else
//! is a subcommand.

use clap::{Args, Parser, Subcommand, ValueEnum};

use ledger_xdr::config::LIQUIDITY_POOL_FEE_V18;
use ledger_xdr::Network;

/// Encode, decode and inspect ledger XDR structures.
///
/// Decoded values print as JSON on stdout; encoded values print as
/// standard base64. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "lxdr",
    about = "Ledger XDR encoder/decoder",
    version,
    propagate_version = true
)]
pub struct LedgerXdrCli {
    /// Network whose ID is mixed into contract IDs: public, testnet,
    /// futurenet, or any other string as a custom passphrase.
    #[arg(long, short = 'n', global = true, env = "LXDR_NETWORK", default_value = "testnet")]
    pub network: Network,

    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "LXDR_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode base64 XDR and print it as JSON. Pass `-` to read stdin.
    Decode {
        #[arg(value_enum)]
        xdr_type: XdrType,
        base64: String,
    },
    /// Encode a JSON value and print its base64 XDR. Pass `-` to read stdin.
    Encode {
        #[arg(value_enum)]
        xdr_type: XdrType,
        json: String,
    },
    /// Convert a decimal amount to stroops.
    ToStroops {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Convert stroops to the canonical decimal amount.
    FromStroops {
        #[arg(allow_negative_numbers = true)]
        stroops: i64,
    },
    /// Approximate a decimal as an `n/d` price.
    Price { decimal: String },
    /// Compute the ID of the constant-product pool for an asset pair.
    ///
    /// Assets are `native` or `CODE:ISSUER`, in canonical order.
    PoolId {
        asset_a: String,
        asset_b: String,
        /// Pool fee in basis points.
        #[arg(long, default_value_t = LIQUIDITY_POOL_FEE_V18)]
        fee: i32,
    },
    /// Derive a contract ID on the selected network.
    ContractId(ContractIdArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct ContractIdArgs {
    #[command(subcommand)]
    pub source: ContractIdSource,
}

#[derive(Subcommand, Debug)]
pub enum ContractIdSource {
    /// The built-in token contract of an asset.
    Asset { asset: String },
    /// A contract deployed by an address.
    Address {
        /// `G…` account or `C…` contract address of the deployer.
        address: String,
        /// 32-byte salt as hex. Random when omitted.
        #[arg(long)]
        salt: Option<String>,
    },
}

/// The structures `decode` and `encode` understand.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum XdrType {
    Operation,
    LedgerEntry,
    LedgerKey,
    ConfigSetting,
    ScVal,
    AuthEntry,
    ClaimPredicate,
    Asset,
    ChangeTrustAsset,
    TransactionData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        LedgerXdrCli::command().debug_assert();
    }

    #[test]
    fn parses_type_names_in_kebab_case() {
        let cli = LedgerXdrCli::try_parse_from(["lxdr", "decode", "sc-val", "AAAAAQ=="]).unwrap();
        match cli.command {
            Commands::Decode { xdr_type, base64 } => {
                assert_eq!(xdr_type, XdrType::ScVal);
                assert_eq!(base64, "AAAAAQ==");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn network_flag_is_global() {
        let cli = LedgerXdrCli::try_parse_from([
            "lxdr",
            "contract-id",
            "asset",
            "native",
            "--network",
            "public",
        ])
        .unwrap();
        assert_eq!(cli.network, Network::Public);
    }

    #[test]
    fn negative_amounts_are_not_flags() {
        let cli = LedgerXdrCli::try_parse_from(["lxdr", "to-stroops", "-1.5"]).unwrap();
        assert!(matches!(cli.command, Commands::ToStroops { amount } if amount == "-1.5"));
    }
}
