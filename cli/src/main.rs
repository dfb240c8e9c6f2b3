// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # lxdr
//!
//! Entry point for the `lxdr` binary. Parses CLI arguments, initializes
//! logging, and runs one command against the `ledger-xdr` library.
//!
//! - `decode` / `encode`: base64 XDR to JSON and back
//! - `to-stroops` / `from-stroops` / `price`: numeric conversions
//! - `pool-id` / `contract-id`: derived identifiers
//! - `version`: print build version information

mod cli;
mod logging;

use std::io::Read;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;

use ledger_xdr::amount::{from_stroops, to_stroops};
use ledger_xdr::config::LEDGER_PROTOCOL_VERSION;
use ledger_xdr::identity::ScAddress;
use ledger_xdr::ledger::{
    Asset, ChangeTrustAsset, ClaimPredicate, ConfigSettingEntry, LedgerEntry, LedgerKey,
    LiquidityPoolParameters,
};
use ledger_xdr::soroban::host_function::{ContractIdAddressPreimage, ContractIdPreimage};
use ledger_xdr::soroban::{ScVal, SorobanAuthorizationEntry, SorobanTransactionData};
use ledger_xdr::{Network, Operation, Price, XdrCodec};

use cli::{Commands, ContractIdSource, LedgerXdrCli, XdrType};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = LedgerXdrCli::parse();
    logging::init_logging("lxdr=info", LogFormat::from_str_lossy(&cli.log_format));

    let result = run(cli.command, &cli.network);
    if let Err(err) = &result {
        tracing::error!(error = %format!("{:#}", err), "command failed");
    }
    result
}

fn run(command: Commands, network: &Network) -> Result<()> {
    match command {
        Commands::Decode { xdr_type, base64 } => {
            let input = read_arg(&base64)?;
            println!("{}", decode(xdr_type, input.trim())?);
        }
        Commands::Encode { xdr_type, json } => {
            let input = read_arg(&json)?;
            println!("{}", encode(xdr_type, &input)?);
        }
        Commands::ToStroops { amount } => {
            let stroops = to_stroops(&amount).with_context(|| format!("invalid amount {:?}", amount))?;
            println!("{}", stroops);
        }
        Commands::FromStroops { stroops } => println!("{}", from_stroops(stroops)),
        Commands::Price { decimal } => {
            let price = Price::from_decimal_str(&decimal)
                .with_context(|| format!("cannot approximate {:?} as a price", decimal))?;
            tracing::debug!(n = price.n, d = price.d, approx = price.as_f64(), "price approximated");
            println!("{}", price);
        }
        Commands::PoolId { asset_a, asset_b, fee } => {
            let params = LiquidityPoolParameters::with_fee(parse_asset(&asset_a)?, parse_asset(&asset_b)?, fee)?;
            println!("{}", params.pool_id()?);
        }
        Commands::ContractId(args) => {
            let preimage = match args.source {
                ContractIdSource::Asset { asset } => ContractIdPreimage::from_asset(parse_asset(&asset)?)?,
                ContractIdSource::Address { address, salt } => {
                    let address: ScAddress = address
                        .parse()
                        .map_err(|e| anyhow!("invalid address {:?}: {}", address, e))?;
                    let preimage = match salt {
                        Some(salt) => ContractIdAddressPreimage::new(address, parse_salt(&salt)?),
                        None => {
                            let preimage = ContractIdAddressPreimage::random(address);
                            tracing::info!(salt = %hex::encode(preimage.salt), "generated random salt");
                            preimage
                        }
                    };
                    ContractIdPreimage::FromAddress(preimage)
                }
            };
            tracing::debug!(network = %network, "deriving contract id");
            println!("{}", preimage.contract_id(network)?);
        }
        Commands::Version => print_version(),
    }
    Ok(())
}

fn decode(xdr_type: XdrType, base64: &str) -> Result<String> {
    tracing::debug!(?xdr_type, len = base64.len(), "decoding");
    match xdr_type {
        XdrType::Operation => decode_as::<Operation>(base64),
        XdrType::LedgerEntry => decode_as::<LedgerEntry>(base64),
        XdrType::LedgerKey => decode_as::<LedgerKey>(base64),
        XdrType::ConfigSetting => decode_as::<ConfigSettingEntry>(base64),
        XdrType::ScVal => decode_as::<ScVal>(base64),
        XdrType::AuthEntry => decode_as::<SorobanAuthorizationEntry>(base64),
        XdrType::ClaimPredicate => decode_as::<ClaimPredicate>(base64),
        XdrType::Asset => decode_as::<Asset>(base64),
        XdrType::ChangeTrustAsset => decode_as::<ChangeTrustAsset>(base64),
        XdrType::TransactionData => decode_as::<SorobanTransactionData>(base64),
    }
}

fn encode(xdr_type: XdrType, json: &str) -> Result<String> {
    tracing::debug!(?xdr_type, len = json.len(), "encoding");
    match xdr_type {
        XdrType::Operation => encode_as::<Operation>(json),
        XdrType::LedgerEntry => encode_as::<LedgerEntry>(json),
        XdrType::LedgerKey => encode_as::<LedgerKey>(json),
        XdrType::ConfigSetting => encode_as::<ConfigSettingEntry>(json),
        XdrType::ScVal => encode_as::<ScVal>(json),
        XdrType::AuthEntry => encode_as::<SorobanAuthorizationEntry>(json),
        XdrType::ClaimPredicate => encode_as::<ClaimPredicate>(json),
        XdrType::Asset => encode_as::<Asset>(json),
        XdrType::ChangeTrustAsset => encode_as::<ChangeTrustAsset>(json),
        XdrType::TransactionData => encode_as::<SorobanTransactionData>(json),
    }
}

fn decode_as<T: XdrCodec + Serialize>(base64: &str) -> Result<String> {
    let value = T::from_xdr_base64(base64)
        .with_context(|| format!("failed to decode {}", short_type_name::<T>()))?;
    serde_json::to_string_pretty(&value).context("failed to render JSON")
}

fn encode_as<T: XdrCodec + DeserializeOwned>(json: &str) -> Result<String> {
    let value: T = serde_json::from_str(json)
        .with_context(|| format!("JSON is not a valid {}", short_type_name::<T>()))?;
    value
        .to_xdr_base64()
        .with_context(|| format!("failed to encode {}", short_type_name::<T>()))
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// `-` means "read the value from stdin".
fn read_arg(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn parse_asset(s: &str) -> Result<Asset> {
    s.parse::<Asset>()
        .with_context(|| format!("invalid asset {:?} (expected `native` or `CODE:ISSUER`)", s))
}

fn parse_salt(s: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(s).context("salt is not valid hex")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow!("salt must be 32 bytes, got {}", b.len()))
}

fn print_version() {
    println!("lxdr      {}", env!("CARGO_PKG_VERSION"));
    println!("protocol  {}", LEDGER_PROTOCOL_VERSION);
}
