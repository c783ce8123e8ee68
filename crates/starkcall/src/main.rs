#![deny(rust_2018_idioms)]

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use starkcall_abi::abi::Mutability;
use starkcall_abi::{AbiEntry, Args, CallKind, ContractAbi};
use starkcall_common::CallParam;
use starkcall_contract::{Contract, InvokeOptions};
use starkcall_gateway_client::Client;

use crate::config::{Cli, Command, GatewayConfig, MethodArgs};

mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Encode(method) => {
            let (abi, args) = load(&method)?;
            let calldata = encode_calldata(&abi, &method.target.method, &args)?
                .iter()
                .map(|c| c.0.to_hex_str())
                .collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&calldata)?);
        }
        Command::Decode { target, result } => {
            let abi = read_abi(&target.abi)?;
            let outputs = starkcall_abi::decode(&abi, &target.method, &result)
                .context("Decoding call result")?;
            println!("{}", serde_json::to_string_pretty(&outputs)?);
        }
        Command::Call {
            method,
            contract,
            block,
        } => {
            let (abi, args) = load(&method)?;
            let client = client(cli.gateway.into_config()?)?;
            let contract = Contract::new(abi, client).with_address(contract.address);

            let outputs = contract
                .call(&method.target.method, &args, block)
                .await
                .context("Calling contract")?;
            println!("{}", serde_json::to_string_pretty(&outputs)?);
        }
        Command::Invoke {
            method,
            contract,
            transaction,
        } => {
            let (abi, args) = load(&method)?;
            let client = client(cli.gateway.into_config()?)?;
            let contract = Contract::new(abi, client).with_address(contract.address);

            let options = InvokeOptions {
                max_fee: transaction.max_fee,
                signature: transaction.signature,
                nonce: transaction.nonce,
                version: transaction.version,
            };
            let response = contract
                .invoke(&method.target.method, &args, options)
                .await
                .context("Invoking contract")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn client(config: GatewayConfig) -> anyhow::Result<Client> {
    tracing::debug!(gateway=%config.gateway, feeder_gateway=%config.feeder_gateway, "Creating gateway client");

    let client = Client::with_urls(config.gateway, config.feeder_gateway, config.timeout)
        .context("Creating gateway client")?
        .with_api_key(config.api_key);
    Ok(client)
}

/// Validates and encodes `args` for any function-like entry.
///
/// Constructors and l1 handlers are neither invoked nor called through a
/// contract handle, so only plain functions are validated.
fn encode_calldata(abi: &ContractAbi, name: &str, args: &Args) -> anyhow::Result<Vec<CallParam>> {
    let mutability = abi.entries().iter().find_map(|entry| match entry {
        AbiEntry::Function(function) if function.name == name => Some(function.mutability()),
        _ => None,
    });
    let kind = match mutability {
        Some(Mutability::View) => Some(CallKind::Call),
        Some(Mutability::External) => Some(CallKind::Invoke),
        None => None,
    };
    if let Some(kind) = kind {
        starkcall_abi::validate(abi, kind, name, args).context("Validating arguments")?;
    }

    starkcall_abi::encode_for(abi, name, args).context("Encoding calldata")
}

fn read_abi(path: &Path) -> anyhow::Result<ContractAbi> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Reading ABI from {}", path.display()))?;
    ContractAbi::from_json(&json).with_context(|| format!("Loading ABI from {}", path.display()))
}

fn load(method: &MethodArgs) -> anyhow::Result<(ContractAbi, Args)> {
    let abi = read_abi(&method.target.abi)?;
    let args = serde_json::from_str::<Args>(&method.args).context("Parsing arguments")?;
    Ok((abi, args))
}
