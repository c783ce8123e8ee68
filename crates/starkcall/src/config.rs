use std::num::NonZeroU64;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use starkcall_common::{
    BlockId,
    ContractAddress,
    Fee,
    Felt,
    TransactionNonce,
    TransactionSignatureElem,
    TransactionVersion,
};

/// Base URL of the Starknet mainnet sequencer, used unless both gateway URLs
/// are configured.
const DEFAULT_BASE_URL: &str = "https://alpha-mainnet.starknet.io/";

#[derive(Parser)]
#[command(name = "starkcall")]
#[command(version)]
#[command(propagate_version = true)]
#[command(about = "Encode, decode, call and invoke Cairo 0 contracts using their ABI.")]
pub struct Cli {
    #[command(flatten)]
    pub gateway: GatewayCli,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Print the calldata of a method invocation without sending it.
    Encode(MethodArgs),
    /// Decode a raw call result into named outputs.
    Decode {
        #[command(flatten)]
        target: AbiArgs,

        /// The raw result elements, decimal or 0x-prefixed hex.
        #[arg(value_name = "FELT")]
        result: Vec<String>,
    },
    /// Execute a view method and print its decoded outputs.
    Call {
        #[command(flatten)]
        method: MethodArgs,

        #[command(flatten)]
        contract: ContractCli,

        #[arg(
            long,
            long_help = "Block to execute the call against: a block number, 'latest' or 'pending'",
            default_value = "latest"
        )]
        block: BlockId,
    },
    /// Submit an invoke transaction of an external method.
    Invoke {
        #[command(flatten)]
        method: MethodArgs,

        #[command(flatten)]
        contract: ContractCli,

        #[command(flatten)]
        transaction: TransactionCli,
    },
}

#[derive(Debug, clap::Args)]
pub struct AbiArgs {
    #[arg(
        long,
        value_name = "FILE",
        value_hint = clap::ValueHint::FilePath,
        long_help = "Path to the contract's JSON ABI"
    )]
    pub abi: PathBuf,

    /// Name of the ABI function.
    pub method: String,
}

#[derive(Debug, clap::Args)]
pub struct MethodArgs {
    #[command(flatten)]
    pub target: AbiArgs,

    #[arg(
        value_name = "JSON",
        long_help = r#"Arguments as a JSON object, in declaration order.

Felts are decimal or 0x-prefixed hex strings, arrays are lists of felts and
structs are objects with their members and a "type" key naming the struct.

Example:
    '{"to": {"type": "Point", "x": "1", "y": "0x2"}, "data": ["5", "6"]}'"#,
        default_value = "{}"
    )]
    pub args: String,
}

#[derive(Debug, clap::Args)]
pub struct ContractCli {
    #[arg(
        long,
        value_name = "FELT",
        long_help = "Address of the deployed contract",
        value_parser = parse_felt::<ContractAddress>
    )]
    pub address: ContractAddress,
}

#[derive(Debug, clap::Args)]
pub struct TransactionCli {
    #[arg(
        long = "max-fee",
        value_name = "FELT",
        default_value = "0",
        value_parser = parse_felt::<Fee>
    )]
    pub max_fee: Fee,

    #[arg(
        long,
        value_name = "FELT",
        long_help = "Signature elements produced by the account's signer, in order",
        value_delimiter = ',',
        value_parser = parse_felt::<TransactionSignatureElem>
    )]
    pub signature: Vec<TransactionSignatureElem>,

    #[arg(long, value_name = "FELT", value_parser = parse_felt::<TransactionNonce>)]
    pub nonce: Option<TransactionNonce>,

    #[arg(
        long,
        value_name = "FELT",
        default_value = "0",
        value_parser = parse_felt::<TransactionVersion>
    )]
    pub version: TransactionVersion,
}

#[derive(clap::Args)]
pub struct GatewayCli {
    #[arg(
        long = "gateway-url",
        value_name = "URL",
        value_hint = clap::ValueHint::Url,
        long_help = "Specify a custom Starknet gateway url. Requires '--feeder-gateway-url'.",
        env = "STARKCALL_GATEWAY_URL",
        requires = "feeder_gateway",
        global = true
    )]
    gateway: Option<Url>,

    #[arg(
        long = "feeder-gateway-url",
        value_name = "URL",
        value_hint = clap::ValueHint::Url,
        long_help = "Specify a custom Starknet feeder gateway url. Requires '--gateway-url'.",
        env = "STARKCALL_FEEDER_GATEWAY_URL",
        requires = "gateway",
        global = true
    )]
    feeder_gateway: Option<Url>,

    #[arg(
        long = "gateway-api-key",
        value_name = "API_KEY",
        long_help = "Specify an API key for both the Starknet feeder gateway and gateway.",
        env = "STARKCALL_GATEWAY_API_KEY",
        global = true
    )]
    api_key: Option<String>,

    #[arg(
        long = "gateway.request-timeout",
        value_name = "Seconds",
        long_help = "Timeout duration for all gateway and feeder-gateway requests",
        env = "STARKCALL_REQUEST_TIMEOUT",
        default_value = "120",
        global = true
    )]
    timeout: NonZeroU64,
}

pub struct GatewayConfig {
    pub gateway: Url,
    pub feeder_gateway: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl GatewayCli {
    pub fn into_config(self) -> anyhow::Result<GatewayConfig> {
        let (gateway, feeder_gateway) = match (self.gateway, self.feeder_gateway) {
            (Some(gateway), Some(feeder_gateway)) => (gateway, feeder_gateway),
            (None, None) => {
                let base = Url::parse(DEFAULT_BASE_URL)?;
                (base.join("gateway")?, base.join("feeder_gateway")?)
            }
            _ => anyhow::bail!("--gateway-url and --feeder-gateway-url must be set together"),
        };

        Ok(GatewayConfig {
            gateway,
            feeder_gateway,
            api_key: self.api_key,
            timeout: Duration::from_secs(self.timeout.get()),
        })
    }
}

fn parse_felt<T: From<Felt>>(s: &str) -> Result<T, String> {
    s.parse::<Felt>().map(T::from).map_err(|e| e.to_string())
}
