//! `inscribe` command line.
//!
//! Every command prints one JSON document to stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use insc_app::ContractClient;
use insc_core::{ClientConfig, ContractIdentity, Network};
use serde::Serialize;

use crate::bootstrap::{load_client_config, wire_services, ConfigOverrides, WiredServices};

pub mod fetch;
pub mod hash;
pub mod inspect;
pub mod plan;
pub mod status;

pub use fetch::FetchArgs;
pub use plan::PlanArgs;

#[derive(Debug, Parser)]
#[command(
    name = "inscribe",
    version,
    about = "Read, verify and plan ledger inscriptions"
)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// mainnet, testnet or devnet
    #[arg(long, global = true)]
    pub network: Option<Network>,

    /// Node API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Principal used as sender for read-only calls
    #[arg(long, global = true)]
    pub sender: Option<String>,

    /// Protocol version of the target contract (e.g. 1.1, 2.0)
    #[arg(long, global = true)]
    pub protocol_version: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Last token id, admin, fee unit and pause flag of a contract
    Status {
        /// `<address>.<name>`
        contract: String,
    },
    /// Metadata, owner, token URI and dependencies of one inscription
    Inspect { contract: String, token_id: u128 },
    /// Reconstruct an inscription's content and write it to a file
    Fetch(FetchArgs),
    /// Chunk count, batch count and running hash of a local file
    Hash { file: PathBuf },
    /// Upload call sequence and fee estimate for a local file
    Plan(PlanArgs),
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            network: self.network,
            api_url: self.api_url.clone(),
            sender: self.sender.clone(),
            protocol_version: self.protocol_version.clone(),
        }
    }
}

/// Loaded configuration plus the services wired from it.
pub struct CommandContext {
    pub config: ClientConfig,
    pub wired: WiredServices,
}

impl CommandContext {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let wired = wire_services(&config)?;
        Ok(Self { config, wired })
    }

    /// Client for `<address>.<name>`. Without a configured sender the
    /// contract's own address is used, which every node accepts for reads.
    pub fn client(&self, contract: &str) -> anyhow::Result<ContractClient> {
        let identity = ContractIdentity::parse(
            contract,
            self.config.network,
            self.config.protocol_version.clone().unwrap_or_default(),
        )?;
        let sender = self
            .config
            .sender
            .clone()
            .unwrap_or_else(|| identity.address.clone());
        Ok(self.wired.services.contract_client_as(identity, sender))
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = load_client_config(cli.config.as_deref(), &cli.overrides())?;
    let ctx = CommandContext::new(config)?;
    execute(&cli.command, &ctx).await
}

pub async fn execute(command: &Command, ctx: &CommandContext) -> anyhow::Result<String> {
    match command {
        Command::Status { contract } => render(&status::run(ctx, contract).await?),
        Command::Inspect { contract, token_id } => {
            render(&inspect::run(ctx, contract, *token_id).await?)
        }
        Command::Fetch(args) => render(&fetch::run(ctx, args).await?),
        Command::Hash { file } => render(&hash::run(file).await?),
        Command::Plan(args) => render(&plan::run(ctx, args).await?),
    }
}

fn render<T: Serialize>(report: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "inscribe",
            "status",
            "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7.inscriptions",
            "--network",
            "testnet",
            "--protocol-version",
            "2.0",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.network, Some(Network::Testnet));
        assert_eq!(overrides.protocol_version.as_deref(), Some("2.0"));
        assert!(matches!(cli.command, Command::Status { .. }));
    }

    #[test]
    fn plan_collects_repeated_dependencies() {
        let cli = Cli::try_parse_from([
            "inscribe",
            "plan",
            "page.html",
            "--contract",
            "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7.inscriptions",
            "--mime",
            "text/html",
            "--dependency",
            "4",
            "--dependency",
            "9",
            "--fee-unit",
            "100",
        ])
        .unwrap();

        match cli.command {
            Command::Plan(args) => {
                assert_eq!(args.dependencies, vec![4, 9]);
                assert_eq!(args.fee_unit, Some(100));
                assert_eq!(args.resume_owner, None);
                assert_eq!(args.token_uri, "");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_network_is_rejected() {
        assert!(
            Cli::try_parse_from(["inscribe", "--network", "regtest", "hash", "a.bin"]).is_err()
        );
    }

    #[test]
    fn client_defaults_sender_to_contract_address() {
        let ctx = CommandContext::new(ClientConfig::default()).unwrap();
        let client = ctx
            .client("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7.inscriptions-v2")
            .unwrap();
        assert_eq!(client.sender(), "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7");
        assert!(client.capabilities().supports_chunk_batch_read);
        assert!(ctx.client("no-dot").is_err());
    }
}
