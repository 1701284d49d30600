use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::info;

use super::CommandContext;

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// `<address>.<name>`
    pub contract: String,
    pub token_id: u128,
    /// Output file
    #[arg(long)]
    pub out: PathBuf,
    /// Skip the final-hash check for sealed inscriptions
    #[arg(long)]
    pub no_verify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    pub contract: String,
    pub token_id: u128,
    pub mime_type: String,
    pub bytes: usize,
    pub verified: bool,
    pub out: PathBuf,
    /// Rate-limit notifications raised while fetching.
    pub rate_limited: usize,
}

pub async fn run(ctx: &CommandContext, args: &FetchArgs) -> anyhow::Result<FetchReport> {
    let client = ctx.client(&args.contract)?;
    let mut rate_limits = ctx.wired.rate_limits.subscribe();

    let loaded = ctx
        .wired
        .services
        .load_inscription()
        .execute(&client, args.token_id, !args.no_verify)
        .await?;

    tokio::fs::write(&args.out, &loaded.content)
        .await
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    info!(out = %args.out.display(), bytes = loaded.content.len(), "Content written");

    let mut rate_limited = 0;
    loop {
        match rate_limits.try_recv() {
            Ok(_) => rate_limited += 1,
            Err(TryRecvError::Lagged(skipped)) => rate_limited += skipped as usize,
            Err(_) => break,
        }
    }

    Ok(FetchReport {
        contract: client.contract_id(),
        token_id: args.token_id,
        mime_type: loaded.meta.mime_type,
        bytes: loaded.content.len(),
        verified: loaded.verified,
        out: args.out.clone(),
        rate_limited,
    })
}
