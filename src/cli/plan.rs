use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use insc_app::usecases::UploadSummary;
use insc_app::{CallDescriptor, EncodedCall};
use insc_core::{FeeEstimate, FeeSchedule};
use serde::Serialize;
use tracing::info;

use super::CommandContext;

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Content to inscribe
    pub file: PathBuf,
    /// `<address>.<name>`
    #[arg(long)]
    pub contract: String,
    #[arg(long)]
    pub mime: String,
    /// Token id this inscription depends on; repeatable
    #[arg(long = "dependency")]
    pub dependencies: Vec<u128>,
    /// Skip reading the fee unit from the contract
    #[arg(long)]
    pub fee_unit: Option<u128>,
    /// Resume the pending upload owned by this principal
    #[arg(long)]
    pub resume_owner: Option<String>,
    #[arg(long, default_value = "")]
    pub token_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub summary: UploadSummary,
    pub fee: FeeEstimate,
    /// Chunk index the chain had reached when resuming.
    pub resumed_from: Option<u64>,
    pub calls: Vec<EncodedCall>,
}

pub async fn run(ctx: &CommandContext, args: &PlanArgs) -> anyhow::Result<PlanReport> {
    let content = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let client = ctx.client(&args.contract)?;
    let planner = ctx.wired.services.upload_planner();
    let plan = planner.plan(&content, &args.mime, args.dependencies.clone());

    let fee_unit = match args.fee_unit {
        Some(fee_unit) => fee_unit,
        None => client.get_fee_unit().await?,
    };

    let pending = match &args.resume_owner {
        Some(owner) => client.get_upload_state(&plan.final_hash, owner).await?,
        None => None,
    };
    let (descriptors, resumed_from) = match pending {
        Some(state) => (
            planner.resume(&client, &plan, &state, &args.token_uri)?,
            Some(state.current_index),
        ),
        None => {
            if args.resume_owner.is_some() {
                info!("No pending upload on chain, planning from scratch");
            }
            (planner.descriptors(&client, &plan, &args.token_uri), None)
        }
    };

    let calls = descriptors
        .iter()
        .map(CallDescriptor::encode)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlanReport {
        summary: plan.summary(),
        fee: plan.fee_estimate(&FeeSchedule::new(fee_unit)),
        resumed_from,
        calls,
    })
}
