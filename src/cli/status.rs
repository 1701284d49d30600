use insc_core::{Capabilities, Network};
use serde::Serialize;

use super::CommandContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub contract: String,
    pub network: Network,
    pub capabilities: Capabilities,
    pub last_token_id: u128,
    pub admin: String,
    pub fee_unit: u128,
    pub paused: bool,
}

pub async fn run(ctx: &CommandContext, contract: &str) -> anyhow::Result<StatusReport> {
    let client = ctx.client(contract)?;
    let (last_token_id, admin, fee_unit, paused) = tokio::try_join!(
        client.get_last_token_id(),
        client.get_admin(),
        client.get_fee_unit(),
        client.is_paused(),
    )?;

    Ok(StatusReport {
        contract: client.contract_id(),
        network: client.identity().network,
        capabilities: client.capabilities(),
        last_token_id,
        admin,
        fee_unit,
        paused,
    })
}
