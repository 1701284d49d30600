use insc_app::ClientError;
use insc_core::InscriptionMeta;
use serde::Serialize;

use super::CommandContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub contract: String,
    pub token_id: u128,
    pub meta: InscriptionMeta,
    pub owner: Option<String>,
    pub token_uri: Option<String>,
    pub dependencies: Vec<u128>,
}

pub async fn run(
    ctx: &CommandContext,
    contract: &str,
    token_id: u128,
) -> anyhow::Result<InspectReport> {
    let client = ctx.client(contract)?;
    let meta = client
        .get_inscription_meta(token_id)
        .await?
        .ok_or(ClientError::NotFound { token_id })?;
    let (owner, token_uri, dependencies) = tokio::try_join!(
        client.get_owner(token_id),
        client.get_token_uri(token_id),
        client.get_dependencies(token_id),
    )?;

    Ok(InspectReport {
        contract: client.contract_id(),
        token_id,
        meta,
        owner,
        token_uri,
        dependencies,
    })
}
