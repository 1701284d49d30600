use std::sync::Arc;

use insc_core::ports::ReadOnlyCallPort;
use insc_core::ContractIdentity;

use crate::capability::CapabilityResolver;
use crate::client::ContractClient;
use crate::deps::ClientDeps;
use crate::gateway::{GatewayPolicy, ReadOnlyGateway};
use crate::usecases::{ContentFetcher, LoadInscriptionUseCase, UploadPlanner};

/// Shared state of one client instance: the gateway (admission queue and
/// rate-limit cooldowns), the capability memo and the content fetcher.
///
/// Construct once and hand out clients from it. Two instances share nothing,
/// which keeps tests and tenants isolated.
pub struct ClientServices {
    remote: Arc<dyn ReadOnlyCallPort>,
    gateway: Arc<ReadOnlyGateway>,
    capabilities: CapabilityResolver,
    fetcher: Arc<ContentFetcher>,
    default_sender: String,
}

impl ClientServices {
    pub fn new(deps: ClientDeps, policy: GatewayPolicy, default_sender: impl Into<String>) -> Self {
        let gateway = Arc::new(ReadOnlyGateway::new(
            policy,
            deps.rate_limit_events,
            deps.clock,
            deps.sleeper,
        ));
        Self {
            remote: deps.remote,
            gateway,
            capabilities: CapabilityResolver::new(),
            fetcher: Arc::new(ContentFetcher::new(deps.cache)),
            default_sender: default_sender.into(),
        }
    }

    pub fn gateway(&self) -> &Arc<ReadOnlyGateway> {
        &self.gateway
    }

    pub fn capabilities(&self) -> &CapabilityResolver {
        &self.capabilities
    }

    /// Client bound to `identity`, reading as the default sender.
    pub fn contract_client(&self, identity: ContractIdentity) -> ContractClient {
        let sender = self.default_sender.clone();
        self.contract_client_as(identity, sender)
    }

    pub fn contract_client_as(
        &self,
        identity: ContractIdentity,
        sender: impl Into<String>,
    ) -> ContractClient {
        let capabilities = self.capabilities.resolve(&identity);
        ContractClient::new(
            identity,
            sender,
            capabilities,
            self.remote.clone(),
            self.gateway.clone(),
        )
    }

    pub fn fetcher(&self) -> Arc<ContentFetcher> {
        self.fetcher.clone()
    }

    pub fn load_inscription(&self) -> LoadInscriptionUseCase {
        LoadInscriptionUseCase::new(self.fetcher.clone())
    }

    pub fn upload_planner(&self) -> UploadPlanner {
        UploadPlanner::new()
    }
}
