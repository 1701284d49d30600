use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown network `{0}`")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" | "mocknet" => Ok(Network::Devnet),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("contract id must look like <address>.<name>, got `{0}`")]
pub struct InvalidContractId(pub String);

/// A deployed contract instance. Immutable once configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractIdentity {
    pub address: String,
    pub contract_name: String,
    pub network: Network,
    pub protocol_version: String,
}

impl ContractIdentity {
    pub fn new(
        address: impl Into<String>,
        contract_name: impl Into<String>,
        network: Network,
        protocol_version: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            contract_name: contract_name.into(),
            network,
            protocol_version: protocol_version.into(),
        }
    }

    /// Parse `<address>.<name>`.
    pub fn parse(
        contract_id: &str,
        network: Network,
        protocol_version: impl Into<String>,
    ) -> Result<Self, InvalidContractId> {
        match contract_id.split_once('.') {
            Some((address, name)) if !address.is_empty() && !name.is_empty() => {
                Ok(Self::new(address, name, network, protocol_version))
            }
            _ => Err(InvalidContractId(contract_id.to_string())),
        }
    }

    /// `<address>.<name>`, the key used for caching and logging.
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.address, self.contract_name)
    }
}

impl Display for ContractIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.address, self.contract_name)
    }
}
