//! # Configuration Resolution / 配置解析
//!
//! Path order: `--config`, then `INSCRIBE_CONFIG`, then
//! `<config_dir>/inscribe/config.toml`. An explicitly named file must exist;
//! the platform default may be absent, in which case defaults apply.
//! CLI flags are applied on top of whatever was loaded.
//! 命令行参数覆盖文件中的值。

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use insc_core::{ClientConfig, Network};
use insc_infra::config::{default_config_path, load_config, load_config_or_default};

pub const CONFIG_ENV_VAR: &str = "INSCRIBE_CONFIG";

/// Values given on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub network: Option<Network>,
    pub api_url: Option<String>,
    pub sender: Option<String>,
    pub protocol_version: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(api_url) = &self.api_url {
            config.api_url = Some(api_url.clone());
        }
        if let Some(sender) = &self.sender {
            config.sender = Some(sender.clone());
        }
        if let Some(version) = &self.protocol_version {
            config.protocol_version = Some(version.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Default(PathBuf),
    None,
}

pub fn resolve_config_source(cli_path: Option<&Path>, env_path: Option<OsString>) -> ConfigSource {
    if let Some(path) = cli_path {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|value| !value.is_empty()) {
        return ConfigSource::Explicit(PathBuf::from(path));
    }
    match default_config_path() {
        Some(path) => ConfigSource::Default(path),
        None => ConfigSource::None,
    }
}

pub fn load_client_config(
    cli_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<ClientConfig> {
    let source = resolve_config_source(cli_path, std::env::var_os(CONFIG_ENV_VAR));
    let mut config = load_from_source(&source)?;
    overrides.apply(&mut config);
    tracing::debug!(
        source = ?source,
        network = %config.network,
        api_url = ?config.api_url,
        "Configuration loaded"
    );
    Ok(config)
}

fn load_from_source(source: &ConfigSource) -> anyhow::Result<ClientConfig> {
    match source {
        ConfigSource::Explicit(path) => {
            load_config(path).context("Failed to load the requested configuration")
        }
        ConfigSource::Default(path) => Ok(load_config_or_default(path)?),
        ConfigSource::None => Ok(ClientConfig::default()),
    }
}
