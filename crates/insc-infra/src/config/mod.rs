//! # Configuration Loader / 配置加载器
//!
//! Pure data loading: read the TOML file and map it onto [`ClientConfig`].
//! Missing fields take the DTO defaults; nothing is validated here.
//! 仅纯数据加载：读取 TOML 并映射为 DTO，不做验证。

use std::path::{Path, PathBuf};

use insc_core::ClientConfig;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "inscribe";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not a valid document.
/// 文件无法读取或内容不是有效 TOML 时返回错误。
pub fn load_config(config_path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(config_path: &Path) -> Result<ClientConfig, ConfigError> {
    if config_path.exists() {
        load_config(config_path)
    } else {
        tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
        Ok(ClientConfig::default())
    }
}

/// `<config_dir>/inscribe/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}
