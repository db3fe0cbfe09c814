use std::path::Path;

use eyre::WrapErr;
use rand::{seq::SliceRandom, thread_rng};
use serde::Deserialize;
use url::Url;

use crate::constants::CONFIG_FILE_PATH;

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    pub rpc_urls: Vec<Url>,
    #[serde(default)]
    pub claim_eligible: bool,
    #[serde(default)]
    pub session_url: Option<Url>,
}

impl Config {
    pub async fn read_from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let cfg_str = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&cfg_str)?;

        if config.rpc_urls.is_empty() {
            eyre::bail!("RPC_URLS must contain at least one endpoint");
        }

        Ok(config)
    }

    pub async fn read_default() -> eyre::Result<Self> {
        Self::read_from_file(CONFIG_FILE_PATH).await
    }

    /// Any of the configured endpoints; they all serve the same network.
    pub fn rpc_url(&self) -> eyre::Result<Url> {
        self.rpc_urls
            .choose(&mut thread_rng())
            .cloned()
            .ok_or_else(|| eyre::eyre!("No RPC endpoint configured"))
    }
}
