use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MindicadorConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SbifConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BancoCentralConfig {
    pub base_url: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub mindicador: Option<MindicadorConfig>,
    pub sbif: Option<SbifConfig>,
    pub banco_central: Option<BancoCentralConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            mindicador: Some(MindicadorConfig {
                base_url: "https://mindicador.cl".to_string(),
            }),
            sbif: Some(SbifConfig {
                base_url: "https://api.sbif.cl/api-sbifv3/recursos_api/uf".to_string(),
                api_key: None,
            }),
            banco_central: Some(BancoCentralConfig {
                base_url: "https://si3.bcentral.cl/SieteRestWS/SieteRestWS.ashx".to_string(),
                user: None,
                password: None,
            }),
        }
    }
}

fn default_persist() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    /// Persist quotes across runs in the on-disk store.
    #[serde(default = "default_persist")]
    pub persist: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { persist: true }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "ufx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "ufx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// SBIF API key, from config or the `SBIF_API_KEY` environment variable.
    pub fn sbif_api_key(&self) -> Option<String> {
        self.providers
            .sbif
            .as_ref()
            .and_then(|s| s.api_key.clone())
            .or_else(|| std::env::var("SBIF_API_KEY").ok())
    }

    /// Banco Central credentials, from config or the
    /// `BANCO_CENTRAL_USER`/`BANCO_CENTRAL_PASSWORD` environment variables.
    pub fn banco_central_credentials(&self) -> (Option<String>, Option<String>) {
        let block = self.providers.banco_central.as_ref();
        let user = block
            .and_then(|b| b.user.clone())
            .or_else(|| std::env::var("BANCO_CENTRAL_USER").ok());
        let password = block
            .and_then(|b| b.password.clone())
            .or_else(|| std::env::var("BANCO_CENTRAL_PASSWORD").ok());
        (user, password)
    }
}
