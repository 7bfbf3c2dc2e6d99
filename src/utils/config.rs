use std::env;
use std::path::PathBuf;

use crate::storage::local_storage::DEFAULT_QUOTA_BYTES;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub storage_quota_bytes: usize,
    pub log_level: String,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let config = Config {
            storage_dir: env::var("PRICE_COMPARE_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_storage_dir()),
            storage_quota_bytes: match env::var("PRICE_COMPARE_STORAGE_QUOTA") {
                Ok(raw) => raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("PRICE_COMPARE_STORAGE_QUOTA must be a number of bytes, got '{}'", raw)
                })?,
                Err(_) => DEFAULT_QUOTA_BYTES,
            },
            log_level: env::var("LOG_LEVEL").unwrap_or("warn".to_string()),
            environment: env::var("APP_ENV").unwrap_or("development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_storage_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.storage_dir = dir;
        }
        self
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("PRICE_COMPARE_STORAGE_DIR is empty"));
        }

        if self.storage_quota_bytes == 0 {
            return Err(anyhow::anyhow!(
                "PRICE_COMPARE_STORAGE_QUOTA must be greater than zero"
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn default_storage_dir() -> PathBuf {
    let mut path = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    path.push(".price-compare");
    path
}
