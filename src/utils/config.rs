use std::env;
use std::time::Duration;

use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_url: String,
    pub catalog_timeout_secs: u64,
    pub log_level: String,
    pub environment: String,
    pub currency_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_timeout_secs: 10,
            log_level: "warn".to_string(),
            environment: "development".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let defaults = Config::default();

        let catalog_timeout_secs = match env::var("CATALOG_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("CATALOG_TIMEOUT_SECS must be a whole number, got '{}'", raw))?,
            Err(_) => defaults.catalog_timeout_secs,
        };

        let config = Config {
            catalog_url: env::var("CATALOG_API_URL").unwrap_or(defaults.catalog_url),
            catalog_timeout_secs,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            environment: env::var("APP_ENV").unwrap_or(defaults.environment),
            currency_symbol: env::var("CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.catalog_url.is_empty() {
            return Err(anyhow::anyhow!("CATALOG_API_URL is not set"));
        }

        let url = Url::parse(&self.catalog_url)
            .map_err(|e| anyhow::anyhow!("CATALOG_API_URL is not a valid URL: {}", e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow::anyhow!(
                "CATALOG_API_URL must start with 'http://' or 'https://'"
            ));
        }

        if self.catalog_timeout_secs == 0 {
            return Err(anyhow::anyhow!("CATALOG_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(())
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }
}
