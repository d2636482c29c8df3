use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use walletlens_core::ledger::DEFAULT_RPC_URL;
use walletlens_market_data::provider::dexscreener::DEFAULT_BASE_URL;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("Unknown log format '{}'", other)),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub rpc_url: String,
    pub rpc_api_key: Option<String>,
    pub market_data_url: String,
    pub request_delay: Duration,
    pub query_timeout: Duration,
    pub include_native_holding: bool,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = var_or("WL_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid WL_LISTEN_ADDR")?;
        let rpc_url = var_or("WL_RPC_URL", DEFAULT_RPC_URL);
        let rpc_api_key = std::env::var("WL_RPC_API_KEY").ok();
        let market_data_url = var_or("WL_MARKET_DATA_URL", DEFAULT_BASE_URL);
        let request_delay = millis_or("WL_REQUEST_DELAY_MS", 200)?;
        let query_timeout = millis_or("WL_QUERY_TIMEOUT_MS", 60000)?;
        let include_native_holding = parse_bool(&var_or("WL_INCLUDE_NATIVE", "false"))
            .context("Invalid WL_INCLUDE_NATIVE")?;
        let cors_allow = var_or("WL_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout = millis_or("WL_REQUEST_TIMEOUT_MS", 30000)?;
        let log_format = var_or("WL_LOG_FORMAT", "text").parse()?;

        Ok(Self {
            listen_addr,
            rpc_url,
            rpc_api_key,
            market_data_url,
            request_delay,
            query_timeout,
            include_native_holding,
            cors_allow,
            request_timeout,
            log_format,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_api_key: None,
            market_data_url: DEFAULT_BASE_URL.to_string(),
            request_delay: Duration::from_millis(200),
            query_timeout: Duration::from_secs(60),
            include_native_holding: false,
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            log_format: LogFormat::Text,
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a millisecond duration, failing on anything that is not a whole number.
fn millis_or(key: &str, default_ms: u64) -> anyhow::Result<Duration> {
    let ms = match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid {}", key))?,
        Err(_) => default_ms,
    };
    Ok(Duration::from_millis(ms))
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow!("expected a boolean, got '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_millis_or() {
        assert_eq!(
            millis_or("WL_TEST_MILLIS_UNSET", 250).unwrap(),
            Duration::from_millis(250)
        );

        std::env::set_var("WL_TEST_MILLIS_VALID", " 1500 ");
        assert_eq!(
            millis_or("WL_TEST_MILLIS_VALID", 250).unwrap(),
            Duration::from_millis(1500)
        );

        std::env::set_var("WL_TEST_MILLIS_GARBAGE", "30s");
        let err = millis_or("WL_TEST_MILLIS_GARBAGE", 250).unwrap_err();
        assert_eq!(err.to_string(), "Invalid WL_TEST_MILLIS_GARBAGE");
    }
}
