use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub api_url: String,
    pub file_path: PathBuf,
    pub db_path: PathBuf,
    /// Deadline for the handler's own fetch.
    pub request_timeout: Duration,
    pub store_fetch_timeout: Duration,
    pub store_insert_timeout: Duration,
    /// Let the store fetch the rate again instead of reusing the handler's.
    pub store_refetch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_url: DEFAULT_API_URL.to_string(),
            file_path: PathBuf::from("cotacao.txt"),
            db_path: PathBuf::from("cotacao.db"),
            request_timeout: Duration::from_millis(300),
            store_fetch_timeout: Duration::from_millis(200),
            store_insert_timeout: Duration::from_millis(10),
            store_refetch: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let listen_addr = match lookup("COTACAO_LISTEN_ADDR") {
            Some(v) => v
                .parse()
                .with_context(|| format!("Invalid COTACAO_LISTEN_ADDR: {v}"))?,
            None => defaults.listen_addr,
        };
        let api_url = lookup("COTACAO_API_URL").unwrap_or(defaults.api_url);
        let file_path = lookup("COTACAO_FILE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.file_path);
        let db_path = lookup("COTACAO_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let millis = |key: &str, default: Duration| -> Result<Duration> {
            match lookup(key) {
                Some(v) => {
                    let ms: u64 = v
                        .trim()
                        .parse()
                        .with_context(|| format!("Invalid {key}: {v}"))?;
                    Ok(Duration::from_millis(ms))
                }
                None => Ok(default),
            }
        };

        let store_refetch = match lookup("COTACAO_STORE_REFETCH") {
            Some(v) => v
                .trim()
                .to_ascii_lowercase()
                .parse()
                .with_context(|| format!("Invalid COTACAO_STORE_REFETCH: {v}"))?,
            None => defaults.store_refetch,
        };

        Ok(Self {
            listen_addr,
            api_url,
            file_path,
            db_path,
            request_timeout: millis("COTACAO_REQUEST_TIMEOUT_MS", defaults.request_timeout)?,
            store_fetch_timeout: millis(
                "COTACAO_STORE_FETCH_TIMEOUT_MS",
                defaults.store_fetch_timeout,
            )?,
            store_insert_timeout: millis(
                "COTACAO_STORE_INSERT_TIMEOUT_MS",
                defaults.store_insert_timeout,
            )?,
            store_refetch,
        })
    }
}
