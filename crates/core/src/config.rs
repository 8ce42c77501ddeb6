use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub haokan: HaokanConfig,
    pub ingestion: IngestionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` pair the API binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where snapshot batches and the account directory live on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `crawl_*.json` batch files.
    pub data_dir: PathBuf,
    /// Single-file store written by older deployments; read if present.
    pub legacy_records_file: Option<PathBuf>,
    /// Account directory (JSON list of `{id, name}`).
    pub accounts_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            legacy_records_file: Some(PathBuf::from("data/records.json")),
            accounts_file: PathBuf::from("config/accounts.json"),
        }
    }
}

/// Upstream listing API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HaokanConfig {
    pub listing_url: String,
    pub author_info_url: String,
    pub video_type: String,
    pub page_size: u32,
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
}

impl Default for HaokanConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://haokan.baidu.com/web/author/listall".to_string(),
            author_info_url: "https://haokan.baidu.com/haokan/ui-web/author/info".to_string(),
            video_type: "haokan|tabhubVideo".to_string(),
            page_size: 20,
            timeout_secs: 10,
            requests_per_minute: 60,
        }
    }
}

/// Ingestion cycle pacing and retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    pub cron_schedule: String,
    pub max_attempts: u32,
    pub retry_backoff_secs: u64,
    pub page_delay_ms: u64,
    pub account_delay_ms: u64,
    /// Hard cap on pages fetched per account in one cycle.
    pub max_pages: u32,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron_schedule: "0 0 * * * *".to_string(),
            max_attempts: 3,
            retry_backoff_secs: 5,
            page_delay_ms: 500,
            account_delay_ms: 1000,
            max_pages: 500,
        }
    }
}
