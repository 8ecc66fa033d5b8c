use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::a001_use_case::parser::ChannelColumns;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Каталог со статикой браузерного клиента
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Доступ к Google Sheets API v4
#[derive(Debug, Deserialize, Clone)]
pub struct GoogleConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// API key для таблиц с доступом по ссылке
    #[serde(default)]
    pub api_key: Option<String>,
    /// JSON-ключ сервисного аккаунта; имеет приоритет над api_key
    #[serde(default)]
    pub credentials_path: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Таблица и лист для /api/fetchMonthlyReach
    #[serde(default)]
    pub default_spreadsheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub default_sheet_name: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_uri: default_token_uri(),
            api_key: None,
            credentials_path: None,
            timeout_secs: default_timeout_secs(),
            default_spreadsheet_id: String::new(),
            default_sheet_name: default_sheet_name(),
        }
    }
}

/// Настройки разбора листов
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ImportConfig {
    /// Первая колонка каналов в матрице (по умолчанию - сразу после колонки id)
    #[serde(default)]
    pub channel_columns_start: Option<usize>,
    /// Колонка, на которой каналы заканчиваются (не включительно)
    #[serde(default)]
    pub channel_columns_end: Option<usize>,
}

impl ImportConfig {
    pub fn channel_columns(&self) -> ChannelColumns {
        ChannelColumns {
            start: self.channel_columns_start,
            end: self.channel_columns_end,
        }
    }
}

/// Начальные данные. Без use_cases_path сервер стартует с пустым портфелем.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub use_cases_path: Option<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "dist".to_string()
}

fn default_api_base() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_sheet_name() -> String {
    "Use case metadata".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000
static_dir = "dist"

[database]
path = "target/db/app.db"

[google]
credentials_path = "service-account.json"
default_sheet_name = "Use case metadata"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Resolve a configured path: absolute paths as is, relative ones against
/// the executable directory (falls back to the current directory)
pub fn resolve_path(path: &str) -> PathBuf {
    let candidate = Path::new(path);

    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(candidate);
        }
    }

    PathBuf::from(path)
}
