use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use super::source::{SheetRows, SheetSource};
use crate::shared::config::{resolve_path, GoogleConfig};

const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Токен обновляется заранее, чтобы не истечь посреди запроса
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Ошибки обращения к Google Sheets API
#[derive(Debug, Error)]
pub enum SheetsApiError {
    #[error("Google Sheets credentials are not configured (set google.credentials_path or google.api_key)")]
    MissingCredentials,

    #[error("Token request failed: HTTP {status}: {body}")]
    TokenRequest { status: u16, body: String },

    #[error("HTTP {status} from Google Sheets for range '{range}': {body}")]
    Http {
        status: u16,
        range: String,
        body: String,
    },
}

/// Ключ сервисного аккаунта (поля JSON-файла, которые нам нужны)
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Clone)]
enum SheetsAuth {
    ServiceAccount(ServiceAccountKey),
    ApiKey(String),
    Unconfigured,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Ответ values.get
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// HTTP-клиент Google Sheets API v4 (только чтение значений листа)
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    api_base: String,
    token_uri: String,
    auth: SheetsAuth,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleSheetsClient {
    pub fn new(config: &GoogleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let auth = Self::load_auth(config);

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token_uri: config.token_uri.clone(),
            auth,
            token: Mutex::new(None),
        })
    }

    /// Ключ сервисного аккаунта читается при старте. Если файла нет, сервер всё
    /// равно запускается: импорт из файла книги работает и без Google.
    fn load_auth(config: &GoogleConfig) -> SheetsAuth {
        if let Some(path) = config.credentials_path.as_deref().filter(|p| !p.trim().is_empty()) {
            let resolved = resolve_path(path);
            match std::fs::read_to_string(&resolved)
                .map_err(anyhow::Error::from)
                .and_then(|raw| Ok(serde_json::from_str::<ServiceAccountKey>(&raw)?))
            {
                Ok(key) => {
                    tracing::info!(
                        "Google Sheets: using service account {} ({})",
                        key.client_email,
                        resolved.display()
                    );
                    return SheetsAuth::ServiceAccount(key);
                }
                Err(e) => {
                    tracing::warn!(
                        "Google Sheets: cannot load service account key {}: {}",
                        resolved.display(),
                        e
                    );
                }
            }
        }

        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {
                tracing::info!("Google Sheets: using API key");
                SheetsAuth::ApiKey(key.to_string())
            }
            _ => {
                tracing::warn!("Google Sheets: no credentials configured, remote import disabled");
                SheetsAuth::Unconfigured
            }
        }
    }

    pub fn values_url(&self, spreadsheet_id: &str, sheet_name: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.api_base,
            urlencoding::encode(spreadsheet_id.trim()),
            urlencoding::encode(sheet_name.trim())
        )
    }

    async fn access_token(&self, key: &ServiceAccountKey) -> Result<String> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        let token_uri = key.token_uri.as_deref().unwrap_or(&self.token_uri);
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: SHEETS_READONLY_SCOPE,
            aud: token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .context("Invalid private key in service account file")?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .context("Failed to sign service account assertion")?;

        tracing::debug!("Requesting Google access token from {}", token_uri);

        let response = self
            .client
            .post(token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .with_context(|| format!("Network error requesting token from {}", token_uri))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsApiError::TokenRequest {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        });

        Ok(value)
    }

    /// Получить значения листа целиком (строка 0 - заголовки)
    pub async fn fetch_values(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<SheetRows> {
        let url = self.values_url(spreadsheet_id, sheet_name);
        let request = match &self.auth {
            SheetsAuth::ServiceAccount(key) => {
                let token = self.access_token(key).await?;
                self.client.get(&url).bearer_auth(token)
            }
            SheetsAuth::ApiKey(api_key) => self.client.get(&url).query(&[("key", api_key)]),
            SheetsAuth::Unconfigured => return Err(SheetsApiError::MissingCredentials.into()),
        };

        tracing::info!("Google Sheets API: GET {}", url);

        let response = request
            .send()
            .await
            .with_context(|| format!("Network error requesting {}", url))?;

        let status = response.status();
        tracing::info!("Google Sheets API response: {} for {}", status, url);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsApiError::Http {
                status: status.as_u16(),
                range: sheet_name.to_string(),
                body,
            }
            .into());
        }

        let range: ValueRange = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;

        let rows = normalize_values(range.values);
        tracing::info!("Google Sheets API: got {} rows from '{}'", rows.len(), sheet_name);
        Ok(rows)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    fn describe(&self) -> String {
        "Google Sheets".to_string()
    }

    async fn fetch_rows(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<SheetRows> {
        self.fetch_values(spreadsheet_id, sheet_name).await
    }
}

/// Привести ячейки ответа к строкам, как их показывает таблица
pub fn normalize_values(values: Vec<Vec<Value>>) -> SheetRows {
    values
        .into_iter()
        .map(|row| row.iter().map(value_to_cell).collect())
        .collect()
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
