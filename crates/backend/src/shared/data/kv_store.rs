use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Таблица key-value хранилища (ключ -> JSON-строка)
const KV_TABLE: &str = "sys_kv_store";

const CREATE_KV_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS sys_kv_store (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

/// Хранилище строковых значений по ключу
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// Хранилище поверх sqlite-соединения sea-orm
pub struct SeaOrmKeyValueStore {
    conn: DatabaseConnection,
}

impl SeaOrmKeyValueStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Создать таблицу, если её ещё нет
    pub async fn ensure_table(&self) -> Result<()> {
        self.conn
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                CREATE_KV_TABLE_SQL.to_string(),
            ))
            .await
            .with_context(|| format!("Failed to create table {}", KV_TABLE))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SeaOrmKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = self
            .conn
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "SELECT value FROM sys_kv_store WHERE key = ?",
                [key.into()],
            ))
            .await
            .with_context(|| format!("Failed to read key '{}'", key))?;

        match row {
            Some(row) => {
                let value: String = row.try_get("", "value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "INSERT OR REPLACE INTO sys_kv_store (key, value, updated_at) VALUES (?, ?, ?)",
                [key.into(), value.to_string().into(), now.into()],
            ))
            .await
            .with_context(|| format!("Failed to write key '{}'", key))?;

        tracing::debug!("KV store: saved '{}' ({} bytes)", key, value.len());
        Ok(())
    }
}

/// Хранилище в памяти (тесты и запуск без базы)
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
