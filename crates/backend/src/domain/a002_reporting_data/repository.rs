use anyhow::Context;
use contracts::domain::a002_reporting_data::{ReportingData, REPORTING_DATA_KEY};

use crate::shared::data::kv_store::KeyValueStore;

/// Сохранить коллекцию отчётных данных целиком (JSON под фиксированным ключом)
pub async fn save(store: &dyn KeyValueStore, rows: &[ReportingData]) -> anyhow::Result<()> {
    let json = serde_json::to_string(rows).context("Failed to serialize reporting data")?;
    store.put(REPORTING_DATA_KEY, &json).await
}

/// Загрузить сохранённую коллекцию; если ничего не сохранено - пустая
pub async fn load(store: &dyn KeyValueStore) -> anyhow::Result<Vec<ReportingData>> {
    match store.get(REPORTING_DATA_KEY).await? {
        Some(json) => serde_json::from_str(&json)
            .with_context(|| format!("Stored value under '{}' is not valid", REPORTING_DATA_KEY)),
        None => Ok(Vec::new()),
    }
}
