use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use contracts::domain::a001_use_case::{
    ChannelStatus, DevelopmentTime, ProductionFilter, ProductionStatus, UseCase, UseCaseFilter,
};
use contracts::usecases::common::{OperationError, OperationResult};

use crate::system::state::AppState;

pub const MAX_AUTOMATION_LEVEL: i32 = 5;

/// Разобранный фильтр списка
#[derive(Debug, Default)]
struct ListFilter {
    production: Option<ProductionStatus>,
    channels: Vec<String>,
    development_times: Vec<DevelopmentTime>,
}

/// Список через запятую без пустых элементов
fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl ListFilter {
    fn from_query(query: &UseCaseFilter) -> OperationResult<Self> {
        let production = match query.production {
            ProductionFilter::All => None,
            ProductionFilter::Yes => Some(ProductionStatus::InProduction),
            ProductionFilter::No => Some(ProductionStatus::NotInProduction),
        };

        let development_times = split_list(query.development_time.as_deref())
            .iter()
            .map(|item| {
                DevelopmentTime::from_cell(item).ok_or_else(|| {
                    OperationError::validation("Development time must be S, M or L")
                        .with_details(format!("got '{}'", item))
                })
            })
            .collect::<OperationResult<Vec<_>>>()?;

        Ok(Self {
            production,
            channels: split_list(query.channels.as_deref()),
            development_times,
        })
    }

    /// Пустой критерий пропускает всё; каналы - совпадение хотя бы одного
    fn matches(&self, use_case: &UseCase) -> bool {
        let production_ok = self
            .production
            .map_or(true, |status| use_case.production_status == status);
        let channels_ok = self.channels.is_empty()
            || self
                .channels
                .iter()
                .any(|channel| use_case.channels.contains(channel));
        let time_ok = self.development_times.is_empty()
            || use_case
                .development_time
                .is_some_and(|time| self.development_times.contains(&time));

        production_ok && channels_ok && time_ok
    }
}

/// Список use case с фильтрами формы списка
pub async fn list_filtered(state: &AppState, query: &UseCaseFilter) -> OperationResult<Vec<UseCase>> {
    let filter = ListFilter::from_query(query)?;
    Ok(state
        .use_cases
        .read()
        .await
        .iter()
        .filter(|uc| filter.matches(uc))
        .cloned()
        .collect())
}

pub async fn get_by_id(state: &AppState, id: &str) -> Option<UseCase> {
    state
        .use_cases
        .read()
        .await
        .iter()
        .find(|uc| uc.id == id)
        .cloned()
}

/// Заменить одну запись новой копией: коллекция пересобирается под write-lock
async fn update_one<F>(state: &AppState, id: &str, update: F) -> OperationResult<UseCase>
where
    F: FnOnce(&mut UseCase),
{
    let mut guard = state.use_cases.write().await;
    let position = guard
        .iter()
        .position(|uc| uc.id == id)
        .ok_or_else(|| OperationError::not_found("Use case not found").with_details(id))?;

    let mut next: Vec<UseCase> = guard.clone();
    update(&mut next[position]);
    let updated = next[position].clone();
    *guard = next;

    Ok(updated)
}

/// Сохранить уровень из формы сопоставления уровней
pub async fn set_current_level(state: &AppState, id: &str, level: i32) -> OperationResult<UseCase> {
    if !(0..=MAX_AUTOMATION_LEVEL).contains(&level) {
        return Err(OperationError::validation(format!(
            "Automation level must be between 0 and {}",
            MAX_AUTOMATION_LEVEL
        ))
        .with_details(format!("got {}", level)));
    }

    let updated = update_one(state, id, |uc| uc.current_level = level).await?;
    tracing::info!("Use case {}: current level set to {}", id, level);
    Ok(updated)
}

/// Переключить статус канала в матрице на следующий по кругу
pub async fn cycle_channel(state: &AppState, id: &str, channel: &str) -> OperationResult<UseCase> {
    let channel = channel.trim();
    if channel.is_empty() {
        return Err(OperationError::validation("Channel name is required"));
    }

    update_one(state, id, |uc| {
        let next = uc.channel_status(channel).next();
        if next == ChannelStatus::NotPlanned {
            uc.channel_levels.remove(channel);
            uc.channels.remove(channel);
        } else {
            uc.channel_levels.insert(channel.to_string(), next.level());
            uc.channels.insert(channel.to_string());
        }
        tracing::info!("Use case {}: channel '{}' -> {}", uc.id, channel, next.label());
    })
    .await
}

/// Начальные use case из JSON-файла (массив записей).
///
/// Невалидные записи и повторы id отбрасываются с предупреждением.
pub fn load_seed(path: &Path) -> anyhow::Result<Vec<UseCase>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read seed file {}", path.display()))?;
    let records: Vec<UseCase> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid seed file {}", path.display()))?;

    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(records.len());
    for record in records {
        if let Err(e) = record.validate() {
            tracing::warn!("Seed: skipping record '{}': {}", record.id, e);
            continue;
        }
        if !seen.insert(record.id.clone()) {
            tracing::warn!("Seed: duplicate id '{}' skipped", record.id);
            continue;
        }
        result.push(record);
    }

    tracing::info!("Seed: loaded {} use case(s) from {}", result.len(), path.display());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::state::test_support::empty_state;

    async fn state_with(ids: &[&str]) -> AppState {
        let state = empty_state();
        state
            .replace_use_cases(ids.iter().map(|id| UseCase::new(*id, *id)).collect())
            .await;
        state
    }

    async fn filter_state() -> AppState {
        let mut scoring = UseCase::new("U1", "Lead scoring");
        scoring.production_status = ProductionStatus::InProduction;
        scoring.channels = ["Email".to_string(), "Web".to_string()].into_iter().collect();
        scoring.development_time = Some(DevelopmentTime::M);

        let mut churn = UseCase::new("U2", "Churn");
        churn.production_status = ProductionStatus::NotInProduction;
        churn.channels = ["SMS".to_string()].into_iter().collect();
        churn.development_time = Some(DevelopmentTime::S);

        let unknown = UseCase::new("U3", "Pilot");

        let state = empty_state();
        state.replace_use_cases(vec![scoring, churn, unknown]).await;
        state
    }

    async fn filtered_ids(state: &AppState, query: UseCaseFilter) -> Vec<String> {
        list_filtered(state, &query)
            .await
            .unwrap()
            .into_iter()
            .map(|uc| uc.id)
            .collect()
    }

    #[tokio::test]
    async fn test_list_without_filters_returns_everything() {
        let state = filter_state().await;
        assert_eq!(
            filtered_ids(&state, UseCaseFilter::default()).await,
            vec!["U1", "U2", "U3"]
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_production_status() {
        let state = filter_state().await;
        let yes = UseCaseFilter {
            production: ProductionFilter::Yes,
            ..Default::default()
        };
        let no = UseCaseFilter {
            production: ProductionFilter::No,
            ..Default::default()
        };
        assert_eq!(filtered_ids(&state, yes).await, vec!["U1"]);
        assert_eq!(filtered_ids(&state, no).await, vec!["U2"]);
    }

    #[tokio::test]
    async fn test_list_filters_by_any_channel_and_development_time() {
        let state = filter_state().await;
        let channels = UseCaseFilter {
            channels: Some("SMS, Web".into()),
            ..Default::default()
        };
        assert_eq!(filtered_ids(&state, channels).await, vec!["U1", "U2"]);

        let time = UseCaseFilter {
            development_time: Some("s".into()),
            ..Default::default()
        };
        assert_eq!(filtered_ids(&state, time).await, vec!["U2"]);

        let both = UseCaseFilter {
            channels: Some("Email".into()),
            development_time: Some("S,L".into()),
            ..Default::default()
        };
        assert!(filtered_ids(&state, both).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_development_time() {
        let state = filter_state().await;
        let query = UseCaseFilter {
            development_time: Some("XL".into()),
            ..Default::default()
        };
        let err = list_filtered(&state, &query).await.unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_set_current_level() {
        let state = state_with(&["U1", "U2"]).await;

        let updated = set_current_level(&state, "U2", 4).await.unwrap();
        assert_eq!(updated.current_level, 4);
        assert_eq!(get_by_id(&state, "U2").await.unwrap().current_level, 4);
        assert_eq!(get_by_id(&state, "U1").await.unwrap().current_level, 0);
    }

    #[tokio::test]
    async fn test_set_current_level_rejects_bad_input() {
        let state = state_with(&["U1"]).await;

        let err = set_current_level(&state, "U1", 6).await.unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");

        let err = set_current_level(&state, "missing", 2).await.unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_cycle_channel_wraps_around() {
        let state = state_with(&["U1"]).await;

        for expected in [1u8, 2, 3] {
            let uc = cycle_channel(&state, "U1", "Email").await.unwrap();
            assert_eq!(uc.channel_levels.get("Email"), Some(&expected));
            assert!(uc.channels.contains("Email"));
        }

        let uc = cycle_channel(&state, "U1", "Email").await.unwrap();
        assert!(uc.channel_levels.get("Email").is_none());
        assert!(!uc.channels.contains("Email"));
    }

    #[test]
    fn test_load_seed_skips_invalid_and_duplicates() {
        let path = std::env::temp_dir().join(format!("seed-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[
                {"id":"U1","name":"Lead scoring","current_level":2},
                {"id":"","name":"No id"},
                {"id":"U1","name":"Duplicate"},
                {"id":"U2","title":"Churn model","purpose":"Reduce churn"}
            ]"#,
        )
        .unwrap();

        let seed = load_seed(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let names: Vec<&str> = seed.iter().map(|uc| uc.name.as_str()).collect();
        assert_eq!(names, vec!["Lead scoring", "Churn model"]);
    }
}
