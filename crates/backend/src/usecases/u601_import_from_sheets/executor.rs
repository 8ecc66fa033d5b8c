use super::journal::ImportJournal;
use crate::domain::a001_use_case::merge::{merge_imported, merge_updates};
use crate::domain::a001_use_case::parser::{
    parse_channel_levels, parse_target_levels, parse_use_cases, ChannelColumns, UseCaseSheet,
};
use crate::domain::a002_reporting_data::{parser::parse_reporting_data, repository};
use crate::shared::sheets::{SheetRows, SheetSource, WorkbookSource};
use crate::system::state::SharedState;
use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::domain::a001_use_case::{ChannelLevelsUpdate, TargetLevelUpdate};
use contracts::domain::a002_reporting_data::ReportingData;
use contracts::usecases::common::OperationMetadata;
use contracts::usecases::u601_import_from_sheets::{
    ImportCategory, ImportJournalEntry, ImportNotice, ImportRequest, ImportResponse,
    ImportSourceKind, RequiredField, WorkbookImportResponse,
};
use uuid::Uuid;

/// Разобранный лист одной категории
#[derive(Debug, Clone)]
enum ParsedSheet {
    UseCases(UseCaseSheet),
    TargetLevels(Vec<TargetLevelUpdate>),
    ReportingData(Vec<ReportingData>),
    ChannelLevels(Vec<ChannelLevelsUpdate>),
}

impl ParsedSheet {
    fn parse(category: ImportCategory, rows: &SheetRows, channels: ChannelColumns) -> Result<Self> {
        let parsed = match category {
            ImportCategory::UseCases => ParsedSheet::UseCases(parse_use_cases(rows)?),
            ImportCategory::TargetLevels => ParsedSheet::TargetLevels(parse_target_levels(rows)?),
            ImportCategory::ReportingData => {
                ParsedSheet::ReportingData(parse_reporting_data(rows)?)
            }
            ImportCategory::ChannelLevels => {
                ParsedSheet::ChannelLevels(parse_channel_levels(rows, channels)?)
            }
        };
        Ok(parsed)
    }

    fn len(&self) -> usize {
        match self {
            ParsedSheet::UseCases(v) => v.len(),
            ParsedSheet::TargetLevels(v) => v.len(),
            ParsedSheet::ReportingData(v) => v.len(),
            ParsedSheet::ChannelLevels(v) => v.len(),
        }
    }
}

/// Результат подготовки одной категории до фиксации
enum Prepared {
    Parsed(ParsedSheet),
    NoData,
}

/// Executor операции импорта листов (Google Sheets или файл книги)
pub struct ImportExecutor {
    state: SharedState,
}

impl OperationMetadata for ImportExecutor {
    fn operation_index() -> &'static str {
        "u601"
    }

    fn operation_name() -> &'static str {
        "import_from_sheets"
    }

    fn display_name() -> &'static str {
        "Импорт из Google Sheets"
    }
}

impl ImportExecutor {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    pub fn journal(&self) -> &ImportJournal {
        &self.state.journal
    }

    /// Импорт одной категории из таблицы Google Sheets.
    ///
    /// Никогда не возвращает ошибку: любой исход описан в `ImportNotice`.
    pub async fn import_from_sheets(&self, request: ImportRequest) -> ImportResponse {
        let session_id = Uuid::new_v4().to_string();
        let category = request.category;
        let sheet_name = request.sheet_name().to_string();

        if request.spreadsheet_id.trim().is_empty() {
            return ImportResponse::new(
                session_id,
                category,
                ImportNotice::FieldRequired {
                    field: RequiredField::SpreadsheetId,
                },
            );
        }
        if sheet_name.is_empty() {
            return ImportResponse::new(
                session_id,
                category,
                ImportNotice::FieldRequired {
                    field: RequiredField::SheetName,
                },
            );
        }

        let Ok(_guard) = self.state.import_guard.try_lock() else {
            tracing::warn!("{}: import requested while another is running", Self::full_name());
            return ImportResponse::new(session_id, category, ImportNotice::Busy);
        };

        let started_at = Utc::now();
        let spreadsheet_id = request.spreadsheet_id.trim().to_string();
        tracing::info!(
            "{}: importing {} from spreadsheet {} sheet '{}' (session {})",
            Self::full_name(),
            category,
            spreadsheet_id,
            sheet_name,
            session_id
        );

        let source = self.state.remote.clone();
        let notice = match self
            .prepare(source.as_ref(), &spreadsheet_id, &sheet_name, category)
            .await
        {
            Ok(Prepared::NoData) => ImportNotice::NoData,
            Ok(Prepared::Parsed(parsed)) => match self.commit(vec![parsed]).await {
                Ok(counts) => ImportNotice::Imported {
                    count: counts.first().copied().unwrap_or_default(),
                },
                Err(e) => failed(category, &e),
            },
            Err(e) => failed(category, &e),
        };

        let response = ImportResponse::new(session_id, category, notice);
        self.record(
            &response,
            &sheet_name,
            ImportSourceKind::GoogleSheets { spreadsheet_id },
            started_at,
        )
        .await;
        response
    }

    /// Импорт загруженного файла книги.
    ///
    /// С категорией импортируется один лист (имя по умолчанию для категории,
    /// если не задано). Без категории импортируются все листы книги в
    /// порядке `ImportCategory::WORKBOOK_ORDER`, как одна операция: если
    /// хоть один лист не разобран, не фиксируется ничего.
    pub async fn import_from_workbook(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        category: Option<ImportCategory>,
        sheet_name: Option<String>,
    ) -> WorkbookImportResponse {
        let session_id = Uuid::new_v4().to_string();
        let reported_category = category.unwrap_or(ImportCategory::UseCases);
        let single = |notice: ImportNotice| WorkbookImportResponse {
            session_id: session_id.clone(),
            file_name: file_name.to_string(),
            results: vec![ImportResponse::new(
                session_id.clone(),
                reported_category,
                notice,
            )],
        };

        if file_name.trim().is_empty() || bytes.is_empty() {
            return single(ImportNotice::FieldRequired {
                field: RequiredField::File,
            });
        }

        let Ok(_guard) = self.state.import_guard.try_lock() else {
            tracing::warn!("{}: upload received while another import is running", Self::full_name());
            return single(ImportNotice::Busy);
        };

        let started_at = Utc::now();
        let csv_sheet_name = sheet_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| reported_category.default_sheet_name().to_string());

        let workbook = match WorkbookSource::from_bytes(file_name, bytes, &csv_sheet_name) {
            Ok(workbook) => workbook,
            Err(e) => {
                let response = WorkbookImportResponse {
                    session_id: session_id.clone(),
                    file_name: file_name.to_string(),
                    results: vec![ImportResponse::new(
                        session_id.clone(),
                        reported_category,
                        failed(reported_category, &e),
                    )],
                };
                self.record_all(&response, &[csv_sheet_name], started_at).await;
                return response;
            }
        };

        // Для CSV и явной категории - ровно один лист
        let is_bundle = category.is_none() && !file_name.to_lowercase().ends_with(".csv");
        let plan: Vec<(ImportCategory, String)> = if is_bundle {
            ImportCategory::WORKBOOK_ORDER
                .iter()
                .map(|c| (*c, c.default_sheet_name().to_string()))
                .collect()
        } else {
            vec![(reported_category, csv_sheet_name)]
        };

        tracing::info!(
            "{}: importing workbook '{}' [{}] (session {})",
            Self::full_name(),
            file_name,
            plan.iter()
                .map(|(c, s)| format!("{} <- '{}'", c, s))
                .collect::<Vec<_>>()
                .join(", "),
            session_id
        );

        let notices = self.import_plan(&workbook, &plan, is_bundle).await;

        let response = WorkbookImportResponse {
            session_id: session_id.clone(),
            file_name: file_name.to_string(),
            results: plan
                .iter()
                .zip(notices)
                .map(|((category, _), notice)| {
                    ImportResponse::new(session_id.clone(), *category, notice)
                })
                .collect(),
        };

        let sheet_names: Vec<String> = plan.into_iter().map(|(_, s)| s).collect();
        self.record_all(&response, &sheet_names, started_at).await;

        if response.is_success() {
            tracing::info!("{}: workbook '{}' imported", Self::full_name(), file_name);
        } else {
            tracing::warn!(
                "{}: workbook '{}' imported nothing (session {})",
                Self::full_name(),
                file_name,
                session_id
            );
        }
        response
    }

    /// Подготовить все листы плана, затем зафиксировать разобранные разом
    async fn import_plan(
        &self,
        workbook: &WorkbookSource,
        plan: &[(ImportCategory, String)],
        is_bundle: bool,
    ) -> Vec<ImportNotice> {
        let mut prepared = Vec::with_capacity(plan.len());

        for (idx, (category, sheet_name)) in plan.iter().enumerate() {
            // В книге целиком отсутствующий лист - это "нет данных", а не ошибка
            if is_bundle && !workbook.has_sheet(sheet_name) {
                tracing::info!("Workbook has no sheet '{}', skipping {}", sheet_name, category);
                prepared.push(Prepared::NoData);
                continue;
            }

            match self.prepare(workbook, "", sheet_name, *category).await {
                Ok(p) => prepared.push(p),
                Err(e) => return aborted(plan, idx, failed(*category, &e)),
            }
        }

        let mut parsed = Vec::new();
        let mut parsed_positions = Vec::new();
        for (idx, p) in prepared.iter().enumerate() {
            if let Prepared::Parsed(sheet) = p {
                parsed.push(sheet.clone());
                parsed_positions.push(idx);
            }
        }

        let mut notices: Vec<ImportNotice> = prepared
            .iter()
            .map(|_| ImportNotice::NoData)
            .collect();

        if parsed.is_empty() {
            return notices;
        }

        match self.commit(parsed).await {
            Ok(counts) => {
                for (position, count) in parsed_positions.into_iter().zip(counts) {
                    notices[position] = ImportNotice::Imported { count };
                }
                notices
            }
            Err(e) => {
                // Сорваться на фиксации может только сохранение отчётных данных
                let position = parsed_positions
                    .iter()
                    .copied()
                    .find(|idx| plan[*idx].0 == ImportCategory::ReportingData)
                    .or_else(|| parsed_positions.first().copied())
                    .unwrap_or_default();
                let (category, _) = &plan[position];
                aborted(plan, position, failed(*category, &e))
            }
        }
    }

    /// Прочитать и разобрать лист; пустой результат - `NoData`
    async fn prepare(
        &self,
        source: &dyn SheetSource,
        spreadsheet_id: &str,
        sheet_name: &str,
        category: ImportCategory,
    ) -> Result<Prepared> {
        let rows = source.fetch_rows(spreadsheet_id, sheet_name).await?;
        tracing::debug!(
            "Fetched {} row(s) for {} from {}",
            rows.len(),
            category,
            source.describe()
        );

        let parsed = ParsedSheet::parse(category, &rows, self.state.channel_columns)?;
        if parsed.len() == 0 {
            tracing::info!("No {} found in sheet '{}'", category.record_noun(), sheet_name);
            return Ok(Prepared::NoData);
        }
        Ok(Prepared::Parsed(parsed))
    }

    /// Зафиксировать разобранные листы. Отчётные данные сохраняются в
    /// хранилище до любых изменений в памяти, чтобы сбой сохранения
    /// не оставлял частично применённый импорт.
    async fn commit(&self, sheets: Vec<ParsedSheet>) -> Result<Vec<usize>> {
        let counts: Vec<usize> = sheets.iter().map(ParsedSheet::len).collect();

        for sheet in &sheets {
            if let ParsedSheet::ReportingData(rows) = sheet {
                repository::save(self.state.store.as_ref(), rows).await?;
            }
        }

        let mut use_cases = self.state.use_cases.write().await;
        let mut merged = use_cases.clone();

        for sheet in sheets {
            match sheet {
                ParsedSheet::UseCases(sheet) => merged = merge_imported(&merged, &sheet),
                ParsedSheet::TargetLevels(updates) => merged = merge_updates(&merged, &updates),
                ParsedSheet::ChannelLevels(updates) => merged = merge_updates(&merged, &updates),
                ParsedSheet::ReportingData(rows) => {
                    self.state.replace_reporting_data(rows).await;
                }
            }
        }

        *use_cases = merged;
        tracing::info!("{}: committed {:?} record(s)", Self::full_name(), counts);
        Ok(counts)
    }

    async fn record(
        &self,
        response: &ImportResponse,
        sheet_name: &str,
        source: ImportSourceKind,
        started_at: DateTime<Utc>,
    ) {
        self.state
            .journal
            .record(ImportJournalEntry {
                session_id: response.session_id.clone(),
                category: response.category,
                sheet_name: sheet_name.to_string(),
                source,
                started_at,
                completed_at: Utc::now(),
                notice: response.notice.clone(),
            })
            .await;
    }

    async fn record_all(
        &self,
        response: &WorkbookImportResponse,
        sheet_names: &[String],
        started_at: DateTime<Utc>,
    ) {
        for (result, sheet_name) in response.results.iter().zip(sheet_names) {
            self.record(
                result,
                sheet_name,
                ImportSourceKind::Workbook {
                    file_name: response.file_name.clone(),
                },
                started_at,
            )
            .await;
        }
    }
}

fn failed(category: ImportCategory, error: &anyhow::Error) -> ImportNotice {
    tracing::error!("Import of {} failed: {:#}", category, error);
    ImportNotice::Failed {
        message: format!("{:#}", error),
    }
}

/// Уведомления для прерванного плана: причина у сорвавшейся категории,
/// у остальных - отметка, что они не импортированы
fn aborted(
    plan: &[(ImportCategory, String)],
    failed_at: usize,
    cause: ImportNotice,
) -> Vec<ImportNotice> {
    let failed_label = plan[failed_at].0.label();
    plan.iter()
        .enumerate()
        .map(|(idx, _)| {
            if idx == failed_at {
                cause.clone()
            } else {
                ImportNotice::Failed {
                    message: format!("Not imported: {} could not be imported", failed_label),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::kv_store::{InMemoryKeyValueStore, KeyValueStore};
    use crate::system::state::test_support::{empty_state, rows, state_with_remote};
    use crate::system::state::AppState;
    use async_trait::async_trait;
    use contracts::domain::a001_use_case::{ProductionStatus, UseCase};
    use contracts::domain::a002_reporting_data::REPORTING_DATA_KEY;
    use contracts::usecases::u601_import_from_sheets::SheetNames;
    use std::sync::Arc;

    struct FailingSource;

    #[async_trait]
    impl SheetSource for FailingSource {
        fn describe(&self) -> String {
            "failing".into()
        }

        async fn fetch_rows(&self, _: &str, _: &str) -> Result<SheetRows> {
            anyhow::bail!("HTTP 403 from Google Sheets")
        }
    }

    fn request(category: ImportCategory, sheet_name: &str) -> ImportRequest {
        let mut sheet_names = SheetNames::default();
        match category {
            ImportCategory::UseCases => sheet_names.use_cases = sheet_name.into(),
            ImportCategory::TargetLevels => sheet_names.target_levels = sheet_name.into(),
            ImportCategory::ReportingData => sheet_names.reporting_data = sheet_name.into(),
            ImportCategory::ChannelLevels => sheet_names.channel_levels = sheet_name.into(),
        }
        ImportRequest {
            spreadsheet_id: "1abc".into(),
            category,
            sheet_names,
        }
    }

    fn remote_book() -> WorkbookSource {
        WorkbookSource::from_sheets(
            "remote",
            vec![
                (
                    "Meta".into(),
                    rows(&[
                        &["id", "name", "desc", "cat", "cur", "tgt", "prod", "year"],
                        &["U1", "Lead scoring", "Score", "Sales", "2", "4", "TRUE", "2023"],
                        &["U2", "Churn", "Keep", "CRM", "1", "", "no", "2024"],
                    ]),
                ),
                ("Targets".into(), rows(&[&["id", "target"], &["U2", "5"]])),
                ("Empty".into(), rows(&[&["id", "target"]])),
                (
                    "Reporting".into(),
                    rows(&[
                        &["year", "month", "revenue", "impact"],
                        &["2024", "Jan", "", "100"],
                    ]),
                ),
            ],
        )
    }

    fn executor(state: AppState) -> ImportExecutor {
        ImportExecutor::new(state.into_shared())
    }

    #[tokio::test]
    async fn test_missing_inputs_are_reported_before_fetch() {
        let executor = ImportExecutor::new(
            AppState::new(
                Arc::new(InMemoryKeyValueStore::new()),
                Arc::new(FailingSource),
            )
            .into_shared(),
        );

        let mut no_id = request(ImportCategory::UseCases, "Meta");
        no_id.spreadsheet_id = "  ".into();
        let response = executor.import_from_sheets(no_id).await;
        assert_eq!(
            response.notice,
            ImportNotice::FieldRequired {
                field: RequiredField::SpreadsheetId
            }
        );
        assert_eq!(response.title, "Sheet ID required");

        let response = executor
            .import_from_sheets(request(ImportCategory::ReportingData, " "))
            .await;
        assert_eq!(
            response.notice,
            ImportNotice::FieldRequired {
                field: RequiredField::SheetName
            }
        );
        assert!(executor.journal().recent().await.is_empty());
    }

    #[tokio::test]
    async fn test_use_cases_then_targets_are_merged() {
        let executor = executor(state_with_remote(remote_book()));

        let response = executor
            .import_from_sheets(request(ImportCategory::UseCases, "Meta"))
            .await;
        assert_eq!(response.notice, ImportNotice::Imported { count: 2 });

        let response = executor
            .import_from_sheets(request(ImportCategory::TargetLevels, "Targets"))
            .await;
        assert_eq!(response.notice, ImportNotice::Imported { count: 1 });

        let use_cases = executor.state.use_cases_snapshot().await;
        assert_eq!(use_cases.len(), 2);
        assert_eq!(use_cases[0].production_status, ProductionStatus::InProduction);
        assert_eq!(use_cases[0].target_level, Some(4));
        assert_eq!(use_cases[1].target_level, Some(5));
        assert_eq!(executor.journal().recent().await.len(), 2);
    }

    #[tokio::test]
    async fn test_reimport_without_optional_columns_keeps_existing_fields() {
        let remote = WorkbookSource::from_sheets(
            "remote",
            vec![("Names".into(), rows(&[&["id", "name"], &["U1", "Renamed"]]))],
        );
        let executor = executor(state_with_remote(remote));

        let mut existing = UseCase::new("U1", "Lead scoring");
        existing.category = "Sales".into();
        existing.current_level = 3;
        existing.target_level = Some(5);
        existing.development_year = Some(2023);
        existing.production_status = ProductionStatus::InProduction;
        executor.state.replace_use_cases(vec![existing]).await;

        let response = executor
            .import_from_sheets(request(ImportCategory::UseCases, "Names"))
            .await;
        assert_eq!(response.notice, ImportNotice::Imported { count: 1 });

        let uc = &executor.state.use_cases_snapshot().await[0];
        assert_eq!(uc.name, "Renamed");
        assert_eq!(uc.category, "Sales");
        assert_eq!(uc.current_level, 3);
        assert_eq!(uc.target_level, Some(5));
        assert_eq!(uc.development_year, Some(2023));
        assert_eq!(uc.production_status, ProductionStatus::InProduction);
    }

    #[tokio::test]
    async fn test_target_rows_without_id_are_not_counted() {
        let remote = WorkbookSource::from_sheets(
            "remote",
            vec![(
                "Targets".into(),
                rows(&[&["id", "target"], &["", "4"], &["U1", "5"]]),
            )],
        );
        let executor = executor(state_with_remote(remote));
        executor
            .state
            .replace_use_cases(vec![UseCase::new("U1", "Lead scoring")])
            .await;

        let response = executor
            .import_from_sheets(request(ImportCategory::TargetLevels, "Targets"))
            .await;
        assert_eq!(response.notice, ImportNotice::Imported { count: 1 });
        assert_eq!(executor.state.use_cases_snapshot().await[0].target_level, Some(5));
    }

    #[tokio::test]
    async fn test_header_only_sheet_reports_no_data() {
        let executor = executor(state_with_remote(remote_book()));
        executor
            .state
            .replace_use_cases(vec![UseCase::new("U2", "Churn")])
            .await;

        let response = executor
            .import_from_sheets(request(ImportCategory::TargetLevels, "Empty"))
            .await;
        assert_eq!(response.notice, ImportNotice::NoData);
        assert_eq!(response.title, "No data found");
        assert_eq!(executor.state.use_cases_snapshot().await[0].target_level, None);
    }

    #[tokio::test]
    async fn test_reporting_data_is_replaced_and_persisted() {
        let executor = executor(state_with_remote(remote_book()));
        executor
            .state
            .replace_reporting_data(vec![ReportingData::default(), ReportingData::default()])
            .await;

        let response = executor
            .import_from_sheets(request(ImportCategory::ReportingData, "Reporting"))
            .await;
        assert_eq!(response.notice, ImportNotice::Imported { count: 1 });

        let rows = executor.state.reporting_data_snapshot().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, 0.0);
        assert_eq!(rows[0].impact, 100.0);

        let stored = executor.state.store.get(REPORTING_DATA_KEY).await.unwrap();
        assert!(stored.unwrap().contains("\"month\":\"Jan\""));
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_state_untouched() {
        let state = AppState::new(
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(FailingSource),
        );
        let executor = executor(state);
        executor
            .state
            .replace_use_cases(vec![UseCase::new("U1", "Kept")])
            .await;

        let response = executor
            .import_from_sheets(request(ImportCategory::UseCases, "Meta"))
            .await;
        assert_eq!(response.title, "Import failed");
        assert!(matches!(response.notice, ImportNotice::Failed { ref message } if message.contains("403")));
        assert_eq!(executor.state.use_cases_snapshot().await[0].name, "Kept");

        let journal = executor.journal().recent().await;
        assert_eq!(journal.len(), 1);
        assert_eq!(journal[0].notice, response.notice);
    }

    #[tokio::test]
    async fn test_concurrent_import_is_busy() {
        let executor = executor(state_with_remote(remote_book()));
        let _running = executor.state.import_guard.lock().await;

        let response = executor
            .import_from_sheets(request(ImportCategory::UseCases, "Meta"))
            .await;
        assert_eq!(response.notice, ImportNotice::Busy);
        assert!(executor.state.use_cases_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_csv_upload_for_one_category() {
        let executor = executor(empty_state());
        let csv = "id,name,current level\nU1,Lead scoring,3\n";

        let response = executor
            .import_from_workbook("meta.csv", csv.as_bytes().to_vec(), None, None)
            .await;

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].category, ImportCategory::UseCases);
        assert_eq!(response.results[0].notice, ImportNotice::Imported { count: 1 });
        assert!(response.is_success());
        assert_eq!(executor.state.use_cases_snapshot().await[0].current_level, 3);
    }

    #[tokio::test]
    async fn test_empty_upload_requires_file() {
        let executor = executor(empty_state());
        let response = executor
            .import_from_workbook("", Vec::new(), Some(ImportCategory::ReportingData), None)
            .await;
        assert_eq!(
            response.results[0].notice,
            ImportNotice::FieldRequired {
                field: RequiredField::File
            }
        );
    }

    #[tokio::test]
    async fn test_unreadable_workbook_fails() {
        let executor = executor(empty_state());
        let response = executor
            .import_from_workbook("book.xlsx", b"garbage".to_vec(), None, None)
            .await;
        assert!(matches!(
            response.results[0].notice,
            ImportNotice::Failed { .. }
        ));
        assert!(!response.is_success());
        assert_eq!(executor.journal().recent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_bundle_commits_all_or_nothing() {
        let state = empty_state();
        let executor = executor(state);
        let book = WorkbookSource::from_sheets(
            "book.xlsx",
            vec![
                (
                    "Use Cases".into(),
                    rows(&[&["id", "name"], &["U1", "Lead scoring"]]),
                ),
                (
                    "Reporting Data".into(),
                    rows(&[&["revenue"], &["10"]]),
                ),
            ],
        );
        let plan: Vec<(ImportCategory, String)> = ImportCategory::WORKBOOK_ORDER
            .iter()
            .map(|c| (*c, c.default_sheet_name().to_string()))
            .collect();

        let notices = executor.import_plan(&book, &plan, true).await;

        assert!(matches!(notices[2], ImportNotice::Failed { ref message } if message.contains("year, month")));
        assert!(matches!(notices[0], ImportNotice::Failed { .. }));
        assert!(executor.state.use_cases_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_bundle_imports_present_sheets_and_skips_absent() {
        let executor = executor(empty_state());
        let book = WorkbookSource::from_sheets(
            "book.xlsx",
            vec![
                (
                    "Use Cases".into(),
                    rows(&[&["id", "name"], &["U1", "Lead scoring"], &["U2", "Churn"]]),
                ),
                (
                    "Target Automation Levels".into(),
                    rows(&[&["id", "target level"], &["U1", "5"]]),
                ),
                (
                    "Channel Levels".into(),
                    rows(&[&["id", "Email", "Web"], &["U2", "TRUE", "FALSE"]]),
                ),
            ],
        );
        let plan: Vec<(ImportCategory, String)> = ImportCategory::WORKBOOK_ORDER
            .iter()
            .map(|c| (*c, c.default_sheet_name().to_string()))
            .collect();

        let notices = executor.import_plan(&book, &plan, true).await;
        assert_eq!(
            notices,
            vec![
                ImportNotice::Imported { count: 2 },
                ImportNotice::Imported { count: 1 },
                ImportNotice::NoData,
                ImportNotice::Imported { count: 1 },
            ]
        );

        let use_cases = executor.state.use_cases_snapshot().await;
        assert_eq!(use_cases[0].target_level, Some(5));
        assert_eq!(use_cases[1].channel_levels.get("Email"), Some(&3));
        assert!(use_cases[1].channels.contains("Email"));
    }
}
