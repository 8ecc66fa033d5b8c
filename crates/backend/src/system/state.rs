use std::sync::Arc;

use contracts::domain::a001_use_case::UseCase;
use contracts::domain::a002_reporting_data::ReportingData;
use tokio::sync::{Mutex, RwLock};

use crate::domain::a001_use_case::parser::ChannelColumns;
use crate::shared::data::kv_store::KeyValueStore;
use crate::shared::sheets::SheetSource;
use crate::usecases::u601_import_from_sheets::journal::ImportJournal;

/// Состояние приложения: обе коллекции, хранилище отчётных данных и всё,
/// что нужно импорту. Коллекции заменяются целиком, никогда не правятся
/// по месту снаружи.
pub struct AppState {
    pub use_cases: RwLock<Vec<UseCase>>,
    pub reporting_data: RwLock<Vec<ReportingData>>,
    pub store: Arc<dyn KeyValueStore>,
    /// Источник для импорта по ID таблицы
    pub remote: Arc<dyn SheetSource>,
    pub channel_columns: ChannelColumns,
    /// Таблица и лист для /api/fetchMonthlyReach
    pub monthly_reach_sheet: (String, String),
    /// Не более одного импорта одновременно
    pub import_guard: Mutex<()>,
    pub journal: ImportJournal,
}

/// То, что получают обработчики через axum State
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, remote: Arc<dyn SheetSource>) -> Self {
        Self {
            use_cases: RwLock::new(Vec::new()),
            reporting_data: RwLock::new(Vec::new()),
            store,
            remote,
            channel_columns: ChannelColumns::default(),
            monthly_reach_sheet: (String::new(), String::new()),
            import_guard: Mutex::new(()),
            journal: ImportJournal::new(),
        }
    }

    pub fn with_channel_columns(mut self, channel_columns: ChannelColumns) -> Self {
        self.channel_columns = channel_columns;
        self
    }

    pub fn with_monthly_reach_sheet(
        mut self,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
    ) -> Self {
        self.monthly_reach_sheet = (spreadsheet_id.into(), sheet_name.into());
        self
    }

    pub async fn replace_use_cases(&self, use_cases: Vec<UseCase>) {
        *self.use_cases.write().await = use_cases;
    }

    pub async fn replace_reporting_data(&self, rows: Vec<ReportingData>) {
        *self.reporting_data.write().await = rows;
    }

    pub async fn use_cases_snapshot(&self) -> Vec<UseCase> {
        self.use_cases.read().await.clone()
    }

    pub async fn reporting_data_snapshot(&self) -> Vec<ReportingData> {
        self.reporting_data.read().await.clone()
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(self)
    }
}
