use super::request::ImportCategory;
use super::response::ImportNotice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Откуда пришли строки листа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportSourceKind {
    GoogleSheets { spreadsheet_id: String },
    Workbook { file_name: String },
}

/// Запись журнала импорта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportJournalEntry {
    pub session_id: String,
    pub category: ImportCategory,
    pub sheet_name: String,
    pub source: ImportSourceKind,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub notice: ImportNotice,
}
