use super::request::ImportCategory;
use serde::{Deserialize, Serialize};

/// Какое поле формы не заполнено
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    SpreadsheetId,
    SheetName,
    File,
}

/// Итог одной операции импорта, как он показывается пользователю
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportNotice {
    /// Не заполнено обязательное поле, к источнику не обращались
    FieldRequired { field: RequiredField },
    /// Лист разобран, но записей нет
    NoData,
    /// Другой импорт ещё выполняется
    Busy,
    Imported { count: usize },
    Failed { message: String },
}

impl ImportNotice {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportNotice::Imported { .. })
    }

    pub fn title(&self, category: ImportCategory) -> String {
        match self {
            ImportNotice::FieldRequired {
                field: RequiredField::SpreadsheetId,
            } => "Sheet ID required".to_string(),
            ImportNotice::FieldRequired {
                field: RequiredField::SheetName,
            } => "Sheet name required".to_string(),
            ImportNotice::FieldRequired {
                field: RequiredField::File,
            } => "File required".to_string(),
            ImportNotice::NoData => "No data found".to_string(),
            ImportNotice::Busy => "Import in progress".to_string(),
            ImportNotice::Imported { .. } => match category {
                ImportCategory::UseCases => "Data imported successfully".to_string(),
                _ => format!("Imported {} successfully", category.label()),
            },
            ImportNotice::Failed { .. } => "Import failed".to_string(),
        }
    }

    pub fn description(&self, category: ImportCategory) -> String {
        match self {
            ImportNotice::FieldRequired {
                field: RequiredField::SpreadsheetId,
            } => "Please enter a Google Sheet ID".to_string(),
            ImportNotice::FieldRequired {
                field: RequiredField::SheetName,
            } => format!("Please enter a sheet name for {}", category.label()),
            ImportNotice::FieldRequired {
                field: RequiredField::File,
            } => "Please select a spreadsheet file".to_string(),
            ImportNotice::NoData => format!(
                "Could not find any valid {} in the sheet",
                category.record_noun()
            ),
            ImportNotice::Busy => {
                "Another import is still running, try again when it finishes".to_string()
            }
            ImportNotice::Imported { count } => {
                format!("Imported {} {}", count, category.record_noun())
            }
            ImportNotice::Failed { message } => message.clone(),
        }
    }
}

/// Ответ на запрос импорта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub session_id: String,
    pub category: ImportCategory,
    pub notice: ImportNotice,
    pub title: String,
    pub description: String,
}

impl ImportResponse {
    pub fn new(session_id: String, category: ImportCategory, notice: ImportNotice) -> Self {
        let title = notice.title(category);
        let description = notice.description(category);
        Self {
            session_id,
            category,
            notice,
            title,
            description,
        }
    }
}

/// Ответ на загрузку файла книги (одна или несколько категорий)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookImportResponse {
    pub session_id: String,
    pub file_name: String,
    pub results: Vec<ImportResponse>,
}

impl WorkbookImportResponse {
    pub fn is_success(&self) -> bool {
        self.results.iter().any(|r| r.notice.is_success())
            && !self
                .results
                .iter()
                .any(|r| matches!(r.notice, ImportNotice::Failed { .. }))
    }
}
