use serde::{Deserialize, Serialize};

/// Категория импорта (вкладка формы импорта)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportCategory {
    UseCases,
    TargetLevels,
    ReportingData,
    ChannelLevels,
}

impl ImportCategory {
    /// Порядок листов при импорте всей книги целиком
    pub const WORKBOOK_ORDER: [ImportCategory; 4] = [
        ImportCategory::UseCases,
        ImportCategory::TargetLevels,
        ImportCategory::ReportingData,
        ImportCategory::ChannelLevels,
    ];

    /// Имя листа в выгрузке книги Google Sheets
    pub fn default_sheet_name(&self) -> &'static str {
        match self {
            ImportCategory::UseCases => "Use Cases",
            ImportCategory::TargetLevels => "Target Automation Levels",
            ImportCategory::ReportingData => "Reporting Data",
            ImportCategory::ChannelLevels => "Channel Levels",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImportCategory::UseCases => "use case metadata",
            ImportCategory::TargetLevels => "target automation levels",
            ImportCategory::ReportingData => "reporting data",
            ImportCategory::ChannelLevels => "channel automation levels",
        }
    }

    /// Как называются записи категории в сообщениях пользователю
    pub fn record_noun(&self) -> &'static str {
        match self {
            ImportCategory::UseCases => "use cases",
            ImportCategory::TargetLevels => "target levels",
            ImportCategory::ReportingData => "reporting rows",
            ImportCategory::ChannelLevels => "channel rows",
        }
    }
}

impl std::fmt::Display for ImportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ImportCategory::UseCases => "use_cases",
            ImportCategory::TargetLevels => "target_levels",
            ImportCategory::ReportingData => "reporting_data",
            ImportCategory::ChannelLevels => "channel_levels",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ImportCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "use_cases" => Ok(ImportCategory::UseCases),
            "target_levels" => Ok(ImportCategory::TargetLevels),
            "reporting_data" => Ok(ImportCategory::ReportingData),
            "channel_levels" => Ok(ImportCategory::ChannelLevels),
            other => Err(format!("Unknown import category: {}", other)),
        }
    }
}

/// Имена листов по категориям, как они введены в форме импорта
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetNames {
    #[serde(default)]
    pub use_cases: String,
    #[serde(default)]
    pub target_levels: String,
    #[serde(default)]
    pub reporting_data: String,
    #[serde(default)]
    pub channel_levels: String,
}

impl SheetNames {
    pub fn for_category(&self, category: ImportCategory) -> &str {
        match category {
            ImportCategory::UseCases => &self.use_cases,
            ImportCategory::TargetLevels => &self.target_levels,
            ImportCategory::ReportingData => &self.reporting_data,
            ImportCategory::ChannelLevels => &self.channel_levels,
        }
    }
}

/// Запрос на импорт одной категории из Google Sheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    /// ID таблицы Google Sheets
    #[serde(default)]
    pub spreadsheet_id: String,

    /// Активная вкладка формы
    pub category: ImportCategory,

    #[serde(default)]
    pub sheet_names: SheetNames,
}

impl ImportRequest {
    pub fn sheet_name(&self) -> &str {
        self.sheet_names.for_category(self.category).trim()
    }
}
