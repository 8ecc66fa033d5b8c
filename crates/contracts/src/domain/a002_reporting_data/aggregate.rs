use serde::{Deserialize, Serialize};

/// Ключ, под которым коллекция отчётных данных хранится в key-value хранилище
pub const REPORTING_DATA_KEY: &str = "reportingData";

/// Строка отчётных данных (агрегат a002)
///
/// Связь с use case необязательна и не проверяется: ссылка на несуществующий
/// use case просто не участвует в агрегации.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportingData {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub use_case_id: Option<String>,

    /// Год, как он записан в листе (без проверки календаря)
    #[serde(default)]
    pub year: String,

    /// Месяц, как он записан в листе
    #[serde(default)]
    pub month: String,

    #[serde(default)]
    pub revenue: f64,

    #[serde(default)]
    pub impact: f64,

    #[serde(default)]
    pub investment: f64,
}

impl ReportingData {
    pub fn has_period(&self) -> bool {
        !self.year.trim().is_empty()
    }
}
