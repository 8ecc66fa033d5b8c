use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Статус внедрения use case в продуктив.
///
/// Источники присылают его по-разному (булево, "Yes"/"No", пустая ячейка),
/// поэтому значение нормализуется сразу при разборе листа.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStatus {
    InProduction,
    NotInProduction,
    #[default]
    Unknown,
}

impl ProductionStatus {
    /// Нормализовать значение ячейки "in production".
    pub fn from_cell(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return ProductionStatus::Unknown;
        }
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => ProductionStatus::InProduction,
            "false" | "no" | "n" | "0" => ProductionStatus::NotInProduction,
            _ => ProductionStatus::Unknown,
        }
    }

    pub fn is_in_production(&self) -> bool {
        matches!(self, ProductionStatus::InProduction)
    }
}

/// Оценка трудоёмкости разработки (S/M/L)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DevelopmentTime {
    S,
    M,
    L,
}

impl DevelopmentTime {
    pub fn from_cell(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "S" | "SMALL" => Some(DevelopmentTime::S),
            "M" | "MEDIUM" => Some(DevelopmentTime::M),
            "L" | "LARGE" => Some(DevelopmentTime::L),
            _ => None,
        }
    }
}

/// Статус канала в матрице автоматизации (шкала 0..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    NotPlanned,
    Backlog,
    OnRoadmap,
    Deployed,
}

impl ChannelStatus {
    pub const ALL: [ChannelStatus; 4] = [
        ChannelStatus::NotPlanned,
        ChannelStatus::Backlog,
        ChannelStatus::OnRoadmap,
        ChannelStatus::Deployed,
    ];

    pub fn level(&self) -> u8 {
        match self {
            ChannelStatus::NotPlanned => 0,
            ChannelStatus::Backlog => 1,
            ChannelStatus::OnRoadmap => 2,
            ChannelStatus::Deployed => 3,
        }
    }

    /// Уровни вне шкалы трактуются как "Not planned"
    pub fn from_level(level: u8) -> Self {
        match level {
            1 => ChannelStatus::Backlog,
            2 => ChannelStatus::OnRoadmap,
            3 => ChannelStatus::Deployed,
            _ => ChannelStatus::NotPlanned,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChannelStatus::NotPlanned => "Not planned",
            ChannelStatus::Backlog => "Backlog",
            ChannelStatus::OnRoadmap => "On roadmap",
            ChannelStatus::Deployed => "Deployed",
        }
    }

    /// Следующий статус по кругу (0 -> 1 -> 2 -> 3 -> 0)
    pub fn next(&self) -> Self {
        Self::from_level((self.level() + 1) % Self::ALL.len() as u8)
    }
}

/// Use case автоматизации (агрегат a001)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UseCase {
    /// Уникальный идентификатор в пределах коллекции
    pub id: String,

    #[serde(alias = "title")]
    pub name: String,

    #[serde(default, alias = "purpose")]
    pub description: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub business_unit: Option<String>,

    /// Текущий уровень автоматизации (0..=5)
    #[serde(default)]
    pub current_level: i32,

    /// Целевой уровень автоматизации (0..=5), не обязан быть >= current_level
    #[serde(default)]
    pub target_level: Option<i32>,

    #[serde(default)]
    pub production_status: ProductionStatus,

    #[serde(default)]
    pub development_year: Option<i32>,

    #[serde(default)]
    pub development_time: Option<DevelopmentTime>,

    /// Канал -> статус (0..=3)
    #[serde(default)]
    pub channel_levels: BTreeMap<String, u8>,

    #[serde(default)]
    pub channels: BTreeSet<String>,

    #[serde(default)]
    pub process_steps: Vec<String>,

    #[serde(default)]
    pub stakeholders: Vec<String>,

    #[serde(default)]
    pub benefits: Vec<String>,

    #[serde(default)]
    pub revenue_impact: Option<f64>,

    #[serde(default)]
    pub implementation_cost: Option<f64>,

    /// Месячный охват (колонка "Monthly Reach" листа метаданных)
    #[serde(default)]
    pub monthly_reach: Option<i64>,

    /// Стоимость каналов в свободной форме, как в листе
    #[serde(default)]
    pub channel_costs: Option<String>,

    #[serde(default)]
    pub time_to_optimize: Option<i32>,
}

impl UseCase {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn channel_status(&self, channel: &str) -> ChannelStatus {
        self.channel_levels
            .get(channel)
            .copied()
            .map(ChannelStatus::from_level)
            .unwrap_or(ChannelStatus::NotPlanned)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Идентификатор use case не может быть пустым".into());
        }
        if self.name.trim().is_empty() {
            return Err("Название use case не может быть пустым".into());
        }
        Ok(())
    }
}

/// Фильтр по статусу внедрения в списке use case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionFilter {
    #[default]
    All,
    Yes,
    No,
}

/// Параметры запроса GET /api/a001/use_case.
///
/// `channels` и `development_time` - списки через запятую; запись проходит,
/// если совпал хотя бы один элемент списка.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UseCaseFilter {
    #[serde(default)]
    pub production: ProductionFilter,
    #[serde(default)]
    pub channels: Option<String>,
    #[serde(default)]
    pub development_time: Option<String>,
}

/// Строка листа "Target Automation Levels"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetLevelUpdate {
    pub id: String,
    /// None, если ячейка не распознана как целое число
    pub target_level: Option<i32>,
}

/// Тело запроса формы сопоставления уровня автоматизации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentLevelRequest {
    pub current_level: i32,
}

/// Строка матрицы каналов: статусы по всем каналам для одного use case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelLevelsUpdate {
    pub id: String,
    pub channel_levels: BTreeMap<String, u8>,
}
