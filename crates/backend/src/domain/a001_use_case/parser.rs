//! Разбор листов с use case: метаданные, целевые уровни, матрица каналов.

use std::collections::{BTreeMap, BTreeSet};

use contracts::domain::a001_use_case::{
    ChannelLevelsUpdate, DevelopmentTime, ProductionStatus, TargetLevelUpdate, UseCase,
};

use crate::shared::sheets::coercion::{
    channel_level, float_or, int_or, is_blank_row, parse_float, parse_int, text, text_or_empty,
};
use crate::shared::sheets::{ColumnMap, ColumnSpec, SheetError, SheetSchema};

pub const USE_CASE_SCHEMA: SheetSchema = SheetSchema {
    name: "Use Cases",
    columns: &[
        ColumnSpec::required("id", &["id", "use case id", "uc id"]),
        ColumnSpec::required("name", &["name", "title", "use case", "use case name"]),
        ColumnSpec::optional("description", &["description", "desc", "purpose"]),
        ColumnSpec::optional("category", &["category", "cat"]),
        ColumnSpec::optional(
            "current_level",
            &["current level", "current", "cur", "current automation level"],
        ),
        ColumnSpec::optional(
            "target_level",
            &["target level", "target", "tgt", "target automation level"],
        ),
        ColumnSpec::optional("in_production", &["in production", "production", "prod", "deployed"]),
        ColumnSpec::optional("development_year", &["development year", "year", "dev year"]),
        ColumnSpec::optional("business_unit", &["business unit", "bu"]),
        ColumnSpec::optional(
            "development_time",
            &["development time", "time to develop", "dev time"],
        ),
        ColumnSpec::optional("monthly_reach", &["monthly reach", "reach"]),
        ColumnSpec::optional("revenue_impact", &["revenue impact"]),
        ColumnSpec::optional("implementation_cost", &["implementation cost", "cost"]),
        ColumnSpec::optional("channel_costs", &["channel costs", "channel cost"]),
        ColumnSpec::optional(
            "time_to_optimize",
            &["time to optimize", "time to optimise", "optimization time"],
        ),
    ],
};

pub const TARGET_LEVEL_SCHEMA: SheetSchema = SheetSchema {
    name: "Target Automation Levels",
    columns: &[
        ColumnSpec::required("id", &["id", "use case id", "uc id"]),
        ColumnSpec::required(
            "target_level",
            &["target level", "target", "tgt", "target automation level"],
        ),
    ],
};

pub const CHANNEL_SCHEMA: SheetSchema = SheetSchema {
    name: "Channel Levels",
    columns: &[ColumnSpec::required("id", &["id", "use case id", "uc id"])],
};

/// Окно колонок матрицы каналов: [start, end). Пустые границы означают
/// "сразу после колонки id" и "до конца строки заголовков".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelColumns {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl ChannelColumns {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Фактические границы для заданного заголовка
    fn bounds(&self, id_index: usize, header_len: usize) -> (usize, usize) {
        let start = self.start.unwrap_or(id_index + 1);
        let end = self.end.unwrap_or(header_len).min(header_len);
        (start, end.max(start))
    }
}

/// Разделить лист на заголовок и строки данных (пустые строки данных отброшены)
fn split_header(rows: &[Vec<String>]) -> Option<(&[String], impl Iterator<Item = &Vec<String>>)> {
    let (header, data) = rows.split_first()?;
    Some((header.as_slice(), data.iter().filter(|row| !is_blank_row(row))))
}

/// Разобранный лист метаданных: записи в порядке строк и поля схемы,
/// для которых в листе нашлась колонка
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseCaseSheet {
    pub use_cases: Vec<UseCase>,
    pub columns: BTreeSet<&'static str>,
}

impl UseCaseSheet {
    /// Есть ли в листе колонка для поля схемы
    pub fn carries(&self, field: &str) -> bool {
        self.columns.contains(field)
    }

    pub fn len(&self) -> usize {
        self.use_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.use_cases.is_empty()
    }
}

/// Лист "Use Cases" -> use case в порядке строк.
///
/// Строки без идентификатора или без названия пропускаются.
pub fn parse_use_cases(rows: &[Vec<String>]) -> Result<UseCaseSheet, SheetError> {
    let Some((header, data)) = split_header(rows) else {
        return Ok(UseCaseSheet::default());
    };
    let map = ColumnMap::resolve(&USE_CASE_SCHEMA, header)?;

    let mut result = Vec::new();
    let mut skipped = 0usize;

    for row in data {
        let (Some(id), Some(name)) = (text(map.cell(row, "id")), text(map.cell(row, "name")))
        else {
            skipped += 1;
            continue;
        };

        let mut use_case = UseCase::new(id, name);
        use_case.description = text_or_empty(map.cell(row, "description"));
        use_case.category = text_or_empty(map.cell(row, "category"));
        use_case.current_level = int_or(map.cell(row, "current_level"), 0);
        use_case.target_level = parse_int(map.cell(row, "target_level"));
        use_case.production_status = map
            .cell(row, "in_production")
            .map(ProductionStatus::from_cell)
            .unwrap_or_default();
        use_case.development_year = parse_int(map.cell(row, "development_year"));
        use_case.business_unit = text(map.cell(row, "business_unit"));
        use_case.development_time = map
            .cell(row, "development_time")
            .and_then(DevelopmentTime::from_cell);
        use_case.monthly_reach = parse_int(map.cell(row, "monthly_reach"));
        use_case.revenue_impact = parse_float(map.cell(row, "revenue_impact"));
        use_case.implementation_cost = parse_float(map.cell(row, "implementation_cost"));
        use_case.channel_costs = text(map.cell(row, "channel_costs"));
        use_case.time_to_optimize = parse_int(map.cell(row, "time_to_optimize"));

        result.push(use_case);
    }

    if skipped > 0 {
        tracing::debug!(
            "Sheet '{}': skipped {} row(s) without id or name",
            USE_CASE_SCHEMA.name,
            skipped
        );
    }

    Ok(UseCaseSheet {
        use_cases: result,
        columns: map.fields().collect(),
    })
}

/// Лист "Target Automation Levels" -> частичные обновления целевого уровня.
///
/// Одна запись на каждую строку с id; нераспознанный уровень даёт None.
pub fn parse_target_levels(rows: &[Vec<String>]) -> Result<Vec<TargetLevelUpdate>, SheetError> {
    let Some((header, data)) = split_header(rows) else {
        return Ok(Vec::new());
    };
    let map = ColumnMap::resolve(&TARGET_LEVEL_SCHEMA, header)?;

    Ok(data
        .filter_map(|row| {
            let id = text(map.cell(row, "id"))?;
            Some(TargetLevelUpdate {
                id,
                target_level: parse_int(map.cell(row, "target_level")),
            })
        })
        .collect())
}

/// Матрица каналов -> статусы каналов по use case.
///
/// Каналы берутся из заголовков колонок внутри окна; колонка id и колонки
/// без заголовка в окно не входят.
pub fn parse_channel_levels(
    rows: &[Vec<String>],
    window: ChannelColumns,
) -> Result<Vec<ChannelLevelsUpdate>, SheetError> {
    let Some((header, data)) = split_header(rows) else {
        return Ok(Vec::new());
    };
    let map = ColumnMap::resolve(&CHANNEL_SCHEMA, header)?;
    let id_index = map.index("id").unwrap_or_default();
    let (start, end) = window.bounds(id_index, header.len());

    let channels: Vec<(usize, String)> = (start..end)
        .filter(|idx| *idx != id_index)
        .filter_map(|idx| text(header.get(idx).map(String::as_str)).map(|label| (idx, label)))
        .collect();

    if channels.is_empty() {
        tracing::warn!(
            "Sheet '{}': no channel columns in window {}..{}",
            CHANNEL_SCHEMA.name,
            start,
            end
        );
    }

    let mut result = Vec::new();
    for row in data {
        let Some(id) = text(map.cell(row, "id")) else {
            continue;
        };

        let channel_levels: BTreeMap<String, u8> = channels
            .iter()
            .map(|(idx, channel)| {
                (
                    channel.clone(),
                    channel_level(row.get(*idx).map(String::as_str)),
                )
            })
            .collect();

        result.push(ChannelLevelsUpdate { id, channel_levels });
    }

    Ok(result)
}

/// Уровень из формы сопоставления уровней (0..=5); всё остальное - None
pub fn parse_level(value: &str) -> Option<i32> {
    parse_int::<i32>(Some(value)).filter(|level| (0..=5).contains(level))
}

/// Сумма месячного охвата из листа метаданных: числа пятой колонки
/// по всем строкам данных (заголовок пропускается)
pub fn sum_monthly_reach(rows: &[Vec<String>]) -> i64 {
    const REACH_COLUMN: usize = 5;
    rows.iter()
        .skip(1)
        .map(|row| float_or(row.get(REACH_COLUMN).map(String::as_str), 0.0) as i64)
        .sum()
}
