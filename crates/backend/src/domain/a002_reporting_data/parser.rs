use contracts::domain::a002_reporting_data::ReportingData;

use crate::shared::sheets::coercion::{float_or, is_blank_row, text, text_or_empty};
use crate::shared::sheets::{ColumnMap, ColumnSpec, SheetError, SheetSchema};

pub const REPORTING_DATA_SCHEMA: SheetSchema = SheetSchema {
    name: "Reporting Data",
    columns: &[
        ColumnSpec::optional("id", &["id", "row id"]),
        ColumnSpec::optional("use_case_id", &["use case id", "use case", "uc id", "usecaseid"]),
        ColumnSpec::required("year", &["year", "reporting year"]),
        ColumnSpec::required("month", &["month", "reporting month"]),
        ColumnSpec::optional("revenue", &["revenue"]),
        ColumnSpec::optional("impact", &["impact"]),
        ColumnSpec::optional("investment", &["investment"]),
    ],
};

/// Лист "Reporting Data" -> строки отчётных данных в порядке листа.
///
/// Пустые и нечисловые суммы дают 0; год и месяц берутся как есть.
pub fn parse_reporting_data(rows: &[Vec<String>]) -> Result<Vec<ReportingData>, SheetError> {
    let Some((header, data)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let map = ColumnMap::resolve(&REPORTING_DATA_SCHEMA, header)?;

    Ok(data
        .iter()
        .filter(|row| !is_blank_row(row))
        .map(|row| ReportingData {
            id: text(map.cell(row, "id")),
            use_case_id: text(map.cell(row, "use_case_id")),
            year: text_or_empty(map.cell(row, "year")),
            month: text_or_empty(map.cell(row, "month")),
            revenue: float_or(map.cell(row, "revenue"), 0.0),
            impact: float_or(map.cell(row, "impact"), 0.0),
            investment: float_or(map.cell(row, "investment"), 0.0),
        })
        .collect())
}
