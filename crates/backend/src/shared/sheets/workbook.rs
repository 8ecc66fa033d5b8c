use anyhow::{Context, Result};
use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use std::io::Cursor;

use super::source::{SheetRows, SheetSource};

/// Книга, загруженная пользователем, разобранная в строки по листам
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    file_name: String,
    sheets: Vec<(String, SheetRows)>,
}

impl WorkbookSource {
    pub fn from_sheets(file_name: impl Into<String>, sheets: Vec<(String, SheetRows)>) -> Self {
        Self {
            file_name: file_name.into(),
            sheets,
        }
    }

    /// Разобрать файл книги.
    ///
    /// CSV содержит один лист, он получает имя `csv_sheet_name`. Остальные
    /// форматы (xlsx, xlsm, xlsb, xls, ods) определяются по содержимому.
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>, csv_sheet_name: &str) -> Result<Self> {
        let sheets = if file_name.to_lowercase().ends_with(".csv") {
            vec![(csv_sheet_name.to_string(), read_csv(&bytes)?)]
        } else {
            read_spreadsheet(bytes)
                .with_context(|| format!("Failed to read spreadsheet file '{}'", file_name))?
        };

        tracing::info!(
            "Workbook '{}' loaded: {} sheet(s) [{}]",
            file_name,
            sheets.len(),
            sheets
                .iter()
                .map(|(name, rows)| format!("{}: {} rows", name, rows.len()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self::from_sheets(file_name, sheets))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Лист по имени: сначала точное совпадение, затем без учёта регистра и пробелов
    pub fn sheet(&self, name: &str) -> Option<&SheetRows> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .or_else(|| {
                let wanted = name.trim().to_lowercase();
                self.sheets
                    .iter()
                    .find(|(sheet, _)| sheet.trim().to_lowercase() == wanted)
            })
            .map(|(_, rows)| rows)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }
}

#[async_trait]
impl SheetSource for WorkbookSource {
    fn describe(&self) -> String {
        format!("workbook '{}'", self.file_name)
    }

    async fn fetch_rows(&self, _spreadsheet_id: &str, sheet_name: &str) -> Result<SheetRows> {
        self.sheet(sheet_name).cloned().ok_or_else(|| {
            anyhow::anyhow!(
                "Sheet '{}' not found in '{}' (available: {})",
                sheet_name,
                self.file_name,
                self.sheet_names().join(", ")
            )
        })
    }
}

fn read_spreadsheet(bytes: Vec<u8>) -> Result<Vec<(String, SheetRows)>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("Failed to read sheet '{}'", name))?;
        let rows: SheetRows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        sheets.push((name, rows));
    }

    Ok(sheets)
}

fn read_csv(bytes: &[u8]) -> Result<SheetRows> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Invalid CSV at record {}", idx + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Значение ячейки в том виде, в каком его показывает таблица
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        // Длительности остаются числом, даты - ISO-строкой, как их показывает таблица
        Data::DateTime(dt) if dt.is_duration() => format_float(dt.as_f64()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_else(|| format_float(dt.as_f64())),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Дата без времени - "2024-01-31", иначе с временем
fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Целые значения без ".0", чтобы "2023" оставалось годом, а не 2023.0
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    fn rows(data: &[&[&str]]) -> SheetRows {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_csv_is_read_as_single_sheet() {
        let csv = "\u{FEFF}id,name\nU1,\"Lead scoring, v2\"\nU2\n";
        let source =
            WorkbookSource::from_bytes("use_cases.csv", csv.as_bytes().to_vec(), "Use Cases")
                .unwrap();

        assert_eq!(source.sheet_names(), vec!["Use Cases"]);
        assert_eq!(
            source.sheet("Use Cases").unwrap(),
            &rows(&[&["id", "name"], &["U1", "Lead scoring, v2"], &["U2"]])
        );
    }

    #[test]
    fn test_sheet_lookup_is_case_insensitive() {
        let source = WorkbookSource::from_sheets(
            "book.xlsx",
            vec![("Reporting Data".to_string(), rows(&[&["year"]]))],
        );
        assert!(source.has_sheet("reporting data "));
        assert!(!source.has_sheet("Use Cases"));
    }

    #[tokio::test]
    async fn test_missing_sheet_is_an_error() {
        let source = WorkbookSource::from_sheets("book.xlsx", vec![]);
        let err = source.fetch_rows("", "Use Cases").await.unwrap_err();
        assert!(err.to_string().contains("Sheet 'Use Cases' not found"));
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let result = WorkbookSource::from_bytes("book.xlsx", b"not a workbook".to_vec(), "x");
        assert!(result.is_err());
    }

    #[test]
    fn test_date_cells_are_rendered_as_dates() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(format_datetime(date.and_time(NaiveTime::MIN)), "2024-01-31");
        assert_eq!(
            format_datetime(date.and_hms_opt(9, 30, 0).unwrap()),
            "2024-01-31 09:30:00"
        );

        let serial = ExcelDateTime::new(45322.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_to_string(&Data::DateTime(serial)), "2024-01-31");
    }

    #[test]
    fn test_cell_formatting() {
        assert_eq!(cell_to_string(&Data::Float(2023.0)), "2023");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
