use async_trait::async_trait;

/// Содержимое листа: строки x ячейки, первая строка - заголовки
pub type SheetRows = Vec<Vec<String>>;

/// Источник сырых строк листа (Google Sheets API или загруженная книга)
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Короткое описание источника для логов
    fn describe(&self) -> String;

    async fn fetch_rows(&self, spreadsheet_id: &str, sheet_name: &str) -> anyhow::Result<SheetRows>;
}
