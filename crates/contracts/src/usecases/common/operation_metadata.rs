/// Метаданные операции для идентификации в логах и журнале
pub trait OperationMetadata {
    /// Индекс операции (например, "u601")
    fn operation_index() -> &'static str;

    /// Техническое имя (например, "import_from_sheets")
    fn operation_name() -> &'static str;

    fn display_name() -> &'static str;

    /// Полное имя вида "u601_import_from_sheets"
    fn full_name() -> String {
        format!("{}_{}", Self::operation_index(), Self::operation_name())
    }
}
