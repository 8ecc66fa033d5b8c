pub mod coercion;
pub mod column_map;
pub mod google_client;
pub mod source;
pub mod workbook;

pub use column_map::{ColumnMap, ColumnSpec, SheetError, SheetSchema};
pub use google_client::GoogleSheetsClient;
pub use source::{SheetRows, SheetSource};
pub use workbook::WorkbookSource;
