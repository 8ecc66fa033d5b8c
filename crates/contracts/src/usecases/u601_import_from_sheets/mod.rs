pub mod journal;
pub mod request;
pub mod response;

pub use journal::{ImportJournalEntry, ImportSourceKind};
pub use request::{ImportCategory, ImportRequest, SheetNames};
pub use response::{ImportNotice, ImportResponse, RequiredField, WorkbookImportResponse};
