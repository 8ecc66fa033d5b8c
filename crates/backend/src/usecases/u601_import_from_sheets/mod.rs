pub mod executor;
pub mod journal;

pub use executor::ImportExecutor;
pub use journal::ImportJournal;
