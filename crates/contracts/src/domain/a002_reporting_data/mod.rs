pub mod aggregate;

pub use aggregate::{ReportingData, REPORTING_DATA_KEY};
