//! Общие типы для всех операций (u6xx)

pub mod operation_error;
pub mod operation_metadata;

pub use operation_error::{OperationError, OperationResult};
pub use operation_metadata::OperationMetadata;
