pub mod a001_use_case;
pub mod a002_reporting_data;
