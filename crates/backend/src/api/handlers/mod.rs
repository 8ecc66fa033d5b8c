pub mod a001_use_case;
pub mod a002_reporting_data;
pub mod d400_portfolio_summary;
pub mod sheets;
pub mod usecases;
