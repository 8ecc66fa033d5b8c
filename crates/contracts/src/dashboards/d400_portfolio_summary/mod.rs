pub mod dto;

pub use dto::{CategoryStats, LevelCount, MonthlyRevenue, PortfolioSummary, YearImpact};
