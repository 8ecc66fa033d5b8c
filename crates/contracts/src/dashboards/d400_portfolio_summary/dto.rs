use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response for the portfolio summary dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_use_cases: usize,
    /// Number of distinct categories
    pub categories: usize,
    pub in_production: usize,
    pub avg_current_level: f64,
    /// Missing target levels count as 0
    pub avg_target_level: f64,
    pub monthly_reach_total: i64,
    /// Use cases per current level 0..=5
    pub level_distribution: Vec<LevelCount>,
    /// Sorted by count, largest first
    pub by_category: Vec<CategoryStats>,
    /// One row per reporting year, sorted by year
    pub portfolio_impact: Vec<YearImpact>,
    /// Revenue per month, calendar order for Jan..Dec
    pub monthly_revenue: Vec<MonthlyRevenue>,
    /// Revenue of the last month in `monthly_revenue`
    pub latest_monthly_revenue: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: i32,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub count: usize,
    /// Rounded to one decimal
    pub avg_level: f64,
}

/// Impact and investment for a single reporting year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearImpact {
    pub year: String,
    /// Impact keyed by the development year of the linked use case
    /// e.g. {2023: 1200.0, 2024: 300.0}
    pub impact_by_development_year: BTreeMap<i32, f64>,
    pub investment: f64,
    /// Running total of (impact - investment) up to and including this year
    pub cumulative_net_benefit: f64,
}

impl YearImpact {
    pub fn total_impact(&self) -> f64 {
        self.impact_by_development_year.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}
