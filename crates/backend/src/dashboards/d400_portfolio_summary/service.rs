use contracts::dashboards::d400_portfolio_summary::{
    CategoryStats, LevelCount, MonthlyRevenue, PortfolioSummary, YearImpact,
};
use contracts::domain::a001_use_case::UseCase;
use contracts::domain::a002_reporting_data::ReportingData;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::a001_use_case::service::MAX_AUTOMATION_LEVEL;
use crate::system::state::AppState;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Сводка портфеля по текущему состоянию
pub async fn get_portfolio_summary(state: &AppState) -> PortfolioSummary {
    let use_cases = state.use_cases_snapshot().await;
    let reporting = state.reporting_data_snapshot().await;
    build_summary(&use_cases, &reporting)
}

pub fn build_summary(use_cases: &[UseCase], reporting: &[ReportingData]) -> PortfolioSummary {
    let total = use_cases.len();
    let divisor = total.max(1) as f64;

    let categories: HashSet<&str> = use_cases.iter().map(|uc| uc.category.as_str()).collect();
    let monthly_revenue = monthly_revenue(reporting);

    PortfolioSummary {
        total_use_cases: total,
        categories: categories.len(),
        in_production: use_cases
            .iter()
            .filter(|uc| uc.production_status.is_in_production())
            .count(),
        avg_current_level: use_cases.iter().map(|uc| uc.current_level as f64).sum::<f64>()
            / divisor,
        avg_target_level: use_cases
            .iter()
            .map(|uc| uc.target_level.unwrap_or(0) as f64)
            .sum::<f64>()
            / divisor,
        monthly_reach_total: use_cases.iter().filter_map(|uc| uc.monthly_reach).sum(),
        level_distribution: level_distribution(use_cases),
        by_category: by_category(use_cases),
        portfolio_impact: portfolio_impact(use_cases, reporting),
        latest_monthly_revenue: monthly_revenue.last().map(|m| m.revenue),
        monthly_revenue,
    }
}

fn level_distribution(use_cases: &[UseCase]) -> Vec<LevelCount> {
    (0..=MAX_AUTOMATION_LEVEL)
        .map(|level| LevelCount {
            level,
            count: use_cases
                .iter()
                .filter(|uc| uc.current_level == level)
                .count(),
        })
        .collect()
}

fn by_category(use_cases: &[UseCase]) -> Vec<CategoryStats> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, (usize, i64)> = HashMap::new();

    for uc in use_cases {
        let entry = totals.entry(uc.category.as_str()).or_insert_with(|| {
            order.push(uc.category.as_str());
            (0, 0)
        });
        entry.0 += 1;
        entry.1 += uc.current_level as i64;
    }

    let mut result: Vec<CategoryStats> = order
        .into_iter()
        .map(|category| {
            let (count, level_sum) = totals[category];
            CategoryStats {
                category: category.to_string(),
                count,
                avg_level: (level_sum as f64 / count as f64 * 10.0).round() / 10.0,
            }
        })
        .collect();

    // sort_by устойчива: при равенстве остаётся порядок первого появления
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// Эффект по отчётным годам: эффект раскладывается по году разработки
/// связанного use case, инвестиции суммируются, чистая выгода копится
/// нарастающим итогом.
fn portfolio_impact(use_cases: &[UseCase], reporting: &[ReportingData]) -> Vec<YearImpact> {
    let development_years: HashMap<&str, i32> = use_cases
        .iter()
        .filter_map(|uc| uc.development_year.map(|year| (uc.id.as_str(), year)))
        .collect();

    let mut by_year: BTreeMap<String, YearImpact> = BTreeMap::new();
    for row in reporting.iter().filter(|r| r.has_period()) {
        let entry = by_year.entry(row.year.clone()).or_insert_with(|| YearImpact {
            year: row.year.clone(),
            ..Default::default()
        });

        let development_year = row
            .use_case_id
            .as_deref()
            .and_then(|id| development_years.get(id));
        if let Some(development_year) = development_year {
            *entry
                .impact_by_development_year
                .entry(*development_year)
                .or_insert(0.0) += row.impact;
        }

        entry.investment += row.investment;
    }

    let mut cumulative = 0.0;
    by_year
        .into_values()
        .map(|mut year| {
            cumulative += year.total_impact() - year.investment;
            year.cumulative_net_benefit = cumulative;
            year
        })
        .collect()
}

/// Выручка по месяцам: строки с месяцем и ненулевой выручкой.
/// Месяцы Jan..Dec идут в календарном порядке, прочие подписи - впереди
/// в порядке первого появления.
fn monthly_revenue(reporting: &[ReportingData]) -> Vec<MonthlyRevenue> {
    let mut result: Vec<MonthlyRevenue> = Vec::new();

    for row in reporting
        .iter()
        .filter(|r| !r.month.trim().is_empty() && r.revenue != 0.0)
    {
        match result.iter_mut().find(|m| m.month == row.month) {
            Some(existing) => existing.revenue += row.revenue,
            None => result.push(MonthlyRevenue {
                month: row.month.clone(),
                revenue: row.revenue,
            }),
        }
    }

    result.sort_by_key(|m| MONTHS.iter().position(|name| *name == m.month));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_use_case::ProductionStatus;

    fn use_case(id: &str, category: &str, current: i32, target: Option<i32>, year: Option<i32>) -> UseCase {
        let mut uc = UseCase::new(id, id);
        uc.category = category.into();
        uc.current_level = current;
        uc.target_level = target;
        uc.development_year = year;
        uc
    }

    fn report(use_case_id: Option<&str>, year: &str, month: &str, revenue: f64, impact: f64, investment: f64) -> ReportingData {
        ReportingData {
            id: None,
            use_case_id: use_case_id.map(str::to_string),
            year: year.into(),
            month: month.into(),
            revenue,
            impact,
            investment,
        }
    }

    #[test]
    fn test_empty_portfolio() {
        let summary = build_summary(&[], &[]);
        assert_eq!(summary.total_use_cases, 0);
        assert_eq!(summary.avg_current_level, 0.0);
        assert_eq!(summary.avg_target_level, 0.0);
        assert!(summary.portfolio_impact.is_empty());
        assert_eq!(summary.latest_monthly_revenue, None);
        assert_eq!(summary.level_distribution.len(), 6);
    }

    #[test]
    fn test_levels_and_categories() {
        let mut a = use_case("A", "Sales", 2, Some(4), None);
        a.production_status = ProductionStatus::InProduction;
        a.monthly_reach = Some(1000);
        let b = use_case("B", "CRM", 1, None, None);
        let mut c = use_case("C", "Sales", 3, Some(5), None);
        c.monthly_reach = Some(500);

        let summary = build_summary(&[a, b, c], &[]);
        assert_eq!(summary.categories, 2);
        assert_eq!(summary.in_production, 1);
        assert_eq!(summary.avg_current_level, 2.0);
        assert_eq!(summary.avg_target_level, 3.0);
        assert_eq!(summary.monthly_reach_total, 1500);
        assert_eq!(summary.level_distribution[2].count, 1);
        assert_eq!(summary.level_distribution[0].count, 0);
        assert_eq!(
            summary.by_category,
            vec![
                CategoryStats { category: "Sales".into(), count: 2, avg_level: 2.5 },
                CategoryStats { category: "CRM".into(), count: 1, avg_level: 1.0 },
            ]
        );
    }

    #[test]
    fn test_portfolio_impact_by_development_year() {
        let use_cases = vec![
            use_case("A", "Sales", 1, None, Some(2023)),
            use_case("B", "Sales", 1, None, Some(2024)),
            use_case("C", "Sales", 1, None, None),
        ];
        let reporting = vec![
            report(Some("A"), "2024", "", 0.0, 100.0, 50.0),
            report(Some("B"), "2024", "", 0.0, 40.0, 0.0),
            report(Some("A"), "2023", "", 0.0, 10.0, 30.0),
            report(Some("ghost"), "2023", "", 0.0, 999.0, 5.0),
            report(Some("C"), "2024", "", 0.0, 7.0, 0.0),
            report(Some("A"), "", "Jan", 0.0, 500.0, 500.0),
        ];

        let impact = portfolio_impact(&use_cases, &reporting);
        assert_eq!(impact.len(), 2);

        assert_eq!(impact[0].year, "2023");
        assert_eq!(impact[0].total_impact(), 10.0);
        assert_eq!(impact[0].investment, 35.0);
        assert_eq!(impact[0].cumulative_net_benefit, -25.0);

        assert_eq!(impact[1].year, "2024");
        assert_eq!(impact[1].impact_by_development_year.get(&2023), Some(&100.0));
        assert_eq!(impact[1].impact_by_development_year.get(&2024), Some(&40.0));
        assert_eq!(impact[1].investment, 50.0);
        assert_eq!(impact[1].cumulative_net_benefit, 65.0);
    }

    #[test]
    fn test_monthly_revenue_sums_and_orders_months() {
        let reporting = vec![
            report(None, "2024", "Mar", 30.0, 0.0, 0.0),
            report(None, "2024", "Jan", 10.0, 0.0, 0.0),
            report(None, "2024", "Mar", 5.0, 0.0, 0.0),
            report(None, "2024", "Q1", 1.0, 0.0, 0.0),
            report(None, "2024", "Feb", 0.0, 0.0, 0.0),
            report(None, "2024", "", 99.0, 0.0, 0.0),
        ];

        let months = monthly_revenue(&reporting);
        let labels: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(labels, vec!["Q1", "Jan", "Mar"]);
        assert_eq!(months[2].revenue, 35.0);

        let summary = build_summary(&[], &reporting);
        assert_eq!(summary.latest_monthly_revenue, Some(35.0));
    }
}
