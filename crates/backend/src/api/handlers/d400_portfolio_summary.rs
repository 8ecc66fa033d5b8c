use axum::{extract::State, Json};
use contracts::dashboards::d400_portfolio_summary::PortfolioSummary;

use crate::dashboards::d400_portfolio_summary::service;
use crate::system::state::SharedState;

/// GET /api/d400/portfolio_summary
pub async fn get_portfolio_summary(State(state): State<SharedState>) -> Json<PortfolioSummary> {
    let summary = service::get_portfolio_summary(&state).await;
    tracing::info!(
        "D400 Dashboard: {} use cases, {} reporting years",
        summary.total_use_cases,
        summary.portfolio_impact.len()
    );
    Json(summary)
}
