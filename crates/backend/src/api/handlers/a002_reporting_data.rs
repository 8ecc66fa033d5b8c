use axum::{extract::State, Json};
use contracts::domain::a002_reporting_data::ReportingData;

use crate::system::state::SharedState;

/// GET /api/a002/reporting_data
pub async fn list_all(State(state): State<SharedState>) -> Json<Vec<ReportingData>> {
    Json(state.reporting_data_snapshot().await)
}
