use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::a001_use_case::parser::sum_monthly_reach;
use crate::shared::sheets::SheetRows;
use crate::system::state::SharedState;

const PROXY_ERROR: &str = "Failed to fetch data from Google Sheets";

fn no_store(body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn proxy_error(error: anyhow::Error) -> Response {
    tracing::error!("Sheets proxy: {:#}", error);
    no_store((
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": PROXY_ERROR })),
    ))
}

async fn fetch(state: &SharedState, spreadsheet_id: &str, sheet_name: &str) -> anyhow::Result<SheetRows> {
    if spreadsheet_id.trim().is_empty() {
        anyhow::bail!("Spreadsheet id is not configured");
    }
    state.remote.fetch_rows(spreadsheet_id, sheet_name).await
}

/// GET /api/sheets/:spreadsheet_id/values/:sheet_name
///
/// Сырые строки листа без кэширования на стороне клиента
pub async fn get_values(
    State(state): State<SharedState>,
    Path((spreadsheet_id, sheet_name)): Path<(String, String)>,
) -> Response {
    match fetch(&state, &spreadsheet_id, &sheet_name).await {
        Ok(rows) => no_store(Json(rows)),
        Err(e) => proxy_error(e),
    }
}

/// GET /api/fetchMonthlyReach
///
/// Лист метаданных из настроек ([google] default_spreadsheet_id / default_sheet_name)
pub async fn fetch_monthly_reach(State(state): State<SharedState>) -> Response {
    let (spreadsheet_id, sheet_name) = state.monthly_reach_sheet.clone();
    match fetch(&state, &spreadsheet_id, &sheet_name).await {
        Ok(rows) => no_store(Json(rows)),
        Err(e) => proxy_error(e),
    }
}

/// GET /api/fetchMonthlyReach/total
pub async fn monthly_reach_total(State(state): State<SharedState>) -> Response {
    let (spreadsheet_id, sheet_name) = state.monthly_reach_sheet.clone();
    match fetch(&state, &spreadsheet_id, &sheet_name).await {
        Ok(rows) => no_store(Json(json!({ "monthly_reach": sum_monthly_reach(&rows) }))),
        Err(e) => proxy_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::sheets::WorkbookSource;
    use crate::system::state::test_support::{rows, state_with_remote};
    use axum::body::to_bytes;

    fn state() -> SharedState {
        state_with_remote(WorkbookSource::from_sheets(
            "remote",
            vec![(
                "Use case metadata".into(),
                rows(&[
                    &["id", "name", "a", "b", "c", "reach"],
                    &["U1", "Lead scoring", "", "", "", "100"],
                    &["U2", "Churn", "", "", "", "20"],
                ]),
            )],
        ))
        .with_monthly_reach_sheet("1abc", "Use case metadata")
        .into_shared()
    }

    #[tokio::test]
    async fn test_monthly_reach_returns_raw_rows_without_caching() {
        let response = fetch_monthly_reach(State(state())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let rows: Vec<Vec<String>> = serde_json::from_slice(&body).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], "Lead scoring");
    }

    #[tokio::test]
    async fn test_monthly_reach_total() {
        let response = monthly_reach_total(State(state())).await;
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["monthly_reach"], 120);
    }

    #[tokio::test]
    async fn test_unknown_sheet_is_a_generic_500() {
        let response = get_values(
            State(state()),
            Path(("1abc".to_string(), "Nope".to_string())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "Failed to fetch data from Google Sheets" }));
    }
}
