use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::system::state::SharedState;

/// Предел тела запроса для загрузки книги (выгрузки xlsx бывают больше 2 MB)
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // GOOGLE SHEETS PROXY
        // ========================================
        .route(
            "/api/sheets/:spreadsheet_id/values/:sheet_name",
            get(handlers::sheets::get_values),
        )
        .route(
            "/api/fetchMonthlyReach",
            get(handlers::sheets::fetch_monthly_reach),
        )
        .route(
            "/api/fetchMonthlyReach/total",
            get(handlers::sheets::monthly_reach_total),
        )
        // ========================================
        // BUSINESS ROUTES
        // ========================================
        // A001 Use case handlers
        .route("/api/a001/use_case", get(handlers::a001_use_case::list_all))
        .route(
            "/api/a001/use_case/:id",
            get(handlers::a001_use_case::get_by_id),
        )
        .route(
            "/api/a001/use_case/:id/current_level",
            post(handlers::a001_use_case::set_current_level),
        )
        .route(
            "/api/a001/use_case/:id/channel/:channel/cycle",
            post(handlers::a001_use_case::cycle_channel),
        )
        // A002 Reporting data handlers
        .route(
            "/api/a002/reporting_data",
            get(handlers::a002_reporting_data::list_all),
        )
        // D400 Portfolio summary dashboard
        .route(
            "/api/d400/portfolio_summary",
            get(handlers::d400_portfolio_summary::get_portfolio_summary),
        )
        // UseCase u601: Import from Google Sheets / workbook
        .route("/api/u601/import", post(handlers::usecases::u601_import))
        .route(
            "/api/u601/import/workbook",
            post(handlers::usecases::u601_import_workbook)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/u601/import/history",
            get(handlers::usecases::u601_get_history),
        )
        .route(
            "/api/u601/import/:session_id",
            get(handlers::usecases::u601_get_session),
        )
        .with_state(state)
}
