use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use contracts::usecases::u601_import_from_sheets::{
    ImportCategory, ImportJournalEntry, ImportRequest, ImportResponse, WorkbookImportResponse,
};

use crate::system::state::SharedState;
use crate::usecases::u601_import_from_sheets::ImportExecutor;

// ============================================================================
// UseCase u601: Import from Google Sheets / workbook file
// ============================================================================

/// POST /api/u601/import
pub async fn u601_import(
    State(state): State<SharedState>,
    Json(request): Json<ImportRequest>,
) -> Json<ImportResponse> {
    let executor = ImportExecutor::new(state);
    Json(executor.import_from_sheets(request).await)
}

/// Поля формы загрузки книги
#[derive(Default)]
struct WorkbookUpload {
    file_name: String,
    bytes: Vec<u8>,
    category: Option<ImportCategory>,
    sheet_name: Option<String>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<WorkbookUpload, String> {
    let mut upload = WorkbookUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid multipart body: {}", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                upload.file_name = field.file_name().unwrap_or_default().to_string();
                upload.bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read uploaded file: {}", e))?
                    .to_vec();
            }
            "category" => {
                let value = field.text().await.map_err(|e| e.to_string())?;
                if !value.trim().is_empty() {
                    upload.category = Some(value.parse()?);
                }
            }
            "sheet_name" => {
                upload.sheet_name = Some(field.text().await.map_err(|e| e.to_string())?);
            }
            other => tracing::debug!("U601: ignoring multipart field '{}'", other),
        }
    }

    Ok(upload)
}

/// POST /api/u601/import/workbook (multipart: file, category?, sheet_name?)
pub async fn u601_import_workbook(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<WorkbookImportResponse>, (StatusCode, String)> {
    let upload = read_upload(&mut multipart).await.map_err(|e| {
        tracing::warn!("U601: rejected upload: {}", e);
        (StatusCode::BAD_REQUEST, e)
    })?;

    tracing::info!(
        "U601: received '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    let executor = ImportExecutor::new(state);
    Ok(Json(
        executor
            .import_from_workbook(
                &upload.file_name,
                upload.bytes,
                upload.category,
                upload.sheet_name,
            )
            .await,
    ))
}

/// GET /api/u601/import/history
pub async fn u601_get_history(State(state): State<SharedState>) -> Json<Vec<ImportJournalEntry>> {
    Json(state.journal.recent().await)
}

/// GET /api/u601/import/:session_id
pub async fn u601_get_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ImportJournalEntry>>, StatusCode> {
    let entries = state.journal.get(&session_id).await;
    if entries.is_empty() {
        Err(StatusCode::NOT_FOUND)
    } else {
        Ok(Json(entries))
    }
}
