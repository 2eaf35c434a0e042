//! Staging tree handlers.

use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, Path, Query, State},
    Json,
};

use super::AppState;
use crate::staging::{is_dot_segment, Entry, ROOT_TARGET};
use crate::web::dto::{
    AddReportResponse, ApiResponse, AssignEntryRequest, CreateFolderRequest, EntryInfo,
    FolderResponse, LocationResponse, PlanQuery, PlanResponse, PrimaryResponse,
    RemovedEntryResponse, RemovedFoldersResponse, StagingQuery, StagingResponse, ValidatedJson,
    ValidatedQuery,
};
use crate::web::error::ApiError;

/// Site name used in the text tree when none is given.
const DEFAULT_SITE_LABEL: &str = "site";

/// GET /api/staging - Rendered staging tree.
pub async fn get_staging(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StagingQuery>,
) -> Result<Json<ApiResponse<StagingResponse>>, ApiError> {
    let site = query
        .site
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SITE_LABEL);

    let tree = state.staging.lock().await;
    Ok(Json(ApiResponse::new(StagingResponse::new(&tree, site))))
}

/// DELETE /api/staging - Clear everything.
pub async fn clear_staging(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StagingResponse>>, ApiError> {
    let mut tree = state.staging.lock().await;
    tree.clear_all();
    tracing::info!("Staging tree cleared");
    Ok(Json(ApiResponse::new(StagingResponse::new(
        &tree,
        DEFAULT_SITE_LABEL,
    ))))
}

/// POST /api/staging/primary - Stage the main HTML document.
///
/// Request body: multipart/form-data with a "file" field.
pub async fn upload_primary(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<PrimaryResponse>>, ApiError> {
    let mut entry: Option<Entry> = None;

    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some("file") {
            entry = Some(read_entry(field, state.max_upload_size).await?);
        }
    }

    let entry = entry.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let info = EntryInfo::from(&entry);

    let replaced = state.staging.lock().await.set_primary(entry)?;

    Ok(Json(ApiResponse::new(PrimaryResponse {
        primary: info,
        replaced: replaced.map(|e| e.name().to_string()),
    })))
}

/// DELETE /api/staging/primary - Drop the main document.
pub async fn clear_primary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Option<EntryInfo>>>, ApiError> {
    let removed = state.staging.lock().await.clear_primary();
    Ok(Json(ApiResponse::new(removed.as_ref().map(EntryInfo::from))))
}

/// POST /api/staging/entries - Stage asset files.
///
/// Request body: multipart/form-data with one or more "files" fields and an
/// optional "folder" field naming the target folder (or "root").
pub async fn upload_entries(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<AddReportResponse>>, ApiError> {
    let mut entries = Vec::new();
    let mut folder: Option<String> = None;

    while let Some(field) = next_field(&mut multipart).await? {
        match field.name().unwrap_or("") {
            "files" | "file" => entries.push(read_entry(field, state.max_upload_size).await?),
            "folder" => {
                let text = field.text().await.map_err(|e| {
                    tracing::error!("Failed to read folder field: {}", e);
                    ApiError::bad_request("Invalid folder")
                })?;
                folder = Some(text.trim().to_string()).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }

    if entries.is_empty() {
        return Err(ApiError::bad_request("No file provided"));
    }

    let mut tree = state.staging.lock().await;
    let report = match folder.as_deref() {
        None => tree.add_entries(entries),
        Some(target) => tree.add_entries_to_folder(entries, target)?,
    };

    Ok(Json(ApiResponse::new(report.into())))
}

/// DELETE /api/staging/entries/:name - Remove an asset.
pub async fn remove_entry(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<RemovedEntryResponse>>, ApiError> {
    let removed = state.staging.lock().await.remove_entry(&name);
    Ok(Json(ApiResponse::new(RemovedEntryResponse { name, removed })))
}

/// PUT /api/staging/entries/:name/location - Move an asset.
pub async fn assign_entry(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    ValidatedJson(req): ValidatedJson<AssignEntryRequest>,
) -> Result<Json<ApiResponse<LocationResponse>>, ApiError> {
    let location = state
        .staging
        .lock()
        .await
        .assign_entry(&name, req.folder.trim())?;
    Ok(Json(ApiResponse::new(LocationResponse::new(
        &name, &location,
    ))))
}

/// POST /api/staging/folders - Create a folder.
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<Json<ApiResponse<FolderResponse>>, ApiError> {
    let mut tree = state.staging.lock().await;
    let path = match req.parent.as_deref().map(str::trim) {
        None | Some("") | Some(ROOT_TARGET) => tree.create_folder(&req.name)?,
        Some(parent) => tree.create_subfolder(parent, &req.name)?,
    };

    Ok(Json(ApiResponse::new(FolderResponse {
        path: path.as_str().to_string(),
        name: path.name().to_string(),
        depth: path.depth(),
    })))
}

/// DELETE /api/staging/folders/*path - Remove a folder and its subfolders.
pub async fn remove_folder(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Json<ApiResponse<RemovedFoldersResponse>>, ApiError> {
    let removed = state
        .staging
        .lock()
        .await
        .remove_folder(path.trim_matches('/'))?;
    Ok(Json(ApiResponse::new(removed.into())))
}

/// GET /api/staging/plan?site= - Upload plan without deploying.
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<PlanQuery>,
) -> Result<Json<ApiResponse<PlanResponse>>, ApiError> {
    let tree = state.staging.lock().await;
    let plan = state.deployer.plan(&tree, &query.site)?;
    Ok(Json(ApiResponse::new(PlanResponse::from(&plan))))
}

async fn next_field(multipart: &mut Multipart) -> Result<Option<Field<'_>>, ApiError> {
    multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })
}

async fn read_entry(field: Field<'_>, max_upload_size: u64) -> Result<Entry, ApiError> {
    // Browsers may send a relative path; only the base name is staged.
    let filename = field
        .file_name()
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("No file name provided"))?;
    if is_dot_segment(&filename) {
        return Err(ApiError::bad_request(format!(
            "Invalid file name: {}",
            filename
        )));
    }

    let content = field.bytes().await.map_err(|e| {
        tracing::error!("Failed to read file content: {}", e);
        ApiError::bad_request("Failed to read file")
    })?;

    if content.len() as u64 > max_upload_size {
        let max_mb = max_upload_size / 1024 / 1024;
        return Err(ApiError::bad_request(format!(
            "File too large: {} (max {}MB)",
            filename, max_mb
        )));
    }

    Ok(Entry::from_bytes(filename, content.to_vec()))
}
