//! Content and version-history endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::auth::AdminIdentity;
use crate::errors::AppError;
use crate::models::{ContentSnapshot, Language, UpdateContentRequest, VersionRecord};
use crate::AppState;

/// GET /api/admin/content (and the public GET /api/content) - Full snapshot.
pub async fn get_content(State(state): State<AppState>) -> Result<Json<ContentSnapshot>, AppError> {
    let snapshot = state.repo.get_snapshot().await?;
    Ok(Json(snapshot))
}

/// PUT /api/admin/content - Persist a single field's new value.
///
/// Returns the version record appended for the change as the success ack.
pub async fn update_content(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(request): Json<UpdateContentRequest>,
) -> Result<Json<VersionRecord>, AppError> {
    if request.section.trim().is_empty() {
        return Err(AppError::Validation("Section is required".to_string()));
    }
    if request.field.trim().is_empty() {
        return Err(AppError::Validation("Field is required".to_string()));
    }
    let language = Language::from_str(&request.language).ok_or_else(|| {
        AppError::Validation(format!("Unknown language {:?}", request.language))
    })?;

    let record = state
        .repo
        .update_field(
            &request.section,
            language,
            &request.field,
            &request.value,
            &identity.username,
        )
        .await?;

    tracing::info!(
        "Updated {}.{}.{} by {}",
        record.section,
        record.language,
        record.field,
        record.author
    );
    Ok(Json(record))
}

/// GET /api/admin/content/versions - All version records, newest first.
pub async fn list_versions(
    State(state): State<AppState>,
) -> Result<Json<Vec<VersionRecord>>, AppError> {
    let versions = state.repo.list_versions().await?;
    Ok(Json(versions))
}

/// POST /api/admin/content/revert/:id - Undo the change a record describes.
///
/// Restores the field to the record's `old_value` and returns the new
/// version record documenting the restoration. 404 when the id is unknown.
pub async fn revert_version(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(id): Path<String>,
) -> Result<Json<VersionRecord>, AppError> {
    let record = state.repo.revert_version(&id, &identity.username).await?;

    tracing::info!(
        "Reverted {}.{}.{} to prior value by {}",
        record.section,
        record.language,
        record.field,
        record.author
    );
    Ok(Json(record))
}
