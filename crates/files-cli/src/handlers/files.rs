//! `/v1/files` handlers

use crate::{ApiError, AppState};
use axum::{
    body::Body,
    extract::{rejection::QueryRejection, FromRequest, Multipart, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use files_core::{
    CoreError, FieldViolation, ListQuery, ObjectKey, ObjectMetadata, ObjectRecord,
    PriorExistence, RawListParams,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response body of an upload
#[derive(Debug, Serialize, Deserialize)]
pub struct PutFileResponse {
    pub file_path: String,
    pub message: String,
}

/// One entry of a listing
#[derive(Debug, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_path: String,
    pub last_modified: DateTime<Utc>,
    pub size_bytes: u64,
}

impl From<ObjectRecord> for FileMetadata {
    fn from(record: ObjectRecord) -> Self {
        Self {
            file_path: record.key,
            last_modified: record.last_modified,
            size_bytes: record.size_bytes,
        }
    }
}

/// Response body of a listing
#[derive(Debug, Serialize, Deserialize)]
pub struct GetFilesResponse {
    pub files: Vec<FileMetadata>,
    pub next_page_token: Option<String>,
}

/// PUT /v1/files/{*file_path} - Upload a file
///
/// Accepts either a raw body or a `multipart/form-data` form whose first file
/// part holds the content.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Path(file_path): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let key = ObjectKey::new(file_path)?;

    let (data, content_type) = if is_multipart(request.headers()) {
        read_file_part(request).await?
    } else {
        let content_type = header_str(request.headers(), header::CONTENT_TYPE);
        let data = Bytes::from_request(request, &())
            .await
            .map_err(|rejection| ApiError::Rejected {
                status: rejection.status(),
                detail: rejection.body_text(),
            })?;
        (data, content_type)
    };

    let prior = state
        .gateway
        .upload(&key, data, content_type.as_deref())
        .await?;

    let (status, message) = match prior {
        PriorExistence::Created => (
            StatusCode::CREATED,
            format!("New file uploaded at path : /{key}"),
        ),
        PriorExistence::Overwritten => (
            StatusCode::OK,
            format!("Existing file updated at path: /{key}"),
        ),
    };

    Ok((
        status,
        Json(PutFileResponse {
            file_path: key.into(),
            message,
        }),
    )
        .into_response())
}

/// GET /v1/files - List files with pagination
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    params: Result<Query<RawListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        ApiError::invalid(FieldViolation::new(rejection.body_text(), serde_json::Value::Null))
    })?;

    let query = ListQuery::from_params(params)?;
    let page = state.listing.list(&query).await?;

    Ok(Json(GetFilesResponse {
        files: page.records.into_iter().map(FileMetadata::from).collect(),
        next_page_token: page.next_page_token.map(|token| token.encode()),
    })
    .into_response())
}

/// HEAD /v1/files/{*file_path} - Retrieve file metadata
///
/// HEAD responses never carry a body, including the 404.
pub async fn head_file(
    State(state): State<Arc<AppState>>,
    Path(file_path): Path<String>,
) -> Result<Response, ApiError> {
    let key = ObjectKey::new(file_path)?;

    match state.gateway.metadata(&key).await {
        Ok(metadata) => Ok(metadata_response(&metadata, Body::empty())),
        Err(CoreError::NotFound(_)) => Ok(StatusCode::NOT_FOUND.into_response()),
        Err(err) => Err(err.into()),
    }
}

/// GET /v1/files/{*file_path} - Retrieve a file
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(file_path): Path<String>,
) -> Result<Response, ApiError> {
    let key = ObjectKey::new(file_path)?;
    let content = state.gateway.fetch(&key).await?;

    Ok(metadata_response(
        &content.metadata,
        Body::from_stream(content.body),
    ))
}

/// DELETE /v1/files/{*file_path} - Delete a file
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(file_path): Path<String>,
) -> Result<Response, ApiError> {
    let key = ObjectKey::new(file_path)?;

    // Store deletes are idempotent, so absence has to be checked up front
    if !state.gateway.exists(&key).await? {
        return Err(ApiError::NotFound(key.into()));
    }

    state.gateway.delete(&key).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn metadata_response(metadata: &ObjectMetadata, body: Body) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, metadata.content_type.clone()),
            (header::LAST_MODIFIED, metadata.last_modified.to_rfc3339()),
            (header::CONTENT_LENGTH, metadata.content_length.to_string()),
        ],
        body,
    )
        .into_response()
}

fn is_multipart(headers: &HeaderMap) -> bool {
    header_str(headers, header::CONTENT_TYPE)
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Read the first file part of a multipart form
async fn read_file_part(request: Request) -> Result<(Bytes, Option<String>), ApiError> {
    let rejected = |status: StatusCode, detail: String| ApiError::Rejected { status, detail };

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|r| rejected(r.status(), r.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejected(e.status(), e.body_text()))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| rejected(e.status(), e.body_text()))?;
        return Ok((data, content_type));
    }

    Err(ApiError::invalid(FieldViolation::new(
        "Field required",
        serde_json::Value::Null,
    )))
}
