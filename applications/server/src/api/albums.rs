/// Album API routes
use crate::{
    api::ApiResponse,
    error::Result,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use openmusic_core::{AlbumId, Fault, NewAlbum, PayloadKind};
use openmusic_storage::{albums, StorageError};
use serde_json::{json, Value};

/// Largest accepted cover image
pub const MAX_COVER_BYTES: u64 = 512_000;

/// Multipart field carrying the cover image
const COVER_FIELD: &str = "cover";

/// POST /albums
pub async fn create_album(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let album: NewAlbum = app_state.schemas.parse(PayloadKind::Album, payload)?;
    let album_id = albums::create(app_state.db.pool(), &album).await?;

    Ok(ApiResponse::created(json!({ "albumId": album_id })))
}

/// GET /albums/:id
pub async fn get_album(
    State(app_state): State<AppState>,
    Path(id): Path<AlbumId>,
) -> Result<ApiResponse> {
    let album = albums::get_by_id(app_state.db.pool(), &id).await?;
    let cover_url = album
        .cover
        .as_deref()
        .map(|file| app_state.file_storage.cover_url(file));

    Ok(ApiResponse::ok(json!({
        "album": {
            "id": album.id,
            "name": album.name,
            "year": album.year,
            "coverUrl": cover_url,
            "songs": album.songs,
        }
    })))
}

/// PUT /albums/:id
pub async fn update_album(
    State(app_state): State<AppState>,
    Path(id): Path<AlbumId>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let album: NewAlbum = app_state.schemas.parse(PayloadKind::Album, payload)?;
    albums::update(app_state.db.pool(), &id, &album).await?;

    Ok(ApiResponse::message("Album updated"))
}

/// DELETE /albums/:id
pub async fn delete_album(
    State(app_state): State<AppState>,
    Path(id): Path<AlbumId>,
) -> Result<ApiResponse> {
    if let Some(cover) = albums::delete(app_state.db.pool(), &id).await? {
        app_state.file_storage.delete_cover(&cover).await?;
    }

    Ok(ApiResponse::message("Album deleted"))
}

/// POST /albums/:id/covers - multipart upload, field `cover`
pub async fn upload_cover(
    State(app_state): State<AppState>,
    Path(id): Path<AlbumId>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ApiResponse> {
    if !albums::exists(app_state.db.pool(), &id).await? {
        return Err(StorageError::not_found("Album", id.as_str()).into());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| Fault::bad_request("Expected multipart/form-data"))?;
    let boundary = multer::parse_boundary(content_type)?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let constraints = multer::Constraints::new()
        .size_limit(multer::SizeLimit::new().for_field(COVER_FIELD, MAX_COVER_BYTES));
    let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);

    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(COVER_FIELD) {
            continue;
        }

        let mime = field
            .content_type()
            .map(ToString::to_string)
            .unwrap_or_default();
        app_state
            .schemas
            .validate_payload(PayloadKind::AlbumCover, &json!({ "content-type": mime }))?;

        let data = field.bytes().await?;
        upload = Some((mime, data));
    }

    let (mime, data) =
        upload.ok_or_else(|| Fault::bad_request("\"cover\" is required"))?;

    let stored = app_state
        .file_storage
        .store_cover(&mime, &data)
        .await?;

    let previous = match albums::set_cover(app_state.db.pool(), &id, &stored).await {
        Ok(previous) => previous,
        Err(e) => {
            app_state.file_storage.delete_cover(&stored).await?;
            return Err(e.into());
        }
    };
    if let Some(previous) = previous {
        app_state.file_storage.delete_cover(&previous).await?;
    }

    Ok(ApiResponse::created_message("Cover uploaded"))
}
