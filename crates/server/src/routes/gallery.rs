use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::gallery as gallery_entity;
use service::events::ChangeAction;
use service::gallery_service::{self, GalleryItem, GalleryPatch, GallerySource};
use service::storage::ImageUpload;

use crate::errors::JsonApiError;
use super::auth::ServerState;

/// `?from=team` (or `?type=team`) switches to the team slides.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GalleryQuery {
    pub from: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[utoipa::path(get, path = "/api/gallery", tag = "gallery", params(GalleryQuery),
    responses((status = 200, description = "Gallery cards")))]
pub async fn public_gallery(State(state): State<ServerState>, Query(q): Query<GalleryQuery>) -> Result<Json<Vec<GalleryItem>>, JsonApiError> {
    let source = GallerySource::parse(q.from.as_deref().or(q.kind.as_deref()));
    Ok(Json(gallery_service::public_gallery(&state.db, source).await?))
}

pub async fn list(State(state): State<ServerState>, Path(franchise_id): Path<Uuid>) -> Result<Json<Vec<gallery_entity::Model>>, JsonApiError> {
    Ok(Json(gallery_service::list_gallery_images(&state.db, franchise_id).await?))
}

/// Multipart `image` file plus optional `alt` text; appended after existing images.
#[utoipa::path(post, path = "/admin/franchises/{id}/gallery", tag = "gallery",
    params(("id" = Uuid, Path, description = "Listing id")),
    request_body(content = String, content_type = "multipart/form-data", description = "`image` file, optional `alt`"),
    responses((status = 200, description = "Added"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn add(
    State(state): State<ServerState>,
    Path(franchise_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<gallery_entity::Model>, JsonApiError> {
    // listing must exist before anything is written
    service::franchise::service::get_complete(&state.db, franchise_id).await?;

    let mut image = None;
    let mut alt = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| JsonApiError::bad_request(e.body_text()))? {
        match field.name().unwrap_or_default() {
            "image" | "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let bytes = field.bytes().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
                image = Some(ImageUpload { file_name, content_type, bytes: bytes.to_vec() });
            }
            "alt" | "image_alt_text" => {
                alt = models::validation::non_blank(Some(field.text().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?));
            }
            _ => {}
        }
    }
    let image = image.ok_or_else(|| JsonApiError::bad_request("missing 'image' part"))?;

    let row = gallery_service::append_image(&state.db, state.store.as_ref(), franchise_id, &image, alt).await?;
    state.events.publish("gallery", ChangeAction::Insert, Some(row.id));
    Ok(Json(row))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReorderInput {
    pub ids: Vec<Uuid>,
}

#[utoipa::path(put, path = "/admin/franchises/{id}/gallery/order", tag = "gallery",
    params(("id" = Uuid, Path, description = "Listing id")), request_body = ReorderInput,
    responses((status = 204, description = "Reordered"), (status = 404, description = "Unknown image id")))]
pub async fn reorder(
    State(state): State<ServerState>,
    Path(franchise_id): Path<Uuid>,
    Json(input): Json<ReorderInput>,
) -> Result<StatusCode, JsonApiError> {
    gallery_service::reorder_gallery_images(&state.db, franchise_id, &input.ids).await?;
    state.events.publish("gallery", ChangeAction::Update, None);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<GalleryPatch>,
) -> Result<Json<gallery_entity::Model>, JsonApiError> {
    let row = gallery_service::update_gallery_image(&state.db, id, patch).await?;
    state.events.publish("gallery", ChangeAction::Update, Some(id));
    Ok(Json(row))
}

/// Removes the row and its stored object.
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    gallery_service::delete_gallery_image_complete(&state.db, state.store.as_ref(), id).await?;
    state.events.publish("gallery", ChangeAction::Delete, Some(id));
    Ok(StatusCode::NO_CONTENT)
}
