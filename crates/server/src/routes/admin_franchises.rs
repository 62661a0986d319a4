use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::franchise_listing;
use service::events::ChangeAction;
use service::franchise::{service as franchises, FranchiseInput, FranchiseView};
use service::storage::ImageUpload;

use crate::errors::JsonApiError;
use super::auth::ServerState;

/// Decoded listing form: the `data` JSON part plus its files.
pub struct FranchiseForm {
    pub input: FranchiseInput,
    pub logo: Option<ImageUpload>,
    pub gallery: Vec<ImageUpload>,
}

fn multipart_error(e: MultipartError) -> JsonApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        JsonApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", Some(e.body_text()))
    } else {
        JsonApiError::bad_request(e.body_text())
    }
}

/// Parts: `data` (JSON), optional `logo`, repeated `gallery`. Empty file parts
/// (an untouched file input) are ignored; unknown parts are skipped.
pub async fn read_form(mut multipart: Multipart) -> Result<FranchiseForm, JsonApiError> {
    let mut input: Option<FranchiseInput> = None;
    let mut logo = None;
    let mut gallery = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "data" => {
                let text = field.text().await.map_err(multipart_error)?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| JsonApiError::bad_request(format!("invalid data part: {e}")))?;
                input = Some(parsed);
            }
            "logo" | "gallery" | "gallery[]" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.is_empty() && file_name.is_empty() {
                    continue;
                }
                let upload = ImageUpload { file_name, content_type, bytes: bytes.to_vec() };
                if name == "logo" { logo = Some(upload) } else { gallery.push(upload) }
            }
            other => tracing::debug!(part = other, "ignoring multipart part"),
        }
    }

    let input = input.ok_or_else(|| JsonApiError::bad_request("missing 'data' part"))?;
    Ok(FranchiseForm { input, logo, gallery })
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StatusInput {
    pub is_active: bool,
}

#[utoipa::path(get, path = "/admin/franchises", tag = "admin", responses((status = 200, description = "All listings"), (status = 401, description = "Unauthorized")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<FranchiseView>>, JsonApiError> {
    Ok(Json(franchises::list_admin(&state.db).await?))
}

pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<FranchiseView>, JsonApiError> {
    Ok(Json(franchises::get_complete(&state.db, id).await?))
}

#[utoipa::path(post, path = "/admin/franchises", tag = "admin",
    request_body(content = String, content_type = "multipart/form-data", description = "`data` JSON part, optional `logo`, repeated `gallery` files"),
    responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 413, description = "Payload Too Large")))]
pub async fn create(State(state): State<ServerState>, multipart: Multipart) -> Result<Json<franchise_listing::Model>, JsonApiError> {
    let form = read_form(multipart).await?;
    let created = franchises::create(&state.db, state.store.as_ref(), form.input, form.logo, form.gallery).await?;
    info!(id = %created.id, "admin_franchise_created");
    state.events.publish("franchise_listings", ChangeAction::Insert, Some(created.id));
    Ok(Json(created))
}

#[utoipa::path(put, path = "/admin/franchises/{id}", tag = "admin",
    params(("id" = Uuid, Path, description = "Listing id")),
    request_body(content = String, content_type = "multipart/form-data", description = "Same parts as create; `existing_gallery_images` in `data` lists the URLs to keep"),
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<franchise_listing::Model>, JsonApiError> {
    let form = read_form(multipart).await?;
    let updated = franchises::update(&state.db, state.store.as_ref(), id, form.input, form.logo, form.gallery).await?;
    state.events.publish("franchise_listings", ChangeAction::Update, Some(id));
    state.events.publish("gallery", ChangeAction::Update, None);
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/admin/franchises/{id}", tag = "admin",
    params(("id" = Uuid, Path, description = "Listing id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    franchises::delete(&state.db, state.store.as_ref(), id).await?;
    state.events.publish("franchise_listings", ChangeAction::Delete, Some(id));
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(patch, path = "/admin/franchises/{id}/status", tag = "admin",
    params(("id" = Uuid, Path, description = "Listing id")), request_body = StatusInput,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<StatusInput>,
) -> Result<Json<franchise_listing::Model>, JsonApiError> {
    let updated = franchises::toggle_status(&state.db, id, input.is_active).await?;
    state.events.publish("franchise_listings", ChangeAction::Update, Some(id));
    Ok(Json(updated))
}
