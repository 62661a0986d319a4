use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::contact_query;
use service::contact_service::{self, ContactFilter, ContactInput, ContactStats};
use service::events::ChangeAction;

use crate::errors::JsonApiError;
use super::auth::ServerState;

#[utoipa::path(post, path = "/api/contact", tag = "contact", request_body = crate::openapi::ContactRequest,
    responses((status = 201, description = "Received"), (status = 400, description = "Validation Error")))]
pub async fn submit(
    State(state): State<ServerState>,
    Json(input): Json<ContactInput>,
) -> Result<(StatusCode, Json<contact_query::Model>), JsonApiError> {
    let created = contact_service::submit(&state.db, input).await?;
    state.events.publish("contact_queries", ChangeAction::Insert, Some(created.id));
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/admin/contact-queries", tag = "contact",
    responses((status = 200, description = "Queries, newest first"), (status = 401, description = "Unauthorized")))]
pub async fn list(State(state): State<ServerState>, Query(filter): Query<ContactFilter>) -> Result<Json<Vec<contact_query::Model>>, JsonApiError> {
    Ok(Json(contact_service::list(&state.db, filter).await?))
}

pub async fn stats(State(state): State<ServerState>) -> Result<Json<ContactStats>, JsonApiError> {
    Ok(Json(contact_service::stats(&state.db).await?))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StatusUpdate {
    pub status: String,
    pub admin_notes: Option<String>,
}

#[utoipa::path(patch, path = "/admin/contact-queries/{id}", tag = "contact",
    params(("id" = Uuid, Path, description = "Query id")), request_body = StatusUpdate,
    responses((status = 200, description = "Updated"), (status = 400, description = "Unknown status"), (status = 404, description = "Not Found")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<StatusUpdate>,
) -> Result<Json<contact_query::Model>, JsonApiError> {
    let updated = contact_service::update_status(&state.db, id, &input.status, input.admin_notes).await?;
    state.events.publish("contact_queries", ChangeAction::Update, Some(id));
    Ok(Json(updated))
}

pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    contact_service::delete(&state.db, id).await?;
    state.events.publish("contact_queries", ChangeAction::Delete, Some(id));
    Ok(StatusCode::NO_CONTENT)
}
