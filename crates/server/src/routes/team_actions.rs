use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use models::team_action_image;
use service::events::ChangeAction;
use service::team_action_service::{self, TeamActionInput};

use crate::errors::JsonApiError;
use super::auth::ServerState;

#[utoipa::path(get, path = "/api/team-actions", tag = "gallery", responses((status = 200, description = "Team slides in display order")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<team_action_image::Model>>, JsonApiError> {
    Ok(Json(team_action_service::list_team_actions(&state.db).await?))
}

pub async fn create(State(state): State<ServerState>, Json(input): Json<TeamActionInput>) -> Result<Json<team_action_image::Model>, JsonApiError> {
    let created = team_action_service::create_team_action(&state.db, input).await?;
    state.events.publish("team_action_images", ChangeAction::Insert, Some(created.id));
    Ok(Json(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<TeamActionInput>,
) -> Result<Json<team_action_image::Model>, JsonApiError> {
    let updated = team_action_service::update_team_action(&state.db, id, input).await?;
    state.events.publish("team_action_images", ChangeAction::Update, Some(id));
    Ok(Json(updated))
}

pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    team_action_service::delete_team_action(&state.db, id).await?;
    state.events.publish("team_action_images", ChangeAction::Delete, Some(id));
    Ok(StatusCode::NO_CONTENT)
}
