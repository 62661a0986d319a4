use axum::{extract::State, Json};

use service::dashboard_service::{self, DashboardStats};

use crate::errors::JsonApiError;
use super::auth::ServerState;

#[utoipa::path(get, path = "/admin/dashboard/stats", tag = "admin",
    responses((status = 200, description = "Listing, industry and gallery counts"), (status = 401, description = "Unauthorized")))]
pub async fn stats(State(state): State<ServerState>) -> Result<Json<DashboardStats>, JsonApiError> {
    Ok(Json(dashboard_service::stats(&state.db).await?))
}
