//! Lookup tables: public reads for the search filters, admin CRUD for the
//! category manager.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::{city, industry, sector, service_product, state as state_entity};
use service::events::ChangeAction;
use service::taxonomy::{
    cities::{self, CityView},
    industries,
    sectors::{self, SectorView},
    services::{self, ServiceView},
    states, ChildPatch,
};

use crate::errors::JsonApiError;
use super::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct NameInput {
    pub name: String,
}

/// Child row input; the parent id is required on create and optional on update.
#[derive(Debug, Deserialize)]
pub struct SectorInput {
    pub name: Option<String>,
    pub industry_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceInput {
    pub name: Option<String>,
    pub sector_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CityInput {
    pub name: Option<String>,
    pub state_id: Option<Uuid>,
}

fn required_parent(id: Option<Uuid>, field: &str) -> Result<Uuid, JsonApiError> {
    id.ok_or_else(|| JsonApiError::bad_request(format!("{field} is required")))
}

// ---- public ----

#[utoipa::path(get, path = "/api/industries", tag = "taxonomy", responses((status = 200, description = "Industries by name")))]
pub async fn public_industries(State(state): State<ServerState>) -> Result<Json<Vec<industry::Model>>, JsonApiError> {
    Ok(Json(industries::list_industries(&state.db).await?))
}

#[utoipa::path(get, path = "/api/industries/{id}/sectors", tag = "taxonomy",
    params(("id" = Uuid, Path, description = "Industry id")), responses((status = 200, description = "Sectors of the industry")))]
pub async fn public_sectors_of(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Vec<sector::Model>>, JsonApiError> {
    Ok(Json(sectors::list_sectors_by_industry(&state.db, id).await?))
}

#[utoipa::path(get, path = "/api/sectors/{id}/services", tag = "taxonomy",
    params(("id" = Uuid, Path, description = "Sector id")), responses((status = 200, description = "Services of the sector")))]
pub async fn public_services_of(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Vec<service_product::Model>>, JsonApiError> {
    Ok(Json(services::list_services_by_sector(&state.db, id).await?))
}

#[utoipa::path(get, path = "/api/states", tag = "taxonomy", responses((status = 200, description = "States by name")))]
pub async fn public_states(State(state): State<ServerState>) -> Result<Json<Vec<state_entity::Model>>, JsonApiError> {
    Ok(Json(states::list_states(&state.db).await?))
}

#[utoipa::path(get, path = "/api/states/{id}/cities", tag = "taxonomy",
    params(("id" = Uuid, Path, description = "State id")), responses((status = 200, description = "Cities of the state")))]
pub async fn public_cities_of(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Vec<city::Model>>, JsonApiError> {
    Ok(Json(cities::list_cities_by_state(&state.db, id).await?))
}

// ---- admin: industries ----

pub async fn list_industries(State(state): State<ServerState>) -> Result<Json<Vec<industry::Model>>, JsonApiError> {
    Ok(Json(industries::list_industries(&state.db).await?))
}

#[utoipa::path(post, path = "/admin/industries", tag = "taxonomy", request_body = NameInput,
    responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Conflict")))]
pub async fn create_industry(State(state): State<ServerState>, Json(input): Json<NameInput>) -> Result<Json<industry::Model>, JsonApiError> {
    let created = industries::create_industry(&state.db, &input.name).await?;
    state.events.publish("industries", ChangeAction::Insert, Some(created.id));
    Ok(Json(created))
}

pub async fn update_industry(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<NameInput>,
) -> Result<Json<industry::Model>, JsonApiError> {
    let updated = industries::update_industry(&state.db, id, &input.name).await?;
    state.events.publish("industries", ChangeAction::Update, Some(id));
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/admin/industries/{id}", tag = "taxonomy",
    params(("id" = Uuid, Path, description = "Industry id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Sectors still reference it")))]
pub async fn delete_industry(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    industries::delete_industry(&state.db, id).await?;
    state.events.publish("industries", ChangeAction::Delete, Some(id));
    Ok(StatusCode::NO_CONTENT)
}

// ---- admin: sectors ----

pub async fn list_sectors(State(state): State<ServerState>) -> Result<Json<Vec<SectorView>>, JsonApiError> {
    Ok(Json(sectors::list_sectors(&state.db).await?))
}

pub async fn create_sector(State(state): State<ServerState>, Json(input): Json<SectorInput>) -> Result<Json<sector::Model>, JsonApiError> {
    let industry_id = required_parent(input.industry_id, "industry_id")?;
    let created = sectors::create_sector(&state.db, input.name.as_deref().unwrap_or(""), industry_id).await?;
    state.events.publish("sectors", ChangeAction::Insert, Some(created.id));
    Ok(Json(created))
}

pub async fn update_sector(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SectorInput>,
) -> Result<Json<sector::Model>, JsonApiError> {
    let updated = sectors::update_sector(&state.db, id, ChildPatch { name: input.name, parent_id: input.industry_id }).await?;
    state.events.publish("sectors", ChangeAction::Update, Some(id));
    Ok(Json(updated))
}

pub async fn delete_sector(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    sectors::delete_sector(&state.db, id).await?;
    state.events.publish("sectors", ChangeAction::Delete, Some(id));
    Ok(StatusCode::NO_CONTENT)
}

// ---- admin: services/products ----

pub async fn list_services(State(state): State<ServerState>) -> Result<Json<Vec<ServiceView>>, JsonApiError> {
    Ok(Json(services::list_services(&state.db).await?))
}

pub async fn create_service(State(state): State<ServerState>, Json(input): Json<ServiceInput>) -> Result<Json<service_product::Model>, JsonApiError> {
    let sector_id = required_parent(input.sector_id, "sector_id")?;
    let created = services::create_service(&state.db, input.name.as_deref().unwrap_or(""), sector_id).await?;
    state.events.publish("services_products", ChangeAction::Insert, Some(created.id));
    Ok(Json(created))
}

pub async fn update_service(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ServiceInput>,
) -> Result<Json<service_product::Model>, JsonApiError> {
    let updated = services::update_service(&state.db, id, ChildPatch { name: input.name, parent_id: input.sector_id }).await?;
    state.events.publish("services_products", ChangeAction::Update, Some(id));
    Ok(Json(updated))
}

pub async fn delete_service(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    services::delete_service(&state.db, id).await?;
    state.events.publish("services_products", ChangeAction::Delete, Some(id));
    Ok(StatusCode::NO_CONTENT)
}

// ---- admin: states ----

pub async fn list_states(State(state): State<ServerState>) -> Result<Json<Vec<state_entity::Model>>, JsonApiError> {
    Ok(Json(states::list_states(&state.db).await?))
}

pub async fn create_state(State(state): State<ServerState>, Json(input): Json<NameInput>) -> Result<Json<state_entity::Model>, JsonApiError> {
    let created = states::create_state(&state.db, &input.name).await?;
    state.events.publish("states", ChangeAction::Insert, Some(created.id));
    Ok(Json(created))
}

pub async fn update_state(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<NameInput>,
) -> Result<Json<state_entity::Model>, JsonApiError> {
    let updated = states::update_state(&state.db, id, &input.name).await?;
    state.events.publish("states", ChangeAction::Update, Some(id));
    Ok(Json(updated))
}

pub async fn delete_state(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    states::delete_state(&state.db, id).await?;
    state.events.publish("states", ChangeAction::Delete, Some(id));
    Ok(StatusCode::NO_CONTENT)
}

// ---- admin: cities ----

pub async fn list_cities(State(state): State<ServerState>) -> Result<Json<Vec<CityView>>, JsonApiError> {
    Ok(Json(cities::list_cities(&state.db).await?))
}

pub async fn create_city(State(state): State<ServerState>, Json(input): Json<CityInput>) -> Result<Json<city::Model>, JsonApiError> {
    let state_id = required_parent(input.state_id, "state_id")?;
    let created = cities::create_city(&state.db, input.name.as_deref().unwrap_or(""), state_id).await?;
    state.events.publish("cities", ChangeAction::Insert, Some(created.id));
    Ok(Json(created))
}

pub async fn update_city(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CityInput>,
) -> Result<Json<city::Model>, JsonApiError> {
    let updated = cities::update_city(&state.db, id, ChildPatch { name: input.name, parent_id: input.state_id }).await?;
    state.events.publish("cities", ChangeAction::Update, Some(id));
    Ok(Json(updated))
}

pub async fn delete_city(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    cities::delete_city(&state.db, id).await?;
    state.events.publish("cities", ChangeAction::Delete, Some(id));
    Ok(StatusCode::NO_CONTENT)
}
