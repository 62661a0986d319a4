use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use common::pagination::Page;
use service::franchise::search::{self, CategoryQuery, InvestmentQuery, LocationQuery, SearchParams, TabResult};
use service::franchise::{service as franchises, FranchiseView};

use crate::errors::JsonApiError;
use super::auth::ServerState;

#[utoipa::path(get, path = "/api/franchises", tag = "franchises",
    responses((status = 200, description = "Active listings, newest first")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<FranchiseView>>, JsonApiError> {
    Ok(Json(franchises::list_public(&state.db).await?))
}

#[utoipa::path(get, path = "/api/franchises/{id}", tag = "franchises",
    params(("id" = Uuid, Path, description = "Listing id")),
    responses((status = 200, description = "Listing"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<FranchiseView>, JsonApiError> {
    Ok(Json(franchises::get_public(&state.db, id).await?))
}

#[utoipa::path(get, path = "/api/franchises/search", tag = "franchises",
    params(crate::openapi::SearchQueryDoc),
    responses((status = 200, description = "One page of results"), (status = 400, description = "Validation Error")))]
pub async fn search_page(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<FranchiseView>>, JsonApiError> {
    Ok(Json(search::search(&state.db, &params).await?))
}

#[utoipa::path(get, path = "/api/franchises/search/category", tag = "franchises",
    responses((status = 200, description = "Listings and total count")))]
pub async fn by_category(State(state): State<ServerState>, Query(q): Query<CategoryQuery>) -> Result<Json<TabResult>, JsonApiError> {
    Ok(Json(search::search_by_category(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/api/franchises/search/location", tag = "franchises",
    responses((status = 200, description = "Listings and total count")))]
pub async fn by_location(State(state): State<ServerState>, Query(q): Query<LocationQuery>) -> Result<Json<TabResult>, JsonApiError> {
    Ok(Json(search::search_by_location(&state.db, &q).await?))
}

#[utoipa::path(get, path = "/api/franchises/search/investment", tag = "franchises",
    responses((status = 200, description = "Listings and total count")))]
pub async fn by_investment(State(state): State<ServerState>, Query(q): Query<InvestmentQuery>) -> Result<Json<TabResult>, JsonApiError> {
    Ok(Json(search::search_by_investment(&state.db, &q).await?))
}
