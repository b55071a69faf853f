// src/handlers/locations.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::location::{City, CityWithState, MaritalStatus, State as UfState},
};

// GET /api/locations/states
#[utoipa::path(
    get,
    path = "/api/locations/states",
    tag = "Locations",
    responses((status = 200, description = "Estados em ordem alfabética", body = Vec<UfState>)),
    security(("api_jwt" = []))
)]
pub async fn list_states(State(app_state): State<AppState>) -> Result<Json<Vec<UfState>>, AppError> {
    Ok(Json(app_state.locations.list_states().await?))
}

// GET /api/locations/states/{id}/cities
#[utoipa::path(
    get,
    path = "/api/locations/states/{id}/cities",
    tag = "Locations",
    params(("id" = i32, Path, description = "ID do estado")),
    responses((status = 200, description = "Cidades do estado", body = Vec<City>)),
    security(("api_jwt" = []))
)]
pub async fn list_cities(
    State(app_state): State<AppState>,
    Path(state_id): Path<i32>,
) -> Result<Json<Vec<City>>, AppError> {
    Ok(Json(app_state.locations.list_cities(state_id).await?))
}

// GET /api/locations/cities/{id}
#[utoipa::path(
    get,
    path = "/api/locations/cities/{id}",
    tag = "Locations",
    params(("id" = i32, Path)),
    responses(
        (status = 200, description = "Cidade com o estado", body = CityWithState),
        (status = 404, description = "Cidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_city(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CityWithState>, AppError> {
    Ok(Json(app_state.locations.get_city(id).await?))
}

// GET /api/locations/marital-statuses
#[utoipa::path(
    get,
    path = "/api/locations/marital-statuses",
    tag = "Locations",
    responses((status = 200, description = "Estados civis", body = Vec<MaritalStatus>)),
    security(("api_jwt" = []))
)]
pub async fn list_marital_statuses(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<MaritalStatus>>, AppError> {
    Ok(Json(app_state.locations.list_marital_statuses().await?))
}
