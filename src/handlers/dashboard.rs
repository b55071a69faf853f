// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{common::error::AppError, config::AppState, models::dashboard::DashboardSummary};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Totais de cadastros e contagens por status", body = DashboardSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(State(app_state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    Ok(Json(app_state.dashboard.get_summary().await?))
}
