// src/handlers/address.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{common::error::AppError, config::AppState, models::address::AddressFill};

// GET /api/address/{cep}
#[utoipa::path(
    get,
    path = "/api/address/{cep}",
    tag = "Address",
    params(("cep" = String, Path, description = "CEP com ou sem pontuação")),
    responses(
        (status = 200, description = "Endereço para preencher o formulário", body = AddressFill),
        (status = 400, description = "CEP não tem 8 dígitos"),
        (status = 404, description = "CEP não encontrado"),
        (status = 502, description = "Serviço de CEP indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn lookup_cep(
    State(app_state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<AddressFill>, AppError> {
    Ok(Json(app_state.address.lookup(&cep).await?))
}
