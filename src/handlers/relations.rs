// src/handlers/relations.rs
// Cônjuges e referências pessoais de um proprietário ou inquilino.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::person::{PartnerPayload, PersonPartner, PersonReference, PersonScope, ReferencePayload},
};

// GET /api/people/{scope}/{id}/partners
#[utoipa::path(
    get,
    path = "/api/people/{scope}/{id}/partners",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    responses((status = 200, description = "Cônjuges cadastrados", body = Vec<PersonPartner>)),
    security(("api_jwt" = []))
)]
pub async fn list_partners(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
) -> Result<Json<Vec<PersonPartner>>, AppError> {
    let person = app_state.people.scoped(scope).get_by_id(id).await?;
    Ok(Json(app_state.partners.list_by_person(person.id).await?))
}

// POST /api/people/{scope}/{id}/partners
#[utoipa::path(
    post,
    path = "/api/people/{scope}/{id}/partners",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    request_body = PartnerPayload,
    responses(
        (status = 201, description = "Cônjuge cadastrado", body = PersonPartner),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Pessoa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_partner(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
    Json(payload): Json<PartnerPayload>,
) -> Result<impl IntoResponse, AppError> {
    let person = app_state.people.scoped(scope).get_by_id(id).await?;
    let partner = app_state.partners.create(&person, payload).await?;
    Ok((StatusCode::CREATED, Json(partner)))
}

// PUT /api/partners/{id}
#[utoipa::path(
    put,
    path = "/api/partners/{id}",
    tag = "People",
    params(("id" = Uuid, Path)),
    request_body = PartnerPayload,
    responses(
        (status = 200, description = "Cônjuge atualizado", body = PersonPartner),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_partner(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartnerPayload>,
) -> Result<Json<PersonPartner>, AppError> {
    Ok(Json(app_state.partners.update(id, payload).await?))
}

// DELETE /api/partners/{id}
#[utoipa::path(
    delete,
    path = "/api/partners/{id}",
    tag = "People",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_partner(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.partners.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/people/{scope}/{id}/references
#[utoipa::path(
    get,
    path = "/api/people/{scope}/{id}/references",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    responses((status = 200, description = "Referências cadastradas", body = Vec<PersonReference>)),
    security(("api_jwt" = []))
)]
pub async fn list_references(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
) -> Result<Json<Vec<PersonReference>>, AppError> {
    let person = app_state.people.scoped(scope).get_by_id(id).await?;
    Ok(Json(app_state.references.list_by_person(person.id).await?))
}

// POST /api/people/{scope}/{id}/references
#[utoipa::path(
    post,
    path = "/api/people/{scope}/{id}/references",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    request_body = ReferencePayload,
    responses(
        (status = 201, description = "Referência cadastrada", body = PersonReference),
        (status = 400, description = "Nome, telefone e parentesco são obrigatórios"),
        (status = 404, description = "Pessoa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_reference(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
    Json(payload): Json<ReferencePayload>,
) -> Result<impl IntoResponse, AppError> {
    let person = app_state.people.scoped(scope).get_by_id(id).await?;
    let reference = app_state.references.create(&person, payload).await?;
    Ok((StatusCode::CREATED, Json(reference)))
}

// PUT /api/references/{id}
#[utoipa::path(
    put,
    path = "/api/references/{id}",
    tag = "People",
    params(("id" = Uuid, Path)),
    request_body = ReferencePayload,
    responses(
        (status = 200, description = "Referência atualizada", body = PersonReference),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_reference(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReferencePayload>,
) -> Result<Json<PersonReference>, AppError> {
    Ok(Json(app_state.references.update(id, payload).await?))
}

// DELETE /api/references/{id}
#[utoipa::path(
    delete,
    path = "/api/references/{id}",
    tag = "People",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_reference(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.references.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
