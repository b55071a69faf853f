// src/handlers/people.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{paginate, Page, PageParams},
    },
    config::AppState,
    handlers::files::attachment,
    models::person::{NewPerson, Person, PersonDetail, PersonFilter, PersonPatch, PersonScope},
    services::{document_service::DocumentFormat, export_service::{write_xlsx, XLSX_CONTENT_TYPE}},
};

// GET /api/people/{scope}
#[utoipa::path(
    get,
    path = "/api/people/{scope}",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees"), PersonFilter, PageParams),
    responses(
        (status = 200, description = "Página de proprietários ou inquilinos", body = Page<Person>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_people(
    State(app_state): State<AppState>,
    Path(scope): Path<PersonScope>,
    Query(filter): Query<PersonFilter>,
    Query(page): Query<PageParams>,
) -> Result<Json<Page<Person>>, AppError> {
    let people = app_state.people.scoped(scope).list(&filter).await?;
    Ok(Json(paginate(people, page)))
}

// POST /api/people/{scope}
#[utoipa::path(
    post,
    path = "/api/people/{scope}",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees")),
    request_body = NewPerson,
    responses(
        (status = 201, description = "Cadastro criado", body = Person),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CPF já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_person(
    State(app_state): State<AppState>,
    Path(scope): Path<PersonScope>,
    Json(payload): Json<NewPerson>,
) -> Result<impl IntoResponse, AppError> {
    let person = app_state.people.scoped(scope).create(payload).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

// GET /api/people/{scope}/{id}
#[utoipa::path(
    get,
    path = "/api/people/{scope}/{id}",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    responses(
        (status = 200, description = "Cadastro com cidade e estado civil", body = PersonDetail),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_person(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
) -> Result<Json<PersonDetail>, AppError> {
    Ok(Json(app_state.people.scoped(scope).get_detail(id).await?))
}

// PUT /api/people/{scope}/{id}
#[utoipa::path(
    put,
    path = "/api/people/{scope}/{id}",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    request_body = PersonPatch,
    responses(
        (status = 200, description = "Cadastro atualizado", body = Person),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_person(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
    Json(patch): Json<PersonPatch>,
) -> Result<Json<Person>, AppError> {
    Ok(Json(app_state.people.scoped(scope).update(id, patch).await?))
}

// DELETE /api/people/{scope}/{id}
#[utoipa::path(
    delete,
    path = "/api/people/{scope}/{id}",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Removido (ou já inexistente)"),
        (status = 404, description = "Cadastro pertence ao outro papel"),
        (status = 409, description = "Ainda referenciado por imóveis ou contratos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_person(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state.people.scoped(scope).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/people/{scope}/export.xlsx
#[utoipa::path(
    get,
    path = "/api/people/{scope}/export.xlsx",
    tag = "People",
    params(("scope" = String, Path, description = "owners | lessees"), PersonFilter),
    responses((status = 200, description = "Planilha com a lista filtrada", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")),
    security(("api_jwt" = []))
)]
pub async fn export_people(
    State(app_state): State<AppState>,
    Path(scope): Path<PersonScope>,
    Query(filter): Query<PersonFilter>,
) -> Result<Response, AppError> {
    let sheet = app_state.exports.people(scope, &filter).await?;
    let bytes = write_xlsx(&sheet)?;
    Ok(attachment(&format!("{}.xlsx", sheet.file_stem), XLSX_CONTENT_TYPE, bytes))
}

async fn person_document(
    app_state: AppState,
    scope: PersonScope,
    id: Uuid,
    format: DocumentFormat,
) -> Result<Response, AppError> {
    let doc = app_state.documents.person_sheet(scope, id, format).await?;
    Ok(attachment(&doc.file_name, doc.content_type, doc.bytes))
}

// GET /api/people/{scope}/{id}/document.pdf
#[utoipa::path(
    get,
    path = "/api/people/{scope}/{id}/document.pdf",
    tag = "Documents",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    responses((status = 200, description = "Ficha em PDF", content_type = "application/pdf")),
    security(("api_jwt" = []))
)]
pub async fn person_pdf(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
) -> Result<Response, AppError> {
    person_document(app_state, scope, id, DocumentFormat::Pdf).await
}

// GET /api/people/{scope}/{id}/document.docx
#[utoipa::path(
    get,
    path = "/api/people/{scope}/{id}/document.docx",
    tag = "Documents",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    responses((status = 200, description = "Ficha em DOCX", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document")),
    security(("api_jwt" = []))
)]
pub async fn person_docx(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
) -> Result<Response, AppError> {
    person_document(app_state, scope, id, DocumentFormat::Docx).await
}
