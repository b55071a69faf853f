// src/handlers/real_estates.rs

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
    models::real_estate::{NewRealEstate, RealEstate, RealEstateDetail, RealEstateFilter, RealEstatePatch},
    services::{
        document_service::DocumentFormat,
        export_service::{write_xlsx, XLSX_CONTENT_TYPE},
    },
};

// GET /api/real-estates
#[utoipa::path(
    get,
    path = "/api/real-estates",
    tag = "Real Estates",
    params(RealEstateFilter, PageParams),
    responses((status = 200, description = "Imóveis com cidade, proprietário e inquilino", body = Page<RealEstateDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_real_estates(
    State(app_state): State<AppState>,
    Query(filter): Query<RealEstateFilter>,
    Query(page): Query<PageParams>,
) -> Result<Json<Page<RealEstateDetail>>, AppError> {
    let real_estates = app_state.real_estates.list(&filter).await?;
    Ok(Json(paginate(real_estates, page)))
}

// POST /api/real-estates
#[utoipa::path(
    post,
    path = "/api/real-estates",
    tag = "Real Estates",
    request_body = NewRealEstate,
    responses(
        (status = 201, description = "Imóvel cadastrado", body = RealEstate),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Proprietário, inquilino ou cidade inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_real_estate(
    State(app_state): State<AppState>,
    Json(payload): Json<NewRealEstate>,
) -> Result<impl IntoResponse, AppError> {
    let real_estate = app_state.real_estates.create(payload).await?;
    Ok((StatusCode::CREATED, Json(real_estate)))
}

// GET /api/real-estates/{id}
#[utoipa::path(
    get,
    path = "/api/real-estates/{id}",
    tag = "Real Estates",
    params(("id" = Uuid, Path)),
    responses(
        (status = 200, description = "Imóvel com relacionamentos", body = RealEstateDetail),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_real_estate(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RealEstateDetail>, AppError> {
    Ok(Json(app_state.real_estates.get_detail(id).await?))
}

// PUT /api/real-estates/{id}
#[utoipa::path(
    put,
    path = "/api/real-estates/{id}",
    tag = "Real Estates",
    params(("id" = Uuid, Path)),
    request_body = RealEstatePatch,
    responses(
        (status = 200, description = "Imóvel atualizado", body = RealEstate),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_real_estate(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<RealEstatePatch>,
) -> Result<Json<RealEstate>, AppError> {
    Ok(Json(app_state.real_estates.update(id, patch).await?))
}

// DELETE /api/real-estates/{id}
#[utoipa::path(
    delete,
    path = "/api/real-estates/{id}",
    tag = "Real Estates",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Removido"),
        (status = 409, description = "Ainda referenciado por contratos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_real_estate(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.real_estates.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/real-estates/export.xlsx
#[utoipa::path(
    get,
    path = "/api/real-estates/export.xlsx",
    tag = "Real Estates",
    params(RealEstateFilter),
    responses((status = 200, description = "Planilha com a lista filtrada", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")),
    security(("api_jwt" = []))
)]
pub async fn export_real_estates(
    State(app_state): State<AppState>,
    Query(filter): Query<RealEstateFilter>,
) -> Result<Response, AppError> {
    let sheet = app_state.exports.real_estates(&filter).await?;
    let bytes = write_xlsx(&sheet)?;
    Ok(attachment(&format!("{}.xlsx", sheet.file_stem), XLSX_CONTENT_TYPE, bytes))
}

async fn real_estate_document(app_state: AppState, id: Uuid, format: DocumentFormat) -> Result<Response, AppError> {
    let doc = app_state.documents.real_estate_sheet(id, format).await?;
    Ok(attachment(&doc.file_name, doc.content_type, doc.bytes))
}

// GET /api/real-estates/{id}/document.pdf
#[utoipa::path(
    get,
    path = "/api/real-estates/{id}/document.pdf",
    tag = "Documents",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Ficha do imóvel em PDF", content_type = "application/pdf")),
    security(("api_jwt" = []))
)]
pub async fn real_estate_pdf(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    real_estate_document(app_state, id, DocumentFormat::Pdf).await
}

// GET /api/real-estates/{id}/document.docx
#[utoipa::path(
    get,
    path = "/api/real-estates/{id}/document.docx",
    tag = "Documents",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Ficha do imóvel em DOCX", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document")),
    security(("api_jwt" = []))
)]
pub async fn real_estate_docx(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    real_estate_document(app_state, id, DocumentFormat::Docx).await
}
