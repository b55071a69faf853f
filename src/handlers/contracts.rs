// src/handlers/contracts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{paginate, Page, PageParams},
    },
    config::AppState,
    handlers::files::attachment,
    models::contract::{Contract, ContractDetail, ContractFilter, ContractPatch, NewContract},
    services::{
        document_service::DocumentFormat,
        export_service::{write_xlsx, XLSX_CONTENT_TYPE},
    },
};

#[derive(Debug, Serialize, ToSchema)]
pub struct IdentifierResponse {
    #[schema(example = "CTR-20250510-4821")]
    pub identifier: String,
}

// GET /api/contracts
#[utoipa::path(
    get,
    path = "/api/contracts",
    tag = "Contracts",
    params(ContractFilter, PageParams),
    responses((status = 200, description = "Contratos com partes e imóvel", body = Page<ContractDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_contracts(
    State(app_state): State<AppState>,
    Query(filter): Query<ContractFilter>,
    Query(page): Query<PageParams>,
) -> Result<Json<Page<ContractDetail>>, AppError> {
    let contracts = app_state.contracts.list(&filter).await?;
    Ok(Json(paginate(contracts, page)))
}

// POST /api/contracts
#[utoipa::path(
    post,
    path = "/api/contracts",
    tag = "Contracts",
    request_body = NewContract,
    responses(
        (status = 201, description = "Contrato criado", body = Contract),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Identificador duplicado ou referência inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_contract(
    State(app_state): State<AppState>,
    Json(payload): Json<NewContract>,
) -> Result<impl IntoResponse, AppError> {
    let contract = app_state.contracts.create(payload).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

// GET /api/contracts/identifier
#[utoipa::path(
    get,
    path = "/api/contracts/identifier",
    tag = "Contracts",
    responses((status = 200, description = "Sugestão de identificador", body = IdentifierResponse)),
    security(("api_jwt" = []))
)]
pub async fn next_identifier(State(app_state): State<AppState>) -> Json<IdentifierResponse> {
    Json(IdentifierResponse {
        identifier: app_state.contracts.next_identifier(),
    })
}

// GET /api/contracts/{id}
#[utoipa::path(
    get,
    path = "/api/contracts/{id}",
    tag = "Contracts",
    params(("id" = Uuid, Path)),
    responses(
        (status = 200, description = "Contrato com relacionamentos", body = ContractDetail),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_contract(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContractDetail>, AppError> {
    Ok(Json(app_state.contracts.get_detail(id).await?))
}

// PUT /api/contracts/{id}
#[utoipa::path(
    put,
    path = "/api/contracts/{id}",
    tag = "Contracts",
    params(("id" = Uuid, Path)),
    request_body = ContractPatch,
    responses(
        (status = 200, description = "Contrato atualizado", body = Contract),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_contract(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ContractPatch>,
) -> Result<Json<Contract>, AppError> {
    Ok(Json(app_state.contracts.update(id, patch).await?))
}

// DELETE /api/contracts/{id}
#[utoipa::path(
    delete,
    path = "/api/contracts/{id}",
    tag = "Contracts",
    params(("id" = Uuid, Path)),
    responses((status = 204, description = "Removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_contract(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.contracts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/contracts/export.xlsx
#[utoipa::path(
    get,
    path = "/api/contracts/export.xlsx",
    tag = "Contracts",
    params(ContractFilter),
    responses((status = 200, description = "Planilha com a lista filtrada", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")),
    security(("api_jwt" = []))
)]
pub async fn export_contracts(
    State(app_state): State<AppState>,
    Query(filter): Query<ContractFilter>,
) -> Result<Response, AppError> {
    let sheet = app_state.exports.contracts(&filter).await?;
    let bytes = write_xlsx(&sheet)?;
    Ok(attachment(&format!("{}.xlsx", sheet.file_stem), XLSX_CONTENT_TYPE, bytes))
}

// GET /api/contracts/{id}/document.pdf
#[utoipa::path(
    get,
    path = "/api/contracts/{id}/document.pdf",
    tag = "Documents",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Ficha do contrato em PDF", content_type = "application/pdf")),
    security(("api_jwt" = []))
)]
pub async fn contract_pdf(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let doc = app_state.documents.contract_sheet(id, DocumentFormat::Pdf).await?;
    Ok(attachment(&doc.file_name, doc.content_type, doc.bytes))
}

// GET /api/contracts/{id}/document.docx
#[utoipa::path(
    get,
    path = "/api/contracts/{id}/document.docx",
    tag = "Documents",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Ficha do contrato em DOCX", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document")),
    security(("api_jwt" = []))
)]
pub async fn contract_docx(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let doc = app_state.documents.contract_sheet(id, DocumentFormat::Docx).await?;
    Ok(attachment(&doc.file_name, doc.content_type, doc.bytes))
}

// GET /api/contracts/{id}/contract.pdf
#[utoipa::path(
    get,
    path = "/api/contracts/{id}/contract.pdf",
    tag = "Documents",
    params(("id" = Uuid, Path)),
    responses(
        (status = 200, description = "Contrato completo com cláusulas", content_type = "application/pdf"),
        (status = 500, description = "Fonte do PDF não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn full_contract_pdf(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let doc = app_state.documents.full_contract(id, DocumentFormat::Pdf).await?;
    Ok(attachment(&doc.file_name, doc.content_type, doc.bytes))
}

// GET /api/contracts/{id}/contract.docx
#[utoipa::path(
    get,
    path = "/api/contracts/{id}/contract.docx",
    tag = "Documents",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Contrato completo em DOCX", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document")),
    security(("api_jwt" = []))
)]
pub async fn full_contract_docx(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let doc = app_state.documents.full_contract(id, DocumentFormat::Docx).await?;
    Ok(attachment(&doc.file_name, doc.content_type, doc.bytes))
}
