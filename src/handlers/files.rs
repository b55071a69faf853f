// src/handlers/files.rs
// Arquivos PDF anexados a proprietários, inquilinos, imóveis e contratos.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        person::PersonScope,
        storage::{EntityKind, StoredFile, UploadFile},
    },
};

/// Corpo multipart do upload: um ou mais PDFs no campo `files`
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<UploadFile>,
}

/// Nome em `filename*` (RFC 5987): tudo fora do conjunto seguro vira %XX
fn encode_rfc5987(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && c != '"' && !c.is_ascii_control() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        encode_rfc5987(file_name)
    )
}

/// Resposta de download: o navegador salva em vez de abrir
pub fn attachment(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Response {
    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(file_name)),
    ];
    (headers, bytes).into_response()
}

async fn read_files(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::FileRejected(e.body_text()))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::FileRejected(e.body_text()))?;
        files.push(UploadFile {
            name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Ok(UploadForm { files })
}

/// Confere se a entidade existe antes de mexer na pasta dela
async fn ensure_exists(app_state: &AppState, kind: EntityKind, id: Uuid) -> Result<(), AppError> {
    match kind {
        EntityKind::Owner => app_state.people.scoped(PersonScope::Owners).get_by_id(id).await.map(|_| ()),
        EntityKind::Lessee => app_state.people.scoped(PersonScope::Lessees).get_by_id(id).await.map(|_| ()),
        EntityKind::RealEstate => app_state.real_estates.get_by_id(id).await.map(|_| ()),
        EntityKind::Contract => app_state.contracts.get_by_id(id).await.map(|_| ()),
    }
}

fn person_kind(scope: PersonScope) -> EntityKind {
    EntityKind::from(scope.role())
}

async fn list(app_state: AppState, kind: EntityKind, id: Uuid) -> Result<Json<Vec<StoredFile>>, AppError> {
    ensure_exists(&app_state, kind, id).await?;
    Ok(Json(app_state.files.load_stored_files(kind, id).await?))
}

async fn upload(
    app_state: AppState,
    kind: EntityKind,
    id: Uuid,
    multipart: Multipart,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    ensure_exists(&app_state, kind, id).await?;
    let form = read_files(multipart).await?;
    Ok(Json(app_state.files.upload_files(kind, id, form.files).await?))
}

async fn remove(app_state: AppState, kind: EntityKind, id: Uuid, name: &str) -> Result<Json<Vec<StoredFile>>, AppError> {
    ensure_exists(&app_state, kind, id).await?;
    app_state.files.delete_stored_file(kind, id, name).await?;
    Ok(Json(app_state.files.load_stored_files(kind, id).await?))
}

// --- Proprietários / Inquilinos ---

#[utoipa::path(
    get,
    path = "/api/people/{scope}/{id}/files",
    tag = "Files",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    responses((status = 200, description = "Arquivos com links temporários", body = Vec<StoredFile>)),
    security(("api_jwt" = []))
)]
pub async fn list_person_files(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    list(app_state, person_kind(scope), id).await
}

#[utoipa::path(
    post,
    path = "/api/people/{scope}/{id}/files",
    tag = "Files",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path)),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Arquivos após o envio", body = Vec<StoredFile>),
        (status = 400, description = "Arquivo recusado (tipo, tamanho ou limite de 3)")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_person_files(
    State(app_state): State<AppState>,
    Path((scope, id)): Path<(PersonScope, Uuid)>,
    multipart: Multipart,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    upload(app_state, person_kind(scope), id, multipart).await
}

#[utoipa::path(
    delete,
    path = "/api/people/{scope}/{id}/files/{name}",
    tag = "Files",
    params(("scope" = String, Path, description = "owners | lessees"), ("id" = Uuid, Path), ("name" = String, Path)),
    responses((status = 200, description = "Arquivos restantes", body = Vec<StoredFile>)),
    security(("api_jwt" = []))
)]
pub async fn delete_person_file(
    State(app_state): State<AppState>,
    Path((scope, id, name)): Path<(PersonScope, Uuid, String)>,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    remove(app_state, person_kind(scope), id, &name).await
}

// --- Imóveis ---

#[utoipa::path(
    get,
    path = "/api/real-estates/{id}/files",
    tag = "Files",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Arquivos com links temporários", body = Vec<StoredFile>)),
    security(("api_jwt" = []))
)]
pub async fn list_real_estate_files(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    list(app_state, EntityKind::RealEstate, id).await
}

#[utoipa::path(
    post,
    path = "/api/real-estates/{id}/files",
    tag = "Files",
    params(("id" = Uuid, Path)),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Arquivos após o envio", body = Vec<StoredFile>),
        (status = 400, description = "Arquivo recusado (tipo, tamanho ou limite de 3)")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_real_estate_files(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    upload(app_state, EntityKind::RealEstate, id, multipart).await
}

#[utoipa::path(
    delete,
    path = "/api/real-estates/{id}/files/{name}",
    tag = "Files",
    params(("id" = Uuid, Path), ("name" = String, Path)),
    responses((status = 200, description = "Arquivos restantes", body = Vec<StoredFile>)),
    security(("api_jwt" = []))
)]
pub async fn delete_real_estate_file(
    State(app_state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    remove(app_state, EntityKind::RealEstate, id, &name).await
}

// --- Contratos ---

#[utoipa::path(
    get,
    path = "/api/contracts/{id}/files",
    tag = "Files",
    params(("id" = Uuid, Path)),
    responses((status = 200, description = "Arquivos com links temporários", body = Vec<StoredFile>)),
    security(("api_jwt" = []))
)]
pub async fn list_contract_files(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    list(app_state, EntityKind::Contract, id).await
}

#[utoipa::path(
    post,
    path = "/api/contracts/{id}/files",
    tag = "Files",
    params(("id" = Uuid, Path)),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Arquivos após o envio", body = Vec<StoredFile>),
        (status = 400, description = "Arquivo recusado (tipo, tamanho ou limite de 3)")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_contract_files(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    upload(app_state, EntityKind::Contract, id, multipart).await
}

#[utoipa::path(
    delete,
    path = "/api/contracts/{id}/files/{name}",
    tag = "Files",
    params(("id" = Uuid, Path), ("name" = String, Path)),
    responses((status = 200, description = "Arquivos restantes", body = Vec<StoredFile>)),
    security(("api_jwt" = []))
)]
pub async fn delete_contract_file(
    State(app_state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    remove(app_state, EntityKind::Contract, id, &name).await
}

// --- Download via proxy ---

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadQuery {
    /// Link assinado devolvido na listagem
    pub url: String,
    /// Nome sugerido para salvar
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/files/download",
    tag = "Files",
    params(DownloadQuery),
    responses(
        (status = 200, description = "Conteúdo do arquivo como anexo", content_type = "application/pdf"),
        (status = 400, description = "URL fora do storage"),
        (status = 404, description = "Arquivo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_file(
    State(app_state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let bytes = app_state.files.download(&query.url).await?;
    let name = query
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "arquivo.pdf".to_string());
    Ok(attachment(&name, app_state.files.policy().allowed_content_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_keeps_ascii_fallback_and_utf8_name() {
        assert_eq!(
            content_disposition("contrato_CTR-1.pdf"),
            "attachment; filename=\"contrato_CTR-1.pdf\"; filename*=UTF-8''contrato_CTR-1.pdf"
        );
        assert_eq!(
            content_disposition("imóvel 2.pdf"),
            "attachment; filename=\"im_vel 2.pdf\"; filename*=UTF-8''im%C3%B3vel%202.pdf"
        );
    }
}
