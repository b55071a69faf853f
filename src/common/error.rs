// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Erro de um campo só (CEP, CPF...), detectado antes de qualquer chamada remota
    #[error("Campo inválido '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("CEP não encontrado.")]
    CepNotFound,

    // Violação de UNIQUE no banco, já traduzida para o nome do campo
    #[error("Valor duplicado para o campo '{field}'")]
    ConstraintViolation { field: String },

    // Violação de FOREIGN KEY: registro referenciado não existe ou ainda está em uso
    #[error("Referência inválida ou em uso no campo '{field}'")]
    ForeignKeyViolation { field: String },

    // O backend não suporta a consulta com relacionamentos
    #[error("Consulta com relacionamentos indisponível")]
    JoinUnavailable,

    #[error("Arquivo recusado: {0}")]
    FileRejected(String),

    #[error("Erro no armazenamento de arquivos: {0}")]
    Storage(String),

    #[error("Erro ao acessar serviço externo: {0}")]
    Upstream(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Falha ao gerar documento: {0}")]
    Export(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidField { field, message } => {
                let body = Json(json!({ "error": message, "field": field }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ConstraintViolation { field } => {
                let message = if field == "cpf" {
                    "CPF já cadastrado para outra pessoa.".to_string()
                } else {
                    format!("Já existe um registro com este valor em '{}'.", field)
                };
                let body = Json(json!({ "error": message, "field": field }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::ForeignKeyViolation { field } => {
                let body = Json(json!({
                    "error": "O registro referenciado não existe ou ainda possui vínculos.",
                    "field": field,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::NotFound(entity) => {
                let body = Json(json!({ "error": format!("{} não encontrado(a).", entity) }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::CepNotFound => (StatusCode::NOT_FOUND, "CEP não encontrado."),
            AppError::FileRejected(reason) => {
                let body = Json(json!({ "error": reason }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),

            // Falhas de rede: o remédio é sempre "tente novamente"
            ref e @ (AppError::Upstream(_) | AppError::Storage(_)) => {
                tracing::error!("Falha em serviço externo: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Serviço externo indisponível. Verifique sua conexão e tente novamente.",
                )
            }

            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
