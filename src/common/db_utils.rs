// src/common/db_utils.rs

use sqlx::error::ErrorKind;

use crate::common::error::AppError;

/// Converte o erro do sqlx em um erro tipado, usando o tipo do erro do banco
/// e o nome da constraint (nunca o texto da mensagem).
pub(crate) fn map_db_error(table: &str, e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        let constraint = db_err.constraint().unwrap_or_default();
        match db_err.kind() {
            ErrorKind::UniqueViolation => {
                return AppError::ConstraintViolation {
                    field: constraint_field(table, constraint, "_key"),
                };
            }
            ErrorKind::ForeignKeyViolation => {
                return AppError::ForeignKeyViolation {
                    field: constraint_field(table, constraint, "_fkey"),
                };
            }
            _ => {}
        }
    }
    AppError::DatabaseError(e)
}

/// "persons_cpf_key" -> "cpf", "contracts_owner_id_fkey" -> "owner_id".
/// Constraints que não seguem a convenção do Postgres voltam inteiras.
pub(crate) fn constraint_field(table: &str, constraint: &str, suffix: &str) -> String {
    let prefix = format!("{}_", table);
    constraint
        .strip_prefix(prefix.as_str())
        .and_then(|rest| rest.strip_suffix(suffix))
        .filter(|field| !field.is_empty())
        .unwrap_or(constraint)
        .to_string()
}

/// Identificadores montados dinamicamente vêm das nossas structs, mas ainda
/// assim só aceitamos [a-z0-9_].
pub(crate) fn quote_ident(ident: &str) -> Result<String, AppError> {
    let valid = !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if !valid {
        return Err(AppError::invalid_field(ident, "Nome de coluna inválido."));
    }
    Ok(format!("\"{}\"", ident))
}
