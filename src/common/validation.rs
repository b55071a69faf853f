// src/common/validation.rs
// Regras de formulário aplicadas antes de qualquer chamada remota.

use crate::common::{error::AppError, format::digits_only};

pub const CPF_LEN: usize = 11;
pub const CEP_LEN: usize = 8;

/// Texto obrigatório, devolvido sem espaços nas pontas
pub fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_field(field, "Campo obrigatório."));
    }
    Ok(trimmed.to_string())
}

/// Texto em branco conta como ausente
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn normalize_cpf(field: &str, raw: &str) -> Result<String, AppError> {
    let digits = digits_only(raw);
    if digits.len() != CPF_LEN {
        return Err(AppError::invalid_field(field, "CPF inválido. Deve conter 11 dígitos."));
    }
    Ok(digits)
}

pub fn normalize_optional_cpf(field: &str, raw: Option<String>) -> Result<Option<String>, AppError> {
    blank_to_none(raw)
        .map(|v| normalize_cpf(field, &v))
        .transpose()
}

pub fn normalize_cep(field: &str, raw: &str) -> Result<String, AppError> {
    let digits = digits_only(raw);
    if digits.len() != CEP_LEN {
        return Err(AppError::invalid_field(field, "CEP inválido. Deve conter 8 dígitos."));
    }
    Ok(digits)
}

pub fn normalize_optional_cep(field: &str, raw: Option<String>) -> Result<Option<String>, AppError> {
    blank_to_none(raw)
        .map(|v| normalize_cep(field, &v))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: AppError) -> String {
        match err {
            AppError::InvalidField { field, .. } => field,
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn cpf_must_have_eleven_digits_after_stripping() {
        assert_eq!(normalize_cpf("cpf", "123.456.789-01").unwrap(), "12345678901");
        for bad in ["", "1234567890", "123456789012", "abc.def.ghi-jk"] {
            assert_eq!(field_of(normalize_cpf("cpf", bad).unwrap_err()), "cpf");
        }
    }

    #[test]
    fn cep_must_have_eight_digits_after_stripping() {
        assert_eq!(normalize_cep("cep", "01310-100").unwrap(), "01310100");
        assert!(normalize_cep("cep", "0131010").is_err());
        assert!(normalize_cep("cep", "013101000").is_err());
    }

    #[test]
    fn optional_values_accept_blank() {
        assert_eq!(normalize_optional_cep("cep", Some("  ".into())).unwrap(), None);
        assert_eq!(normalize_optional_cpf("cpf", None).unwrap(), None);
        assert!(normalize_optional_cep("cep", Some("123".into())).is_err());
    }

    #[test]
    fn required_trims() {
        assert_eq!(required("full_name", "  Ana  ").unwrap(), "Ana");
        assert_eq!(field_of(required("full_name", "   ").unwrap_err()), "full_name");
    }
}
