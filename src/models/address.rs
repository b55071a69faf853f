// src/models/address.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::location::City;

/// Resposta do ViaCEP (`/ws/{cep}/json/`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CepResponse {
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub localidade: Option<String>,
    pub uf: Option<String>,
    // Vem como `true` ou `"true"` quando o CEP não existe
    pub erro: Option<Value>,
}

impl CepResponse {
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// Campos para preencher o formulário a partir do CEP
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddressFill {
    #[schema(example = "01310100")]
    pub cep: String,
    pub street: String,
    pub neighborhood: String,
    pub city_name: String,
    pub uf: String,
    pub state_id: Option<i32>,
    pub city_id: Option<i32>,
    /// Cidades do estado encontrado, para o seletor
    pub cities: Vec<City>,
    pub warning: Option<String>,
}

pub const STATE_NOT_FOUND_WARNING: &str = "Estado não encontrado no sistema. Preencha manualmente.";
