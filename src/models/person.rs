// src/models/person.rs
// Proprietários e inquilinos dividem a tabela `persons`, separados pelo `role`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        format::contains_ci,
        validation::{blank_to_none, normalize_cpf, normalize_optional_cep, normalize_optional_cpf, required},
    },
    db::record::{Ordering, Record, WritePayload},
    models::location::{CityWithState, MaritalStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "person_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PersonRole {
    Owner,
    Lessee,
}

impl PersonRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Owner => "OWNER",
            PersonRole::Lessee => "LESSEE",
        }
    }

    /// Rótulo usado em mensagens e documentos
    pub fn label(&self) -> &'static str {
        match self {
            PersonRole::Owner => "Proprietário",
            PersonRole::Lessee => "Inquilino",
        }
    }
}

/// Segmento de rota `/api/people/{scope}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PersonScope {
    Owners,
    Lessees,
}

impl PersonScope {
    pub fn role(&self) -> PersonRole {
        match self {
            PersonScope::Owners => PersonRole::Owner,
            PersonScope::Lessees => PersonRole::Lessee,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Person {
    pub id: Uuid,
    pub role: PersonRole,
    pub full_name: String,
    pub marital_status_id: Option<i32>,
    pub profession: Option<String>,
    pub rg: Option<String>,
    pub issuing_body: Option<String>,
    pub uf_rg: Option<String>,
    #[schema(example = "12345678901")]
    pub cpf: String,
    pub cellphone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub cep: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city_id: Option<i32>,
    pub bank: Option<String>,
    pub branch: Option<String>,
    pub account: Option<String>,
    pub account_type: Option<String>,
    pub opted_for_power_of_attorney: Option<bool>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Person {
    type Id = Uuid;
    const TABLE: &'static str = "persons";
    const LABEL: &'static str = "Pessoa";
    const ORDER: Ordering = Ordering::Asc("full_name");

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Dados do formulário de cadastro. O `role` vem da rota, nunca do corpo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewPerson {
    pub full_name: String,
    pub cpf: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uf_rg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cellphone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opted_for_power_of_attorney: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WritePayload for NewPerson {
    fn prepare(&mut self) -> Result<(), AppError> {
        self.full_name = required("full_name", &self.full_name)?;
        self.cpf = normalize_cpf("cpf", &self.cpf)?;
        self.cep = normalize_optional_cep("cep", self.cep.take())?;
        self.email = blank_to_none(self.email.take());
        self.validate()?;
        Ok(())
    }
}

/// Edição parcial: campos ausentes (ou em branco) mantêm o valor atual.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PersonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uf_rg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cellphone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opted_for_power_of_attorney: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WritePayload for PersonPatch {
    fn prepare(&mut self) -> Result<(), AppError> {
        self.full_name = blank_to_none(self.full_name.take());
        self.cpf = normalize_optional_cpf("cpf", self.cpf.take())?;
        self.cep = normalize_optional_cep("cep", self.cep.take())?;
        self.email = blank_to_none(self.email.take());
        self.validate()?;
        Ok(())
    }
}

/// Pessoa com cidade (e estado) e estado civil resolvidos
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonDetail {
    #[serde(flatten)]
    pub person: Person,
    pub city: Option<CityWithState>,
    pub marital_status: Option<MaritalStatus>,
}

/// Filtros da listagem de proprietários/inquilinos
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PersonFilter {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub rg: Option<String>,
    pub email: Option<String>,
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        contains_ci(Some(&person.full_name), self.name.as_deref())
            && contains_ci(Some(&person.cpf), self.cpf.as_deref())
            && contains_ci(person.rg.as_deref(), self.rg.as_deref())
            && contains_ci(person.email.as_deref(), self.email.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Cônjuge / parceiro(a)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PersonPartner {
    pub id: Uuid,
    pub person_id: Uuid,
    pub full_name: String,
    pub rg: Option<String>,
    pub issuing_body: Option<String>,
    pub cpf: Option<String>,
    pub cellphone: Option<String>,
    pub email: Option<String>,
    pub cep_partner: Option<String>,
    pub street_partner: Option<String>,
    pub number_partner: Option<String>,
    pub complement_partner: Option<String>,
    pub neighborhood_partner: Option<String>,
    pub city_id_partner: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for PersonPartner {
    type Id = Uuid;
    const TABLE: &'static str = "person_partners";
    const LABEL: &'static str = "Cônjuge";
    const ORDER: Ordering = Ordering::Asc("full_name");

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Serve para criar e para editar: na edição, só os campos enviados mudam.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PartnerPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cellphone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep_partner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_partner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_partner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement_partner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood_partner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id_partner: Option<i32>,
}

impl WritePayload for PartnerPayload {
    fn prepare(&mut self) -> Result<(), AppError> {
        self.full_name = blank_to_none(self.full_name.take());
        self.cpf = normalize_optional_cpf("cpf", self.cpf.take())?;
        self.cep_partner = normalize_optional_cep("cep_partner", self.cep_partner.take())?;
        self.email = blank_to_none(self.email.take());
        self.validate()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Referências pessoais
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PersonReference {
    pub id: Uuid,
    pub person_id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub full_address: Option<String>,
    pub cep: Option<String>,
    pub kinship: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for PersonReference {
    type Id = Uuid;
    const TABLE: &'static str = "person_references";
    const LABEL: &'static str = "Referência";
    const ORDER: Ordering = Ordering::Asc("full_name");

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReferencePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Irmão")]
    pub kinship: Option<String>,
}

impl WritePayload for ReferencePayload {
    fn prepare(&mut self) -> Result<(), AppError> {
        self.full_name = blank_to_none(self.full_name.take());
        self.phone = blank_to_none(self.phone.take());
        self.kinship = blank_to_none(self.kinship.take());
        self.cep = normalize_optional_cep("cep", self.cep.take())?;
        self.email = blank_to_none(self.email.take());
        self.validate()?;
        Ok(())
    }
}

impl ReferencePayload {
    /// No cadastro, nome, telefone e parentesco são obrigatórios
    pub fn ensure_complete(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("full_name", &self.full_name),
            ("phone", &self.phone),
            ("kinship", &self.kinship),
        ] {
            if value.is_none() {
                return Err(AppError::invalid_field(field, "Campo obrigatório."));
            }
        }
        Ok(())
    }
}

impl PartnerPayload {
    pub fn ensure_complete(&self) -> Result<(), AppError> {
        if self.full_name.is_none() {
            return Err(AppError::invalid_field("full_name", "Campo obrigatório."));
        }
        Ok(())
    }
}
