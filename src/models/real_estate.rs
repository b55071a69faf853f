// src/models/real_estate.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        format::{contains_ci, equals_if_set},
        validation::{blank_to_none, normalize_cep, normalize_optional_cep, required},
    },
    db::record::{Ordering, Record, WritePayload},
    models::{location::CityWithState, person::Person},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "real_estate_kind_enum")]
pub enum RealEstateKind {
    Casa,
    Apartamento,
    #[sqlx(rename = "Salas comerciais")]
    #[serde(rename = "Salas comerciais")]
    SalasComerciais,
    Loja,
    #[sqlx(rename = "Galpão")]
    #[serde(rename = "Galpão")]
    Galpao,
}

impl RealEstateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RealEstateKind::Casa => "Casa",
            RealEstateKind::Apartamento => "Apartamento",
            RealEstateKind::SalasComerciais => "Salas comerciais",
            RealEstateKind::Loja => "Loja",
            RealEstateKind::Galpao => "Galpão",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_real_estate_enum")]
pub enum StatusRealEstate {
    #[default]
    #[sqlx(rename = "Disponível")]
    #[serde(rename = "Disponível")]
    Disponivel,
    Alugado,
    Vendido,
    Cancelado,
}

impl StatusRealEstate {
    pub const ALL: [StatusRealEstate; 4] = [
        StatusRealEstate::Disponivel,
        StatusRealEstate::Alugado,
        StatusRealEstate::Vendido,
        StatusRealEstate::Cancelado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusRealEstate::Disponivel => "Disponível",
            StatusRealEstate::Alugado => "Alugado",
            StatusRealEstate::Vendido => "Vendido",
            StatusRealEstate::Cancelado => "Cancelado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RealEstate {
    pub id: Uuid,
    pub municipal_registration: Option<String>,
    pub state_id: i32,
    pub city_id: i32,
    pub neighborhood: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub cep: String,
    pub note: Option<String>,
    pub real_estate_kind: RealEstateKind,
    pub has_inspection: bool,
    pub status_real_estate: StatusRealEstate,
    pub has_proof_document: bool,
    pub owner_id: Uuid,
    pub lessee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for RealEstate {
    type Id = Uuid;
    const TABLE: &'static str = "real_estates";
    const LABEL: &'static str = "Imóvel";
    const ORDER: Ordering = Ordering::Desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}

impl RealEstate {
    /// "Rua X, 10 - Bairro"
    pub fn address_line(&self) -> String {
        let mut line = format!("{}, {}", self.street, self.number);
        if let Some(complement) = self.complement.as_deref().filter(|c| !c.trim().is_empty()) {
            line.push_str(&format!(" ({})", complement));
        }
        line.push_str(&format!(" - {}", self.neighborhood));
        line
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewRealEstate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipal_registration: Option<String>,
    pub state_id: i32,
    pub city_id: i32,
    pub neighborhood: String,
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub cep: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub real_estate_kind: RealEstateKind,
    #[serde(default)]
    pub has_inspection: bool,
    #[serde(default)]
    pub status_real_estate: StatusRealEstate,
    #[serde(default)]
    pub has_proof_document: bool,
    pub owner_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessee_id: Option<Uuid>,
}

impl WritePayload for NewRealEstate {
    fn prepare(&mut self) -> Result<(), AppError> {
        self.neighborhood = required("neighborhood", &self.neighborhood)?;
        self.street = required("street", &self.street)?;
        self.number = required("number", &self.number)?;
        self.cep = normalize_cep("cep", &self.cep)?;
        self.municipal_registration = blank_to_none(self.municipal_registration.take());
        self.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RealEstatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipal_registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_estate_kind: Option<RealEstateKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_inspection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_real_estate: Option<StatusRealEstate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_proof_document: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessee_id: Option<Uuid>,
}

impl WritePayload for RealEstatePatch {
    fn prepare(&mut self) -> Result<(), AppError> {
        self.neighborhood = blank_to_none(self.neighborhood.take());
        self.street = blank_to_none(self.street.take());
        self.number = blank_to_none(self.number.take());
        self.cep = normalize_optional_cep("cep", self.cep.take())?;
        self.validate()?;
        Ok(())
    }
}

/// Imóvel com cidade/estado, proprietário e inquilino atual
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RealEstateDetail {
    #[serde(flatten)]
    pub real_estate: RealEstate,
    pub city: Option<CityWithState>,
    pub owner: Option<Person>,
    pub lessee: Option<Person>,
}

/// Uma linha por imóvel: a base com os relacionamentos em `doc`
pub const REAL_ESTATE_DETAIL_SELECT: &str = r#"
    SELECT to_jsonb(base) || jsonb_build_object(
        'city', CASE WHEN c.id IS NULL THEN NULL
                     ELSE to_jsonb(c) || jsonb_build_object('state', to_jsonb(s)) END,
        'owner', CASE WHEN o.id IS NULL THEN NULL ELSE to_jsonb(o) END,
        'lessee', CASE WHEN l.id IS NULL THEN NULL ELSE to_jsonb(l) END
    ) AS doc
    FROM real_estates AS base
    LEFT JOIN cities AS c ON c.id = base.city_id
    LEFT JOIN states AS s ON s.id = c.state_id
    LEFT JOIN persons AS o ON o.id = base.owner_id
    LEFT JOIN persons AS l ON l.id = base.lessee_id
"#;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RealEstateFilter {
    /// Rua, número ou bairro
    pub address: Option<String>,
    pub municipal_registration: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
}

impl RealEstateFilter {
    pub fn matches(&self, real_estate: &RealEstate) -> bool {
        let address = format!(
            "{} {} {}",
            real_estate.street, real_estate.number, real_estate.neighborhood
        );
        contains_ci(Some(&address), self.address.as_deref())
            && contains_ci(
                real_estate.municipal_registration.as_deref(),
                self.municipal_registration.as_deref(),
            )
            && equals_if_set(real_estate.real_estate_kind.as_str(), self.kind.as_deref())
            && equals_if_set(real_estate.status_real_estate.as_str(), self.status.as_deref())
    }
}
