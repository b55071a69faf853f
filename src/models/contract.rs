// src/models/contract.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        format::{contains_ci, equals_if_set},
        validation::blank_to_none,
    },
    db::record::{Ordering, Record, WritePayload},
    models::{person::Person, real_estate::RealEstate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contract_kind_enum")]
pub enum ContractKind {
    #[sqlx(rename = "Venda com exclusividade")]
    #[serde(rename = "Venda com exclusividade")]
    VendaComExclusividade,
    #[sqlx(rename = "Venda sem exclusividade")]
    #[serde(rename = "Venda sem exclusividade")]
    VendaSemExclusividade,
    #[sqlx(rename = "Locação com administração")]
    #[serde(rename = "Locação com administração")]
    LocacaoComAdministracao,
    #[sqlx(rename = "Locação")]
    #[serde(rename = "Locação")]
    Locacao,
}

impl ContractKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::VendaComExclusividade => "Venda com exclusividade",
            ContractKind::VendaSemExclusividade => "Venda sem exclusividade",
            ContractKind::LocacaoComAdministracao => "Locação com administração",
            ContractKind::Locacao => "Locação",
        }
    }

    pub fn is_lease(&self) -> bool {
        matches!(self, ContractKind::Locacao | ContractKind::LocacaoComAdministracao)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contract_status_enum")]
pub enum ContractStatus {
    #[default]
    Ativo,
    #[sqlx(rename = "Concluído")]
    #[serde(rename = "Concluído")]
    Concluido,
    Cancelado,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 3] = [
        ContractStatus::Ativo,
        ContractStatus::Concluido,
        ContractStatus::Cancelado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Ativo => "Ativo",
            ContractStatus::Concluido => "Concluído",
            ContractStatus::Cancelado => "Cancelado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Contract {
    pub id: Uuid,
    #[schema(example = "CTR-20250510-4821")]
    pub identifier: String,
    pub contract_kind: ContractKind,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub day_payment: Option<i32>,
    #[schema(value_type = f64)]
    pub payment_value: Decimal,
    /// Duração em meses
    pub duration: Option<i32>,
    pub status: ContractStatus,
    pub owner_id: Uuid,
    pub lessee_id: Option<Uuid>,
    pub real_estate_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Contract {
    type Id = Uuid;
    const TABLE: &'static str = "contracts";
    const LABEL: &'static str = "Contrato";
    const ORDER: Ordering = Ordering::Desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}

/// `CTR-AAAAMMDD-NNNN`, com NNNN entre 1000 e 9999.
/// Não garante unicidade: duas gerações no mesmo dia podem colidir.
pub fn generate_identifier(today: NaiveDate, entropy: u128) -> String {
    let suffix = 1000 + (entropy % 9000) as u32;
    format!("CTR-{}-{}", today.format("%Y%m%d"), suffix)
}

pub fn new_identifier() -> String {
    generate_identifier(Utc::now().date_naive(), Uuid::new_v4().as_u128())
}

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(AppError::invalid_field(
                "end_date",
                "A data de término deve ser posterior à data de início.",
            ));
        }
    }
    Ok(())
}

fn check_payment_value(value: Decimal) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::invalid_field(
            "payment_value",
            "O valor do pagamento deve ser maior que zero.",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewContract {
    /// Em branco gera um identificador automaticamente
    #[serde(default)]
    pub identifier: String,
    pub contract_kind: ContractKind,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 31, message = "O dia de pagamento deve estar entre 1 e 31."))]
    pub day_payment: i32,
    #[schema(value_type = f64)]
    pub payment_value: Decimal,
    #[validate(range(min = 1, message = "A duração deve ser de pelo menos 1 mês."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(default)]
    pub status: ContractStatus,
    pub owner_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessee_id: Option<Uuid>,
    pub real_estate_id: Uuid,
}

impl WritePayload for NewContract {
    fn prepare(&mut self) -> Result<(), AppError> {
        self.identifier = match blank_to_none(Some(std::mem::take(&mut self.identifier))) {
            Some(identifier) => identifier,
            None => new_identifier(),
        };
        check_payment_value(self.payment_value)?;
        check_dates(Some(self.start_date), self.end_date)?;
        self.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ContractPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_kind: Option<ContractKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 31, message = "O dia de pagamento deve estar entre 1 e 31."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_payment: Option<i32>,
    #[schema(value_type = Option<f64>)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_value: Option<Decimal>,
    #[validate(range(min = 1, message = "A duração deve ser de pelo menos 1 mês."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContractStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessee_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_estate_id: Option<Uuid>,
}

impl WritePayload for ContractPatch {
    fn prepare(&mut self) -> Result<(), AppError> {
        self.identifier = blank_to_none(self.identifier.take());
        if let Some(value) = self.payment_value {
            check_payment_value(value)?;
        }
        check_dates(self.start_date, self.end_date)?;
        self.validate()?;
        Ok(())
    }
}

impl ContractPatch {
    /// Datas do patch combinadas com as atuais precisam continuar em ordem
    pub fn check_against(&self, current: &Contract) -> Result<(), AppError> {
        check_dates(
            Some(self.start_date.unwrap_or(current.start_date)),
            self.end_date.or(current.end_date),
        )
    }
}

/// Contrato com proprietário, inquilino (opcional) e imóvel
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContractDetail {
    #[serde(flatten)]
    pub contract: Contract,
    pub owner: Option<Person>,
    pub lessee: Option<Person>,
    pub real_estate: Option<RealEstate>,
}

pub const CONTRACT_DETAIL_SELECT: &str = r#"
    SELECT to_jsonb(base) || jsonb_build_object(
        'owner', CASE WHEN o.id IS NULL THEN NULL ELSE to_jsonb(o) END,
        'lessee', CASE WHEN l.id IS NULL THEN NULL ELSE to_jsonb(l) END,
        'real_estate', CASE WHEN r.id IS NULL THEN NULL ELSE to_jsonb(r) END
    ) AS doc
    FROM contracts AS base
    LEFT JOIN persons AS o ON o.id = base.owner_id
    LEFT JOIN persons AS l ON l.id = base.lessee_id
    LEFT JOIN real_estates AS r ON r.id = base.real_estate_id
"#;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContractFilter {
    pub identifier: Option<String>,
    pub owner_name: Option<String>,
    pub lessee_name: Option<String>,
    /// Rua, número ou bairro do imóvel
    pub address: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    /// Contratos que começam nesta data ou depois
    pub start_date_from: Option<NaiveDate>,
    /// Contratos que terminam até esta data (sem término sempre passam)
    pub end_date_until: Option<NaiveDate>,
}

impl ContractFilter {
    pub fn matches(&self, detail: &ContractDetail) -> bool {
        let contract = &detail.contract;
        let address = detail
            .real_estate
            .as_ref()
            .map(|r| format!("{} {} {}", r.street, r.number, r.neighborhood));

        contains_ci(Some(&contract.identifier), self.identifier.as_deref())
            && contains_ci(
                detail.owner.as_ref().map(|p| p.full_name.as_str()),
                self.owner_name.as_deref(),
            )
            && contains_ci(
                detail.lessee.as_ref().map(|p| p.full_name.as_str()),
                self.lessee_name.as_deref(),
            )
            && contains_ci(address.as_deref(), self.address.as_deref())
            && equals_if_set(contract.contract_kind.as_str(), self.kind.as_deref())
            && equals_if_set(contract.status.as_str(), self.status.as_deref())
            && self.start_date_from.is_none_or(|from| contract.start_date >= from)
            && match (self.end_date_until, contract.end_date) {
                (Some(until), Some(end)) => end <= until,
                _ => true,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_has_date_and_four_digit_suffix() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        assert_eq!(generate_identifier(day, 0), "CTR-20250510-1000");
        assert_eq!(generate_identifier(day, 8999), "CTR-20250510-9999");
        assert_eq!(generate_identifier(day, 9000), "CTR-20250510-1000");

        for _ in 0..200 {
            let id = new_identifier();
            let suffix: u32 = id.rsplit('-').next().unwrap().parse().unwrap();
            assert!((1000..=9999).contains(&suffix), "{id}");
        }
    }

    fn payload() -> NewContract {
        NewContract {
            identifier: "  ".into(),
            contract_kind: ContractKind::Locacao,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            day_payment: 5,
            payment_value: Decimal::new(150000, 2),
            duration: Some(12),
            status: ContractStatus::Ativo,
            owner_id: Uuid::new_v4(),
            lessee_id: None,
            real_estate_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn blank_identifier_is_generated() {
        let mut contract = payload();
        contract.prepare().unwrap();
        assert!(contract.identifier.starts_with("CTR-"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut bad_day = payload();
        bad_day.day_payment = 32;
        assert!(matches!(bad_day.prepare(), Err(AppError::ValidationError(_))));

        let mut zero = payload();
        zero.payment_value = Decimal::ZERO;
        assert!(matches!(zero.prepare(), Err(AppError::InvalidField { field, .. }) if field == "payment_value"));

        let mut inverted = payload();
        inverted.end_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        assert!(matches!(inverted.prepare(), Err(AppError::InvalidField { field, .. }) if field == "end_date"));

        let mut no_duration = payload();
        no_duration.duration = Some(0);
        assert!(no_duration.prepare().is_err());
    }

    #[test]
    fn kind_and_status_use_portuguese_labels() {
        assert_eq!(serde_json::to_value(ContractKind::LocacaoComAdministracao).unwrap(), "Locação com administração");
        assert_eq!(serde_json::to_value(ContractStatus::Concluido).unwrap(), "Concluído");
        assert!(ContractKind::Locacao.is_lease());
        assert!(!ContractKind::VendaSemExclusividade.is_lease());
    }

    #[test]
    fn detail_reads_a_postgres_document() {
        let doc = serde_json::json!({
            "id": "6f1c2a52-3c1e-4b59-9d7a-0b8d2f4e1a10",
            "identifier": "CTR-20250510-4821",
            "contract_kind": "Locação com administração",
            "start_date": "2025-05-10",
            "end_date": null,
            "day_payment": 5,
            "payment_value": 1850.50,
            "duration": 30,
            "status": "Concluído",
            "owner_id": "0c8b3f0e-8f45-4a8e-9a37-5d6f1c9b2e01",
            "lessee_id": null,
            "real_estate_id": "9a4e7c21-1d2b-4f3a-8c5e-7b6a5d4c3b20",
            "created_at": "2025-05-10T09:15:42.123456-03:00",
            "updated_at": "2025-05-10T12:15:42.123456+00:00",
            "owner": {
                "id": "0c8b3f0e-8f45-4a8e-9a37-5d6f1c9b2e01",
                "role": "OWNER",
                "full_name": "Otávio Prado",
                "cpf": "12312312312",
                "city_id": null,
                "created_at": "2025-05-01T08:00:00-03:00",
                "updated_at": "2025-05-01T08:00:00-03:00"
            },
            "lessee": null,
            "real_estate": null
        });

        let detail: ContractDetail = serde_json::from_value(doc).unwrap();
        assert_eq!(detail.contract.contract_kind, ContractKind::LocacaoComAdministracao);
        assert_eq!(detail.contract.status, ContractStatus::Concluido);
        assert_eq!(detail.contract.payment_value, Decimal::new(185050, 2));
        assert_eq!(detail.contract.created_at, detail.contract.updated_at);
        assert!(detail.contract.end_date.is_none());
        assert_eq!(detail.owner.unwrap().full_name, "Otávio Prado");
        assert!(detail.lessee.is_none() && detail.real_estate.is_none());
    }
}
