// src/services/export_service.rs
// Planilhas (XLSX) das listas, já com os filtros da tela aplicados.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, Workbook};

use crate::{
    common::{error::AppError, format::format_date},
    models::{
        contract::{ContractDetail, ContractFilter},
        location::CityWithState,
        person::{PersonDetail, PersonFilter, PersonScope},
        real_estate::{RealEstateDetail, RealEstateFilter},
    },
    services::{
        contract_service::ContractService, location_service::LocationService,
        person_service::PeopleService, real_estate_service::RealEstateService,
    },
};

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const PERSON_HEADERS: [&str; 15] = [
    "Nome",
    "CPF",
    "RG",
    "Órgão Emissor",
    "Profissão",
    "Telefone",
    "Email",
    "CEP",
    "Rua",
    "Número",
    "Complemento",
    "Bairro",
    "Cidade",
    "UF",
    "Estado Civil",
];

const REAL_ESTATE_HEADERS: [&str; 13] = [
    "Tipo",
    "Matrícula",
    "Status",
    "CEP",
    "Rua",
    "Número",
    "Complemento",
    "Bairro",
    "Cidade",
    "UF",
    "Proprietário",
    "Inquilino Atual",
    "Observações",
];

const CONTRACT_HEADERS: [&str; 11] = [
    "Identificador",
    "Tipo",
    "Status",
    "Data de Início",
    "Data de Término",
    "Duração (meses)",
    "Valor",
    "Dia de Pagamento",
    "Proprietário",
    "Inquilino",
    "Imóvel",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Cell::Text(v.to_string()),
            _ => Cell::Empty,
        }
    }

    fn number(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub file_stem: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

fn city_cells(city: Option<&CityWithState>) -> [Cell; 2] {
    [
        Cell::text(city.map(|c| c.city.name.as_str())),
        Cell::text(city.and_then(|c| c.state.as_ref()).map(|s| s.uf.as_str())),
    ]
}

pub fn people_sheet(scope: PersonScope, people: &[PersonDetail]) -> Sheet {
    let rows = people
        .iter()
        .map(|detail| {
            let p = &detail.person;
            let [city, uf] = city_cells(detail.city.as_ref());
            vec![
                Cell::text(Some(p.full_name.as_str())),
                Cell::text(Some(p.cpf.as_str())),
                Cell::text(p.rg.as_deref()),
                Cell::text(p.issuing_body.as_deref()),
                Cell::text(p.profession.as_deref()),
                Cell::text(p.cellphone.as_deref()),
                Cell::text(p.email.as_deref()),
                Cell::text(p.cep.as_deref()),
                Cell::text(p.street.as_deref()),
                Cell::text(p.number.as_deref()),
                Cell::text(p.complement.as_deref()),
                Cell::text(p.neighborhood.as_deref()),
                city,
                uf,
                Cell::text(detail.marital_status.as_ref().map(|m| m.name.as_str())),
            ]
        })
        .collect();

    let (name, file_stem) = match scope {
        PersonScope::Owners => ("Proprietários", "proprietarios"),
        PersonScope::Lessees => ("Inquilinos", "inquilinos"),
    };
    Sheet {
        name,
        file_stem,
        headers: &PERSON_HEADERS,
        rows,
    }
}

pub fn real_estates_sheet(real_estates: &[RealEstateDetail]) -> Sheet {
    let rows = real_estates
        .iter()
        .map(|detail| {
            let r = &detail.real_estate;
            let [city, uf] = city_cells(detail.city.as_ref());
            vec![
                Cell::text(Some(r.real_estate_kind.as_str())),
                Cell::text(r.municipal_registration.as_deref()),
                Cell::text(Some(r.status_real_estate.as_str())),
                Cell::text(Some(r.cep.as_str())),
                Cell::text(Some(r.street.as_str())),
                Cell::text(Some(r.number.as_str())),
                Cell::text(r.complement.as_deref()),
                Cell::text(Some(r.neighborhood.as_str())),
                city,
                uf,
                Cell::text(detail.owner.as_ref().map(|o| o.full_name.as_str())),
                Cell::text(detail.lessee.as_ref().map(|l| l.full_name.as_str())),
                Cell::text(r.note.as_deref()),
            ]
        })
        .collect();

    Sheet {
        name: "Imóveis",
        file_stem: "imoveis",
        headers: &REAL_ESTATE_HEADERS,
        rows,
    }
}

pub fn contracts_sheet(contracts: &[ContractDetail]) -> Sheet {
    let rows = contracts
        .iter()
        .map(|detail| {
            let c = &detail.contract;
            vec![
                Cell::text(Some(c.identifier.as_str())),
                Cell::text(Some(c.contract_kind.as_str())),
                Cell::text(Some(c.status.as_str())),
                Cell::Text(format_date(Some(c.start_date))),
                c.end_date
                    .map(|d| Cell::Text(format_date(Some(d))))
                    .unwrap_or(Cell::Empty),
                Cell::number(c.duration.map(f64::from)),
                // Valor numérico; a formatação R$ fica por conta do formato da célula
                Cell::number(c.payment_value.to_f64()),
                Cell::number(c.day_payment.map(f64::from)),
                Cell::text(detail.owner.as_ref().map(|o| o.full_name.as_str())),
                Cell::text(detail.lessee.as_ref().map(|l| l.full_name.as_str())),
                detail
                    .real_estate
                    .as_ref()
                    .map(|r| Cell::Text(format!("{}, {}", r.street, r.number)))
                    .unwrap_or(Cell::Empty),
            ]
        })
        .collect();

    Sheet {
        name: "Contratos",
        file_stem: "contratos",
        headers: &CONTRACT_HEADERS,
        rows,
    }
}

fn xlsx_error(e: rust_xlsxwriter::XlsxError) -> AppError {
    AppError::Export(e.to_string())
}

pub fn write_xlsx(sheet: &Sheet) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x742851));
    let money_format = Format::new().set_num_format("\"R$\" #,##0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.name).map_err(xlsx_error)?;

    for (col, header) in sheet.headers.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *header, &header_format)
            .map_err(xlsx_error)?;
        worksheet
            .set_column_width(col, (header.chars().count() + 6) as f64)
            .map_err(xlsx_error)?;
    }

    let money_col = sheet.headers.iter().position(|h| *h == "Valor");
    for (i, row) in sheet.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(r, c, text).map_err(xlsx_error)?;
                }
                Cell::Number(n) if money_col == Some(col) => {
                    worksheet
                        .write_number_with_format(r, c, *n, &money_format)
                        .map_err(xlsx_error)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n).map_err(xlsx_error)?;
                }
                Cell::Empty => {}
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

#[derive(Clone)]
pub struct ExportService {
    people: PeopleService,
    real_estates: RealEstateService,
    contracts: ContractService,
    locations: LocationService,
}

impl ExportService {
    pub fn new(
        people: PeopleService,
        real_estates: RealEstateService,
        contracts: ContractService,
        locations: LocationService,
    ) -> Self {
        Self {
            people,
            real_estates,
            contracts,
            locations,
        }
    }

    /// Resolve cidade e estado civil uma vez por id, não por pessoa
    pub async fn people(&self, scope: PersonScope, filter: &PersonFilter) -> Result<Sheet, AppError> {
        let people = self.people.scoped(scope).list(filter).await?;
        let statuses: HashMap<i32, _> = self
            .locations
            .list_marital_statuses()
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let mut cities: HashMap<i32, Option<CityWithState>> = HashMap::new();
        let mut details = Vec::with_capacity(people.len());
        for person in people {
            let city = match person.city_id {
                Some(id) => {
                    if !cities.contains_key(&id) {
                        let found = self.locations.find_city(Some(id)).await?;
                        cities.insert(id, found);
                    }
                    cities.get(&id).cloned().flatten()
                }
                None => None,
            };
            let marital_status = person
                .marital_status_id
                .and_then(|id| statuses.get(&id).cloned());
            details.push(PersonDetail {
                person,
                city,
                marital_status,
            });
        }

        Ok(people_sheet(scope, &details))
    }

    pub async fn real_estates(&self, filter: &RealEstateFilter) -> Result<Sheet, AppError> {
        Ok(real_estates_sheet(&self.real_estates.list(filter).await?))
    }

    pub async fn contracts(&self, filter: &ContractFilter) -> Result<Sheet, AppError> {
        Ok(contracts_sheet(&self.contracts.list(filter).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::contract::ContractKind,
        services::{
            contract_service::tests::{new_contract, scenario},
            document_layout::tests::contract_detail,
            location_service::tests::seeded,
            person_service::tests::new_person,
        },
    };

    #[test]
    fn contract_rows_follow_headers() {
        let sheet = contracts_sheet(&[contract_detail(ContractKind::Locacao, false)]);
        assert_eq!(sheet.rows[0].len(), sheet.headers.len());
        assert_eq!(sheet.rows[0][0], Cell::Text("CTR-20250101-1234".into()));
        assert_eq!(sheet.rows[0][3], Cell::Text("01/01/2025".into()));
        // Sem data de término, duração nem inquilino
        assert_eq!(sheet.rows[0][4], Cell::Empty);
        assert_eq!(sheet.rows[0][5], Cell::Empty);
        assert_eq!(sheet.rows[0][6], Cell::Number(3500.0));
        assert_eq!(sheet.rows[0][9], Cell::Empty);
        assert_eq!(sheet.rows[0][10], Cell::Text("Avenida Paulista, 1578".into()));
    }

    #[test]
    fn workbook_is_a_zip_package() {
        let sheet = contracts_sheet(&[contract_detail(ContractKind::VendaSemExclusividade, true)]);
        let bytes = write_xlsx(&sheet).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn people_export_resolves_city_and_marital_status() {
        let s = scenario().await;
        let exports = ExportService::new(
            s.people.clone(),
            s.real_estates.clone(),
            s.contracts.clone(),
            seeded().await,
        );

        let mut payload = new_person("Clara Nunes", "55566677788");
        payload.city_id = Some(101);
        payload.marital_status_id = Some(2);
        s.people.owners.create(payload).await.unwrap();

        let filter = PersonFilter {
            name: Some("clara".into()),
            ..Default::default()
        };
        let sheet = exports.people(PersonScope::Owners, &filter).await.unwrap();
        assert_eq!(sheet.name, "Proprietários");
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0][12], Cell::Text("Campinas".into()));
        assert_eq!(sheet.rows[0][13], Cell::Text("SP".into()));
        assert_eq!(sheet.rows[0][14], Cell::Text("Casado(a)".into()));
    }

    #[tokio::test]
    async fn contract_export_applies_filter() {
        let s = scenario().await;
        s.contracts
            .create(new_contract(s.owner.id, s.real_estate.id))
            .await
            .unwrap();
        let exports = ExportService::new(
            s.people.clone(),
            s.real_estates.clone(),
            s.contracts.clone(),
            seeded().await,
        );

        let all = exports.contracts(&ContractFilter::default()).await.unwrap();
        assert_eq!(all.rows.len(), 1);

        let none = exports
            .contracts(&ContractFilter {
                owner_name: Some("ninguém".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.rows.is_empty());
    }
}
