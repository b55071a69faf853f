// src/services/document_layout.rs
// Conteúdo das fichas e do contrato, independente do formato (PDF ou DOCX).

use chrono::NaiveDate;

use crate::{
    common::format::{format_currency, format_date, or_dash},
    models::{
        contract::{ContractDetail, ContractKind},
        location::CityWithState,
        person::{Person, PersonDetail},
        real_estate::{RealEstate, RealEstateDetail},
    },
};

pub const THEME_COLOR: (u8, u8, u8) = (0x74, 0x28, 0x51);
pub const FOOTER: &str = "SOGRINHA GESTÃO DE CONTRATOS";

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// "Rótulo: valor"
    Field(String, String),
    Text(String),
    /// Texto centralizado (assinaturas, local e data)
    Centered(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<Line>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    fn field(mut self, label: &str, value: impl Into<String>) -> Self {
        self.lines.push(Line::Field(label.to_string(), value.into()));
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.lines.push(Line::Text(text.into()));
        self
    }

    fn centered(mut self, text: impl Into<String>) -> Self {
        self.lines.push(Line::Centered(text.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub title: String,
    pub subtitle: Option<String>,
    pub generated_on: NaiveDate,
    pub sections: Vec<Section>,
    pub footer: String,
}

impl DocumentLayout {
    fn new(title: impl Into<String>, generated_on: NaiveDate) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            generated_on,
            sections: Vec::new(),
            footer: FOOTER.to_string(),
        }
    }

    pub fn has_section(&self, title: &str) -> bool {
        self.sections.iter().any(|s| s.title == title)
    }
}

fn city_line(city: Option<&CityWithState>) -> String {
    match city {
        Some(c) => match &c.state {
            Some(state) => format!("{} / {}", c.city.name, state.uf),
            None => c.city.name.clone(),
        },
        None => "-".to_string(),
    }
}

/// "Rua, 10, Apto 2, Bairro" sem vírgulas sobrando
fn joined_address(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn person_address(person: &Person) -> String {
    joined_address(&[
        person.street.as_deref(),
        person.number.as_deref(),
        person.complement.as_deref(),
        person.neighborhood.as_deref(),
    ])
}

fn real_estate_address(real_estate: &RealEstate) -> String {
    joined_address(&[
        Some(real_estate.street.as_str()),
        Some(real_estate.number.as_str()),
        real_estate.complement.as_deref(),
        Some(real_estate.neighborhood.as_str()),
    ])
}

fn contact_section(title: &str, person: &Person, with_email: bool) -> Section {
    let section = Section::new(title)
        .field("Nome", person.full_name.clone())
        .field("Telefone", or_dash(person.cellphone.as_deref()));
    if with_email {
        section.field("Email", or_dash(person.email.as_deref()))
    } else {
        section
    }
}

/// Ficha de proprietário ou inquilino
pub fn person_sheet(detail: &PersonDetail, today: NaiveDate) -> DocumentLayout {
    let person = &detail.person;
    let mut layout = DocumentLayout::new(
        format!("FICHA DE {}", person.role.label().to_uppercase()),
        today,
    );

    layout.sections.push(
        Section::new("Dados Pessoais")
            .field("Nome", person.full_name.clone())
            .field("CPF", or_dash(Some(person.cpf.as_str())))
            .field(
                "RG",
                format!(
                    "{} / Órgão Emissor: {}",
                    or_dash(person.rg.as_deref()),
                    or_dash(person.issuing_body.as_deref())
                ),
            )
            .field("Profissão", or_dash(person.profession.as_deref()))
            .field(
                "Estado Civil",
                or_dash(detail.marital_status.as_ref().map(|m| m.name.as_str())),
            )
            .field("Nacionalidade", or_dash(person.nationality.as_deref()))
            .field("Celular", or_dash(person.cellphone.as_deref()))
            .field("Email", or_dash(person.email.as_deref())),
    );

    layout.sections.push(
        Section::new("Endereço")
            .field("CEP", or_dash(person.cep.as_deref()))
            .field(
                "Rua",
                format!(
                    "{}, Nº {}",
                    or_dash(person.street.as_deref()),
                    or_dash(person.number.as_deref())
                ),
            )
            .field("Complemento", or_dash(person.complement.as_deref()))
            .field("Bairro", or_dash(person.neighborhood.as_deref()))
            .field("Cidade", city_line(detail.city.as_ref())),
    );

    if person.bank.as_deref().is_some_and(|b| !b.trim().is_empty()) {
        layout.sections.push(
            Section::new("Dados Bancários")
                .field("Banco", or_dash(person.bank.as_deref()))
                .field("Agência", or_dash(person.branch.as_deref()))
                .field("Conta", or_dash(person.account.as_deref()))
                .field("Tipo de Conta", or_dash(person.account_type.as_deref())),
        );
    }

    if let Some(note) = person.note.as_deref().filter(|n| !n.trim().is_empty()) {
        layout.sections.push(Section::new("Observações").text(note));
    }

    layout
}

pub fn real_estate_sheet(detail: &RealEstateDetail, today: NaiveDate) -> DocumentLayout {
    let real_estate = &detail.real_estate;
    let mut layout = DocumentLayout::new("FICHA DO IMÓVEL", today);

    layout.sections.push(
        Section::new("Dados do Imóvel")
            .field("Tipo", real_estate.real_estate_kind.as_str())
            .field("Matrícula", or_dash(real_estate.municipal_registration.as_deref()))
            .field("Status", real_estate.status_real_estate.as_str())
            .field("Vistoria", if real_estate.has_inspection { "Sim" } else { "Não" })
            .field(
                "Comprovante",
                if real_estate.has_proof_document { "Sim" } else { "Não" },
            ),
    );

    layout.sections.push(
        Section::new("Localização")
            .field("CEP", real_estate.cep.clone())
            .field("Rua", format!("{}, Nº {}", real_estate.street, real_estate.number))
            .field("Complemento", or_dash(real_estate.complement.as_deref()))
            .field("Bairro", real_estate.neighborhood.clone())
            .field("Cidade", city_line(detail.city.as_ref())),
    );

    if let Some(owner) = &detail.owner {
        layout.sections.push(contact_section("Proprietário", owner, false));
    }
    if let Some(lessee) = &detail.lessee {
        layout.sections.push(contact_section("Inquilino Atual", lessee, false));
    }
    if let Some(note) = real_estate.note.as_deref().filter(|n| !n.trim().is_empty()) {
        layout.sections.push(Section::new("Observações").text(note));
    }

    layout
}

/// Resumo do contrato (ficha)
pub fn contract_sheet(detail: &ContractDetail, today: NaiveDate) -> DocumentLayout {
    let contract = &detail.contract;
    let mut layout = DocumentLayout::new("FICHA DO CONTRATO", today);

    layout.sections.push(
        Section::new("Informações do Contrato")
            .field("Identificador", contract.identifier.clone())
            .field("Tipo", contract.contract_kind.as_str())
            .field("Status", contract.status.as_str())
            .field(
                "Período",
                format!(
                    "{} a {}",
                    format_date(Some(contract.start_date)),
                    format_date(contract.end_date)
                ),
            )
            .field(
                "Duração",
                contract
                    .duration
                    .map(|d| format!("{} meses", d))
                    .unwrap_or_else(|| "-".to_string()),
            )
            .field("Valor", format_currency(contract.payment_value))
            .field(
                "Dia de Pagamento",
                contract
                    .day_payment
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
    );

    if let Some(owner) = &detail.owner {
        layout.sections.push(contact_section("Proprietário", owner, true));
    }
    if let Some(lessee) = &detail.lessee {
        layout.sections.push(contact_section("Inquilino", lessee, true));
    }
    if let Some(real_estate) = &detail.real_estate {
        layout.sections.push(
            Section::new("Imóvel")
                .field("Tipo", real_estate.real_estate_kind.as_str())
                .field("Endereço", format!("{}, {}", real_estate.street, real_estate.number))
                .field("Bairro", real_estate.neighborhood.clone()),
        );
    }

    layout
}

fn party_section(title: &str, person: &Person) -> Section {
    let mut section = Section::new(title).text(person.full_name.clone());

    let mut documents = vec![format!("CPF: {}", person.cpf)];
    if let Some(rg) = person.rg.as_deref().filter(|r| !r.trim().is_empty()) {
        documents.push(format!("RG: {}", rg));
    }
    section = section.text(documents.join(", "));

    let address = person_address(person);
    if !address.is_empty() {
        section = section.field("Endereço", address);
    }

    let mut contact = Vec::new();
    if let Some(phone) = person.cellphone.as_deref().filter(|p| !p.trim().is_empty()) {
        contact.push(format!("Tel: {}", phone));
    }
    if let Some(email) = person.email.as_deref().filter(|e| !e.trim().is_empty()) {
        contact.push(format!("Email: {}", email));
    }
    if !contact.is_empty() {
        section = section.text(contact.join(", "));
    }

    section
}

/// Contrato completo com cláusulas, em versão de locação ou de venda
pub fn full_contract(detail: &ContractDetail, today: NaiveDate) -> DocumentLayout {
    let contract = &detail.contract;
    let kind = contract.contract_kind;
    let lease = kind.is_lease();

    let mut layout = DocumentLayout::new("CONTRATO", today);
    layout.subtitle = Some(kind.as_str().to_uppercase());
    layout.footer = format!("{} - Documento gerado em {}", FOOTER, format_date(Some(today)));

    layout.sections.push(
        Section::new(format!("CONTRATO Nº {}", contract.identifier))
            .field("Data", format_date(Some(today))),
    );

    if let Some(owner) = &detail.owner {
        let title = if lease { "LOCADOR(A)" } else { "VENDEDOR(A)" };
        layout.sections.push(party_section(title, owner));
    }
    if let Some(lessee) = detail.lessee.as_ref().filter(|_| lease) {
        layout.sections.push(party_section("LOCATÁRIO(A)", lessee));
    }
    if let Some(real_estate) = &detail.real_estate {
        let mut section = Section::new("IMÓVEL OBJETO DO CONTRATO").text(format!(
            "{}: {}",
            real_estate.real_estate_kind.as_str(),
            real_estate_address(real_estate)
        ));
        if let Some(registration) = real_estate
            .municipal_registration
            .as_deref()
            .filter(|r| !r.trim().is_empty())
        {
            section = section.field("Matrícula", registration);
        }
        layout.sections.push(section);
    }

    let value = format_currency(contract.payment_value);
    match kind {
        ContractKind::Locacao | ContractKind::LocacaoComAdministracao => {
            layout.sections.push(Section::new("CLÁUSULA PRIMEIRA - DO OBJETO").text(format!(
                "O(A) LOCADOR(A) cede ao(à) LOCATÁRIO(A) o imóvel acima identificado, para fins \
                 residenciais, pelo prazo de {} meses, iniciando em {} e terminando em {}.",
                contract.duration.unwrap_or(12),
                format_date(Some(contract.start_date)),
                format_date(contract.end_date),
            )));
            layout.sections.push(Section::new("CLÁUSULA SEGUNDA - DO ALUGUEL E ENCARGOS").text(format!(
                "O aluguel mensal é de {}, a ser pago até o dia {} de cada mês, acrescido das \
                 despesas de consumo de água, luz, telefone, condomínio e demais encargos que \
                 incidam sobre o imóvel.",
                value,
                contract.day_payment.unwrap_or(5),
            )));
            if kind == ContractKind::LocacaoComAdministracao {
                layout.sections.push(Section::new("CLÁUSULA TERCEIRA - DA ADMINISTRAÇÃO").text(format!(
                    "A administração deste contrato será realizada pela empresa {}, que se \
                     responsabiliza pela coleta de aluguéis, prestação de contas ao LOCADOR e pela \
                     supervisão do cumprimento das cláusulas contratuais por ambas as partes.",
                    FOOTER
                )));
            }
        }
        ContractKind::VendaComExclusividade | ContractKind::VendaSemExclusividade => {
            layout.sections.push(Section::new("CLÁUSULA PRIMEIRA - DO OBJETO").text(format!(
                "O presente contrato tem por objeto a venda do imóvel acima identificado, de \
                 propriedade do(a) VENDEDOR(A), pelo valor de {}.",
                value
            )));
            if kind == ContractKind::VendaComExclusividade {
                layout.sections.push(Section::new("CLÁUSULA SEGUNDA - DA EXCLUSIVIDADE").text(format!(
                    "O VENDEDOR concede à {} a exclusividade para intermediar a venda do imóvel, \
                     pelo período de {} meses, a contar da data de assinatura deste contrato.",
                    FOOTER,
                    contract.duration.unwrap_or(3),
                )));
            }
        }
    }

    layout.sections.push(Section::new("DISPOSIÇÕES FINAIS").text(
        "Para firmeza e como prova de assim haverem contratado, as partes assinam o presente \
         contrato em duas vias de igual teor e forma, na presença das testemunhas abaixo.",
    ));

    let (first, second) = if lease {
        ("LOCADOR(A)", "LOCATÁRIO(A)")
    } else {
        ("VENDEDOR(A)", "COMPRADOR(A)/INTERMEDIADOR(A)")
    };
    let line = "_".repeat(30);
    layout.sections.push(
        Section::new("ASSINATURAS")
            .centered("Local e data: ___________________________, _____ de _______________ de _______")
            .centered(format!("{}        {}", line, line))
            .centered(format!("{}        {}", first, second))
            .centered(format!("{}        {}", line, line))
            .centered("TESTEMUNHA 1        TESTEMUNHA 2"),
    );

    layout
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::models::{
        contract::{Contract, ContractStatus},
        person::PersonRole,
        real_estate::{RealEstateKind, StatusRealEstate},
    };

    pub(crate) fn person(role: PersonRole, name: &str) -> Person {
        Person {
            id: Uuid::new_v4(),
            role,
            full_name: name.into(),
            marital_status_id: None,
            profession: None,
            rg: Some("12.345.678-9".into()),
            issuing_body: Some("SSP".into()),
            uf_rg: None,
            cpf: "12345678901".into(),
            cellphone: Some("(11) 90000-0000".into()),
            email: None,
            gender: None,
            nationality: None,
            cep: None,
            street: Some("Rua A".into()),
            number: Some("10".into()),
            complement: None,
            neighborhood: Some("Centro".into()),
            city_id: None,
            bank: None,
            branch: None,
            account: None,
            account_type: None,
            opted_for_power_of_attorney: None,
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn real_estate(owner_id: Uuid) -> RealEstate {
        RealEstate {
            id: Uuid::new_v4(),
            municipal_registration: Some("IPTU-77".into()),
            state_id: 25,
            city_id: 100,
            neighborhood: "Bela Vista".into(),
            street: "Avenida Paulista".into(),
            number: "1578".into(),
            complement: None,
            cep: "01310100".into(),
            note: None,
            real_estate_kind: RealEstateKind::Apartamento,
            has_inspection: true,
            status_real_estate: StatusRealEstate::Alugado,
            has_proof_document: false,
            owner_id,
            lessee_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn contract_detail(kind: ContractKind, with_lessee: bool) -> ContractDetail {
        let owner = person(PersonRole::Owner, "Olga Prado");
        let lessee = person(PersonRole::Lessee, "Luan Reis");
        let estate = real_estate(owner.id);
        ContractDetail {
            contract: Contract {
                id: Uuid::new_v4(),
                identifier: "CTR-20250101-1234".into(),
                contract_kind: kind,
                start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end_date: None,
                day_payment: Some(10),
                payment_value: Decimal::new(350000, 2),
                duration: None,
                status: ContractStatus::Ativo,
                owner_id: owner.id,
                lessee_id: with_lessee.then_some(lessee.id),
                real_estate_id: estate.id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            owner: Some(owner),
            lessee: with_lessee.then_some(lessee),
            real_estate: Some(estate),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    fn all_text(layout: &DocumentLayout) -> String {
        layout
            .sections
            .iter()
            .flat_map(|s| {
                std::iter::once(s.title.clone()).chain(s.lines.iter().map(|l| match l {
                    Line::Field(label, value) => format!("{label}: {value}"),
                    Line::Text(text) | Line::Centered(text) => text.clone(),
                }))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn contract_without_lessee_has_no_lessee_section() {
        let detail = contract_detail(ContractKind::Locacao, false);

        let sheet = contract_sheet(&detail, today());
        assert!(sheet.has_section("Proprietário"));
        assert!(!sheet.has_section("Inquilino"));

        let full = full_contract(&detail, today());
        assert!(full.has_section("LOCADOR(A)"));
        assert!(!full.has_section("LOCATÁRIO(A)"));
    }

    #[test]
    fn lease_contract_has_lessee_and_rent_clauses() {
        let detail = contract_detail(ContractKind::LocacaoComAdministracao, true);
        let full = full_contract(&detail, today());

        assert_eq!(full.subtitle.as_deref(), Some("LOCAÇÃO COM ADMINISTRAÇÃO"));
        assert!(full.has_section("LOCATÁRIO(A)"));
        assert!(full.has_section("CLÁUSULA TERCEIRA - DA ADMINISTRAÇÃO"));
        let text = all_text(&full);
        assert!(text.contains("O aluguel mensal é de R$ 3.500,00, a ser pago até o dia 10"));
        assert!(text.contains("pelo prazo de 12 meses, iniciando em 01/01/2025 e terminando em -."));
        assert!(full.footer.ends_with("Documento gerado em 10/05/2025"));
    }

    #[test]
    fn sale_contract_uses_seller_wording() {
        let detail = contract_detail(ContractKind::VendaComExclusividade, true);
        let full = full_contract(&detail, today());

        assert!(full.has_section("VENDEDOR(A)"));
        assert!(!full.has_section("LOCADOR(A)"));
        // Venda não mostra o inquilino como parte
        assert!(!full.has_section("LOCATÁRIO(A)"));
        assert!(full.has_section("CLÁUSULA SEGUNDA - DA EXCLUSIVIDADE"));
        assert!(all_text(&full).contains("pelo período de 3 meses"));
    }

    #[test]
    fn person_sheet_skips_empty_optional_sections() {
        let detail = PersonDetail {
            person: person(PersonRole::Lessee, "Luan Reis"),
            city: None,
            marital_status: None,
        };
        let sheet = person_sheet(&detail, today());
        assert_eq!(sheet.title, "FICHA DE INQUILINO");
        assert!(sheet.has_section("Dados Pessoais"));
        assert!(!sheet.has_section("Dados Bancários"));
        assert!(all_text(&sheet).contains("RG: 12.345.678-9 / Órgão Emissor: SSP"));
        assert!(all_text(&sheet).contains("Email: -"));
    }

    #[test]
    fn real_estate_sheet_lists_relations_present() {
        let owner = person(PersonRole::Owner, "Olga Prado");
        let detail = RealEstateDetail {
            real_estate: real_estate(owner.id),
            city: None,
            owner: Some(owner),
            lessee: None,
        };
        let sheet = real_estate_sheet(&detail, today());
        assert!(sheet.has_section("Proprietário"));
        assert!(!sheet.has_section("Inquilino Atual"));
        assert!(all_text(&sheet).contains("Vistoria: Sim"));
    }
}
