// src/services/document_service.rs

use std::io::Cursor;

use chrono::Local;
use docx_rs::{AlignmentType, Docx, Paragraph, Run};
use genpdf::{elements, style, Alignment, Element};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::person::PersonScope,
    services::{
        contract_service::ContractService,
        document_layout::{self, DocumentLayout, Line, THEME_COLOR},
        person_service::PeopleService,
        real_estate_service::RealEstateService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// Arquivo pronto para ser devolvido como anexo
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// "Maria da Silva" -> "Maria_da_Silva"
fn file_stem(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}

#[derive(Debug, Clone)]
pub struct PdfRenderer {
    fonts_dir: String,
    font_family: String,
}

impl PdfRenderer {
    pub fn new(fonts_dir: impl Into<String>, font_family: impl Into<String>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_family: font_family.into(),
        }
    }

    pub fn render(&self, layout: &DocumentLayout) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None)
            .map_err(|_| {
                AppError::FontNotFound(format!(
                    "Fonte '{}' não encontrada na pasta {}",
                    self.font_family, self.fonts_dir
                ))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(layout.title.clone());
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        let (r, g, b) = THEME_COLOR;
        let theme = style::Style::new().with_color(style::Color::Rgb(r, g, b));

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(layout.title.clone())
                .aligned(Alignment::Center)
                .styled(theme.bold().with_font_size(18)),
        );
        if let Some(subtitle) = &layout.subtitle {
            doc.push(
                elements::Paragraph::new(subtitle.clone())
                    .aligned(Alignment::Center)
                    .styled(theme.bold().with_font_size(13)),
            );
        }
        doc.push(
            elements::Paragraph::new(format!(
                "Gerado em: {}",
                layout.generated_on.format("%d/%m/%Y")
            ))
            .aligned(Alignment::Right)
            .styled(style::Style::new().with_font_size(9)),
        );
        doc.push(elements::Break::new(1.5));

        // --- SEÇÕES ---
        let bold = style::Style::new().bold();
        for section in &layout.sections {
            doc.push(
                elements::Paragraph::new(section.title.clone())
                    .styled(theme.bold().with_font_size(12)),
            );
            for line in &section.lines {
                match line {
                    Line::Field(label, value) => {
                        let mut p = elements::Paragraph::default();
                        p.push_styled(format!("{}: ", label), bold);
                        p.push(value.clone());
                        doc.push(p);
                    }
                    Line::Text(text) => doc.push(elements::Paragraph::new(text.clone())),
                    Line::Centered(text) => {
                        doc.push(elements::Paragraph::new(text.clone()).aligned(Alignment::Center))
                    }
                }
            }
            doc.push(elements::Break::new(1));
        }

        // --- RODAPÉ ---
        doc.push(elements::Break::new(2));
        doc.push(
            elements::Paragraph::new(layout.footer.clone())
                .aligned(Alignment::Center)
                .styled(theme.with_font_size(8)),
        );

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::Export(e.to_string()))?;
        Ok(buffer)
    }
}

pub fn render_docx(layout: &DocumentLayout) -> Result<Vec<u8>, AppError> {
    let theme = "742851";
    // Tamanhos do docx em meio-ponto
    let mut docx = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(&layout.title).bold().size(36).color(theme))
                .align(AlignmentType::Center),
        );
    if let Some(subtitle) = &layout.subtitle {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(subtitle).bold().size(26).color(theme))
                .align(AlignmentType::Center),
        );
    }
    docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(
                Run::new()
                    .add_text(format!("Gerado em: {}", layout.generated_on.format("%d/%m/%Y")))
                    .size(18),
            )
            .align(AlignmentType::Right),
    );

    for section in &layout.sections {
        docx = docx.add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(&section.title).bold().size(24).color(theme)),
        );
        for line in &section.lines {
            let paragraph = match line {
                Line::Field(label, value) => Paragraph::new()
                    .add_run(Run::new().add_text(format!("{}: ", label)).bold())
                    .add_run(Run::new().add_text(value)),
                Line::Text(text) => Paragraph::new().add_run(Run::new().add_text(text)),
                Line::Centered(text) => Paragraph::new()
                    .add_run(Run::new().add_text(text))
                    .align(AlignmentType::Center),
            };
            docx = docx.add_paragraph(paragraph);
        }
    }

    docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text(&layout.footer).size(16).color(theme))
            .align(AlignmentType::Center),
    );

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| AppError::Export(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[derive(Clone)]
pub struct DocumentService {
    people: PeopleService,
    real_estates: RealEstateService,
    contracts: ContractService,
    pdf: PdfRenderer,
}

impl DocumentService {
    pub fn new(
        people: PeopleService,
        real_estates: RealEstateService,
        contracts: ContractService,
        pdf: PdfRenderer,
    ) -> Self {
        Self {
            people,
            real_estates,
            contracts,
            pdf,
        }
    }

    fn render(
        &self,
        layout: &DocumentLayout,
        stem: String,
        format: DocumentFormat,
    ) -> Result<RenderedDocument, AppError> {
        let bytes = match format {
            DocumentFormat::Pdf => self.pdf.render(layout)?,
            DocumentFormat::Docx => render_docx(layout)?,
        };
        Ok(RenderedDocument {
            file_name: format!("{}.{}", stem, format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }

    pub async fn person_sheet(
        &self,
        scope: PersonScope,
        id: Uuid,
        format: DocumentFormat,
    ) -> Result<RenderedDocument, AppError> {
        let detail = self.people.scoped(scope).get_detail(id).await?;
        let layout = document_layout::person_sheet(&detail, Local::now().date_naive());
        let prefix = match scope {
            PersonScope::Owners => "proprietario",
            PersonScope::Lessees => "inquilino",
        };
        tracing::debug!("Gerando ficha {} de {}", format.extension(), id);
        self.render(
            &layout,
            format!("{}_{}", prefix, file_stem(&detail.person.full_name)),
            format,
        )
    }

    pub async fn real_estate_sheet(
        &self,
        id: Uuid,
        format: DocumentFormat,
    ) -> Result<RenderedDocument, AppError> {
        let detail = self.real_estates.get_detail(id).await?;
        let layout = document_layout::real_estate_sheet(&detail, Local::now().date_naive());
        let stem = format!(
            "imovel_{}_{}",
            file_stem(&detail.real_estate.street),
            file_stem(&detail.real_estate.number)
        );
        self.render(&layout, stem, format)
    }

    pub async fn contract_sheet(
        &self,
        id: Uuid,
        format: DocumentFormat,
    ) -> Result<RenderedDocument, AppError> {
        let detail = self.contracts.get_detail(id).await?;
        let layout = document_layout::contract_sheet(&detail, Local::now().date_naive());
        let stem = format!("contrato_{}", file_stem(&detail.contract.identifier));
        self.render(&layout, stem, format)
    }

    /// Contrato completo com cláusulas
    pub async fn full_contract(
        &self,
        id: Uuid,
        format: DocumentFormat,
    ) -> Result<RenderedDocument, AppError> {
        let detail = self.contracts.get_detail(id).await?;
        let layout = document_layout::full_contract(&detail, Local::now().date_naive());
        let stem = format!("contrato_profissional_{}", file_stem(&detail.contract.identifier));
        self.render(&layout, stem, format)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        models::contract::ContractKind,
        services::{
            contract_service::tests::{new_contract, scenario, Scenario},
            document_layout::tests::contract_detail,
        },
    };

    fn service_for(s: &Scenario) -> DocumentService {
        DocumentService::new(
            s.people.clone(),
            s.real_estates.clone(),
            s.contracts.clone(),
            PdfRenderer::new("./nao-existe", "Roboto"),
        )
    }

    #[test]
    fn docx_is_a_zip_package() {
        let detail = contract_detail(ContractKind::Locacao, false);
        let layout = document_layout::full_contract(&detail, NaiveDate::from_ymd_opt(2025, 5, 10).unwrap());
        let bytes = render_docx(&layout).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn missing_font_is_reported() {
        let detail = contract_detail(ContractKind::Locacao, true);
        let layout = document_layout::contract_sheet(&detail, NaiveDate::from_ymd_opt(2025, 5, 10).unwrap());
        let err = PdfRenderer::new("./nao-existe", "Roboto").render(&layout).unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }

    #[test]
    fn file_names_replace_whitespace() {
        assert_eq!(file_stem("Maria  da Silva"), "Maria_da_Silva");
        assert_eq!(DocumentFormat::Docx.extension(), "docx");
    }

    #[tokio::test]
    async fn contract_docx_is_named_after_identifier() {
        let s = scenario().await;
        let contract = s
            .contracts
            .create(new_contract(s.owner.id, s.real_estate.id))
            .await
            .unwrap();
        let docs = service_for(&s);

        let doc = docs.contract_sheet(contract.id, DocumentFormat::Docx).await.unwrap();
        assert_eq!(doc.file_name, format!("contrato_{}.docx", contract.identifier));
        assert!(doc.bytes.starts_with(b"PK"));

        let err = docs.full_contract(Uuid::new_v4(), DocumentFormat::Docx).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
