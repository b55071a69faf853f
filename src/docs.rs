// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- People ---
        handlers::people::list_people,
        handlers::people::create_person,
        handlers::people::get_person,
        handlers::people::update_person,
        handlers::people::delete_person,
        handlers::people::export_people,
        handlers::relations::list_partners,
        handlers::relations::create_partner,
        handlers::relations::update_partner,
        handlers::relations::delete_partner,
        handlers::relations::list_references,
        handlers::relations::create_reference,
        handlers::relations::update_reference,
        handlers::relations::delete_reference,

        // --- Real Estates ---
        handlers::real_estates::list_real_estates,
        handlers::real_estates::create_real_estate,
        handlers::real_estates::get_real_estate,
        handlers::real_estates::update_real_estate,
        handlers::real_estates::delete_real_estate,
        handlers::real_estates::export_real_estates,

        // --- Contracts ---
        handlers::contracts::list_contracts,
        handlers::contracts::create_contract,
        handlers::contracts::next_identifier,
        handlers::contracts::get_contract,
        handlers::contracts::update_contract,
        handlers::contracts::delete_contract,
        handlers::contracts::export_contracts,

        // --- Documents ---
        handlers::people::person_pdf,
        handlers::people::person_docx,
        handlers::real_estates::real_estate_pdf,
        handlers::real_estates::real_estate_docx,
        handlers::contracts::contract_pdf,
        handlers::contracts::contract_docx,
        handlers::contracts::full_contract_pdf,
        handlers::contracts::full_contract_docx,

        // --- Files ---
        handlers::files::list_person_files,
        handlers::files::upload_person_files,
        handlers::files::delete_person_file,
        handlers::files::list_real_estate_files,
        handlers::files::upload_real_estate_files,
        handlers::files::delete_real_estate_file,
        handlers::files::list_contract_files,
        handlers::files::upload_contract_files,
        handlers::files::delete_contract_file,
        handlers::files::download_file,

        // --- Locations / Address ---
        handlers::locations::list_states,
        handlers::locations::list_cities,
        handlers::locations::get_city,
        handlers::locations::list_marital_statuses,
        handlers::address::lookup_cep,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- People ---
            models::person::PersonRole,
            models::person::Person,
            models::person::NewPerson,
            models::person::PersonPatch,
            models::person::PersonDetail,
            models::person::PersonPartner,
            models::person::PartnerPayload,
            models::person::PersonReference,
            models::person::ReferencePayload,

            // --- Real Estates ---
            models::real_estate::RealEstateKind,
            models::real_estate::StatusRealEstate,
            models::real_estate::RealEstate,
            models::real_estate::NewRealEstate,
            models::real_estate::RealEstatePatch,
            models::real_estate::RealEstateDetail,

            // --- Contracts ---
            models::contract::ContractKind,
            models::contract::ContractStatus,
            models::contract::Contract,
            models::contract::NewContract,
            models::contract::ContractPatch,
            models::contract::ContractDetail,
            handlers::contracts::IdentifierResponse,

            // --- Locations ---
            models::location::State,
            models::location::City,
            models::location::CityWithState,
            models::location::MaritalStatus,
            models::address::AddressFill,

            // --- Files ---
            models::storage::StoredFile,
            handlers::files::UploadForm,

            // --- Dashboard ---
            models::dashboard::StatusCount,
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "People", description = "Proprietários, Inquilinos, Cônjuges e Referências"),
        (name = "Real Estates", description = "Cadastro de Imóveis"),
        (name = "Contracts", description = "Contratos de Locação e Venda"),
        (name = "Documents", description = "Fichas e Contratos em PDF/DOCX"),
        (name = "Files", description = "Arquivos PDF anexados aos cadastros"),
        (name = "Locations", description = "Estados, Cidades e Estados Civis"),
        (name = "Address", description = "Consulta de CEP"),
        (name = "Dashboard", description = "Indicadores Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_form_is_documented_as_binary_files() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let files = &doc["components"]["schemas"]["UploadForm"]["properties"]["files"];
        assert_eq!(files["type"], "array");
        assert!(files.to_string().contains("binary"));
        assert!(doc["components"]["securitySchemes"]["api_jwt"].is_object());
    }
}
