// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{PgStore, Record, UserRepository},
    models::storage::FileSyncPolicy,
    services::{
        address_service::{AddressService, ViaCepClient},
        auth::AuthService,
        contract_service::ContractService,
        dashboard_service::DashboardService,
        document_service::{DocumentService, PdfRenderer},
        entity_service::EntityService,
        export_service::ExportService,
        file_sync_service::FileSyncService,
        location_service::LocationService,
        person_service::{PartnerService, PeopleService, ReferenceService},
        real_estate_service::RealEstateService,
        storage_service::SupabaseStorage,
    },
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub storage_url: String,
    pub storage_key: String,
    pub storage_bucket: String,
    pub cep_base_url: String,
    pub fonts_dir: String,
    pub font_family: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    // Conta inicial; sem ela ninguém consegue logar para cadastrar os demais
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{} deve ser definida", key))
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {}", v))?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            storage_url: required("STORAGE_URL")?,
            storage_key: required("STORAGE_KEY")?,
            storage_bucket: or_default("STORAGE_BUCKET", "documents"),
            cep_base_url: or_default("CEP_BASE_URL", "https://viacep.com.br"),
            fonts_dir: or_default("FONTS_DIR", "./fonts"),
            font_family: or_default("FONT_FAMILY", "Roboto"),
            bind_addr: or_default("BIND_ADDR", "0.0.0.0:3000"),
            db_max_connections,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub locations: LocationService,
    pub people: PeopleService,
    pub partners: PartnerService,
    pub references: ReferenceService,
    pub real_estates: RealEstateService,
    pub contracts: ContractService,
    pub address: AddressService,
    pub files: FileSyncService,
    pub documents: DocumentService,
    pub exports: ExportService,
    pub dashboard: DashboardService,
}

fn entity<T: Record>(pool: &PgPool) -> EntityService<T> {
    EntityService::new(Arc::new(PgStore::<T>::new(pool.clone())))
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::with_pool(config, db_pool)
    }

    /// Monta os serviços sobre um pool já criado
    pub fn with_pool(config: &AppConfig, db_pool: PgPool) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Falha ao montar o cliente HTTP")?;

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let auth_service = AuthService::new(user_repo, config.jwt_secret.clone());

        let locations = LocationService::new(entity(&db_pool), entity(&db_pool), entity(&db_pool));
        let people_store = entity(&db_pool);
        let real_estate_store = entity(&db_pool);

        let people = PeopleService::new(people_store.clone(), locations.clone());
        let partners = PartnerService::new(entity(&db_pool));
        let references = ReferenceService::new(entity(&db_pool));
        let real_estates = RealEstateService::new(real_estate_store.clone(), people_store.clone(), locations.clone());
        let contracts = ContractService::new(entity(&db_pool), people_store, real_estate_store);

        let address = AddressService::new(
            Arc::new(ViaCepClient::new(http.clone(), config.cep_base_url.clone())),
            locations.clone(),
        );
        let files = FileSyncService::new(
            Arc::new(SupabaseStorage::new(http, config.storage_url.clone(), config.storage_key.clone())),
            FileSyncPolicy::new(config.storage_bucket.clone()),
        );

        let documents = DocumentService::new(
            people.clone(),
            real_estates.clone(),
            contracts.clone(),
            PdfRenderer::new(config.fonts_dir.clone(), config.font_family.clone()),
        );
        let exports = ExportService::new(people.clone(), real_estates.clone(), contracts.clone(), locations.clone());
        let dashboard = DashboardService::new(people.clone(), real_estates.clone(), contracts.clone());

        Ok(Self {
            db_pool,
            auth_service,
            locations,
            people,
            partners,
            references,
            real_estates,
            contracts,
            address,
            files,
            documents,
            exports,
            dashboard,
        })
    }
}
