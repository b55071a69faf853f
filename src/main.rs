//src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::{
    config::{AppConfig, AppState},
    docs::ApiDoc,
    middleware::auth::auth_guard,
};

// Três PDFs de até 2 MiB mais o envelope do multipart
const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        app_state.auth_service.ensure_admin(email, password).await?;
    }

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}

fn app(app_state: AppState) -> Router {
    // Só o login é público; cadastro de conta passa pelo guard
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route(
            "/register",
            post(handlers::auth::register)
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    let people_routes = Router::new()
        .route(
            "/{scope}",
            get(handlers::people::list_people).post(handlers::people::create_person),
        )
        .route("/{scope}/export.xlsx", get(handlers::people::export_people))
        .route(
            "/{scope}/{id}",
            get(handlers::people::get_person)
                .put(handlers::people::update_person)
                .delete(handlers::people::delete_person),
        )
        .route(
            "/{scope}/{id}/partners",
            get(handlers::relations::list_partners).post(handlers::relations::create_partner),
        )
        .route(
            "/{scope}/{id}/references",
            get(handlers::relations::list_references).post(handlers::relations::create_reference),
        )
        .route(
            "/{scope}/{id}/files",
            get(handlers::files::list_person_files).post(handlers::files::upload_person_files),
        )
        .route(
            "/{scope}/{id}/files/{name}",
            axum::routing::delete(handlers::files::delete_person_file),
        )
        .route("/{scope}/{id}/document.pdf", get(handlers::people::person_pdf))
        .route("/{scope}/{id}/document.docx", get(handlers::people::person_docx));

    let real_estate_routes = Router::new()
        .route(
            "/",
            get(handlers::real_estates::list_real_estates).post(handlers::real_estates::create_real_estate),
        )
        .route("/export.xlsx", get(handlers::real_estates::export_real_estates))
        .route(
            "/{id}",
            get(handlers::real_estates::get_real_estate)
                .put(handlers::real_estates::update_real_estate)
                .delete(handlers::real_estates::delete_real_estate),
        )
        .route(
            "/{id}/files",
            get(handlers::files::list_real_estate_files).post(handlers::files::upload_real_estate_files),
        )
        .route(
            "/{id}/files/{name}",
            axum::routing::delete(handlers::files::delete_real_estate_file),
        )
        .route("/{id}/document.pdf", get(handlers::real_estates::real_estate_pdf))
        .route("/{id}/document.docx", get(handlers::real_estates::real_estate_docx));

    let contract_routes = Router::new()
        .route(
            "/",
            get(handlers::contracts::list_contracts).post(handlers::contracts::create_contract),
        )
        .route("/identifier", get(handlers::contracts::next_identifier))
        .route("/export.xlsx", get(handlers::contracts::export_contracts))
        .route(
            "/{id}",
            get(handlers::contracts::get_contract)
                .put(handlers::contracts::update_contract)
                .delete(handlers::contracts::delete_contract),
        )
        .route(
            "/{id}/files",
            get(handlers::files::list_contract_files).post(handlers::files::upload_contract_files),
        )
        .route(
            "/{id}/files/{name}",
            axum::routing::delete(handlers::files::delete_contract_file),
        )
        .route("/{id}/document.pdf", get(handlers::contracts::contract_pdf))
        .route("/{id}/document.docx", get(handlers::contracts::contract_docx))
        .route("/{id}/contract.pdf", get(handlers::contracts::full_contract_pdf))
        .route("/{id}/contract.docx", get(handlers::contracts::full_contract_docx));

    let location_routes = Router::new()
        .route("/states", get(handlers::locations::list_states))
        .route("/states/{id}/cities", get(handlers::locations::list_cities))
        .route("/cities/{id}", get(handlers::locations::get_city))
        .route("/marital-statuses", get(handlers::locations::list_marital_statuses));

    // Tudo abaixo exige o token
    let protected_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        .nest("/people", people_routes)
        .route("/partners/{id}", put(handlers::relations::update_partner).delete(handlers::relations::delete_partner))
        .route(
            "/references/{id}",
            put(handlers::relations::update_reference).delete(handlers::relations::delete_reference),
        )
        .nest("/real-estates", real_estate_routes)
        .nest("/contracts", contract_routes)
        .nest("/locations", location_routes)
        .route("/address/{cep}", get(handlers::address::lookup_cep))
        .route("/files/download", get(handlers::files::download_file))
        .route("/dashboard/summary", get(handlers::dashboard::get_summary))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    // Pool preguiçoso: o guard recusa antes de qualquer consulta
    fn state() -> AppState {
        let config = AppConfig {
            database_url: "postgres://localhost/sogrinha".into(),
            jwt_secret: "segredo".into(),
            storage_url: "http://localhost:54321".into(),
            storage_key: "chave".into(),
            storage_bucket: "documents".into(),
            cep_base_url: "http://localhost:9".into(),
            fonts_dir: "./fonts".into(),
            font_family: "Roboto".into(),
            bind_addr: "127.0.0.1:0".into(),
            db_max_connections: 1,
            admin_email: None,
            admin_password: None,
        };
        let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
        AppState::with_pool(&config, pool).unwrap()
    }

    fn register_request(bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
            .body(Body::from(r#"{"email":"novo@sogrinha.com","password":"segredo123"}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn register_requires_a_token() {
        let resp = app(state()).oneshot(register_request(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app(state()).oneshot(register_request(Some("lixo"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn domain_routes_require_a_token() {
        let req = Request::builder()
            .uri("/api/people/owners")
            .body(Body::empty())
            .unwrap();
        let resp = app(state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_is_public() {
        let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let resp = app(state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
