// src/services/address_service.rs
// Preenchimento de endereço a partir do CEP (ViaCEP).

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    common::{error::AppError, validation::normalize_cep},
    models::address::{AddressFill, CepResponse, STATE_NOT_FOUND_WARNING},
    services::location_service::LocationService,
};

#[async_trait]
pub trait CepProvider: Send + Sync {
    /// `cep` já chega com exatamente 8 dígitos
    async fn fetch(&self, cep: &str) -> Result<CepResponse, AppError>;
}

#[derive(Clone)]
pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CepProvider for ViaCepClient {
    async fn fetch(&self, cep: &str) -> Result<CepResponse, AppError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep);
        tracing::debug!("Consultando CEP em {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Serviço de CEP respondeu {}",
                response.status()
            )));
        }

        let body: CepResponse = response.json().await?;
        if body.is_not_found() {
            return Err(AppError::CepNotFound);
        }
        Ok(body)
    }
}

#[derive(Clone)]
pub struct AddressService {
    provider: Arc<dyn CepProvider>,
    locations: LocationService,
}

impl AddressService {
    pub fn new(provider: Arc<dyn CepProvider>, locations: LocationService) -> Self {
        Self { provider, locations }
    }

    /// Sem cache: cada consulta vai até o serviço externo.
    pub async fn lookup(&self, raw_cep: &str) -> Result<AddressFill, AppError> {
        let cep = normalize_cep("cep", raw_cep)?;

        let found = self.provider.fetch(&cep).await?;
        if found.is_not_found() {
            return Err(AppError::CepNotFound);
        }

        let uf = found.uf.clone().unwrap_or_default();
        let city_name = found.localidade.clone().unwrap_or_default();

        let mut fill = AddressFill {
            cep,
            street: found.logradouro.unwrap_or_default(),
            neighborhood: found.bairro.unwrap_or_default(),
            city_name,
            uf,
            state_id: None,
            city_id: None,
            cities: Vec::new(),
            warning: None,
        };

        match self.locations.find_state_by_uf(&fill.uf).await? {
            Some(state) => {
                let cities = self.locations.list_cities(state.id).await?;
                let wanted = fill.city_name.trim().to_lowercase();
                fill.city_id = cities
                    .iter()
                    .find(|c| c.name.trim().to_lowercase() == wanted)
                    .map(|c| c.id);
                fill.state_id = Some(state.id);
                fill.cities = cities;
            }
            None => {
                tracing::warn!("UF '{}' do CEP {} não cadastrada", fill.uf, fill.cep);
                fill.warning = Some(STATE_NOT_FOUND_WARNING.to_string());
            }
        }

        Ok(fill)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::services::location_service;

    struct CannedCep {
        body: serde_json::Value,
        calls: AtomicUsize,
    }

    impl CannedCep {
        fn new(body: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                body,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CepProvider for CannedCep {
        async fn fetch(&self, _cep: &str) -> Result<CepResponse, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(self.body.clone()).unwrap())
        }
    }

    fn paulista() -> serde_json::Value {
        json!({
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP"
        })
    }

    #[tokio::test]
    async fn malformed_cep_is_rejected_before_any_call() {
        let provider = CannedCep::new(paulista());
        let service = AddressService::new(provider.clone(), location_service::tests::seeded().await);

        for cep in ["", "0131010", "013101000", "01310-10", "abc", "01.310-1000"] {
            let result = service.lookup(cep).await;
            assert!(matches!(result, Err(AppError::InvalidField { field, .. }) if field == "cep"), "{cep}");
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fills_street_and_resolves_state_and_city() {
        let provider = CannedCep::new(paulista());
        let service = AddressService::new(provider.clone(), location_service::tests::seeded().await);

        let fill = service.lookup("01310-100").await.unwrap();
        assert_eq!(fill.street, "Avenida Paulista");
        assert_eq!(fill.neighborhood, "Bela Vista");
        assert_eq!(fill.state_id, Some(25));
        assert_eq!(fill.city_id, Some(100));
        let names: Vec<&str> = fill.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Campinas", "São Paulo"]);
        assert!(fill.warning.is_none());

        // Sem cache
        service.lookup("01310100").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_state_still_fills_street_with_warning() {
        let mut body = paulista();
        body["uf"] = json!("ZZ");
        let service = AddressService::new(CannedCep::new(body), location_service::tests::seeded().await);

        let fill = service.lookup("01310100").await.unwrap();
        assert_eq!(fill.street, "Avenida Paulista");
        assert_eq!(fill.state_id, None);
        assert_eq!(fill.city_id, None);
        assert!(fill.cities.is_empty());
        assert_eq!(fill.warning.as_deref(), Some(STATE_NOT_FOUND_WARNING));
    }

    #[tokio::test]
    async fn unmatched_city_keeps_the_dropdown() {
        let mut body = paulista();
        body["localidade"] = json!("Santos");
        let service = AddressService::new(CannedCep::new(body), location_service::tests::seeded().await);

        let fill = service.lookup("11010000").await.unwrap();
        assert_eq!(fill.state_id, Some(25));
        assert_eq!(fill.city_id, None);
        assert_eq!(fill.cities.len(), 2);
    }

    #[tokio::test]
    async fn provider_error_flag_means_not_found() {
        for flag in [json!(true), json!("true")] {
            let service = AddressService::new(
                CannedCep::new(json!({ "erro": flag })),
                location_service::tests::seeded().await,
            );
            assert!(matches!(service.lookup("99999999").await, Err(AppError::CepNotFound)));
        }
    }
}
