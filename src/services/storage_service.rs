// src/services/storage_service.rs
// Cliente da API REST de Storage (buckets de arquivos).

use async_trait::async_trait;
use reqwest::{header, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;

use crate::{common::error::AppError, models::storage::ObjectEntry};

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>, AppError>;

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<(), AppError>;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), AppError>;

    /// Link temporário, válido por `expires_in` segundos
    async fn create_signed_url(&self, bucket: &str, path: &str, expires_in: u64) -> Result<String, AppError>;

    async fn download(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

#[derive(Clone)]
pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl SupabaseStorage {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// `{base}/storage/v1/{parts...}/{path}` com cada segmento codificado
    fn endpoint(&self, parts: &[&str], path: Option<&str>) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| AppError::Storage(format!("URL inválida: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::Storage("URL do storage não aceita caminho".into()))?;
            segments.pop_if_empty().extend(["storage", "v1"]).extend(parts);
            if let Some(path) = path {
                segments.extend(path.split('/').filter(|s| !s.is_empty()));
            }
        }
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Storage(format!("{} falhou ({}): {}", action, status, body)))
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>, AppError> {
        let url = self.endpoint(&["object", "list", bucket], None)?;
        let response = self
            .authorized(self.http.post(url))
            .json(&json!({
                "prefix": prefix,
                "limit": 100,
                "offset": 0,
                "sortBy": { "column": "name", "order": "asc" },
            }))
            .send()
            .await?;

        let response = Self::check(response, "Listagem").await?;
        Ok(response.json().await?)
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&["object", bucket], Some(path))?;
        let response = self
            .authorized(self.http.post(url))
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, format!("max-age={}", cache_control))
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        Self::check(response, "Upload").await?;
        Ok(())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), AppError> {
        let url = self.endpoint(&["object", bucket], None)?;
        let response = self
            .authorized(self.http.delete(url))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        Self::check(response, "Remoção").await?;
        Ok(())
    }

    async fn create_signed_url(&self, bucket: &str, path: &str, expires_in: u64) -> Result<String, AppError> {
        let url = self.endpoint(&["object", "sign", bucket], Some(path))?;
        let response = self
            .authorized(self.http.post(url))
            .json(&json!({ "expiresIn": expires_in }))
            .send()
            .await?;

        let signed: SignedUrlResponse = Self::check(response, "Assinatura").await?.json().await?;
        // A API devolve o caminho relativo a /storage/v1
        Ok(format!("{}/storage/v1{}", self.base_url, signed.signed_url))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AppError> {
        // Só baixamos do nosso próprio storage
        if !url.starts_with(&format!("{}/storage/v1/", self.base_url)) {
            return Err(AppError::invalid_field("url", "URL de download não pertence ao armazenamento."));
        }

        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Arquivo"));
        }
        let response = Self::check(response, "Download").await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabaseStorage {
        SupabaseStorage::new(reqwest::Client::new(), "https://abc.supabase.co/", "key")
    }

    #[test]
    fn endpoints_encode_each_segment() {
        let url = storage()
            .endpoint(&["object", "documents"], Some("owners/123/contrato final.pdf"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/storage/v1/object/documents/owners/123/contrato%20final.pdf"
        );

        let list = storage().endpoint(&["object", "list", "documents"], None).unwrap();
        assert_eq!(list.as_str(), "https://abc.supabase.co/storage/v1/object/list/documents");
    }

    #[tokio::test]
    async fn download_refuses_foreign_urls() {
        let result = storage().download("https://evil.example.com/file.pdf").await;
        assert!(matches!(result, Err(AppError::InvalidField { field, .. }) if field == "url"));
    }
}
