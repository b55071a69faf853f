// src/models/storage.rs
// Arquivos anexados às entidades, guardados no bucket de documentos.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{common::error::AppError, models::person::PersonRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Owner,
    Lessee,
    Contract,
    RealEstate,
}

impl EntityKind {
    /// Pasta do bucket onde ficam os arquivos desse tipo de entidade
    pub fn folder(&self) -> &'static str {
        match self {
            EntityKind::Owner => "owners",
            EntityKind::Lessee => "lessees",
            EntityKind::Contract => "contracts",
            EntityKind::RealEstate => "real-estates",
        }
    }
}

impl From<PersonRole> for EntityKind {
    fn from(role: PersonRole) -> Self {
        match role {
            PersonRole::Owner => EntityKind::Owner,
            PersonRole::Lessee => EntityKind::Lessee,
        }
    }
}

/// Entrada da listagem do bucket
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<ObjectMetadata>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectMetadata {
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "mimetype")]
    pub mime_type: Option<String>,
}

impl ObjectEntry {
    pub fn size(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.size)
    }
}

/// Arquivo já salvo, com link temporário para download
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredFile {
    pub name: String,
    pub path: String,
    pub size: Option<u64>,
    pub updated_at: Option<String>,
    pub signed_url: String,
}

/// Arquivo recebido no upload (multipart)
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Regras do bucket: onde cada entidade guarda seus arquivos e o que é aceito.
#[derive(Debug, Clone)]
pub struct FileSyncPolicy {
    pub bucket: String,
    pub max_files: usize,
    pub max_file_bytes: usize,
    pub allowed_content_type: &'static str,
    pub cache_control: &'static str,
    /// Validade dos links assinados, em segundos
    pub signed_url_ttl: u64,
}

impl FileSyncPolicy {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            max_files: 3,
            max_file_bytes: 2 * 1024 * 1024,
            allowed_content_type: "application/pdf",
            cache_control: "3600",
            signed_url_ttl: 60 * 60,
        }
    }

    pub fn folder(&self, kind: EntityKind, id: Uuid) -> String {
        format!("{}/{}", kind.folder(), id)
    }

    pub fn path(&self, kind: EntityKind, id: Uuid, name: &str) -> String {
        format!("{}/{}", self.folder(kind, id), name)
    }

    /// Tamanho e tipo, conferidos antes de qualquer chamada ao bucket
    pub fn check_file(&self, file: &UploadFile) -> Result<(), AppError> {
        if file.bytes.len() > self.max_file_bytes {
            return Err(AppError::FileRejected(format!(
                "O arquivo '{}' excede o limite de {} MB.",
                file.name,
                self.max_file_bytes / (1024 * 1024)
            )));
        }
        if file.content_type != self.allowed_content_type {
            return Err(AppError::FileRejected(format!(
                "O arquivo '{}' não é um PDF.",
                file.name
            )));
        }
        Ok(())
    }
}

/// Fica só o último componente do caminho ("../a/b.pdf" -> "b.pdf")
pub fn sanitize_file_name(raw: &str) -> Result<String, AppError> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::FileRejected("Nome de arquivo inválido.".into()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_namespaced_by_entity() {
        let policy = FileSyncPolicy::new("documents");
        let id = Uuid::nil();
        assert_eq!(
            policy.path(EntityKind::RealEstate, id, "laudo.pdf"),
            "real-estates/00000000-0000-0000-0000-000000000000/laudo.pdf"
        );
        assert_eq!(EntityKind::from(PersonRole::Lessee).folder(), "lessees");
    }

    #[test]
    fn file_names_lose_directories() {
        assert_eq!(sanitize_file_name("../../etc/contrato.pdf").unwrap(), "contrato.pdf");
        assert_eq!(sanitize_file_name("C:\\docs\\rg.pdf").unwrap(), "rg.pdf");
        assert!(sanitize_file_name("pasta/").is_err());
        assert!(sanitize_file_name("..").is_err());
    }
}
