// src/services/file_sync_service.rs
// Anexos (PDF) de proprietários, inquilinos, contratos e imóveis.

use std::{collections::BTreeSet, sync::Arc};

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::storage::{sanitize_file_name, EntityKind, FileSyncPolicy, ObjectEntry, StoredFile, UploadFile},
    services::storage_service::ObjectStorage,
};

// O storage cria este arquivo para representar pastas vazias
const FOLDER_PLACEHOLDER: &str = ".emptyFolderPlaceholder";

#[derive(Clone)]
pub struct FileSyncService {
    storage: Arc<dyn ObjectStorage>,
    policy: FileSyncPolicy,
}

impl FileSyncService {
    pub fn new(storage: Arc<dyn ObjectStorage>, policy: FileSyncPolicy) -> Self {
        Self { storage, policy }
    }

    pub fn policy(&self) -> &FileSyncPolicy {
        &self.policy
    }

    async fn list_folder(&self, folder: &str) -> Result<Vec<ObjectEntry>, AppError> {
        Ok(self
            .storage
            .list(&self.policy.bucket, folder)
            .await?
            .into_iter()
            .filter(|entry| !entry.name.is_empty() && entry.name != FOLDER_PLACEHOLDER)
            .collect())
    }

    /// Lista a pasta da entidade e assina um link para cada arquivo
    pub async fn load_stored_files(&self, kind: EntityKind, id: Uuid) -> Result<Vec<StoredFile>, AppError> {
        let folder = self.policy.folder(kind, id);
        let entries = self.list_folder(&folder).await?;

        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = format!("{}/{}", folder, entry.name);
            let signed_url = self
                .storage
                .create_signed_url(&self.policy.bucket, &path, self.policy.signed_url_ttl)
                .await?;
            files.push(StoredFile {
                size: entry.size(),
                updated_at: entry.updated_at.clone(),
                name: entry.name,
                path,
                signed_url,
            });
        }
        Ok(files)
    }

    /// Aceita o lote inteiro ou nenhum arquivo. Tamanho e tipo são conferidos
    /// antes de falar com o storage; depois, o total de nomes (existentes +
    /// novos) não pode passar do limite. Se o storage falhar no meio do lote,
    /// os arquivos novos já enviados são removidos; um arquivo que substituiu
    /// outro de mesmo nome não tem como voltar ao conteúdo antigo.
    pub async fn upload_files(
        &self,
        kind: EntityKind,
        id: Uuid,
        files: Vec<UploadFile>,
    ) -> Result<Vec<StoredFile>, AppError> {
        if files.is_empty() {
            return Err(AppError::FileRejected("Nenhum arquivo enviado.".into()));
        }

        let mut prepared = Vec::with_capacity(files.len());
        for mut file in files {
            file.name = sanitize_file_name(&file.name)?;
            self.policy.check_file(&file)?;
            prepared.push(file);
        }

        let folder = self.policy.folder(kind, id);
        let existing: BTreeSet<String> = self
            .list_folder(&folder)
            .await?
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        let mut names = existing.clone();
        names.extend(prepared.iter().map(|f| f.name.clone()));
        if names.len() > self.policy.max_files {
            return Err(AppError::FileRejected(format!(
                "Limite de {} arquivos por cadastro atingido.",
                self.policy.max_files
            )));
        }

        let mut sent = Vec::with_capacity(prepared.len());
        for file in prepared {
            tracing::info!("Enviando '{}' para {}", file.name, folder);
            let path = format!("{}/{}", folder, file.name);
            let is_new = !existing.contains(&file.name);
            if let Err(e) = self.put_overwrite(&folder, file).await {
                self.discard(&sent).await;
                return Err(e);
            }
            if is_new {
                sent.push(path);
            }
        }

        self.load_stored_files(kind, id).await
    }

    async fn discard(&self, paths: &[String]) {
        if paths.is_empty() {
            return;
        }
        tracing::warn!("Envio interrompido, removendo {} arquivo(s) já enviados", paths.len());
        if let Err(e) = self.storage.remove(&self.policy.bucket, paths).await {
            tracing::error!("Falha ao desfazer envio parcial: {}", e);
        }
    }

    /// Grava substituindo um arquivo de mesmo nome: lista, remove e envia.
    /// Não é atômico; dois envios simultâneos do mesmo nome podem se
    /// intercalar entre a remoção e o upload.
    pub async fn put_overwrite(&self, folder: &str, file: UploadFile) -> Result<(), AppError> {
        let path = format!("{}/{}", folder, file.name);

        let exists = self
            .list_folder(folder)
            .await?
            .iter()
            .any(|entry| entry.name == file.name);
        if exists {
            self.storage
                .remove(&self.policy.bucket, std::slice::from_ref(&path))
                .await?;
        }

        self.storage
            .upload(
                &self.policy.bucket,
                &path,
                file.bytes,
                &file.content_type,
                self.policy.cache_control,
            )
            .await
    }

    pub async fn download(&self, url: &str) -> Result<Vec<u8>, AppError> {
        self.storage.download(url).await
    }

    pub async fn delete_stored_file(&self, kind: EntityKind, id: Uuid, name: &str) -> Result<(), AppError> {
        let name = sanitize_file_name(name)?;
        let path = self.policy.path(kind, id, &name);
        tracing::info!("Removendo arquivo {}", path);
        self.storage.remove(&self.policy.bucket, &[path]).await
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use async_trait::async_trait;

    use super::*;

    /// Bucket em memória que registra as operações feitas
    #[derive(Default)]
    struct MemoryBucket {
        objects: Mutex<BTreeMap<String, Vec<u8>>>,
        log: Mutex<Vec<String>>,
        calls: AtomicUsize,
        // Uploads cujo caminho termina com este nome falham
        fail_on: Mutex<Option<String>>,
    }

    impl MemoryBucket {
        fn record(&self, op: String) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push(op);
        }
    }

    #[async_trait]
    impl ObjectStorage for MemoryBucket {
        async fn list(&self, _bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>, AppError> {
            self.record(format!("list {prefix}"));
            let objects = self.objects.lock().unwrap();
            Ok(objects
                .keys()
                .filter_map(|path| path.strip_prefix(&format!("{prefix}/")).map(str::to_string))
                .map(|name| ObjectEntry {
                    name,
                    id: None,
                    updated_at: None,
                    metadata: None,
                })
                .collect())
        }

        async fn upload(
            &self,
            _bucket: &str,
            path: &str,
            bytes: Vec<u8>,
            content_type: &str,
            cache_control: &str,
        ) -> Result<(), AppError> {
            self.record(format!("upload {path} {content_type} {cache_control}"));
            if let Some(name) = self.fail_on.lock().unwrap().as_deref() {
                if path.ends_with(name) {
                    return Err(AppError::Storage("Internal Server Error".into()));
                }
            }
            let mut objects = self.objects.lock().unwrap();
            if objects.contains_key(path) {
                return Err(AppError::Storage("The resource already exists".into()));
            }
            objects.insert(path.to_string(), bytes);
            Ok(())
        }

        async fn remove(&self, _bucket: &str, paths: &[String]) -> Result<(), AppError> {
            self.record(format!("remove {}", paths.join(",")));
            let mut objects = self.objects.lock().unwrap();
            for path in paths {
                objects.remove(path);
            }
            Ok(())
        }

        async fn create_signed_url(&self, bucket: &str, path: &str, expires_in: u64) -> Result<String, AppError> {
            self.record(format!("sign {path}"));
            Ok(format!("https://storage.test/{bucket}/{path}?ttl={expires_in}"))
        }

        async fn download(&self, url: &str) -> Result<Vec<u8>, AppError> {
            self.record(format!("download {url}"));
            let objects = self.objects.lock().unwrap();
            objects
                .iter()
                .find(|(path, _)| url.contains(path.as_str()))
                .map(|(_, bytes)| bytes.clone())
                .ok_or(AppError::NotFound("Arquivo"))
        }
    }

    fn pdf(name: &str, size: usize) -> UploadFile {
        UploadFile {
            name: name.into(),
            content_type: "application/pdf".into(),
            bytes: vec![b'%'; size],
        }
    }

    fn service() -> (Arc<MemoryBucket>, FileSyncService) {
        let bucket = Arc::new(MemoryBucket::default());
        let service = FileSyncService::new(bucket.clone(), FileSyncPolicy::new("documents"));
        (bucket, service)
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_any_call() {
        let (bucket, files) = service();
        let result = files
            .upload_files(EntityKind::Contract, Uuid::new_v4(), vec![pdf("ok.pdf", 10), pdf("grande.pdf", 3 * 1024 * 1024)])
            .await;
        assert!(matches!(result, Err(AppError::FileRejected(_))));
        assert_eq!(bucket.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_pdf_is_rejected_before_any_call() {
        let (bucket, files) = service();
        let mut image = pdf("foto.png", 10);
        image.content_type = "image/png".into();
        let result = files.upload_files(EntityKind::Owner, Uuid::new_v4(), vec![image]).await;
        assert!(matches!(result, Err(AppError::FileRejected(_))));
        assert_eq!(bucket.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fourth_file_is_rejected_and_nothing_is_uploaded() {
        let (bucket, files) = service();
        let id = Uuid::new_v4();
        files
            .upload_files(EntityKind::Lessee, id, vec![pdf("a.pdf", 10), pdf("b.pdf", 10), pdf("c.pdf", 10)])
            .await
            .unwrap();

        let result = files.upload_files(EntityKind::Lessee, id, vec![pdf("d.pdf", 10)]).await;
        assert!(matches!(result, Err(AppError::FileRejected(_))));
        assert_eq!(bucket.objects.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn same_name_overwrites_instead_of_counting_twice() {
        let (bucket, files) = service();
        let id = Uuid::new_v4();
        files
            .upload_files(EntityKind::RealEstate, id, vec![pdf("a.pdf", 1), pdf("b.pdf", 1), pdf("c.pdf", 1)])
            .await
            .unwrap();

        let stored = files
            .upload_files(EntityKind::RealEstate, id, vec![pdf("b.pdf", 5)])
            .await
            .unwrap();
        assert_eq!(stored.len(), 3);

        let path = format!("real-estates/{id}/b.pdf");
        assert_eq!(bucket.objects.lock().unwrap()[&path].len(), 5);
        let log = bucket.log.lock().unwrap();
        let remove_at = log.iter().position(|op| op == &format!("remove {path}")).unwrap();
        let upload_at = log.iter().rposition(|op| op.starts_with(&format!("upload {path}"))).unwrap();
        assert!(remove_at < upload_at);
        assert!(log[upload_at].ends_with("application/pdf 3600"));
    }

    #[tokio::test]
    async fn storage_failure_mid_batch_removes_new_files() {
        let (bucket, files) = service();
        let id = Uuid::new_v4();
        files.upload_files(EntityKind::Contract, id, vec![pdf("antigo.pdf", 1)]).await.unwrap();
        *bucket.fail_on.lock().unwrap() = Some("c.pdf".into());

        let result = files
            .upload_files(EntityKind::Contract, id, vec![pdf("a.pdf", 1), pdf("c.pdf", 1)])
            .await;
        assert!(matches!(result, Err(AppError::Storage(_))));

        let objects = bucket.objects.lock().unwrap();
        let names: Vec<&String> = objects.keys().collect();
        assert_eq!(names, vec![&format!("contracts/{id}/antigo.pdf")]);
    }

    #[tokio::test]
    async fn stored_files_carry_signed_urls_for_one_hour() {
        let (_, files) = service();
        let id = Uuid::new_v4();
        files.upload_files(EntityKind::Owner, id, vec![pdf("../rg.pdf", 1)]).await.unwrap();

        let stored = files.load_stored_files(EntityKind::Owner, id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "rg.pdf");
        assert_eq!(stored[0].path, format!("owners/{id}/rg.pdf"));
        assert!(stored[0].signed_url.ends_with("?ttl=3600"));

        let bytes = files.download(&stored[0].signed_url).await.unwrap();
        assert_eq!(bytes, vec![b'%']);

        files.delete_stored_file(EntityKind::Owner, id, "rg.pdf").await.unwrap();
        assert!(files.load_stored_files(EntityKind::Owner, id).await.unwrap().is_empty());
    }
}
