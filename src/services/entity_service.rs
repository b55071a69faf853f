// src/services/entity_service.rs

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    common::error::AppError,
    db::record::{Filter, Record, RecordStore, WritePayload},
};

/// CRUD genérico de uma tabela. Os serviços de cada entidade montam suas
/// regras (escopo por `role`, relacionamentos) em cima deste.
pub struct EntityService<T: Record> {
    store: Arc<dyn RecordStore<T>>,
}

impl<T: Record> Clone for EntityService<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: Record> EntityService<T> {
    pub fn new(store: Arc<dyn RecordStore<T>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn RecordStore<T> {
        self.store.as_ref()
    }

    pub async fn get_all(&self) -> Result<Vec<T>, AppError> {
        self.store.list(&[]).await
    }

    pub async fn list_where(&self, filters: &[Filter]) -> Result<Vec<T>, AppError> {
        self.store.list(filters).await
    }

    pub async fn find(&self, id: T::Id) -> Result<Option<T>, AppError> {
        self.store.get(id).await
    }

    pub async fn get_by_id(&self, id: T::Id) -> Result<T, AppError> {
        self.store.get(id).await?.ok_or(AppError::NotFound(T::LABEL))
    }

    pub async fn create<P: WritePayload>(&self, payload: P) -> Result<T, AppError> {
        self.create_scoped(payload, &[]).await
    }

    /// Insere o payload com colunas fixas por cima (ex.: `role`, `person_id`)
    pub async fn create_scoped<P: WritePayload>(&self, mut payload: P, stamp: &[Filter]) -> Result<T, AppError> {
        payload.prepare()?;

        let mut values = serde_json::to_value(&payload)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar {}: {}", T::TABLE, e))?;
        if let Value::Object(map) = &mut values {
            for filter in stamp {
                map.insert(filter.column.to_string(), filter.value.to_json());
            }
        }

        let record = self.store.insert(values).await?;
        tracing::info!("{} criado(a): {}", T::LABEL, record.id());
        Ok(record)
    }

    pub async fn update<P: WritePayload>(&self, id: T::Id, mut patch: P) -> Result<T, AppError> {
        patch.prepare()?;

        let values = serde_json::to_value(&patch)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar {}: {}", T::TABLE, e))?;

        self.store
            .update(id, values)
            .await?
            .ok_or(AppError::NotFound(T::LABEL))
    }

    /// Linhas com relacionamentos numa consulta só. Erro aqui (inclusive de
    /// decodificação) deixa o chamador cair na busca sem join.
    pub async fn joined<D: DeserializeOwned>(&self, select: &str, filters: &[Filter]) -> Result<Vec<D>, AppError> {
        self.store
            .list_joined(select, filters)
            .await?
            .into_iter()
            .map(|doc| {
                serde_json::from_value(doc)
                    .map_err(|e| AppError::from(anyhow::anyhow!("Linha de {} inválida: {}", T::TABLE, e)))
            })
            .collect()
    }

    /// Sem cascata; remover um id que já não existe não é erro.
    pub async fn delete(&self, id: T::Id) -> Result<(), AppError> {
        let removed = self.store.delete(id).await?;
        if removed == 0 {
            tracing::debug!("{} {} já não existia", T::LABEL, id);
        }
        Ok(())
    }
}
