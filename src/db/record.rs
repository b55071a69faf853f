// src/db/record.rs
//
// Contrato genérico de acesso a dados. Cada tabela vira um `Record`, e os
// serviços falam com um `RecordStore<T>` sem saber se por trás existe o
// Postgres (`PgStore`) ou o armazenamento em memória dos testes.

use std::fmt::Display;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::{postgres::PgRow, FromRow, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;

/// Tipos de chave primária aceitos (UUID nas entidades, SERIAL nas tabelas de referência)
pub trait RecordId:
    Copy
    + Display
    + PartialEq
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
    + sqlx::Type<Postgres>
    + for<'q> sqlx::Encode<'q, Postgres>
    + 'static
{
    /// Gera a próxima chave no armazenamento em memória
    #[cfg(test)]
    fn generate(seq: i64) -> Self;
}

impl RecordId for Uuid {
    #[cfg(test)]
    fn generate(_seq: i64) -> Self {
        Uuid::new_v4()
    }
}

impl RecordId for i32 {
    #[cfg(test)]
    fn generate(seq: i64) -> Self {
        seq as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Asc(&'static str),
    Desc(&'static str),
}

impl Ordering {
    pub fn column(&self) -> &'static str {
        match self {
            Ordering::Asc(c) | Ordering::Desc(c) => c,
        }
    }

    pub fn is_desc(&self) -> bool {
        matches!(self, Ordering::Desc(_))
    }
}

pub trait Record:
    Clone + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static + for<'r> FromRow<'r, PgRow>
{
    type Id: RecordId;

    const TABLE: &'static str;
    /// Nome exibido nos erros de "não encontrado"
    const LABEL: &'static str;
    const ORDER: Ordering;
    /// A tabela tem coluna `updated_at`?
    const TRACKS_UPDATES: bool = true;

    fn id(&self) -> Self::Id;
}

/// Corpo de escrita (insert/patch). `prepare` normaliza e valida o payload
/// antes de qualquer chamada ao banco.
pub trait WritePayload: Serialize + Send + Sync {
    fn prepare(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Uuid(Uuid),
    Int(i32),
}

impl From<Uuid> for FilterValue {
    fn from(v: Uuid) -> Self {
        FilterValue::Uuid(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Int(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl FilterValue {
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Text(s) => Value::String(s.clone()),
            FilterValue::Uuid(u) => Value::String(u.to_string()),
            FilterValue::Int(i) => Value::from(*i),
        }
    }
}

/// Igualdade simples em uma coluna (`.eq('role', 'OWNER')`)
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: FilterValue,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<FilterValue>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Todas as linhas que passam nos filtros, na ordem padrão da tabela
    async fn list(&self, filters: &[Filter]) -> Result<Vec<T>, AppError>;

    async fn get(&self, id: T::Id) -> Result<Option<T>, AppError>;

    /// Insere as colunas presentes no objeto JSON e devolve a linha persistida
    async fn insert(&self, values: Value) -> Result<T, AppError>;

    /// Aplica um patch parcial: chaves ausentes mantêm o valor atual.
    /// `None` quando o id não existe.
    async fn update(&self, id: T::Id, patch: Value) -> Result<Option<T>, AppError>;

    /// Quantidade de linhas removidas (0 quando já não existia)
    async fn delete(&self, id: T::Id) -> Result<u64, AppError>;

    /// Consulta com relacionamentos. `select` produz uma coluna `doc` (jsonb)
    /// a partir da tabela base com alias `base`.
    async fn list_joined(&self, _select: &str, _filters: &[Filter]) -> Result<Vec<Value>, AppError> {
        Err(AppError::JoinUnavailable)
    }
}
