// src/db/memory_store.rs
// Implementação em memória do `RecordStore`, usada pelos testes dos serviços.

use std::{
    marker::PhantomData,
    sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Mutex,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    common::error::AppError,
    db::record::{Filter, Record, RecordId, RecordStore},
};

struct Rows {
    seq: i64,
    rows: Vec<(i64, Map<String, Value>)>,
}

pub struct MemoryStore<T> {
    inner: Mutex<Rows>,
    unique: Vec<&'static str>,
    // Documentos devolvidos por `list_joined`; sem eles o join fica indisponível
    joined: Option<Vec<Value>>,
    calls: AtomicUsize,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Rows { seq: 0, rows: Vec::new() }),
            unique: Vec::new(),
            joined: None,
            calls: AtomicUsize::new(0),
            _record: PhantomData,
        }
    }

    /// Simula uma constraint UNIQUE (ex.: `persons_cpf_key`)
    pub fn with_unique(mut self, column: &'static str) -> Self {
        self.unique.push(column);
        self
    }

    /// Responde a consulta com relacionamentos com os documentos dados,
    /// no formato que o `to_jsonb` do Postgres produz
    pub fn with_joined(mut self, docs: Vec<Value>) -> Self {
        self.joined = Some(docs);
        self
    }

    /// Quantas operações chegaram ao "banco"
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
    }

    fn decode(row: &Map<String, Value>) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(row.clone()))
            .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("linha inválida: {}", e)))
    }

    fn matches(row: &Map<String, Value>, filters: &[Filter]) -> bool {
        filters
            .iter()
            .all(|f| row.get(f.column).cloned().unwrap_or(Value::Null) == f.value.to_json())
    }

    fn check_unique(&self, rows: &Rows, row: &Map<String, Value>, id: Option<T::Id>) -> Result<(), AppError> {
        for column in &self.unique {
            let candidate = row.get(*column).cloned().unwrap_or(Value::Null);
            let taken = !candidate.is_null()
                && rows.rows.iter().any(|(_, r)| {
                    r.get(*column) == Some(&candidate) && !id.is_some_and(|id| Self::id_matches(r, id))
                });
            if taken {
                return Err(AppError::ConstraintViolation { field: column.to_string() });
            }
        }
        Ok(())
    }

    fn id_matches(row: &Map<String, Value>, id: T::Id) -> bool {
        serde_json::to_value(id).ok().as_ref() == row.get("id")
    }
}

/// Linha no formato do `to_jsonb` do Postgres: timestamps no fuso da sessão
pub fn to_jsonb<S: Serialize>(row: &S) -> Value {
    let mut value = serde_json::to_value(row).expect("linha serializável");
    if let Value::Object(map) = &mut value {
        let offset = FixedOffset::west_opt(3 * 3600).expect("fuso válido");
        for key in ["created_at", "updated_at"] {
            if let Some(Value::String(ts)) = map.get_mut(key) {
                if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
                    *ts = parsed.with_timezone(&offset).to_rfc3339_opts(SecondsFormat::Micros, false);
                }
            }
        }
    }
    value
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(Value::Null) | None, Some(Value::Null) | None) => std::cmp::Ordering::Equal,
        (Some(Value::Null) | None, _) => std::cmp::Ordering::Less,
        (_, Some(Value::Null) | None) => std::cmp::Ordering::Greater,
        _ => std::cmp::Ordering::Equal,
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn list(&self, filters: &[Filter]) -> Result<Vec<T>, AppError> {
        self.touch();
        let inner = self.inner.lock().expect("memory store poisoned");
        let mut rows: Vec<&(i64, Map<String, Value>)> =
            inner.rows.iter().filter(|(_, row)| Self::matches(row, filters)).collect();

        let column = T::ORDER.column();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            compare(a.get(column), b.get(column)).then(seq_a.cmp(seq_b))
        });
        if T::ORDER.is_desc() {
            rows.reverse();
        }

        rows.into_iter().map(|(_, row)| Self::decode(row)).collect()
    }

    async fn get(&self, id: T::Id) -> Result<Option<T>, AppError> {
        self.touch();
        let inner = self.inner.lock().expect("memory store poisoned");
        inner
            .rows
            .iter()
            .find(|(_, row)| Self::id_matches(row, id))
            .map(|(_, row)| Self::decode(row))
            .transpose()
    }

    async fn insert(&self, values: Value) -> Result<T, AppError> {
        self.touch();
        let Value::Object(mut row) = values else {
            return Err(AppError::invalid_field("payload", "O corpo deve ser um objeto JSON."));
        };

        let mut inner = self.inner.lock().expect("memory store poisoned");
        self.check_unique(&inner, &row, None)?;

        inner.seq += 1;
        let seq = inner.seq;
        if !row.contains_key("id") {
            let id = T::Id::generate(seq);
            row.insert("id".into(), serde_json::to_value(id).unwrap_or(Value::Null));
        }
        if T::TRACKS_UPDATES {
            row.insert("created_at".into(), now());
            row.insert("updated_at".into(), now());
        }

        let record = Self::decode(&row)?;
        inner.rows.push((seq, row));
        Ok(record)
    }

    async fn update(&self, id: T::Id, patch: Value) -> Result<Option<T>, AppError> {
        self.touch();
        let Value::Object(patch) = patch else {
            return Err(AppError::invalid_field("payload", "O corpo deve ser um objeto JSON."));
        };

        let mut inner = self.inner.lock().expect("memory store poisoned");
        let Some(mut merged) = inner
            .rows
            .iter()
            .find(|(_, row)| Self::id_matches(row, id))
            .map(|(_, row)| row.clone())
        else {
            return Ok(None);
        };

        for (key, value) in patch {
            if key != "id" && key != "created_at" && key != "updated_at" {
                merged.insert(key, value);
            }
        }
        self.check_unique(&inner, &merged, Some(id))?;

        let Some((_, row)) = inner.rows.iter_mut().find(|(_, row)| Self::id_matches(row, id)) else {
            return Ok(None);
        };
        *row = merged;
        if T::TRACKS_UPDATES {
            row.insert("updated_at".into(), now());
        }

        Self::decode(row).map(Some)
    }

    async fn delete(&self, id: T::Id) -> Result<u64, AppError> {
        self.touch();
        let mut inner = self.inner.lock().expect("memory store poisoned");
        let before = inner.rows.len();
        inner.rows.retain(|(_, row)| !Self::id_matches(row, id));
        Ok((before - inner.rows.len()) as u64)
    }

    async fn list_joined(&self, _select: &str, filters: &[Filter]) -> Result<Vec<Value>, AppError> {
        self.touch();
        let Some(docs) = &self.joined else {
            return Err(AppError::JoinUnavailable);
        };
        Ok(docs
            .iter()
            .filter(|doc| doc.as_object().is_some_and(|row| Self::matches(row, filters)))
            .cloned()
            .collect())
    }
}
