// src/db/pg_store.rs

use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::{
    common::{
        db_utils::{map_db_error, quote_ident},
        error::AppError,
    },
    db::record::{Filter, FilterValue, Record, RecordStore},
};

// Colunas que o banco preenche sozinho e nunca aceitamos do payload
const MANAGED_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Repositório genérico de uma tabela do Postgres.
///
/// Escritas recebem o payload já serializado em JSON e passam por
/// `jsonb_populate_record`, então só chegam ao banco as colunas que existem
/// na struct tipada do payload.
pub struct PgStore<T> {
    pool: PgPool,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for PgStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> PgStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &[Filter]) -> Result<(), AppError> {
    for (i, filter) in filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        let column = quote_ident(filter.column)?;
        match &filter.value {
            // Enums do Postgres não comparam com TEXT sem cast
            FilterValue::Text(value) => {
                qb.push(format!("base.{}::text = ", column));
                qb.push_bind(value.clone());
            }
            FilterValue::Uuid(value) => {
                qb.push(format!("base.{} = ", column));
                qb.push_bind(*value);
            }
            FilterValue::Int(value) => {
                qb.push(format!("base.{} = ", column));
                qb.push_bind(*value);
            }
        }
    }
    Ok(())
}

fn order_clause<T: Record>() -> Result<String, AppError> {
    Ok(format!(
        " ORDER BY base.{} {}",
        quote_ident(T::ORDER.column())?,
        if T::ORDER.is_desc() { "DESC" } else { "ASC" }
    ))
}

fn writable_columns(values: &Value) -> Result<Vec<String>, AppError> {
    let object = values
        .as_object()
        .ok_or_else(|| AppError::invalid_field("payload", "O corpo deve ser um objeto JSON."))?;

    object
        .keys()
        .filter(|key| !MANAGED_COLUMNS.contains(&key.as_str()))
        .map(|key| quote_ident(key))
        .collect()
}

#[async_trait]
impl<T: Record> RecordStore<T> for PgStore<T> {
    async fn list(&self, filters: &[Filter]) -> Result<Vec<T>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT base.* FROM {} AS base", T::TABLE));
        push_filters(&mut qb, filters)?;
        qb.push(order_clause::<T>()?);

        qb.build_query_as::<T>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(T::TABLE, e))
    }

    async fn get(&self, id: T::Id) -> Result<Option<T>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(T::TABLE, e))
    }

    async fn insert(&self, values: Value) -> Result<T, AppError> {
        let columns = writable_columns(&values)?;
        if columns.is_empty() {
            return Err(AppError::invalid_field("payload", "Nenhum campo informado."));
        }
        let columns = columns.join(", ");

        let sql = format!(
            "INSERT INTO {table} ({columns}) \
             SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1) \
             RETURNING *",
            table = T::TABLE,
            columns = columns,
        );

        sqlx::query_as::<_, T>(&sql)
            .bind(values)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(T::TABLE, e))
    }

    async fn update(&self, id: T::Id, patch: Value) -> Result<Option<T>, AppError> {
        let columns = writable_columns(&patch)?;

        let mut targets = columns.clone();
        let mut sources: Vec<String> = columns.iter().map(|c| format!("patch.{}", c)).collect();
        if T::TRACKS_UPDATES {
            targets.push("\"updated_at\"".to_string());
            sources.push("NOW()".to_string());
        }

        if targets.is_empty() {
            return self.get(id).await;
        }

        // jsonb_populate_record(base, ...) parte da linha atual, então as
        // chaves ausentes no patch preservam o valor existente.
        let sql = format!(
            "UPDATE {table} AS base SET ({targets}) = \
             (SELECT {sources} FROM jsonb_populate_record(base, $2) AS patch) \
             WHERE base.id = $1 \
             RETURNING base.*",
            table = T::TABLE,
            targets = targets.join(", "),
            sources = sources.join(", "),
        );

        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(patch)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(T::TABLE, e))
    }

    async fn delete(&self, id: T::Id) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(T::TABLE, e))?;

        Ok(result.rows_affected())
    }

    async fn list_joined(&self, select: &str, filters: &[Filter]) -> Result<Vec<Value>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(select);
        push_filters(&mut qb, filters)?;
        qb.push(order_clause::<T>()?);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(T::TABLE, e))?;

        rows.iter()
            .map(|row| row.try_get::<Value, _>("doc").map_err(AppError::from))
            .collect()
    }
}
