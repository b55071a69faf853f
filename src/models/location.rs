// src/models/location.rs
// Tabelas de referência estáticas: estados, cidades e estados civis.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::db::record::{Ordering, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct State {
    pub id: i32,
    #[schema(example = "SP")]
    pub uf: String,
    #[schema(example = "São Paulo")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct City {
    pub id: i32,
    pub state_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaritalStatus {
    pub id: i32,
    pub name: String,
}

/// Cidade com o estado embutido (o `cities(*, states(*))` do front antigo)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityWithState {
    #[serde(flatten)]
    pub city: City,
    pub state: Option<State>,
}

impl Record for State {
    type Id = i32;
    const TABLE: &'static str = "states";
    const LABEL: &'static str = "Estado";
    const ORDER: Ordering = Ordering::Asc("name");
    const TRACKS_UPDATES: bool = false;

    fn id(&self) -> i32 {
        self.id
    }
}

impl Record for City {
    type Id = i32;
    const TABLE: &'static str = "cities";
    const LABEL: &'static str = "Cidade";
    const ORDER: Ordering = Ordering::Asc("name");
    const TRACKS_UPDATES: bool = false;

    fn id(&self) -> i32 {
        self.id
    }
}

impl Record for MaritalStatus {
    type Id = i32;
    const TABLE: &'static str = "marital_statuses";
    const LABEL: &'static str = "Estado civil";
    const ORDER: Ordering = Ordering::Asc("name");
    const TRACKS_UPDATES: bool = false;

    fn id(&self) -> i32 {
        self.id
    }
}
