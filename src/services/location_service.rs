// src/services/location_service.rs

use crate::{
    common::error::AppError,
    db::Filter,
    models::location::{City, CityWithState, MaritalStatus, State},
    services::entity_service::EntityService,
};

#[derive(Clone)]
pub struct LocationService {
    states: EntityService<State>,
    cities: EntityService<City>,
    marital_statuses: EntityService<MaritalStatus>,
}

impl LocationService {
    pub fn new(
        states: EntityService<State>,
        cities: EntityService<City>,
        marital_statuses: EntityService<MaritalStatus>,
    ) -> Self {
        Self {
            states,
            cities,
            marital_statuses,
        }
    }

    pub async fn list_states(&self) -> Result<Vec<State>, AppError> {
        self.states.get_all().await
    }

    pub async fn list_cities(&self, state_id: i32) -> Result<Vec<City>, AppError> {
        self.cities.list_where(&[Filter::eq("state_id", state_id)]).await
    }

    pub async fn list_marital_statuses(&self) -> Result<Vec<MaritalStatus>, AppError> {
        self.marital_statuses.get_all().await
    }

    pub async fn find_marital_status(&self, id: Option<i32>) -> Result<Option<MaritalStatus>, AppError> {
        match id {
            Some(id) => self.marital_statuses.find(id).await,
            None => Ok(None),
        }
    }

    pub async fn get_city(&self, id: i32) -> Result<CityWithState, AppError> {
        let city = self.cities.get_by_id(id).await?;
        let state = self.states.find(city.state_id).await?;
        Ok(CityWithState { city, state })
    }

    /// Igual a `get_city`, mas cidade ausente vira `None`
    pub async fn find_city(&self, id: Option<i32>) -> Result<Option<CityWithState>, AppError> {
        let Some(id) = id else {
            return Ok(None);
        };
        match self.cities.find(id).await? {
            Some(city) => {
                let state = self.states.find(city.state_id).await?;
                Ok(Some(CityWithState { city, state }))
            }
            None => Ok(None),
        }
    }

    /// Busca pela sigla, sem diferenciar maiúsculas
    pub async fn find_state_by_uf(&self, uf: &str) -> Result<Option<State>, AppError> {
        let uf = uf.trim();
        Ok(self
            .list_states()
            .await?
            .into_iter()
            .find(|s| s.uf.trim().eq_ignore_ascii_case(uf)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::db::{memory_store::MemoryStore, RecordStore};

    /// SP com duas cidades, RJ com uma, e os estados civis
    pub(crate) async fn seeded() -> LocationService {
        let states = MemoryStore::<State>::new();
        states.insert(json!({ "id": 25, "uf": "SP", "name": "São Paulo" })).await.unwrap();
        states.insert(json!({ "id": 19, "uf": "RJ", "name": "Rio de Janeiro" })).await.unwrap();

        let cities = MemoryStore::<City>::new();
        cities.insert(json!({ "id": 100, "state_id": 25, "name": "São Paulo" })).await.unwrap();
        cities.insert(json!({ "id": 101, "state_id": 25, "name": "Campinas" })).await.unwrap();
        cities.insert(json!({ "id": 200, "state_id": 19, "name": "Niterói" })).await.unwrap();

        let marital = MemoryStore::<MaritalStatus>::new();
        marital.insert(json!({ "id": 1, "name": "Solteiro(a)" })).await.unwrap();
        marital.insert(json!({ "id": 2, "name": "Casado(a)" })).await.unwrap();

        LocationService::new(
            EntityService::new(Arc::new(states)),
            EntityService::new(Arc::new(cities)),
            EntityService::new(Arc::new(marital)),
        )
    }

    #[tokio::test]
    async fn cities_are_scoped_to_their_state() {
        let locations = seeded().await;
        let names: Vec<String> = locations.list_cities(25).await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Campinas", "São Paulo"]);
    }

    #[tokio::test]
    async fn city_comes_with_its_state() {
        let locations = seeded().await;
        let city = locations.get_city(200).await.unwrap();
        assert_eq!(city.state.unwrap().uf, "RJ");
        assert!(locations.find_city(Some(999)).await.unwrap().is_none());
        assert!(matches!(locations.get_city(999).await, Err(AppError::NotFound("Cidade"))));
    }

    #[tokio::test]
    async fn uf_lookup_ignores_case() {
        let locations = seeded().await;
        assert_eq!(locations.find_state_by_uf("sp").await.unwrap().unwrap().id, 25);
        assert!(locations.find_state_by_uf("XX").await.unwrap().is_none());
    }
}
