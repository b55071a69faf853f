// src/services/real_estate_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Filter, WritePayload},
    models::{
        person::Person,
        real_estate::{
            NewRealEstate, RealEstate, RealEstateDetail, RealEstateFilter, RealEstatePatch,
            REAL_ESTATE_DETAIL_SELECT,
        },
    },
    services::{entity_service::EntityService, location_service::LocationService, person_service::check_parties},
};

#[derive(Clone)]
pub struct RealEstateService {
    real_estates: EntityService<RealEstate>,
    people: EntityService<Person>,
    locations: LocationService,
}

impl RealEstateService {
    pub fn new(
        real_estates: EntityService<RealEstate>,
        people: EntityService<Person>,
        locations: LocationService,
    ) -> Self {
        Self {
            real_estates,
            people,
            locations,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<RealEstate>, AppError> {
        self.real_estates.get_all().await
    }

    /// Tenta o join; se falhar, busca os imóveis e resolve cada relação à parte.
    pub async fn list_details(&self, filters: &[Filter]) -> Result<Vec<RealEstateDetail>, AppError> {
        match self.real_estates.joined(REAL_ESTATE_DETAIL_SELECT, filters).await {
            Ok(details) => Ok(details),
            Err(e) => {
                tracing::warn!("Consulta de imóveis com relacionamentos falhou, buscando sem join: {}", e);
                let rows = self.real_estates.list_where(filters).await?;
                let mut details = Vec::with_capacity(rows.len());
                for row in rows {
                    details.push(self.attach(row).await?);
                }
                Ok(details)
            }
        }
    }

    pub async fn list(&self, filter: &RealEstateFilter) -> Result<Vec<RealEstateDetail>, AppError> {
        Ok(self
            .list_details(&[])
            .await?
            .into_iter()
            .filter(|d| filter.matches(&d.real_estate))
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<RealEstate, AppError> {
        self.real_estates.get_by_id(id).await
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<RealEstateDetail, AppError> {
        let row = self.real_estates.get_by_id(id).await?;
        self.attach(row).await
    }

    async fn attach(&self, real_estate: RealEstate) -> Result<RealEstateDetail, AppError> {
        let city = self.locations.find_city(Some(real_estate.city_id)).await?;
        let owner = self.people.find(real_estate.owner_id).await?;
        let lessee = match real_estate.lessee_id {
            Some(id) => self.people.find(id).await?,
            None => None,
        };
        Ok(RealEstateDetail {
            real_estate,
            city,
            owner,
            lessee,
        })
    }

    pub async fn create(&self, mut payload: NewRealEstate) -> Result<RealEstate, AppError> {
        payload.prepare()?;
        check_parties(&self.people, Some(payload.owner_id), payload.lessee_id).await?;
        self.real_estates.create(payload).await
    }

    pub async fn update(&self, id: Uuid, mut patch: RealEstatePatch) -> Result<RealEstate, AppError> {
        patch.prepare()?;
        check_parties(&self.people, patch.owner_id, patch.lessee_id).await?;
        self.real_estates.update(id, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.real_estates.delete(id).await
    }
}
