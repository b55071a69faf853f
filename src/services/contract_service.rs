// src/services/contract_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Filter, WritePayload},
    models::{
        contract::{
            new_identifier, Contract, ContractDetail, ContractFilter, ContractPatch, NewContract,
            CONTRACT_DETAIL_SELECT,
        },
        person::Person,
        real_estate::RealEstate,
    },
    services::{entity_service::EntityService, person_service::check_parties},
};

#[derive(Clone)]
pub struct ContractService {
    contracts: EntityService<Contract>,
    people: EntityService<Person>,
    real_estates: EntityService<RealEstate>,
}

impl ContractService {
    pub fn new(
        contracts: EntityService<Contract>,
        people: EntityService<Person>,
        real_estates: EntityService<RealEstate>,
    ) -> Self {
        Self {
            contracts,
            people,
            real_estates,
        }
    }

    pub fn next_identifier(&self) -> String {
        new_identifier()
    }

    pub async fn get_all(&self) -> Result<Vec<Contract>, AppError> {
        self.contracts.get_all().await
    }

    pub async fn list_details(&self, filters: &[Filter]) -> Result<Vec<ContractDetail>, AppError> {
        match self.contracts.joined(CONTRACT_DETAIL_SELECT, filters).await {
            Ok(details) => Ok(details),
            Err(e) => {
                tracing::warn!("Consulta de contratos com relacionamentos falhou, buscando sem join: {}", e);
                let rows = self.contracts.list_where(filters).await?;
                let mut details = Vec::with_capacity(rows.len());
                for row in rows {
                    details.push(self.attach(row).await?);
                }
                Ok(details)
            }
        }
    }

    pub async fn list(&self, filter: &ContractFilter) -> Result<Vec<ContractDetail>, AppError> {
        Ok(self
            .list_details(&[])
            .await?
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Contract, AppError> {
        self.contracts.get_by_id(id).await
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<ContractDetail, AppError> {
        let row = self.contracts.get_by_id(id).await?;
        self.attach(row).await
    }

    async fn attach(&self, contract: Contract) -> Result<ContractDetail, AppError> {
        let owner = self.people.find(contract.owner_id).await?;
        let lessee = match contract.lessee_id {
            Some(id) => self.people.find(id).await?,
            None => None,
        };
        let real_estate = self.real_estates.find(contract.real_estate_id).await?;
        Ok(ContractDetail {
            contract,
            owner,
            lessee,
            real_estate,
        })
    }

    pub async fn create(&self, mut payload: NewContract) -> Result<Contract, AppError> {
        payload.prepare()?;
        check_parties(&self.people, Some(payload.owner_id), payload.lessee_id).await?;
        self.contracts.create(payload).await
    }

    pub async fn update(&self, id: Uuid, mut patch: ContractPatch) -> Result<Contract, AppError> {
        patch.prepare()?;
        let current = self.contracts.get_by_id(id).await?;
        patch.check_against(&current)?;
        check_parties(&self.people, patch.owner_id, patch.lessee_id).await?;
        self.contracts.update(id, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.contracts.delete(id).await
    }
}
