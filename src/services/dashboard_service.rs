// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    models::{
        contract::{Contract, ContractStatus},
        dashboard::{DashboardSummary, StatusCount},
        real_estate::{RealEstate, StatusRealEstate},
    },
    services::{
        contract_service::ContractService, person_service::PeopleService,
        real_estate_service::RealEstateService,
    },
};

/// Contagens em uma passada só. Todos os status aparecem, mesmo com zero.
pub fn summarize(
    owners: usize,
    lessees: usize,
    real_estates: &[RealEstate],
    contracts: &[Contract],
) -> DashboardSummary {
    let mut by_estate = [0usize; StatusRealEstate::ALL.len()];
    for r in real_estates {
        if let Some(i) = StatusRealEstate::ALL.iter().position(|s| *s == r.status_real_estate) {
            by_estate[i] += 1;
        }
    }

    let mut by_contract = [0usize; ContractStatus::ALL.len()];
    for c in contracts {
        if let Some(i) = ContractStatus::ALL.iter().position(|s| *s == c.status) {
            by_contract[i] += 1;
        }
    }

    DashboardSummary {
        owners,
        lessees,
        real_estates: real_estates.len(),
        contracts: contracts.len(),
        real_estates_by_status: StatusRealEstate::ALL
            .iter()
            .zip(by_estate)
            .map(|(s, count)| StatusCount {
                status: s.as_str().to_string(),
                count,
            })
            .collect(),
        contracts_by_status: ContractStatus::ALL
            .iter()
            .zip(by_contract)
            .map(|(s, count)| StatusCount {
                status: s.as_str().to_string(),
                count,
            })
            .collect(),
    }
}

#[derive(Clone)]
pub struct DashboardService {
    people: PeopleService,
    real_estates: RealEstateService,
    contracts: ContractService,
}

impl DashboardService {
    pub fn new(people: PeopleService, real_estates: RealEstateService, contracts: ContractService) -> Self {
        Self {
            people,
            real_estates,
            contracts,
        }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let (owners, lessees, real_estates, contracts) = tokio::try_join!(
            self.people.owners.get_all(),
            self.people.lessees.get_all(),
            self.real_estates.get_all(),
            self.contracts.get_all(),
        )?;
        Ok(summarize(owners.len(), lessees.len(), &real_estates, &contracts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::contract_service::tests::{new_contract, scenario};

    #[tokio::test]
    async fn counts_every_status() {
        let s = scenario().await;
        let first = s
            .contracts
            .create(new_contract(s.owner.id, s.real_estate.id))
            .await
            .unwrap();
        s.contracts
            .create(new_contract(s.owner.id, s.real_estate.id))
            .await
            .unwrap();
        s.contracts
            .update(
                first.id,
                crate::models::contract::ContractPatch {
                    status: Some(ContractStatus::Cancelado),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let dashboard = DashboardService::new(s.people.clone(), s.real_estates.clone(), s.contracts.clone());
        let summary = dashboard.get_summary().await.unwrap();

        assert_eq!(summary.owners, 1);
        assert_eq!(summary.lessees, 1);
        assert_eq!(summary.real_estates, 1);
        assert_eq!(summary.contracts, 2);
        assert_eq!(summary.real_estates_by_status.len(), 4);
        assert_eq!(
            summary.contracts_by_status,
            vec![
                StatusCount { status: "Ativo".into(), count: 1 },
                StatusCount { status: "Concluído".into(), count: 0 },
                StatusCount { status: "Cancelado".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn empty_lists_still_list_statuses() {
        let summary = summarize(0, 0, &[], &[]);
        assert_eq!(summary.real_estates, 0);
        assert!(summary.real_estates_by_status.iter().all(|s| s.count == 0));
        assert_eq!(summary.real_estates_by_status[0].status, "Disponível");
    }
}
