// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub owners: usize,
    pub lessees: usize,
    pub real_estates: usize,
    pub contracts: usize,
    pub real_estates_by_status: Vec<StatusCount>,
    pub contracts_by_status: Vec<StatusCount>,
}
