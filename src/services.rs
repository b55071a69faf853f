pub mod address_service;
pub mod auth;
pub mod contract_service;
pub mod dashboard_service;
pub mod document_layout;
pub mod document_service;
pub mod entity_service;
pub mod export_service;
pub mod file_sync_service;
pub mod location_service;
pub mod person_service;
pub mod real_estate_service;
pub mod storage_service;
