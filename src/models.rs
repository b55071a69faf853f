pub mod address;
pub mod auth;
pub mod contract;
pub mod dashboard;
pub mod location;
pub mod person;
pub mod real_estate;
pub mod storage;
