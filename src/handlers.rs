pub mod address;
pub mod auth;
pub mod contracts;
pub mod dashboard;
pub mod files;
pub mod locations;
pub mod people;
pub mod real_estates;
pub mod relations;
