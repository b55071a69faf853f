pub mod pg_store;
pub mod record;
pub mod user_repo;

#[cfg(test)]
pub mod memory_store;

pub use pg_store::PgStore;
pub use record::{Filter, Record, RecordStore, WritePayload};
pub use user_repo::UserRepository;
