pub mod dashboard_repo;
pub mod error;
pub mod event_repo;
pub mod store;
pub mod user_repo;
pub mod valkey;

pub use error::StoreError;
pub use store::{StoreResult, TableStore};
pub use valkey::ValkeyTableStore;
