pub mod schema;
pub mod store;

pub use schema::{SalesSnapshot, SnapshotRow, UserSnapshot};
pub use store::{DbStore, StoreError};
