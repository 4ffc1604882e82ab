use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::schema::{SalesSnapshot, UserSnapshot};
use crate::db::store::{DbStore, StoreError};

/// Where the latest snapshot rows come from.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Most recent `sales_stats` row, `None` when the table is empty.
    async fn latest_sales(&self) -> Result<Option<SalesSnapshot>, StoreError>;

    /// Most recent `user_stats` row, `None` when the table is empty.
    async fn latest_users(&self) -> Result<Option<UserSnapshot>, StoreError>;
}

#[async_trait]
impl MetricsSource for DbStore {
    async fn latest_sales(&self) -> Result<Option<SalesSnapshot>, StoreError> {
        DbStore::latest_sales(self).await
    }

    async fn latest_users(&self) -> Result<Option<UserSnapshot>, StoreError> {
        DbStore::latest_users(self).await
    }
}

/// In-memory source for tests and demos.
#[derive(Clone, Default)]
pub struct InMemorySource {
    inner: Arc<RwLock<InMemoryState>>,
}

#[derive(Default)]
struct InMemoryState {
    sales: Option<SalesSnapshot>,
    users: Option<UserSnapshot>,
    failure: Option<String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_sales(&self, row: Option<SalesSnapshot>) {
        self.inner.write().await.sales = row;
    }

    pub async fn set_users(&self, row: Option<UserSnapshot>) {
        self.inner.write().await.users = row;
    }

    /// Make every subsequent read fail with the given message.
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.inner.write().await.failure = Some(message.into());
    }

    pub async fn recover(&self) {
        self.inner.write().await.failure = None;
    }
}

#[async_trait]
impl MetricsSource for InMemorySource {
    async fn latest_sales(&self) -> Result<Option<SalesSnapshot>, StoreError> {
        let state = self.inner.read().await;
        match &state.failure {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(state.sales.clone()),
        }
    }

    async fn latest_users(&self) -> Result<Option<UserSnapshot>, StoreError> {
        let state = self.inner.read().await;
        match &state.failure {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(state.users.clone()),
        }
    }
}
