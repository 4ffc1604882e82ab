use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::schema::{SalesSnapshot, SnapshotRow, UserSnapshot};
use crate::db::store::StoreError;
use crate::metrics::mock;
use crate::metrics::source::MetricsSource;

/// Where a served snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotOrigin {
    Store,
    Mock,
}

impl SnapshotOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotOrigin::Store => "store",
            SnapshotOrigin::Mock => "mock",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub data: T,
    pub origin: SnapshotOrigin,
}

impl<T> Snapshot<T> {
    pub fn is_mock(&self) -> bool {
        self.origin == SnapshotOrigin::Mock
    }
}

/// Serves the latest snapshots, degrading to the mock fixtures on any store problem.
#[derive(Clone)]
pub struct MetricsService {
    source: Option<Arc<dyn MetricsSource>>,
    mock_sales: SalesSnapshot,
    mock_users: UserSnapshot,
}

impl MetricsService {
    pub fn new(source: Option<Arc<dyn MetricsSource>>) -> Self {
        let now = Utc::now();
        Self {
            source,
            mock_sales: mock::sales_snapshot(now),
            mock_users: mock::user_snapshot(now),
        }
    }

    pub fn mock_only() -> Self {
        Self::new(None)
    }

    pub fn has_store(&self) -> bool {
        self.source.is_some()
    }

    pub fn mock_sales(&self) -> &SalesSnapshot {
        &self.mock_sales
    }

    pub fn mock_users(&self) -> &UserSnapshot {
        &self.mock_users
    }

    pub async fn sales_snapshot(&self) -> Snapshot<SalesSnapshot> {
        let fetched = match &self.source {
            Some(source) => Some(source.latest_sales().await),
            None => None,
        };
        resolve(fetched, &self.mock_sales)
    }

    pub async fn user_snapshot(&self) -> Snapshot<UserSnapshot> {
        let fetched = match &self.source {
            Some(source) => Some(source.latest_users().await),
            None => None,
        };
        resolve(fetched, &self.mock_users)
    }
}

fn resolve<T>(fetched: Option<Result<Option<T>, StoreError>>, mock: &T) -> Snapshot<T>
where
    T: SnapshotRow + Clone,
{
    let fallback = || Snapshot {
        data: mock.clone(),
        origin: SnapshotOrigin::Mock,
    };

    match fetched {
        None => {
            debug!("DATABASE_URL not configured, serving mock {}", T::TABLE);
            fallback()
        }
        Some(Ok(None)) => {
            info!("No rows in {}, serving mock data", T::TABLE);
            fallback()
        }
        Some(Ok(Some(row))) => match row.check() {
            Ok(()) => Snapshot {
                data: row,
                origin: SnapshotOrigin::Store,
            },
            Err(e) => {
                warn!("Rejected {} row, serving mock data: {}", T::TABLE, e);
                fallback()
            }
        },
        Some(Err(e)) => {
            warn!("Database error reading {}, serving mock data: {}", T::TABLE, e);
            fallback()
        }
    }
}
