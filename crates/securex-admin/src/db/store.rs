use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{AppConfig, Environment};
use crate::db::schema::{SalesSnapshot, UserSnapshot};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("invalid row: {0}")]
    InvalidRow(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

const LATEST_SALES_SQL: &str = r#"
    SELECT
        id::bigint AS id,
        date::timestamptz AS date,
        COALESCE(purchases_today, 0)::bigint AS purchases_today,
        COALESCE(purchases_month, 0)::bigint AS purchases_month,
        COALESCE(purchases_total, 0)::bigint AS purchases_total,
        COALESCE(earned_last_month, 0)::float8 AS earned_last_month,
        COALESCE(earned_this_month, 0)::float8 AS earned_this_month,
        COALESCE(earned_total, 0)::float8 AS earned_total,
        COALESCE(net_last_month, 0)::float8 AS net_last_month,
        COALESCE(net_this_month, 0)::float8 AS net_this_month,
        COALESCE(net_total, 0)::float8 AS net_total,
        COALESCE(payout_sellers_last_month, 0)::float8 AS payout_sellers_last_month
    FROM sales_stats
    ORDER BY date DESC
    LIMIT 1
"#;

const LATEST_USERS_SQL: &str = r#"
    SELECT
        id::bigint AS id,
        date::timestamptz AS date,
        COALESCE(total_users, 0)::bigint AS total_users,
        COALESCE(admins, 0)::bigint AS admins,
        COALESCE(sellers, 0)::bigint AS sellers,
        COALESCE(banned_users, 0)::bigint AS banned_users,
        COALESCE(active_users_today, 0)::bigint AS active_users_today,
        COALESCE(new_registrations_today, 0)::bigint AS new_registrations_today,
        COALESCE(last_updated, date)::timestamptz AS last_updated
    FROM user_stats
    ORDER BY date DESC
    LIMIT 1
"#;

/// Read-only handle on the reseller's PostgreSQL metrics database.
#[derive(Clone)]
pub struct DbStore {
    pool: PgPool,
}

impl DbStore {
    /// Build the pool without touching the network; connections open on first use.
    pub fn connect_lazy(database_url: &str, config: &AppConfig) -> Result<Self, StoreError> {
        let mut options: PgConnectOptions = database_url.parse()?;
        if config.environment == Environment::Production {
            options = options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .idle_timeout(Duration::from_secs(300))
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied successfully");
        Ok(())
    }

    pub async fn latest_sales(&self) -> Result<Option<SalesSnapshot>, StoreError> {
        let row = sqlx::query_as::<_, SalesSnapshot>(LATEST_SALES_SQL)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn latest_users(&self) -> Result<Option<UserSnapshot>, StoreError> {
        let row = sqlx::query_as::<_, UserSnapshot>(LATEST_USERS_SQL)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
