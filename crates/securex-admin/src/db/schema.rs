use sqlx::FromRow;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use utoipa::ToSchema;

use crate::db::store::StoreError;

/// Latest aggregate sales figures, one row of `sales_stats`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct SalesSnapshot {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub purchases_today: i64,
    pub purchases_month: i64,
    pub purchases_total: i64,
    pub earned_last_month: f64,
    pub earned_this_month: f64,
    pub earned_total: f64,
    pub net_last_month: f64,
    pub net_this_month: f64,
    pub net_total: f64,
    pub payout_sellers_last_month: f64,
}

/// Latest aggregate user figures, one row of `user_stats`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct UserSnapshot {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub total_users: i64,
    pub admins: i64,
    pub sellers: i64,
    pub banned_users: i64,
    pub active_users_today: i64,
    pub new_registrations_today: i64,
    pub last_updated: DateTime<Utc>,
}

/// Row-level checks applied before a stored snapshot is served.
pub trait SnapshotRow {
    const TABLE: &'static str;

    fn check(&self) -> Result<(), StoreError>;
}

fn non_negative(table: &str, field: &str, value: f64) -> Result<(), StoreError> {
    // NaN fails this comparison as well
    if value >= 0.0 {
        Ok(())
    } else {
        Err(StoreError::InvalidRow(format!("{}.{} is negative: {}", table, field, value)))
    }
}

impl SnapshotRow for SalesSnapshot {
    const TABLE: &'static str = "sales_stats";

    fn check(&self) -> Result<(), StoreError> {
        let counts = [
            ("purchases_today", self.purchases_today),
            ("purchases_month", self.purchases_month),
            ("purchases_total", self.purchases_total),
        ];
        for (field, value) in counts {
            non_negative(Self::TABLE, field, value as f64)?;
        }

        let amounts = [
            ("earned_last_month", self.earned_last_month),
            ("earned_this_month", self.earned_this_month),
            ("earned_total", self.earned_total),
            ("net_last_month", self.net_last_month),
            ("net_this_month", self.net_this_month),
            ("net_total", self.net_total),
            ("payout_sellers_last_month", self.payout_sellers_last_month),
        ];
        for (field, value) in amounts {
            non_negative(Self::TABLE, field, value)?;
        }

        Ok(())
    }
}

impl SnapshotRow for UserSnapshot {
    const TABLE: &'static str = "user_stats";

    fn check(&self) -> Result<(), StoreError> {
        let counts = [
            ("total_users", self.total_users),
            ("admins", self.admins),
            ("sellers", self.sellers),
            ("banned_users", self.banned_users),
            ("active_users_today", self.active_users_today),
            ("new_registrations_today", self.new_registrations_today),
        ];
        for (field, value) in counts {
            non_negative(Self::TABLE, field, value as f64)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mock;

    #[test]
    fn test_mock_rows_pass_checks() {
        let now = Utc::now();
        assert!(mock::sales_snapshot(now).check().is_ok());
        assert!(mock::user_snapshot(now).check().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut row = mock::sales_snapshot(Utc::now());
        row.net_this_month = -1.0;
        let err = row.check().unwrap_err();
        assert!(err.to_string().contains("net_this_month"));
    }

    #[test]
    fn test_nan_amount_rejected() {
        let mut row = mock::sales_snapshot(Utc::now());
        row.earned_total = f64::NAN;
        assert!(row.check().is_err());
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut row = mock::user_snapshot(Utc::now());
        row.banned_users = -3;
        assert!(row.check().is_err());
    }
}
