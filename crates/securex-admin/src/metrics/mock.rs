//! Fixed snapshots served whenever the metrics store is absent, empty or failing.

use chrono::{DateTime, Utc};

use crate::db::schema::{SalesSnapshot, UserSnapshot};

pub const MOCK_ID: i64 = 1;

pub fn sales_snapshot(at: DateTime<Utc>) -> SalesSnapshot {
    SalesSnapshot {
        id: MOCK_ID,
        date: at,
        purchases_today: 45,
        purchases_month: 1250,
        purchases_total: 15780,
        earned_last_month: 125000.5,
        earned_this_month: 89750.25,
        earned_total: 2450000.75,
        net_last_month: 95000.4,
        net_this_month: 68200.2,
        net_total: 1960000.6,
        payout_sellers_last_month: 30000.1,
    }
}

pub fn user_snapshot(at: DateTime<Utc>) -> UserSnapshot {
    UserSnapshot {
        id: MOCK_ID,
        date: at,
        total_users: 184,
        admins: 3,
        sellers: 0,
        banned_users: 0,
        active_users_today: 45,
        new_registrations_today: 12,
        last_updated: at,
    }
}
