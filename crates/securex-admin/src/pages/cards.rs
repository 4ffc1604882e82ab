use crate::db::schema::{SalesSnapshot, UserSnapshot};
use crate::pages::format::{format_count, format_currency};
use crate::series::MetricFamily;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardValue {
    Count(i64),
    Currency(f64),
}

impl CardValue {
    pub fn display(&self) -> String {
        match self {
            CardValue::Count(value) => format_count(*value),
            CardValue::Currency(value) => format_currency(*value),
        }
    }
}

/// One snapshot figure on a statistics page.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub key: &'static str,
    pub title: String,
    pub value: CardValue,
}

impl MetricCard {
    fn new(family: MetricFamily, key: &'static str, value: CardValue) -> Self {
        Self {
            key,
            title: family.title_for(key),
            value,
        }
    }
}

pub fn sales_cards(snapshot: &SalesSnapshot) -> Vec<MetricCard> {
    use CardValue::{Count, Currency};

    [
        ("purchases-today", Count(snapshot.purchases_today)),
        ("purchases-month", Count(snapshot.purchases_month)),
        ("purchases-total", Count(snapshot.purchases_total)),
        ("earned-last-month", Currency(snapshot.earned_last_month)),
        ("earned-this-month", Currency(snapshot.earned_this_month)),
        ("earned-total", Currency(snapshot.earned_total)),
        ("net-last-month", Currency(snapshot.net_last_month)),
        ("net-this-month", Currency(snapshot.net_this_month)),
        ("net-total", Currency(snapshot.net_total)),
        ("payout-sellers-last-month", Currency(snapshot.payout_sellers_last_month)),
    ]
    .into_iter()
    .map(|(key, value)| MetricCard::new(MetricFamily::Sales, key, value))
    .collect()
}

pub fn user_cards(snapshot: &UserSnapshot) -> Vec<MetricCard> {
    [
        ("total-users", snapshot.total_users),
        ("admins", snapshot.admins),
        ("sellers", snapshot.sellers),
        ("banned-users", snapshot.banned_users),
        ("active-today", snapshot.active_users_today),
        ("new-registrations", snapshot.new_registrations_today),
    ]
    .into_iter()
    .map(|(key, value)| MetricCard::new(MetricFamily::Users, key, CardValue::Count(value)))
    .collect()
}
