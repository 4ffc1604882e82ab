//! Known metrics per family: display titles, value kind and generator bounds.

use serde::Serialize;

/// Which statistics page a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFamily {
    Sales,
    Users,
}

/// Half-open value range `[min, min + span)` used when synthesising points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u64,
    pub span: u64,
}

impl Bounds {
    pub const fn new(min: u64, span: u64) -> Self {
        Self { min, span }
    }

    pub fn max_exclusive(&self) -> u64 {
        self.min + self.span
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && value < self.max_exclusive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Count,
    Currency,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub kind: ValueKind,
    pub bounds: Bounds,
}

const PURCHASES: Bounds = Bounds::new(20, 100);
const EARNED: Bounds = Bounds::new(10_000, 50_000);
const NET: Bounds = Bounds::new(5_000, 30_000);
const PAYOUT: Bounds = Bounds::new(3_000, 20_000);

const SALES_METRICS: &[MetricSpec] = &[
    MetricSpec { key: "purchases-today", title: "Покупки сегодня", kind: ValueKind::Count, bounds: PURCHASES },
    MetricSpec { key: "purchases-month", title: "Покупки в этом месяце", kind: ValueKind::Count, bounds: PURCHASES },
    MetricSpec { key: "purchases-total", title: "Всего покупок", kind: ValueKind::Count, bounds: PURCHASES },
    MetricSpec { key: "earned-last-month", title: "Заработано в прошлом месяце", kind: ValueKind::Currency, bounds: EARNED },
    MetricSpec { key: "earned-this-month", title: "Заработано в этом месяце", kind: ValueKind::Currency, bounds: EARNED },
    MetricSpec { key: "earned-total", title: "Всего заработано", kind: ValueKind::Currency, bounds: EARNED },
    MetricSpec { key: "net-last-month", title: "Чистая прибыль прошлый месяц", kind: ValueKind::Currency, bounds: NET },
    MetricSpec { key: "net-this-month", title: "Чистая прибыль этот месяц", kind: ValueKind::Currency, bounds: NET },
    MetricSpec { key: "net-total", title: "Всего чистой прибыли", kind: ValueKind::Currency, bounds: NET },
    MetricSpec { key: "payout-sellers-last-month", title: "Выплаты продавцам прошлый месяц", kind: ValueKind::Currency, bounds: PAYOUT },
];

const USER_METRICS: &[MetricSpec] = &[
    MetricSpec { key: "total-users", title: "Всего пользователей", kind: ValueKind::Count, bounds: Bounds::new(150, 50) },
    MetricSpec { key: "admins", title: "Админов", kind: ValueKind::Count, bounds: Bounds::new(2, 3) },
    MetricSpec { key: "sellers", title: "Продажников", kind: ValueKind::Count, bounds: Bounds::new(0, 5) },
    MetricSpec { key: "banned-users", title: "Забаненных", kind: ValueKind::Count, bounds: Bounds::new(0, 3) },
    MetricSpec { key: "active-today", title: "Активных сегодня", kind: ValueKind::Count, bounds: Bounds::new(20, 80) },
    MetricSpec { key: "new-registrations", title: "Новых регистраций сегодня", kind: ValueKind::Count, bounds: Bounds::new(5, 20) },
];

impl MetricFamily {
    pub fn metrics(&self) -> &'static [MetricSpec] {
        match self {
            MetricFamily::Sales => SALES_METRICS,
            MetricFamily::Users => USER_METRICS,
        }
    }

    pub fn lookup(&self, key: &str) -> Option<&'static MetricSpec> {
        self.metrics().iter().find(|spec| spec.key == key)
    }

    /// Bounds for keys outside the catalog.
    pub fn fallback_bounds(&self) -> Bounds {
        match self {
            MetricFamily::Sales => Bounds::new(100, 1_000),
            MetricFamily::Users => Bounds::new(10, 100),
        }
    }

    pub fn bounds_for(&self, key: &str) -> Bounds {
        self.lookup(key)
            .map(|spec| spec.bounds)
            .unwrap_or_else(|| self.fallback_bounds())
    }

    /// Display title, or the raw key when the metric is unknown.
    pub fn title_for(&self, key: &str) -> String {
        self.lookup(key)
            .map(|spec| spec.title.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    /// Path segment of the family's pages under `/admin`.
    pub fn slug(&self) -> &'static str {
        match self {
            MetricFamily::Sales => "sales-statistics",
            MetricFamily::Users => "user-statistics",
        }
    }

    pub fn page_path(&self) -> &'static str {
        match self {
            MetricFamily::Sales => "/admin/sales-statistics",
            MetricFamily::Users => "/admin/user-statistics",
        }
    }
}
