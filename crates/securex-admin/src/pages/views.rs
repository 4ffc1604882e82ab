//! Dashboard pages rendered through tera. Templates are compiled into the
//! binary and auto-escaped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::{Context, Tera};

use crate::pages::cards::MetricCard;
use crate::pages::format::{format_count, format_currency};
use crate::series::{summarize, DateRange, DetailedStats, MetricFamily, MetricSpec, ValueKind};

pub const PRESET_DAYS: [i64; 3] = [7, 30, 90];

const TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("stats.html", include_str!("../../templates/stats.html")),
    ("detail.html", include_str!("../../templates/detail.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

fn family_title(family: MetricFamily) -> &'static str {
    match family {
        MetricFamily::Sales => "Статистика продаж",
        MetricFamily::Users => "Статистика пользователей",
    }
}

fn format_value(kind: ValueKind, value: u64) -> String {
    match kind {
        ValueKind::Count => format_count(value as i64),
        ValueKind::Currency => format_currency(value as f64),
    }
}

fn date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

#[derive(Serialize)]
struct LoginPage<'a> {
    page_title: &'static str,
    username: &'static str,
    login: &'a str,
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct CardView {
    key: &'static str,
    title: String,
    value: String,
}

#[derive(Serialize)]
struct StatsPage<'a> {
    page_title: &'static str,
    username: &'a str,
    slug: &'static str,
    is_mock: bool,
    cards: Vec<CardView>,
}

#[derive(Serialize)]
struct RangeView {
    from: String,
    to: String,
}

#[derive(Serialize)]
struct PresetView {
    days: i64,
    from: String,
    to: String,
}

#[derive(Serialize)]
struct SummaryView {
    max: String,
    average: String,
    min: String,
}

#[derive(Serialize, Default)]
struct RowView {
    label: String,
    value: String,
    compared_label: String,
    compared: String,
}

#[derive(Serialize)]
struct DetailPage<'a> {
    page_title: &'static str,
    username: &'a str,
    slug: &'static str,
    family_title: &'static str,
    key: &'static str,
    current: String,
    from: String,
    to: String,
    comparison: Option<RangeView>,
    pinned_comparison: bool,
    presets: Vec<PresetView>,
    summary: Option<SummaryView>,
    rows: Vec<RowView>,
}

#[derive(Serialize)]
struct ErrorPage<'a> {
    page_title: &'a str,
    username: &'a str,
    slug: &'static str,
    key: &'a str,
    message: &'a str,
}

/// Everything the detail page shows for one metric.
pub struct DetailView<'a> {
    pub family: MetricFamily,
    pub spec: &'a MetricSpec,
    pub range: DateRange,
    pub comparison: Option<DateRange>,
    /// Comparison bounds were given explicitly and are carried into preset links.
    pub pinned_comparison: bool,
    pub stats: &'a DetailedStats,
    pub today: DateTime<Utc>,
    pub username: &'a str,
}

/// Primary and comparison points side by side; the longer series sets the row count.
fn table_rows(kind: ValueKind, stats: &DetailedStats) -> Vec<RowView> {
    let primary = &stats.historical_data;
    let comparison = stats.comparison_data.as_deref().unwrap_or_default();

    (0..primary.len().max(comparison.len()))
        .map(|i| {
            let mut row = RowView::default();
            if let Some(point) = primary.get(i) {
                row.label = point.label.clone();
                row.value = format_value(kind, point.value);
            }
            if let Some(point) = comparison.get(i) {
                row.compared_label = point.label.clone();
                row.compared = format_value(kind, point.value);
            }
            row
        })
        .collect()
}

#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera: Arc::new(tera) })
    }

    fn render<T: Serialize>(&self, template: &str, page: &T) -> Result<String, tera::Error> {
        self.tera.render(template, &Context::from_serialize(page)?)
    }

    pub fn login_page(&self, error: Option<&str>, login: &str) -> Result<String, tera::Error> {
        self.render("login.html", &LoginPage {
            page_title: "Вход",
            username: "",
            login,
            error,
        })
    }

    pub fn stats_page(
        &self,
        family: MetricFamily,
        cards: &[MetricCard],
        is_mock: bool,
        username: &str,
    ) -> Result<String, tera::Error> {
        let cards = cards
            .iter()
            .map(|card| CardView {
                key: card.key,
                title: card.title.clone(),
                value: card.value.display(),
            })
            .collect();

        self.render("stats.html", &StatsPage {
            page_title: family_title(family),
            username,
            slug: family.slug(),
            is_mock,
            cards,
        })
    }

    pub fn detail_page(&self, view: &DetailView<'_>) -> Result<String, tera::Error> {
        let kind = view.spec.kind;
        let presets = PRESET_DAYS
            .iter()
            .map(|days| {
                let range = DateRange::trailing(view.today, *days);
                PresetView {
                    days: *days,
                    from: date(range.from),
                    to: date(range.to),
                }
            })
            .collect();

        let summary = summarize(&view.stats.historical_data).map(|summary| SummaryView {
            max: format_value(kind, summary.max),
            average: format_value(kind, summary.average),
            min: format_value(kind, summary.min),
        });

        self.render("detail.html", &DetailPage {
            page_title: view.spec.title,
            username: view.username,
            slug: view.family.slug(),
            family_title: family_title(view.family),
            key: view.spec.key,
            current: format_value(kind, view.stats.current_value),
            from: date(view.range.from),
            to: date(view.range.to),
            comparison: view.comparison.map(|range| RangeView {
                from: date(range.from),
                to: date(range.to),
            }),
            pinned_comparison: view.pinned_comparison,
            presets,
            summary,
            rows: table_rows(kind, view.stats),
        })
    }

    /// Error panel with a retry link to the family page, or to `key`'s detail page.
    pub fn error_page(
        &self,
        username: &str,
        family: MetricFamily,
        key: Option<&str>,
        title: &str,
        message: &str,
    ) -> Result<String, tera::Error> {
        self.render("error.html", &ErrorPage {
            page_title: title,
            username,
            slug: family.slug(),
            key: key.unwrap_or(""),
            message,
        })
    }
}
