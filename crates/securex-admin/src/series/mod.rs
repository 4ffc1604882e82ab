//! Historical series generator.
//!
//! Synthesises one value per day over an inclusive date range. Values are drawn
//! uniformly from per-metric bounds and are regenerated on every call; nothing is
//! smoothed or persisted. This stands in for a real analytics pipeline.

pub mod catalog;
pub mod query;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use catalog::{Bounds, MetricFamily, MetricSpec, ValueKind};
pub use query::{DetailQuery, DetailRequest};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("invalid timestamp for {param}: {value}")]
    InvalidTimestamp { param: &'static str, value: String },
    #[error("range of {days} days exceeds the limit of {max} days")]
    RangeTooLong { days: i64, max: i64 },
    #[error("date range falls outside the supported calendar")]
    OutOfCalendar,
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// The `days` days ending at `end`.
    pub fn trailing(end: DateTime<Utc>, days: i64) -> Self {
        Self::new(end - Duration::days(days), end)
    }

    /// The range of equal length immediately before this one, `None` when it
    /// would start before the earliest representable date.
    pub fn preceding(&self) -> Option<Self> {
        let length = self.to - self.from;
        let from = self.from.checked_sub_signed(length)?;
        Some(Self::new(from, self.from))
    }

    /// `ceil((to - from) / 1 day)`; negative when `to` is a day or more before `from`.
    pub fn day_span(&self) -> i64 {
        let millis = (self.to - self.from).num_milliseconds();
        if millis <= 0 {
            -(-millis / DAY_MILLIS)
        } else {
            (millis + DAY_MILLIS - 1) / DAY_MILLIS
        }
    }

    pub fn point_count(&self) -> usize {
        let span = self.day_span();
        if span < 0 {
            0
        } else {
            span as usize + 1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SeriesPoint {
    pub date: DateTime<Utc>,
    pub value: u64,
    /// Short `dd.mm` label for chart axes
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetailedStats {
    pub metric: String,
    pub title: String,
    pub current_value: u64,
    pub historical_data: Vec<SeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_data: Option<Vec<SeriesPoint>>,
}

pub fn generate_series<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds, range: &DateRange) -> Vec<SeriesPoint> {
    (0..range.point_count())
        .map_while(|offset| range.from.checked_add_signed(Duration::days(offset as i64)))
        .map(|date| SeriesPoint {
            date,
            value: rng.gen_range(bounds.min..bounds.max_exclusive()),
            label: date.format("%d.%m").to_string(),
        })
        .collect()
}

/// Maximum, rounded mean and minimum of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSummary {
    pub max: u64,
    pub average: u64,
    pub min: u64,
}

pub fn summarize(points: &[SeriesPoint]) -> Option<SeriesSummary> {
    let max = points.iter().map(|p| p.value).max()?;
    let min = points.iter().map(|p| p.value).min()?;
    let sum: u128 = points.iter().map(|p| u128::from(p.value)).sum();
    let average = (sum as f64 / points.len() as f64).round() as u64;
    Some(SeriesSummary { max, average, min })
}

#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    max_range_days: i64,
}

impl SeriesGenerator {
    pub fn new(max_range_days: i64) -> Self {
        Self { max_range_days }
    }

    pub fn max_range_days(&self) -> i64 {
        self.max_range_days
    }

    pub fn detailed(&self, family: MetricFamily, request: &DetailRequest) -> Result<DetailedStats, SeriesError> {
        self.detailed_with(&mut rand::thread_rng(), family, request)
    }

    pub fn detailed_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        family: MetricFamily,
        request: &DetailRequest,
    ) -> Result<DetailedStats, SeriesError> {
        self.check_range(&request.range)?;
        if let Some(comparison) = &request.comparison {
            self.check_range(comparison)?;
        }

        let bounds = family.bounds_for(&request.metric);
        let historical_data = generate_series(&mut *rng, bounds, &request.range);
        let comparison_data = request
            .comparison
            .as_ref()
            .map(|range| generate_series(&mut *rng, bounds, range));

        let current_value = historical_data.last().map(|point| point.value).unwrap_or(0);

        Ok(DetailedStats {
            metric: request.metric.clone(),
            title: family.title_for(&request.metric),
            current_value,
            historical_data,
            comparison_data,
        })
    }

    fn check_range(&self, range: &DateRange) -> Result<(), SeriesError> {
        let days = range.day_span();
        if days > self.max_range_days {
            return Err(SeriesError::RangeTooLong {
                days,
                max: self.max_range_days,
            });
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    /// Every recognised metric yields `days + 1` in-bounds points covering the range.
    #[test]
    fn prop_series_covers_inclusive_range() {
        let keys: Vec<(MetricFamily, &'static str)> = [MetricFamily::Sales, MetricFamily::Users]
            .iter()
            .flat_map(|family| family.metrics().iter().map(move |spec| (*family, spec.key)))
            .collect();

        proptest!(|(
            index in 0..keys.len(),
            start_secs in 1_600_000_000i64..1_800_000_000i64,
            days in 0i64..400,
            extra_secs in 0i64..86_400,
        )| {
            let (family, key) = keys[index];
            let from = Utc.timestamp_opt(start_secs, 0).unwrap();
            let range = DateRange::new(from, from + Duration::days(days) + Duration::seconds(extra_secs));
            let expected = if extra_secs == 0 { days + 1 } else { days + 2 };

            let generator = SeriesGenerator::new(3660);
            let stats = generator.detailed(family, &DetailRequest {
                metric: key.to_string(),
                range,
                comparison: None,
            }).unwrap();

            prop_assert_eq!(stats.historical_data.len() as i64, expected);
            prop_assert_eq!(stats.historical_data[0].date, from);
            let bounds = family.bounds_for(key);
            for (i, point) in stats.historical_data.iter().enumerate() {
                prop_assert_eq!(point.date, from + Duration::days(i as i64));
                prop_assert!(bounds.contains(point.value));
            }
        });
    }
}
