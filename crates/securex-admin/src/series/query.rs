use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::series::{DateRange, SeriesError};

/// Raw query string of the detailed statistics endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetailQuery {
    /// Metric key, e.g. `purchases-today`
    pub metric: Option<String>,
    /// Range start, RFC 3339 or `YYYY-MM-DD`
    pub from: Option<String>,
    /// Range end (inclusive), RFC 3339 or `YYYY-MM-DD`
    pub to: Option<String>,
    /// Comparison range start; ignored unless `comparison_to` is also set
    pub comparison_from: Option<String>,
    /// Comparison range end; ignored unless `comparison_from` is also set
    pub comparison_to: Option<String>,
}

/// Validated detail request.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRequest {
    pub metric: String,
    pub range: DateRange,
    pub comparison: Option<DateRange>,
}

impl DetailQuery {
    pub fn into_request(self) -> Result<DetailRequest, SeriesError> {
        let metric = required(self.metric, "metric")?;
        let from = required(self.from, "from")?;
        let to = required(self.to, "to")?;

        let range = DateRange::new(parse_timestamp("from", &from)?, parse_timestamp("to", &to)?);

        let comparison = match (present(self.comparison_from), present(self.comparison_to)) {
            (Some(from), Some(to)) => Some(DateRange::new(
                parse_timestamp("comparison_from", &from)?,
                parse_timestamp("comparison_to", &to)?,
            )),
            _ => None,
        };

        Ok(DetailRequest { metric, range, comparison })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String, SeriesError> {
    present(value).ok_or(SeriesError::MissingParameter(name))
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(param: &'static str, raw: &str) -> Result<DateTime<Utc>, SeriesError> {
    // A literal '+' in a query string arrives as a space.
    let value = raw.trim().replace(' ', "+");

    if let Ok(ts) = DateTime::parse_from_rfc3339(&value) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SeriesError::InvalidTimestamp {
            param,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query(pairs: &[(&str, &str)]) -> DetailQuery {
        let mut q = DetailQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "metric" => q.metric = value,
                "from" => q.from = value,
                "to" => q.to = value,
                "comparison_from" => q.comparison_from = value,
                "comparison_to" => q.comparison_to = value,
                _ => unreachable!(),
            }
        }
        q
    }

    #[test]
    fn test_missing_parameters() {
        let err = query(&[("from", "2024-05-01"), ("to", "2024-05-02")]).into_request().unwrap_err();
        assert!(matches!(err, SeriesError::MissingParameter("metric")));

        let err = query(&[("metric", "admins"), ("to", "2024-05-02")]).into_request().unwrap_err();
        assert!(matches!(err, SeriesError::MissingParameter("from")));

        let err = query(&[("metric", "admins"), ("from", "2024-05-01")]).into_request().unwrap_err();
        assert!(matches!(err, SeriesError::MissingParameter("to")));
    }

    #[test]
    fn test_empty_parameter_counts_as_missing() {
        let err = query(&[("metric", ""), ("from", "2024-05-01"), ("to", "2024-05-02")])
            .into_request()
            .unwrap_err();
        assert!(matches!(err, SeriesError::MissingParameter("metric")));
    }

    #[test]
    fn test_comparison_needs_both_bounds() {
        let request = query(&[
            ("metric", "admins"),
            ("from", "2024-05-01"),
            ("to", "2024-05-10"),
            ("comparison_from", "2024-04-01"),
        ])
        .into_request()
        .unwrap();
        assert!(request.comparison.is_none());

        let request = query(&[
            ("metric", "admins"),
            ("from", "2024-05-01"),
            ("to", "2024-05-10"),
            ("comparison_from", "2024-04-01"),
            ("comparison_to", "2024-04-10"),
        ])
        .into_request()
        .unwrap();
        assert!(request.comparison.is_some());
    }

    #[test]
    fn test_parse_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("from", "2024-05-01").unwrap(), expected);
        assert_eq!(parse_timestamp("from", "2024-05-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("from", "2024-05-01T00:00:00.000Z").unwrap(), expected);
        assert_eq!(parse_timestamp("from", "2024-05-01T03:00:00 03:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_timestamp("to", "yesterday").unwrap_err();
        assert!(matches!(err, SeriesError::InvalidTimestamp { param: "to", .. }));
    }
}
