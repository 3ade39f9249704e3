//! Inclusive calendar-day range used to query customers by creation time.

use crate::error::AppError;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

pub const DATE_RANGE_EXAMPLE: &str = "/api/mongo/customers/date-range?from=2024-01-01&to=2024-12-31";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    from_label: String,
    to_label: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Both bounds must be present, parse as `YYYY-MM-DD`, and be ordered.
    /// `from` expands to 00:00:00.000 and `to` to 23:59:59.999 (UTC).
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, AppError> {
        fn present(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }
        let (from, to) = match (present(from), present(to)) {
            (Some(f), Some(t)) => (f, t),
            _ => {
                return Err(AppError::InvalidRequest {
                    message: "Both from and to date parameters are required".into(),
                    example: Some(DATE_RANGE_EXAMPLE),
                })
            }
        };
        let invalid_format = || AppError::InvalidRequest {
            message: "Invalid date format. Please use YYYY-MM-DD format".into(),
            example: Some(DATE_RANGE_EXAMPLE),
        };
        let from_date = NaiveDate::parse_from_str(from, DATE_FORMAT).map_err(|_| invalid_format())?;
        let to_date = NaiveDate::parse_from_str(to, DATE_FORMAT).map_err(|_| invalid_format())?;
        if from_date > to_date {
            return Err(AppError::invalid("From date cannot be after to date"));
        }
        let start_of_day = from_date.and_hms_milli_opt(0, 0, 0, 0).ok_or_else(invalid_format)?;
        let end_of_day = to_date.and_hms_milli_opt(23, 59, 59, 999).ok_or_else(invalid_format)?;
        Ok(DateRange {
            from_label: from.to_string(),
            to_label: to.to_string(),
            start: Utc.from_utc_datetime(&start_of_day),
            end: Utc.from_utc_datetime(&end_of_day),
        })
    }

    /// Bounds as supplied by the client, echoed in the response message.
    pub fn from_label(&self) -> &str {
        &self.from_label
    }

    pub fn to_label(&self) -> &str {
        &self.to_label
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    pub fn start_iso(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn end_iso(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
