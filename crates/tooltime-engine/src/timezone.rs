use chrono::{DateTime, Datelike, FixedOffset, Local, Offset, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use tracing::debug;

/// Zone used to bucket events by local hour and weekday
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportTimezone {
    Named(Tz),
    /// No named zone could be resolved; the current local UTC offset
    Offset(FixedOffset),
}

impl Default for ReportTimezone {
    fn default() -> Self {
        ReportTimezone::Named(Tz::UTC)
    }
}

impl ReportTimezone {
    /// IANA zone by name, e.g. `America/Los_Angeles`
    pub fn named(name: &str) -> Option<Self> {
        name.trim().parse::<Tz>().ok().map(ReportTimezone::Named)
    }

    /// Process-local zone: `TZ`, then the system zone database, then the
    /// current UTC offset.
    pub fn system_default() -> Self {
        if let Ok(tz) = std::env::var("TZ")
            && let Some(zone) = Self::named(tz.trim_start_matches(':'))
        {
            return zone;
        }
        if let Ok(name) = iana_time_zone::get_timezone()
            && let Some(zone) = Self::named(&name)
        {
            return zone;
        }
        let offset = Local::now().offset().fix();
        debug!(%offset, "no named local timezone, using fixed offset");
        ReportTimezone::Offset(offset)
    }

    pub fn name(&self) -> String {
        match self {
            ReportTimezone::Named(tz) => tz.name().to_string(),
            ReportTimezone::Offset(offset) if offset.local_minus_utc() == 0 => "UTC".to_string(),
            ReportTimezone::Offset(offset) => format!("UTC{}", offset),
        }
    }

    /// Local hour (0-23) and weekday of an instant
    pub fn hour_and_weekday(&self, ts: &DateTime<Utc>) -> (u32, Weekday) {
        match self {
            ReportTimezone::Named(tz) => {
                let local = tz.from_utc_datetime(&ts.naive_utc());
                (local.hour(), local.weekday())
            }
            ReportTimezone::Offset(offset) => {
                let local = offset.from_utc_datetime(&ts.naive_utc());
                (local.hour(), local.weekday())
            }
        }
    }
}
