//! Login insights service.

use std::collections::HashSet;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use forgefeed_common::AppResult;
use forgefeed_db::repositories::LoginRepository;
use serde::Serialize;

/// Login counts for the current local day.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LoginInsights {
    /// Total login events today.
    pub today_logins: u64,
    /// Distinct users who logged in today.
    pub unique_visitors: u64,
}

/// Insights service computing login statistics at request time.
#[derive(Clone)]
pub struct InsightsService {
    login_repo: LoginRepository,
    timezone: Tz,
}

impl InsightsService {
    /// Create a new insights service.
    #[must_use]
    pub const fn new(login_repo: LoginRepository, timezone: Tz) -> Self {
        Self {
            login_repo,
            timezone,
        }
    }

    /// Today's login totals, bounded by the configured timezone's local
    /// day.
    pub async fn today(&self) -> AppResult<LoginInsights> {
        let (start, end) = day_bounds(Utc::now(), self.timezone);
        let logins = self.login_repo.find_between(start, end).await?;

        let unique: HashSet<&str> = logins.iter().map(|l| l.user_id.as_str()).collect();

        Ok(LoginInsights {
            today_logins: logins.len() as u64,
            unique_visitors: unique.len() as u64,
        })
    }
}

/// The UTC instants bounding the local day containing `now`, as the
/// half-open interval `[start, end)`.
#[must_use]
pub fn day_bounds(now: DateTime<Utc>, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_date = now.with_timezone(&tz).date_naive();
    let start = local_midnight(local_date, tz);
    let end = local_midnight(local_date + Duration::days(1), tz);
    (start, end)
}

/// Local midnight resolved to UTC. A DST gap at midnight resolves to the
/// first valid instant after it.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => match tz.from_local_datetime(&(midnight + Duration::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => Utc.from_utc_datetime(&midnight),
        },
    }
}
