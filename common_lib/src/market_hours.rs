//! market_hours.rs
//!
//! Trading-session status for the US and Saudi markets.
//!
//! Everything here is a pure function of the instant handed in. Nothing reads
//! the wall clock, so one request computes every market against the same
//! moment and tests can pin any instant they like.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::market::{Market, TradingCalendar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Open,
    PreMarket,
    AfterHours,
    Closed,
}

/// What the api hands back for one market.
///
/// `next_close` is only set while open, `next_open` only while not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStatusSnapshot {
    pub market: Market,
    pub status: SessionStatus,
    pub is_open: bool,
    pub current_time: DateTime<Utc>,
    pub next_open: Option<DateTime<Utc>>,
    pub next_close: Option<DateTime<Utc>>,
    pub timezone: Tz,
}

/// both markets computed at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllMarketStatus {
    #[serde(rename = "US")]
    pub us: MarketStatusSnapshot,
    #[serde(rename = "SA")]
    pub sa: MarketStatusSnapshot,
}

pub struct MarketSessionClock {}

impl MarketSessionClock {
    pub fn status(now: DateTime<Utc>, market: Market) -> MarketStatusSnapshot {
        let calendar = market.calendar();
        let local = now.with_timezone(&calendar.timezone);
        let today = local.date_naive();
        let time = local.time();

        let (status, next_open, next_close) = if !calendar.is_trading_day(today.weekday()) {
            let next = calendar.next_trading_date_after(today);
            (SessionStatus::Closed, Some(calendar.session_open_on(next)), None)
        } else {
            match calendar.session_at(time) {
                SessionStatus::Open => (SessionStatus::Open, None, Some(calendar.session_close_on(today))),
                SessionStatus::PreMarket => (SessionStatus::PreMarket, Some(calendar.session_open_on(today)), None),
                SessionStatus::AfterHours => {
                    let next = calendar.next_trading_date_after(today);
                    (SessionStatus::AfterHours, Some(calendar.session_open_on(next)), None)
                }
                SessionStatus::Closed => {
                    // early morning opens today; late night waits for the next trading day
                    let open_date = if time < calendar.earliest_start() {
                        today
                    } else {
                        calendar.next_trading_date_after(today)
                    };
                    (SessionStatus::Closed, Some(calendar.session_open_on(open_date)), None)
                }
            }
        };

        MarketStatusSnapshot {
            market,
            status,
            is_open: status == SessionStatus::Open,
            current_time: now,
            next_open,
            next_close,
            timezone: calendar.timezone,
        }
    }

    pub fn status_all(now: DateTime<Utc>) -> AllMarketStatus {
        AllMarketStatus {
            us: MarketSessionClock::status(now, Market::Us),
            sa: MarketSessionClock::status(now, Market::Sa),
        }
    }
}

impl TradingCalendar {
    /// which window a local time-of-day falls in, assuming a trading day. Windows are [start, end).
    pub fn session_at(&self, time: NaiveTime) -> SessionStatus {
        if time >= self.session_open && time < self.session_close {
            return SessionStatus::Open;
        }
        if let Some(pre) = self.pre_market_open {
            if time >= pre && time < self.session_open {
                return SessionStatus::PreMarket;
            }
        }
        if let Some(after) = self.after_hours_close {
            if time >= self.session_close && time < after {
                return SessionStatus::AfterHours;
            }
        }
        SessionStatus::Closed
    }

    /// the first trading date strictly after `date`
    pub fn next_trading_date_after(&self, date: NaiveDate) -> NaiveDate {
        (1..=7)
            .map(|days| date + Duration::days(days))
            .find(|d| self.is_trading_day(d.weekday()))
            // an empty calendar never trades; a week out is as good an answer as any
            .unwrap_or(date + Duration::days(7))
    }

    pub fn session_open_on(&self, date: NaiveDate) -> DateTime<Utc> {
        local_to_utc(&self.timezone, date, self.session_open)
    }

    pub fn session_close_on(&self, date: NaiveDate) -> DateTime<Utc> {
        local_to_utc(&self.timezone, date, self.session_close)
    }
}

/// Resolve a local wall-clock time to an instant.
///
/// A repeated hour (fall back) takes the earlier instant. A skipped hour
/// (spring forward) is read with the offset in force before the jump, which
/// lands the same distance past the transition.
pub fn local_to_utc(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let offset_before = tz.offset_from_utc_datetime(&(naive - Duration::days(1))).fix();
            let utc = naive - Duration::seconds(offset_before.local_minus_utc() as i64);
            Utc.from_utc_datetime(&utc)
        }
    }
}
