//! Market data port trait.

use chrono::{Datelike, NaiveDateTime};

/// Supplies current prices and the calendar facts the trading rules need.
///
/// Price lookups are infallible by contract: a provider that cannot reach its
/// source substitutes a value rather than surfacing the failure.
pub trait MarketDataPort: std::fmt::Debug {
    /// Current price of one share of `ticker`.
    fn stock_price(&self, ticker: &str) -> f64;

    /// Current price of one coin.
    fn btc_price(&self) -> f64;

    /// Whether `time` falls Monday through Friday.
    fn is_weekday(&self, time: NaiveDateTime) -> bool {
        time.weekday().num_days_from_monday() < 5
    }

    /// The same wall-clock time one year earlier. Feb 29 clamps to Feb 28
    /// before the year shifts.
    fn one_year_before(&self, time: NaiveDateTime) -> NaiveDateTime {
        match time.with_year(time.year() - 1) {
            Some(t) => t,
            None => time
                .with_day(28)
                .and_then(|t| t.with_year(t.year() - 1))
                .unwrap_or(time),
        }
    }
}
