#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use papertrader::domain::portfolio::Portfolio;

/// 2024-01-15 was a Monday.
pub fn monday_at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// 2024-01-20 was a Saturday.
pub fn saturday_at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 20)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// A weekday more than a year before [`monday_at`].
pub fn two_years_earlier(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 1, 17)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Open an account holding exactly `cash` after the 1.0 enrollment fee.
pub fn open_account(cash: f64) -> Portfolio {
    Portfolio::open(cash + 1.0, 1.0).unwrap().unwrap()
}
