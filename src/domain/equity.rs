//! Stock trading: lot purchases, sales with tax realization, dividends, and
//! compound interest on idle cash.
//!
//! Orders only execute on a weekday inside the trading window. Sales realize
//! profit with a doubled spread (short lots invert it), tax the gain by
//! holding period, and pay the flat commission fee.

use chrono::{NaiveDateTime, Timelike};

use super::error::PapertraderError;
use super::portfolio::Portfolio;
use super::stock::StockLot;
use super::tax;
use crate::ports::market_data_port::MarketDataPort;

/// First hour of the trading window (inclusive).
pub const MARKET_OPEN_HOUR: u32 = 10;

/// End of the trading window (exclusive).
pub const MARKET_CLOSE_HOUR: u32 = 16;

fn market_is_open(market: &dyn MarketDataPort, time: NaiveDateTime) -> bool {
    market.is_weekday(time) && time.hour() >= MARKET_OPEN_HOUR && time.hour() < MARKET_CLOSE_HOUR
}

/// Buy `shares` of `ticker`, optionally as a short position.
///
/// Cost is `price * shares + fee`. Returns `Ok(None)` without touching the
/// account when the cost exceeds cash on hand or the market is closed at
/// `time`. On a fill the cash is debited and the new lot is returned; the
/// caller decides whether to attach it to the portfolio's lot list.
pub fn buy(
    portfolio: &mut Portfolio,
    market: &dyn MarketDataPort,
    ticker: &str,
    shares: u64,
    short: bool,
    time: NaiveDateTime,
) -> Result<Option<StockLot>, PapertraderError> {
    if shares == 0 {
        return Err(PapertraderError::invalid_state(
            "share purchase amount must be positive",
        ));
    }
    let price = market.stock_price(ticker);
    let cost = price * shares as f64 + portfolio.commission_fee();
    if cost <= portfolio.cash() && market_is_open(market, time) {
        portfolio.set_cash(portfolio.cash() - cost)?;
        let lot = StockLot::new(ticker, price, shares, short, time)?;
        return Ok(Some(lot));
    }
    Ok(None)
}

/// Outcome of a stock sale.
#[derive(Debug, Clone, PartialEq)]
pub enum SaleOutcome {
    Filled {
        shares_sold: u64,
        after_tax_profit: f64,
    },
    Rejected,
}

/// Sell up to `amount` shares (capped at the lot's holding) from the lot at
/// `lot_index`.
///
/// Rejected when the market is closed at `time` or cash cannot cover the
/// commission fee. Past that gate the sale always proceeds: shares come off
/// the lot even when the realized profit is zero or negative. Profit is the
/// doubled spread between current and purchase price (inverted for short
/// lots); a positive profit is taxed long-term when the lot is strictly older
/// than one year, short-term otherwise. Cash moves by the after-tax profit
/// minus the fee.
pub fn sell(
    portfolio: &mut Portfolio,
    market: &dyn MarketDataPort,
    lot_index: usize,
    amount: u64,
    time: NaiveDateTime,
) -> Result<SaleOutcome, PapertraderError> {
    if amount == 0 {
        return Err(PapertraderError::invalid_state(
            "share sale amount must be positive",
        ));
    }
    let lot = portfolio
        .lots()
        .get(lot_index)
        .ok_or(PapertraderError::UnknownLot { index: lot_index })?;
    let ticker = lot.ticker().to_string();
    let held = lot.shares();
    let buy_price = lot.buy_price();
    let buy_date = lot.buy_date();
    let short = lot.is_short();

    if !market_is_open(market, time) || portfolio.cash() < portfolio.commission_fee() {
        return Ok(SaleOutcome::Rejected);
    }

    let shares_sold = amount.min(held);
    let current = market.stock_price(&ticker);
    let profit = if short {
        shares_sold as f64 * 2.0 * (buy_price - current)
    } else {
        shares_sold as f64 * 2.0 * (current - buy_price)
    };

    portfolio.lot_mut(lot_index)?.reduce_shares(shares_sold)?;

    let after_tax_profit = if profit <= 0.0 {
        0.0
    } else {
        let long_term = market.one_year_before(time) > buy_date;
        tax::after_tax_profit(profit, long_term)
    };

    portfolio.set_cash(portfolio.cash() - portfolio.commission_fee() + after_tax_profit)?;
    Ok(SaleOutcome::Filled {
        shares_sold,
        after_tax_profit,
    })
}

/// Credit a per-share dividend from `company` against the lot at `lot_index`.
///
/// Returns `Ok(false)` without paying anything when the lot belongs to a
/// different ticker. The payout is taxed short-term and does not change the
/// lot's share count.
pub fn pay_dividends(
    portfolio: &mut Portfolio,
    lot_index: usize,
    company: &str,
    per_share: f64,
) -> Result<bool, PapertraderError> {
    if per_share < 0.0 || per_share.is_nan() {
        return Err(PapertraderError::invalid_state(format!(
            "dividend per share {per_share} must be non-negative"
        )));
    }
    let lot = portfolio
        .lots()
        .get(lot_index)
        .ok_or(PapertraderError::UnknownLot { index: lot_index })?;
    if lot.ticker() != company {
        return Ok(false);
    }
    let profit = per_share * lot.shares() as f64;
    let credited = tax::after_tax_profit(profit, false);
    portfolio.set_cash(portfolio.cash() + credited)?;
    Ok(true)
}

/// Grow the cash balance by compound interest and return the new balance.
///
/// `rate` is a percentage. A finite `times_compounded` (must exceed 1)
/// compounds discretely; `f64::INFINITY` compounds continuously.
pub fn compute_interest(
    portfolio: &mut Portfolio,
    rate: f64,
    years: f64,
    times_compounded: f64,
) -> Result<f64, PapertraderError> {
    if rate < 0.0 || rate.is_nan() {
        return Err(PapertraderError::invalid_state(format!(
            "interest rate {rate} must be non-negative"
        )));
    }
    if years <= 0.0 || years.is_nan() {
        return Err(PapertraderError::invalid_state(format!(
            "compounding period {years} must be positive"
        )));
    }
    if times_compounded <= 1.0 || times_compounded.is_nan() {
        return Err(PapertraderError::invalid_state(format!(
            "compounding frequency {times_compounded} must exceed one per year"
        )));
    }

    let total = if times_compounded.is_infinite() {
        portfolio.cash() * ((rate / 100.0) * years).exp()
    } else {
        portfolio.cash()
            * (1.0 + (rate / 100.0) / times_compounded).powf(times_compounded * years)
    };
    portfolio.set_cash(total)?;
    Ok(total)
}
