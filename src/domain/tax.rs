//! Tiered tax calculation.
//!
//! Two bracket tables: short-term profits are taxed like ordinary income,
//! long-term profits like capital gains. Pure functions, no portfolio state.

/// Post-tax profit for a realized gain.
///
/// `long_term` selects the capital-gains table; otherwise the ordinary-income
/// table applies. Callers clamp losses to zero before taxing, so `profit` is
/// expected to be non-negative.
pub fn after_tax_profit(profit: f64, long_term: bool) -> f64 {
    let tax = if long_term {
        capital_gains_tax(profit)
    } else {
        income_tax(profit)
    };
    profit - tax
}

fn income_tax(profit: f64) -> f64 {
    if profit <= 10_000.0 {
        0.1 * profit
    } else if profit <= 100_000.0 {
        0.1 * 10_000.0 + 0.2 * (profit - 10_000.0)
    } else if profit <= 1_000_000.0 {
        0.1 * 10_000.0 + 0.2 * 90_000.0 + 0.3 * (profit - 100_000.0)
    } else if profit <= 10_000_000.0 {
        0.1 * 10_000.0 + 0.2 * 90_000.0 + 0.3 * 900_000.0 + 0.4 * (profit - 1_000_000.0)
    } else {
        0.1 * 10_000.0
            + 0.2 * 90_000.0
            + 0.3 * 900_000.0
            + 0.4 * 9_000_000.0
            + 0.7 * (profit - 10_000_000.0)
    }
}

fn capital_gains_tax(profit: f64) -> f64 {
    if profit <= 38_600.0 {
        0.0
    } else if profit <= 425_800.0 {
        0.15 * (profit - 38_600.0)
    } else {
        0.15 * 387_200.0 + 0.3 * (profit - 425_800.0)
    }
}
