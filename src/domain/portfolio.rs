//! Portfolio aggregate: cash, fees, loan rate, stock lots, loans, coins.
//!
//! Every monetary field is revalidated on mutation; a write that would leave
//! the account in an illegal state (negative or NaN cash, negative rate) fails
//! with [`PapertraderError::InvalidState`] and changes nothing.

use super::error::PapertraderError;
use super::loan::Loan;
use super::stock::StockLot;

/// Flat per-transaction commission charged from account opening onwards.
pub const OPENING_COMMISSION_FEE: f64 = 1.0;

/// Loan interest rate a freshly opened portfolio starts at.
pub const OPENING_LOAN_RATE: f64 = 0.10;

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    cash: f64,
    commission_fee: f64,
    loan_rate: f64,
    coin_balance: u64,
    lots: Vec<StockLot>,
    loans: Vec<Loan>,
}

fn ensure_money(label: &str, value: f64) -> Result<(), PapertraderError> {
    if value < 0.0 || value.is_nan() {
        return Err(PapertraderError::invalid_state(format!(
            "{label} {value} must be non-negative"
        )));
    }
    Ok(())
}

impl Portfolio {
    /// Open a portfolio funded with `to_invest`, charging the enrollment
    /// `fee`. Returns `Ok(None)` when the fee exceeds the investment.
    pub fn open(to_invest: f64, fee: f64) -> Result<Option<Portfolio>, PapertraderError> {
        ensure_money("investment", to_invest)?;
        ensure_money("enrollment fee", fee)?;
        if fee > to_invest {
            return Ok(None);
        }
        Ok(Some(Portfolio {
            cash: to_invest - fee,
            commission_fee: OPENING_COMMISSION_FEE,
            loan_rate: OPENING_LOAN_RATE,
            coin_balance: 0,
            lots: Vec::new(),
            loans: Vec::new(),
        }))
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn set_cash(&mut self, value: f64) -> Result<(), PapertraderError> {
        ensure_money("cash", value)?;
        self.cash = value;
        Ok(())
    }

    pub fn commission_fee(&self) -> f64 {
        self.commission_fee
    }

    pub fn loan_rate(&self) -> f64 {
        self.loan_rate
    }

    pub fn set_loan_rate(&mut self, value: f64) -> Result<(), PapertraderError> {
        ensure_money("loan rate", value)?;
        self.loan_rate = value;
        Ok(())
    }

    pub fn coin_balance(&self) -> u64 {
        self.coin_balance
    }

    pub fn set_coin_balance(&mut self, units: u64) {
        self.coin_balance = units;
    }

    /// All lots ever bought, including lots sold down to zero shares.
    pub fn lots(&self) -> &[StockLot] {
        &self.lots
    }

    pub fn push_lot(&mut self, lot: StockLot) {
        self.lots.push(lot);
    }

    pub fn lot_mut(&mut self, index: usize) -> Result<&mut StockLot, PapertraderError> {
        self.lots
            .get_mut(index)
            .ok_or(PapertraderError::UnknownLot { index })
    }

    /// All loans ever issued, including fully repaid ones.
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn push_loan(&mut self, loan: Loan) {
        self.loans.push(loan);
    }

    pub fn loan_mut(&mut self, index: usize) -> Result<&mut Loan, PapertraderError> {
        self.loans
            .get_mut(index)
            .ok_or(PapertraderError::UnknownLoan { index })
    }
}
