//! Loan issuance and amortized repayment.
//!
//! A loan owes `balance` across `months_left` equal installments. Missing an
//! installment adds the flat late fee to the balance instead of moving cash.
//! Repaid loans stay in the portfolio's loan list with a zero balance.

use super::error::PapertraderError;
use super::portfolio::Portfolio;

/// Flat penalty added to the balance when an installment cannot be paid.
pub const LATE_FEE: f64 = 100.0;

/// Portfolios with a loan rate above this are refused further credit.
pub const MAX_LOAN_RATE: f64 = 0.20;

/// Rate movement per issuance (up) and per fully repaid loan (down).
pub const RATE_STEP: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    balance: f64,
    months_left: u32,
    late_fee: f64,
}

impl Loan {
    pub fn new(balance: f64, months: u32) -> Result<Self, PapertraderError> {
        if balance < 0.0 || balance.is_nan() {
            return Err(PapertraderError::invalid_state(format!(
                "loan balance {balance} must be non-negative"
            )));
        }
        Ok(Loan {
            balance,
            months_left: months,
            late_fee: LATE_FEE,
        })
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn months_left(&self) -> u32 {
        self.months_left
    }

    pub fn late_fee(&self) -> f64 {
        self.late_fee
    }

    pub fn is_retired(&self) -> bool {
        self.months_left == 0
    }

    pub fn set_balance(&mut self, value: f64) -> Result<(), PapertraderError> {
        if value < 0.0 || value.is_nan() {
            return Err(PapertraderError::invalid_state(format!(
                "loan balance {value} must be non-negative"
            )));
        }
        self.balance = value;
        Ok(())
    }

    pub fn set_months_left(&mut self, months: u32) {
        self.months_left = months;
    }
}

/// Issue a loan of `amount` over `length_years`.
///
/// Refused (`Ok(None)`) when the portfolio's loan rate already exceeds
/// [`MAX_LOAN_RATE`]. Otherwise the cash is credited immediately, the rate
/// rises one step, and the returned loan's balance carries simple interest at
/// the raised rate. The caller owns attaching the loan to the portfolio.
/// No commission and no tax on this transaction.
pub fn issue(
    portfolio: &mut Portfolio,
    amount: f64,
    length_years: u32,
) -> Result<Option<Loan>, PapertraderError> {
    if amount < 0.0 || amount.is_nan() {
        return Err(PapertraderError::invalid_state(format!(
            "loan amount {amount} must be non-negative"
        )));
    }
    if length_years == 0 {
        return Err(PapertraderError::invalid_state(
            "loan length must be at least one year",
        ));
    }
    if portfolio.loan_rate() > MAX_LOAN_RATE {
        return Ok(None);
    }

    portfolio.set_cash(portfolio.cash() + amount)?;
    portfolio.set_loan_rate(portfolio.loan_rate() + RATE_STEP)?;

    let balance = amount + length_years as f64 * portfolio.loan_rate() * amount;
    Ok(Some(Loan::new(balance, length_years)?))
}

/// Outcome of one scheduled installment.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Paid { installment: f64 },
    Late { penalty: f64 },
}

/// Pay the current installment (`balance / months_left`) on the loan at
/// `loan_index`.
///
/// With insufficient cash the payment is missed: the late fee is added to the
/// loan balance and cash stays put. The portfolio's loan rate steps down when
/// the final installment clears. Paying an already retired loan is a caller
/// bug and fails with `InvalidState`.
pub fn pay(
    portfolio: &mut Portfolio,
    loan_index: usize,
) -> Result<PaymentOutcome, PapertraderError> {
    let (balance, months_left) = {
        let loan = portfolio.loan_mut(loan_index)?;
        (loan.balance(), loan.months_left())
    };
    if months_left == 0 {
        return Err(PapertraderError::invalid_state(
            "loan is already retired; no installment is due",
        ));
    }

    let installment = balance / months_left as f64;
    if portfolio.cash() < installment {
        let loan = portfolio.loan_mut(loan_index)?;
        let penalty = loan.late_fee();
        loan.set_balance(balance + penalty)?;
        return Ok(PaymentOutcome::Late { penalty });
    }

    if months_left == 1 {
        portfolio.set_loan_rate(portfolio.loan_rate() - RATE_STEP)?;
    }
    portfolio.set_cash(portfolio.cash() - installment)?;
    let loan = portfolio.loan_mut(loan_index)?;
    loan.set_balance(balance - installment)?;
    loan.set_months_left(months_left - 1);
    Ok(PaymentOutcome::Paid { installment })
}
