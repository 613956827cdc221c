//! CSV account statement adapter.
//!
//! Writes three files into the target directory: `summary.csv` (one row of
//! account figures), `holdings.csv` (every lot, including sold-out ones) and
//! `loans.csv` (every loan, including repaid ones).

use std::fs;
use std::path::Path;

use crate::domain::error::PapertraderError;
use crate::domain::portfolio::Portfolio;
use crate::ports::statement_port::StatementPort;

pub struct CsvStatementAdapter;

fn statement_error(e: csv::Error) -> PapertraderError {
    PapertraderError::Statement {
        reason: e.to_string(),
    }
}

impl CsvStatementAdapter {
    pub fn new() -> Self {
        CsvStatementAdapter
    }

    fn write_summary(portfolio: &Portfolio, path: &Path) -> Result<(), PapertraderError> {
        let mut writer = csv::Writer::from_path(path).map_err(statement_error)?;
        writer
            .write_record(["cash", "commission_fee", "loan_rate", "coin_balance"])
            .map_err(statement_error)?;
        writer
            .write_record([
                format!("{:.2}", portfolio.cash()),
                format!("{:.2}", portfolio.commission_fee()),
                format!("{:.2}", portfolio.loan_rate()),
                portfolio.coin_balance().to_string(),
            ])
            .map_err(statement_error)?;
        writer.flush()?;
        Ok(())
    }

    fn write_holdings(portfolio: &Portfolio, path: &Path) -> Result<(), PapertraderError> {
        let mut writer = csv::Writer::from_path(path).map_err(statement_error)?;
        writer
            .write_record(["ticker", "shares", "buy_price", "buy_date", "short"])
            .map_err(statement_error)?;
        for lot in portfolio.lots() {
            writer
                .write_record([
                    lot.ticker().to_string(),
                    lot.shares().to_string(),
                    format!("{:.2}", lot.buy_price()),
                    lot.buy_date().format("%Y-%m-%d %H:%M:%S").to_string(),
                    lot.is_short().to_string(),
                ])
                .map_err(statement_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_loans(portfolio: &Portfolio, path: &Path) -> Result<(), PapertraderError> {
        let mut writer = csv::Writer::from_path(path).map_err(statement_error)?;
        writer
            .write_record(["balance", "months_left", "late_fee"])
            .map_err(statement_error)?;
        for loan in portfolio.loans() {
            writer
                .write_record([
                    format!("{:.2}", loan.balance()),
                    loan.months_left().to_string(),
                    format!("{:.2}", loan.late_fee()),
                ])
                .map_err(statement_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvStatementAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementPort for CsvStatementAdapter {
    fn write(&self, portfolio: &Portfolio, dir: &Path) -> Result<(), PapertraderError> {
        fs::create_dir_all(dir)?;
        Self::write_summary(portfolio, &dir.join("summary.csv"))?;
        Self::write_holdings(portfolio, &dir.join("holdings.csv"))?;
        Self::write_loans(portfolio, &dir.join("loans.csv"))?;
        Ok(())
    }
}
