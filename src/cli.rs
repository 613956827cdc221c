//! CLI definition and dispatch.
//!
//! The engines never read stdin; all prompting lives here.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_statement_adapter::CsvStatementAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::fixed_quote_adapter::FixedQuoteAdapter;
use crate::adapters::http_quote_adapter::HttpQuoteAdapter;
use crate::domain::config_validation::{
    validate_session_config, DEFAULT_ENROLLMENT_FEE, DEFAULT_MARKET_MODE,
};
use crate::domain::crypto::{self, CoinTrade};
use crate::domain::equity::{self, SaleOutcome};
use crate::domain::error::PapertraderError;
use crate::domain::loan;
use crate::domain::portfolio::Portfolio;
use crate::domain::tax;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::statement_port::StatementPort;

#[derive(Parser, Debug)]
#[command(name = "papertrader", about = "Personal investment account simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an interactive trading session
    Play {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory to write a CSV statement into when the session ends
        #[arg(long)]
        statement: Option<PathBuf>,
    },
    /// Print the current price for a ticker (BTC for the coin price)
    Quote {
        ticker: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the post-tax value of a profit
    Tax {
        profit: f64,
        #[arg(long)]
        long_term: bool,
    },
    /// Validate a session config file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Play { config, statement } => run_play(config.as_ref(), statement.as_ref()),
        Command::Quote { ticker, config } => run_quote(&ticker, config.as_ref()),
        Command::Tax { profit, long_term } => run_tax(profit, long_term),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PapertraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build the quote provider the config asks for: the fixed price table, or
/// the live endpoint when `[market] mode = live`.
pub fn build_market_provider(
    config: &dyn ConfigPort,
) -> Result<Box<dyn MarketDataPort>, PapertraderError> {
    let mode = config
        .get_string("market", "mode")
        .unwrap_or_else(|| DEFAULT_MARKET_MODE.to_string());
    match mode.as_str() {
        "fixed" => Ok(Box::new(FixedQuoteAdapter::new())),
        "live" => {
            let key = config.get_string("market", "api_key").ok_or_else(|| {
                PapertraderError::ConfigMissing {
                    section: "market".to_string(),
                    key: "api_key".to_string(),
                }
            })?;
            Ok(Box::new(HttpQuoteAdapter::new(&key)))
        }
        other => Err(PapertraderError::ConfigInvalid {
            section: "market".to_string(),
            key: "mode".to_string(),
            reason: format!("expected fixed or live, got {other}"),
        }),
    }
}

pub fn enrollment_fee(config: &dyn ConfigPort) -> f64 {
    config.get_double("account", "enrollment_fee", DEFAULT_ENROLLMENT_FEE)
}

fn load_session_config(config_path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    let adapter = match config_path {
        Some(path) => load_config(path)?,
        None => FileConfigAdapter::empty(),
    };
    if let Err(e) = validate_session_config(&adapter) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }
    Ok(adapter)
}

fn run_play(config_path: Option<&PathBuf>, statement_dir: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_session_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let market = match build_market_provider(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let fee = enrollment_fee(&adapter);

    match run_session(market.as_ref(), fee, statement_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_session(
    market: &dyn MarketDataPort,
    fee: f64,
    statement_dir: Option<&PathBuf>,
) -> Result<(), PapertraderError> {
    let start = prompt_f64("How much money would you like to start with? ")?;
    if start < 0.0 {
        println!("A starting balance cannot be negative.");
        return Ok(());
    }
    let Some(mut portfolio) = Portfolio::open(start, fee)? else {
        println!(
            "The enrollment fee of ${fee:.2} exceeds your investment; no account was opened."
        );
        return Ok(());
    };

    loop {
        println!("\nYou have a cash balance of ${:.2}", portfolio.cash());
        println!("Would you like to...... (type the number of the action)");
        println!(" Press 1 to buy coins");
        println!(" Press 2 to sell coins");
        println!(" Press 3 to take out a loan");
        println!(" Press 4 to buy stock");
        println!(" Press 5 to sell stock");
        println!(" Press 6 to quit");
        let choice = prompt_line("Enter: ")?;
        match choice.as_str() {
            "1" => buy_coins(&mut portfolio, market)?,
            "2" => sell_coins(&mut portfolio, market)?,
            "3" => take_loan(&mut portfolio)?,
            "4" => buy_shares(&mut portfolio, market)?,
            "5" => sell_shares(&mut portfolio, market)?,
            "6" => break,
            _ => println!("Key stroke not recognized"),
        }
    }

    println!("\nYou have a final cash balance of ${:.2}", portfolio.cash());
    if let Some(dir) = statement_dir {
        CsvStatementAdapter::new().write(&portfolio, dir)?;
        eprintln!("Statement written to {}", dir.display());
    }
    println!("Thanks!");
    Ok(())
}

fn buy_coins(
    portfolio: &mut Portfolio,
    market: &dyn MarketDataPort,
) -> Result<(), PapertraderError> {
    println!("The current price of a coin is ${:.2}", market.btc_price());
    let amount = prompt_u64("How many coins would you like to buy? ")?;
    if amount == 0 {
        println!("Nothing to buy");
        return Ok(());
    }
    match crypto::buy(portfolio, market, amount)? {
        CoinTrade::Filled { .. } => {
            println!("You now have a coin balance of {}", portfolio.coin_balance());
            println!(
                "They are worth ${:.2}",
                portfolio.coin_balance() as f64 * market.btc_price()
            );
        }
        CoinTrade::InsufficientCash => {
            println!("I am sorry, you do not have enough money for this transaction");
        }
    }
    Ok(())
}

fn sell_coins(
    portfolio: &mut Portfolio,
    market: &dyn MarketDataPort,
) -> Result<(), PapertraderError> {
    println!("The current price of a coin is ${:.2}", market.btc_price());
    let amount = prompt_u64("How many coins would you like to sell? ")?;
    if amount == 0 {
        println!("Nothing to sell");
        return Ok(());
    }
    match crypto::sell(portfolio, market, amount)? {
        CoinTrade::Filled { .. } => {
            println!("You now have a coin balance of {}", portfolio.coin_balance());
            println!(
                "They are worth ${:.2}",
                portfolio.coin_balance() as f64 * market.btc_price()
            );
        }
        CoinTrade::InsufficientCash => {
            println!("I am sorry, you do not have enough money for this transaction");
        }
    }
    Ok(())
}

fn take_loan(portfolio: &mut Portfolio) -> Result<(), PapertraderError> {
    let amount = prompt_f64("How much money would you like to borrow? ")?;
    if amount < 0.0 {
        println!("A loan amount cannot be negative");
        return Ok(());
    }
    let years = prompt_u32("Over how many years? ")?;
    if years == 0 {
        println!("A loan needs at least one year");
        return Ok(());
    }
    match loan::issue(portfolio, amount, years)? {
        Some(new_loan) => {
            println!(
                "You now have a loan with a balance of ${:.2}",
                new_loan.balance()
            );
            portfolio.push_loan(new_loan);
            println!("Your cash balance is now ${:.2}", portfolio.cash());
        }
        None => println!("I am sorry, this transaction failed"),
    }
    Ok(())
}

fn buy_shares(
    portfolio: &mut Portfolio,
    market: &dyn MarketDataPort,
) -> Result<(), PapertraderError> {
    let ticker = prompt_line("What stock would you like to buy? ")?;
    if ticker.is_empty() {
        println!("No ticker given");
        return Ok(());
    }
    println!(
        "{} is currently worth ${:.2}",
        ticker,
        market.stock_price(&ticker)
    );
    let shares = prompt_u64("How many shares would you like to buy? ")?;
    if shares == 0 {
        println!("Nothing to buy");
        return Ok(());
    }
    let short = prompt_line("Would you like to short this stock Y/N? ")? == "Y";
    let now = Local::now().naive_local();
    match equity::buy(portfolio, market, &ticker, shares, short, now)? {
        Some(lot) => {
            portfolio.push_lot(lot);
            println!("Transaction successful!");
        }
        None => println!("I am sorry, this transaction failed"),
    }
    Ok(())
}

fn sell_shares(
    portfolio: &mut Portfolio,
    market: &dyn MarketDataPort,
) -> Result<(), PapertraderError> {
    let ticker = prompt_line("What stock would you like to sell? ")?;
    if ticker.is_empty() {
        println!("No ticker given");
        return Ok(());
    }
    println!(
        "{} is currently worth ${:.2}",
        ticker,
        market.stock_price(&ticker)
    );
    // Sell out of the matching lot with the most shares left.
    let index = portfolio
        .lots()
        .iter()
        .enumerate()
        .filter(|(_, lot)| lot.ticker() == ticker)
        .max_by_key(|(_, lot)| lot.shares())
        .map(|(i, _)| i);
    let Some(index) = index else {
        println!("You do not own any shares of {ticker}");
        return Ok(());
    };
    let shares = prompt_u64("How many shares would you like to sell? ")?;
    if shares == 0 {
        println!("Nothing to sell");
        return Ok(());
    }
    let now = Local::now().naive_local();
    match equity::sell(portfolio, market, index, shares, now)? {
        SaleOutcome::Filled { shares_sold, .. } => {
            println!("Transaction successful! Sold {shares_sold} shares");
            println!("You now have a balance of ${:.2}", portfolio.cash());
        }
        SaleOutcome::Rejected => println!("I am sorry, this transaction failed"),
    }
    Ok(())
}

fn run_quote(ticker: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_session_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let market = match build_market_provider(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let price = if ticker.eq_ignore_ascii_case("BTC") {
        market.btc_price()
    } else {
        market.stock_price(ticker)
    };
    println!("{ticker}: ${price:.2}");
    ExitCode::SUCCESS
}

fn run_tax(profit: f64, long_term: bool) -> ExitCode {
    if profit < 0.0 {
        eprintln!("error: profit must be non-negative");
        return ExitCode::from(4);
    }
    let kept = tax::after_tax_profit(profit, long_term);
    println!("{kept:.2}");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_session_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");
    ExitCode::SUCCESS
}

fn prompt_line(prompt: &str) -> Result<String, PapertraderError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().read_line(&mut line)?;
    if read == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
    }
    Ok(line.trim().to_string())
}

fn prompt_f64(prompt: &str) -> Result<f64, PapertraderError> {
    loop {
        let line = prompt_line(prompt)?;
        match line.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Please enter a number"),
        }
    }
}

fn prompt_u64(prompt: &str) -> Result<u64, PapertraderError> {
    loop {
        let line = prompt_line(prompt)?;
        match line.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Please enter a whole number"),
        }
    }
}

fn prompt_u32(prompt: &str) -> Result<u32, PapertraderError> {
    loop {
        let line = prompt_line(prompt)?;
        match line.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Please enter a whole number"),
        }
    }
}
