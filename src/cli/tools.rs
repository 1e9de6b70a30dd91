//! Calculator and payment CLI commands

use chrono::Utc;

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::display::format_transaction_details;
use crate::models::{Money, UserId};
use crate::services::calculator::format_number;
use crate::services::{annual_total, simple_interest, Calculator, PaymentProcessor};

/// Press `keys` on a fresh calculator and print the display
pub fn handle_calc(keys: &str) -> LedgerResult<()> {
    let mut calculator = Calculator::new();
    let display = calculator.run(keys)?;
    println!("{}", display);
    Ok(())
}

/// Print simple interest and, optionally, the annual total of a monthly figure
pub fn handle_interest(
    settings: &Settings,
    principal: f64,
    rate: f64,
    years: f64,
    monthly: Option<f64>,
) -> LedgerResult<()> {
    if ![principal, rate, years].iter().all(|v| v.is_finite()) {
        return Err(LedgerError::Validation(
            "Principal, rate and years must be numbers".into(),
        ));
    }

    let symbol = settings.currency_symbol.as_str();
    let interest = simple_interest(principal, rate, years);
    println!("Interest:    {}{}", symbol, format_number(interest));
    println!("Total:       {}{}", symbol, format_number(principal + interest));

    if let Some(monthly) = monthly {
        println!("Annual:      {}{}", symbol, format_number(annual_total(monthly)));
    }
    Ok(())
}

/// Run a simulated card payment
pub fn handle_pay(
    settings: &Settings,
    amount: &str,
    description: &str,
    seed: Option<u64>,
) -> LedgerResult<()> {
    let amount = Money::parse(amount).map_err(|e| LedgerError::Validation(e.to_string()))?;
    let mut processor = match seed {
        Some(seed) => PaymentProcessor::with_seed(seed, &settings.payments)?,
        None => PaymentProcessor::from_settings(&settings.payments)?,
    };

    let receipt = processor.process(amount, description, Utc::now())?;
    let symbol = settings.currency_symbol.as_str();

    println!("Payment successful");
    println!("  Reference:   {}", receipt.id);
    println!("  Amount:      {}", receipt.amount.format_with_symbol(symbol));
    println!("  Description: {}", receipt.description);
    println!("  Settles at:  {}", receipt.settles_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();
    println!("Ledger entry");
    print!(
        "{}",
        format_transaction_details(&receipt.to_transaction(UserId::new()), symbol)
    );
    Ok(())
}
