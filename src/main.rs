#![allow(unused_imports, dead_code)]
use chrono::NaiveDate;
use loanopt::calendar::HolidayCalendar;
use loanopt::rates::{BankRates, IncludeBanks};
use loanopt::strategy::*;
use log::{info, warn};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    let calculator = Calculator::new(HolidayCalendar::indonesia_2025());

    let result = calculator.calculate_optimal_strategy(
        38_000_000_000.,
        30,
        NaiveDate::from_ymd_opt(2025, 5, 29).unwrap(),
        NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
        &BankRates::default(),
        IncludeBanks::default(),
    );

    match result {
        Ok(optimization) => {
            optimization.show_comparison();
            println!();
            optimization.best_strategy().show_breakdown();
        }
        Err(err) => warn!("calculation failed: {}", err),
    }
}

// verifies that types can implement the gated traits below
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<Segment>();
    is_normal::<Strategy>();
    is_normal::<Optimization>();
    is_normal::<Calculator>();
}
