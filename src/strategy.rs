use chrono::{Datelike, NaiveDate};
use log::{info, trace, warn};
use std::{cmp::Ordering, fmt};

use crate::calendar::HolidayCalendar;
use crate::error::{CalcError, CalcResult, ConstructionError};
use crate::rates::{BankRates, IncludeBanks, RateKey};

/// The closed catalogue of strategy templates. Each variant knows its roll
/// cadence and which offer funds its standard segments.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StrategyKind {
    CitiThreeMonth,
    ScbtOneWeek,
    ScbtTwoWeek,
    CimbOneMonth,
    PermataOneMonth,
}

impl StrategyKind {
    pub const CATALOGUE: [StrategyKind; 5] = [
        StrategyKind::CitiThreeMonth,
        StrategyKind::ScbtOneWeek,
        StrategyKind::ScbtTwoWeek,
        StrategyKind::CimbOneMonth,
        StrategyKind::PermataOneMonth,
    ];

    pub fn strategy_name(&self) -> &'static str {
        match self {
            StrategyKind::CitiThreeMonth => "CITI 3-month",
            StrategyKind::ScbtOneWeek => "SCBT 1-week rolling",
            StrategyKind::ScbtTwoWeek => "SCBT 2-week rolling",
            StrategyKind::CimbOneMonth => "CIMB 1-month",
            StrategyKind::PermataOneMonth => "Permata 1-month",
        }
    }

    pub fn lender_label(&self) -> &'static str {
        match self {
            StrategyKind::CitiThreeMonth => "CITI 3M",
            StrategyKind::ScbtOneWeek => "SCBT 1w",
            StrategyKind::ScbtTwoWeek => "SCBT 2w",
            StrategyKind::CimbOneMonth => "CIMB 1M",
            StrategyKind::PermataOneMonth => "Permata 1M",
        }
    }

    pub fn rate_key(&self) -> RateKey {
        match self {
            StrategyKind::CitiThreeMonth => RateKey::Citi3m,
            StrategyKind::ScbtOneWeek => RateKey::Scbt1w,
            StrategyKind::ScbtTwoWeek => RateKey::Scbt2w,
            StrategyKind::CimbOneMonth => RateKey::Cimb,
            StrategyKind::PermataOneMonth => RateKey::Permata,
        }
    }

    // roll cadence in days; the 3-month facility funds the whole period
    fn chunk_days(&self, total_days: i64) -> i64 {
        match self {
            StrategyKind::CitiThreeMonth => total_days,
            StrategyKind::ScbtOneWeek => 7,
            StrategyKind::ScbtTwoWeek => 14,
            StrategyKind::CimbOneMonth | StrategyKind::PermataOneMonth => 30,
        }
    }

    fn is_enabled(&self, include_banks: &IncludeBanks) -> bool {
        match self {
            StrategyKind::CimbOneMonth => include_banks.cimb,
            StrategyKind::PermataOneMonth => include_banks.permata,
            _ => true,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.strategy_name())
    }
}

/// One contiguous loan-servicing interval: `[start_date, end_date]`
/// inclusive, funded by a single lender at a single rate.
#[derive(PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Segment {
    pub lender: &'static str,
    pub rate: f64,
    pub day_count: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub interest: f64,
    pub crosses_month: bool,
}

impl Segment {
    fn new(
        lender: &'static str,
        rate: f64,
        principal: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        crosses_month: bool,
    ) -> Self {
        let day_count = end_date.signed_duration_since(start_date).num_days() + 1;
        let interest = simple_interest(&principal, &rate, &day_count);
        Self {
            lender,
            rate,
            day_count,
            start_date,
            end_date,
            interest,
            crosses_month,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} to {}, {} days @ {:.2}%, interest {:.2}{}",
            self.lender,
            self.start_date,
            self.end_date,
            self.day_count,
            self.rate,
            self.interest,
            if self.crosses_month { " (cross-month)" } else { "" }
        )
    }
}

/// A complete, ordered partition of the loan period into segments, with
/// metrics computed once at construction. Never mutated afterwards.
#[derive(PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Strategy {
    pub name: &'static str,
    pub kind: StrategyKind,
    pub segments: Vec<Segment>,
    pub total_interest: f64,
    pub average_rate: f64,
    pub crosses_month: bool,
    pub uses_multi_banks: bool,
    pub is_valid: bool,
}

impl Strategy {
    fn new(kind: StrategyKind, segments: Vec<Segment>) -> Self {
        let total_days: i64 = segments.iter().map(|s| s.day_count).sum();
        let (total_interest, average_rate) = if segments.is_empty() {
            (f64::INFINITY, f64::INFINITY)
        } else {
            let interest: f64 = segments.iter().map(|s| s.interest).sum();
            let weighted: f64 = segments.iter().map(|s| s.rate * s.day_count as f64).sum();
            (interest, weighted / total_days as f64)
        };
        Self {
            name: kind.strategy_name(),
            kind,
            crosses_month: segments.iter().any(|s| s.crosses_month),
            uses_multi_banks: segments.iter().any(|s| s.lender != segments[0].lender),
            is_valid: !segments.is_empty(),
            segments,
            total_interest,
            average_rate,
        }
    }

    fn invalid(kind: StrategyKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// Prints a segment-by-segment breakdown with the strategy totals.
    pub fn show_breakdown(&self) {
        println!("{}", self);
        for segment in &self.segments {
            println!("  {}", segment);
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid {
            return write!(f, "{} (invalid)", self.name);
        }
        write!(
            f,
            "{}: total interest {:.2}, average rate {:.2}%, {} segments",
            self.name,
            self.total_interest,
            self.average_rate,
            self.segments.len()
        )
    }
}

/// The result of one calculation call: the full strategy catalogue in
/// generation order plus the cheapest valid entry.
#[derive(PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Optimization {
    strategies: Vec<Strategy>,
    best: usize,
}

impl Optimization {
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn into_strategies(self) -> Vec<Strategy> {
        self.strategies
    }

    pub fn best_strategy(&self) -> &Strategy {
        &self.strategies[self.best]
    }

    pub fn show_comparison(&self) {
        for strategy in &self.strategies {
            println!("{}", strategy);
        }
    }
}

/// Loan-interest optimization calculator. Holds the (immutable) holiday
/// calendar; every calculation call is a pure function of its arguments.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Calculator {
    calendar: HolidayCalendar,
}

impl Calculator {
    pub fn new(calendar: HolidayCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    /// Generates every enabled strategy for `[start_date, start_date +
    /// total_days)`, prices each by simple daily interest and returns the
    /// catalogue together with the cheapest valid strategy.
    ///
    /// Input errors abort the whole call; a strategy template that cannot be
    /// constructed is returned invalid without poisoning the others.
    pub fn calculate_optimal_strategy(
        &self,
        principal: f64,
        total_days: i64,
        start_date: NaiveDate,
        month_end: NaiveDate,
        bank_rates: &BankRates,
        include_banks: IncludeBanks,
    ) -> CalcResult<Optimization> {
        validate_inputs(principal, total_days, start_date, month_end)?;

        // resolve every referenced rate up front: a missing or malformed
        // entry fails the call before any strategy is built
        let penalty_pct = checked_rate(bank_rates, RateKey::GeneralCrossMonth)?;
        let call_pct = match bank_rates.get(RateKey::CitiCall) {
            Some(_) => Some(checked_rate(bank_rates, RateKey::CitiCall)?),
            None => None,
        };
        let mut enabled = Vec::new();
        for kind in StrategyKind::CATALOGUE {
            if kind.is_enabled(&include_banks) {
                enabled.push((kind, checked_rate(bank_rates, kind.rate_key())?));
            }
        }

        let loan_end = days_after(start_date, total_days - 1);
        let month_ends = month_ends_between(start_date, loan_end, month_end);
        info!(
            "optimizing {:.0} over {} days, {} to {}, month-ends {:?}",
            principal, total_days, start_date, loan_end, month_ends
        );

        let mut strategies = Vec::with_capacity(enabled.len());
        for (kind, standard_pct) in enabled {
            // the call loan undercuts the cross-month penalty whenever the
            // bank offers it
            let (cross_lender, cross_pct) = match call_pct {
                Some(pct) => ("CITI Call", pct),
                None => (kind.lender_label(), penalty_pct),
            };
            let strategy = match self.build_segments(
                kind,
                principal,
                total_days,
                start_date,
                &month_ends,
                standard_pct,
                cross_lender,
                cross_pct,
            ) {
                Ok(segments) => Strategy::new(kind, segments),
                Err(err) => {
                    warn!("{}: {}", kind, err);
                    Strategy::invalid(kind)
                }
            };
            strategies.push(strategy);
        }

        let best = strategies
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_valid && s.total_interest.is_finite())
            .min_by(|(_, a), (_, b)| {
                a.total_interest
                    .partial_cmp(&b.total_interest)
                    .unwrap_or(Ordering::Equal)
            })
            .map(|(index, _)| index)
            .ok_or(CalcError::NoValidStrategy)?;

        info!("optimal: {}", strategies[best]);
        Ok(Optimization { strategies, best })
    }

    // Walks the period in roll chunks of the template's size. Non-final roll
    // dates are pulled back to the previous business day and the freed days
    // ride into the next chunk, so segment day counts always sum to
    // `total_days`. A chunk still ending past a month-end after adjustment is
    // split there: the overhang is funded by the cross lender.
    #[allow(clippy::too_many_arguments)]
    fn build_segments(
        &self,
        kind: StrategyKind,
        principal: f64,
        total_days: i64,
        start_date: NaiveDate,
        month_ends: &[NaiveDate],
        standard_pct: f64,
        cross_lender: &'static str,
        cross_pct: f64,
    ) -> Result<Vec<Segment>, ConstructionError> {
        let chunk_size = kind.chunk_days(total_days);
        let mut segments = Vec::new();
        let mut remaining = total_days;
        let mut current = start_date;
        let mut carry = 0;

        while remaining > 0 {
            let target = (chunk_size + carry).min(remaining);
            carry = 0;
            let mut days = target;
            let mut end = days_after(current, days - 1);
            let is_final = days == remaining;

            if !is_final && !self.calendar.is_business_day(end) {
                // the maturity date is fixed; every other roll date must
                // land on a business day
                let adjusted = self.calendar.previous_business_day(end);
                if adjusted < current {
                    return Err(ConstructionError::UnresolvableBoundary {
                        start: current,
                        end,
                    });
                }
                trace!("{}: roll date {} pulled back to {}", kind, end, adjusted);
                days = adjusted.signed_duration_since(current).num_days() + 1;
                carry = target - days;
                end = adjusted;
            }

            match first_crossed_month_end(current, end, month_ends) {
                Some(boundary) => {
                    warn!(
                        "{}: {} to {} crosses month-end {}, overhang at {:.2}% ({})",
                        kind, current, end, boundary, cross_pct, cross_lender
                    );
                    segments.push(Segment::new(
                        kind.lender_label(),
                        standard_pct,
                        principal,
                        current,
                        boundary,
                        false,
                    ));
                    segments.push(Segment::new(
                        cross_lender,
                        cross_pct,
                        principal,
                        days_after(boundary, 1),
                        end,
                        true,
                    ));
                }
                None => {
                    trace!("{}: {} to {}, {} days at {:.2}%", kind, current, end, days, standard_pct);
                    segments.push(Segment::new(
                        kind.lender_label(),
                        standard_pct,
                        principal,
                        current,
                        end,
                        false,
                    ));
                }
            }

            remaining -= days;
            current = days_after(end, 1);
        }
        Ok(segments)
    }
}

// simple daily interest on an ACT/365 fixed basis
fn simple_interest(&principal: &f64, &annual_pct: &f64, &days: &i64) -> f64 {
    principal * (annual_pct / 100.) * (days as f64 / 365.)
}

fn validate_inputs(
    principal: f64,
    total_days: i64,
    start_date: NaiveDate,
    month_end: NaiveDate,
) -> CalcResult<()> {
    if !principal.is_finite() || principal <= 0. {
        return Err(CalcError::invalid_input(format!(
            "principal must be positive, got {}",
            principal
        )));
    }
    if total_days <= 0 {
        return Err(CalcError::invalid_input(format!(
            "total days must be positive, got {}",
            total_days
        )));
    }
    if start_date > month_end {
        return Err(CalcError::invalid_input(format!(
            "start date {} is after month end {}",
            start_date, month_end
        )));
    }
    Ok(())
}

fn checked_rate(bank_rates: &BankRates, key: RateKey) -> CalcResult<f64> {
    let pct = bank_rates.require(key)?;
    if !pct.is_finite() || pct < 0. {
        return Err(CalcError::invalid_input(format!(
            "rate '{}' must be a non-negative number, got {}",
            key, pct
        )));
    }
    Ok(pct)
}

fn days_after(date: NaiveDate, days: i64) -> NaiveDate {
    match date.checked_add_days(chrono::Days::new(days as u64)) {
        Some(later) => later,
        None => panic!("{} has no date {} days later", date, days),
    }
}

// Every month-end boundary the loan has to respect: the declared one plus
// the calendar end of each month the period touches.
fn month_ends_between(start: NaiveDate, end: NaiveDate, declared: NaiveDate) -> Vec<NaiveDate> {
    let mut month_ends = Vec::new();
    if declared >= start && declared < end {
        month_ends.push(declared);
    }

    let mut first_of_month = start.with_day(1).unwrap_or(start);
    while first_of_month <= end {
        let next_month = match first_of_month.checked_add_months(chrono::Months::new(1)) {
            Some(date) => date,
            None => break,
        };
        let month_end = match next_month.pred_opt() {
            Some(date) => date,
            None => break,
        };
        if month_end >= start && month_end < end && !month_ends.contains(&month_end) {
            month_ends.push(month_end);
        }
        first_of_month = next_month;
    }

    month_ends.sort();
    month_ends
}

// A chunk crosses a boundary when it ends strictly after it. Only the first
// crossed boundary splits the chunk; the whole overhang rides on the cross
// lender.
fn first_crossed_month_end(
    start: NaiveDate,
    end: NaiveDate,
    month_ends: &[NaiveDate],
) -> Option<NaiveDate> {
    month_ends
        .iter()
        .copied()
        .find(|&month_end| start <= month_end && end > month_end)
}
