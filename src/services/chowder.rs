// src/services/chowder.rs
//
// Pure Chowder Rule math: split adjustment, yearly aggregation, trailing
// yield, tiered CAGR estimation, and the composition ladder. Everything here
// is a plain function of its inputs; fetching lives in market_data/polygon.
use chrono::{Datelike, Duration, NaiveDate};
use log::{info, warn};
use std::collections::HashMap;

use crate::models::{
    AdjustedDividendEvent, ChowderResult, DividendEvent, SplitEvent, YearlyDividendTotals,
};

/// Growth windows tried in order; the first one with two positive endpoint
/// years wins. Deliberately only 5 and 3 — no interpolation, no other tiers.
const CAGR_WINDOWS: [i32; 2] = [5, 3];

/// Length of the trailing-twelve-month yield window, in days.
const TRAILING_WINDOW_DAYS: i64 = 365;

/// A successful growth-rate estimate, with the window that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthEstimate {
    pub cagr: f64,
    pub window_years: i32,
    pub from_year: i32,
    pub to_year: i32,
}

/// Rewrites each dividend's cash amount onto the current share basis.
///
/// For every split executed strictly after a dividend's ex-date, the
/// dividend's adjustment factor picks up `split_to / split_from`; the
/// adjusted amount is `raw / factor`. A split executed exactly on the
/// ex-date does not qualify (documented boundary assumption, kept from the
/// source data conventions). Output has the same length and order as the
/// input; events with missing fields pass through unchanged.
pub fn adjust_for_splits(
    dividends: &[DividendEvent],
    splits: &[SplitEvent],
) -> Vec<AdjustedDividendEvent> {
    // Invalid ratios contribute nothing. Sorting is for deterministic
    // traversal; the factor is a product, so order cannot change the result.
    let mut ordered: Vec<&SplitEvent> = splits
        .iter()
        .filter(|s| s.split_from > 0 && s.split_to > 0)
        .collect();
    ordered.sort_by_key(|s| s.execution_date);

    dividends
        .iter()
        .map(|dividend| {
            let factor = match dividend.ex_dividend_date {
                Some(ex_date) => ordered
                    .iter()
                    .filter(|s| s.execution_date > ex_date)
                    .fold(1.0, |f, s| f * s.split_to as f64 / s.split_from as f64),
                None => 1.0,
            };

            AdjustedDividendEvent {
                amount: dividend.cash_amount.map(|amount| amount / factor),
                ex_date: dividend.ex_dividend_date,
            }
        })
        .collect()
}

/// Buckets adjusted dividend amounts by calendar year. Events missing an
/// amount or a date are excluded. Returns a fresh map each call.
pub fn aggregate_by_year(adjusted: &[AdjustedDividendEvent]) -> YearlyDividendTotals {
    let mut totals = HashMap::new();
    for event in adjusted {
        if let (Some(amount), Some(date)) = (event.amount, event.ex_date) {
            *totals.entry(date.year()).or_insert(0.0) += amount;
        }
    }
    totals
}

/// Trailing-twelve-month dividend yield as a percentage: the sum of adjusted
/// amounts dated within `[as_of - 365 days, as_of]` (inclusive on both
/// ends), divided by the current price. Callers must have verified
/// `current_price > 0` beforehand.
pub fn trailing_yield(
    adjusted: &[AdjustedDividendEvent],
    as_of: NaiveDate,
    current_price: f64,
) -> f64 {
    let window_start = as_of - Duration::days(TRAILING_WINDOW_DAYS);
    let ttm_sum: f64 = adjusted
        .iter()
        .filter_map(|event| match (event.amount, event.ex_date) {
            (Some(amount), Some(date)) if date >= window_start && date <= as_of => Some(amount),
            _ => None,
        })
        .sum();

    ttm_sum / current_price * 100.0
}

fn positive_total(totals: &YearlyDividendTotals, year: i32) -> Option<f64> {
    totals.get(&year).copied().filter(|total| *total > 0.0)
}

/// Estimates the compound annual dividend growth rate from yearly totals.
///
/// The end year is `reference_year - 1`, the most recent fully completed
/// calendar year (the in-progress year has incomplete data). Each candidate
/// window from `CAGR_WINDOWS` is tried in order and qualifies only when both
/// endpoint years are present with strictly positive totals. No qualifying
/// window is an ordinary outcome, reported as `None`.
pub fn estimate_growth_rate(
    totals: &YearlyDividendTotals,
    reference_year: i32,
) -> Option<GrowthEstimate> {
    let to_year = reference_year - 1;

    for window in CAGR_WINDOWS {
        let from_year = to_year - window;
        let (start, end) = match (
            positive_total(totals, from_year),
            positive_total(totals, to_year),
        ) {
            (Some(start), Some(end)) => (start, end),
            _ => continue,
        };

        let cagr = ((end / start).powf(1.0 / window as f64) - 1.0) * 100.0;
        return Some(GrowthEstimate {
            cagr,
            window_years: window,
            from_year,
            to_year,
        });
    }

    None
}

fn invalid_result(
    message: String,
    years_of_data: usize,
    current_price: Option<f64>,
) -> ChowderResult {
    ChowderResult {
        chowder_score: None,
        dividend_yield: None,
        dividend_cagr: None,
        years_of_data,
        is_valid: false,
        message,
        current_price,
    }
}

/// Composes the Chowder score from raw market data.
///
/// Walks an ordered ladder of terminal outcomes; the first applicable one
/// wins: missing price, no dividends, fewer than two years of data, no
/// growth window (which still carries the computed yield), then success.
/// Insufficient data is business-ordinary and never becomes an error.
pub fn compose_chowder_result(
    symbol: &str,
    current_price: Option<f64>,
    dividends: &[DividendEvent],
    splits: &[SplitEvent],
    as_of: NaiveDate,
) -> ChowderResult {
    let price = match current_price.filter(|p| *p > 0.0) {
        Some(price) => price,
        None => {
            warn!("No usable current price for {}", symbol);
            return invalid_result(
                format!("Current price for {} is unavailable or non-positive", symbol),
                0,
                None,
            );
        }
    };

    let adjusted = adjust_for_splits(dividends, splits);
    if adjusted.is_empty() {
        warn!("No dividend history found for {}", symbol);
        return invalid_result(
            format!("No dividend history found for {}", symbol),
            0,
            Some(price),
        );
    }

    let totals = aggregate_by_year(&adjusted);
    let years_of_data = totals.len();
    if years_of_data < 2 {
        warn!(
            "Insufficient dividend history for {}: {} year(s)",
            symbol, years_of_data
        );
        return invalid_result(
            format!(
                "Only {} year(s) of dividend data for {}; at least 2 required",
                years_of_data, symbol
            ),
            years_of_data,
            Some(price),
        );
    }

    let dividend_yield = trailing_yield(&adjusted, as_of, price);

    match estimate_growth_rate(&totals, as_of.year()) {
        Some(estimate) => {
            let message = format!(
                "{}-year CAGR from {} to {}",
                estimate.window_years, estimate.from_year, estimate.to_year
            );
            info!(
                "Chowder score for {}: yield {:.2}% + CAGR {:.2}% ({})",
                symbol, dividend_yield, estimate.cagr, message
            );
            ChowderResult {
                chowder_score: Some(dividend_yield + estimate.cagr),
                dividend_yield: Some(dividend_yield),
                dividend_cagr: Some(estimate.cagr),
                years_of_data,
                is_valid: true,
                message,
                current_price: Some(price),
            }
        }
        None => {
            // Partial positive result: the yield was computable even though
            // no growth window qualified, so it is carried on the invalid
            // result instead of being dropped.
            warn!("No 5-year or 3-year growth window for {}", symbol);
            ChowderResult {
                chowder_score: None,
                dividend_yield: Some(dividend_yield),
                dividend_cagr: None,
                years_of_data,
                is_valid: false,
                message: format!(
                    "No 5-year or 3-year dividend growth window available for {}",
                    symbol
                ),
                current_price: Some(price),
            }
        }
    }
}
