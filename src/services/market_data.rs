// src/services/market_data.rs
use chrono::{Datelike, NaiveDate};
use log::info;

use super::chowder;
use super::polygon::{MarketDataError, PolygonClient};
use crate::models::ChowderResult;

/// Complete calendar years of history requested ahead of the last complete
/// year, enough to cover the 5-year growth window and its starting year.
const LOOKBACK_YEARS: i32 = 6;

/// January 1st of `(last complete year - LOOKBACK_YEARS)`.
fn lookback_start(as_of: NaiveDate) -> NaiveDate {
    let last_complete_year = as_of.year() - 1;
    NaiveDate::from_ymd_opt(last_complete_year - LOOKBACK_YEARS, 1, 1).unwrap()
}

/// Fetches price, dividend, and split history for `symbol` and runs the
/// Chowder composition over it. Vendor failures propagate as
/// `MarketDataError`; thin data comes back as an invalid `ChowderResult`.
pub async fn compute_chowder_score(
    client: &PolygonClient,
    symbol: &str,
    as_of: NaiveDate,
) -> Result<ChowderResult, MarketDataError> {
    let from_date = lookback_start(as_of);
    info!(
        "Computing Chowder score for {} as of {} (history from {})",
        symbol, as_of, from_date
    );

    let current_price = client.fetch_current_price(symbol).await?;
    let dividends = client.fetch_dividend_history(symbol, from_date).await?;
    let splits = client.fetch_split_history(symbol, from_date).await?;

    Ok(chowder::compose_chowder_result(
        symbol,
        Some(current_price),
        &dividends,
        &splits,
        as_of,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_covers_six_complete_years() {
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(
            lookback_start(as_of),
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
        );
    }

    #[test]
    fn lookback_on_january_first_still_anchors_to_previous_year() {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            lookback_start(as_of),
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
        );
    }
}
