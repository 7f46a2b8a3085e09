// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One declared cash dividend as reported by Polygon. Fields are nullable in
/// the vendor payload, so both are optional here; events with missing pieces
/// are filtered out downstream rather than rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub cash_amount: Option<f64>,
    pub ex_dividend_date: Option<NaiveDate>,
}

/// A stock split: `split_from` shares became `split_to` shares on
/// `execution_date`. Ratios that are zero or negative carry no adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEvent {
    pub execution_date: NaiveDate,
    #[serde(default)]
    pub split_from: i64,
    #[serde(default)]
    pub split_to: i64,
}

/// A dividend whose cash amount has been rewritten onto the current share
/// basis. Same shape as `DividendEvent`, kept as a separate type so raw
/// amounts cannot be fed into the yield or aggregation steps by accident.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedDividendEvent {
    pub amount: Option<f64>,
    pub ex_date: Option<NaiveDate>,
}

/// Summed adjusted dividends per 4-digit calendar year.
pub type YearlyDividendTotals = HashMap<i32, f64>;

/// Chowder Rule calculation result returned to the frontend.
///
/// Data insufficiency (missing price, no dividends, too few years, no growth
/// window) is reported through `is_valid` / `message`, never as an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChowderResult {
    pub chowder_score: Option<f64>,
    pub dividend_yield: Option<f64>,
    #[serde(rename = "dividendCAGR")]
    pub dividend_cagr: Option<f64>,
    pub years_of_data: usize,
    pub is_valid: bool,
    pub message: String,
    pub current_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dividend_event_deserializes_polygon_payload() {
        let event: DividendEvent =
            serde_json::from_str(r#"{"cash_amount": 0.24, "ex_dividend_date": "2024-02-09"}"#)
                .unwrap();
        assert_eq!(event.cash_amount, Some(0.24));
        assert_eq!(event.ex_dividend_date, NaiveDate::from_ymd_opt(2024, 2, 9));
    }

    #[test]
    fn dividend_event_tolerates_missing_fields() {
        let event: DividendEvent = serde_json::from_str(r#"{"cash_amount": null}"#).unwrap();
        assert_eq!(event.cash_amount, None);
        assert_eq!(event.ex_dividend_date, None);
    }

    #[test]
    fn split_event_defaults_missing_ratios_to_zero() {
        let split: SplitEvent =
            serde_json::from_str(r#"{"execution_date": "2020-08-31", "split_to": 4}"#).unwrap();
        assert_eq!(split.split_from, 0);
        assert_eq!(split.split_to, 4);
    }

    #[test]
    fn chowder_result_serializes_camel_case() {
        let result = ChowderResult {
            chowder_score: Some(11.5),
            dividend_yield: Some(1.6),
            dividend_cagr: Some(9.9),
            years_of_data: 6,
            is_valid: true,
            message: "5-year CAGR from 2019 to 2024".to_string(),
            current_price: Some(100.0),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["chowderScore"], 11.5);
        assert_eq!(json["dividendYield"], 1.6);
        assert_eq!(json["dividendCAGR"], 9.9);
        assert_eq!(json["yearsOfData"], 6);
        assert_eq!(json["isValid"], true);
        assert_eq!(json["currentPrice"], 100.0);
    }
}
