//! Yahoo Finance price provider.
//!
//! Fetches daily OHLCV rows from Yahoo's v8 chart API for a `range` period
//! and normalises the epoch-second index into an explicit date column. Each
//! timestamp marks the session open, so it is shifted by the exchange's UTC
//! offset before taking the calendar day.
//!
//! There is no retry and no backoff: a failed request is returned to the
//! caller as a `DataError`.

use super::provider::{DataError, DataSource, Period, PriceProvider};
use crate::domain::{PriceRow, PriceTable};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance price provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| {
                DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: CHART_BASE_URL.to_string(),
        })
    }

    /// Point the provider at a different chart endpoint (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the chart API URL for a symbol and period.
    fn chart_url(&self, symbol: &str, period: Period) -> String {
        format!(
            "{}/{symbol}?range={period}&interval=1d&includeAdjustedClose=true",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Parse the chart API response into price rows.
    pub(crate) fn parse_response(
        symbol: &str,
        resp: ChartResponse,
    ) -> Result<Vec<PriceRow>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        fn at(series: &[Option<f64>], i: usize) -> Option<f64> {
            series.get(i).copied().flatten()
        }

        let mut rows = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = ts
                .checked_add(data.meta.gmtoffset)
                .and_then(|local| chrono::DateTime::from_timestamp(local, 0))
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let row = PriceRow {
                date: Some(date),
                open: at(&quote.open, i),
                high: at(&quote.high, i),
                low: at(&quote.low, i),
                close: at(&quote.close, i),
                volume: at(&quote.volume, i),
            };

            // Holidays and halted sessions come back with every field null
            if row.open.is_none()
                && row.high.is_none()
                && row.low.is_none()
                && row.close.is_none()
                && row.volume.is_none()
            {
                continue;
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(rows)
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn source(&self) -> DataSource {
        DataSource::YahooFinance
    }

    fn fetch(&self, symbol: &str, period: Period) -> Result<PriceTable, DataError> {
        let url = self.chart_url(symbol, period);
        debug!(%url, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Ok(PriceTable::new(Self::parse_response(symbol, chart)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(symbol: &str, json: &str) -> Result<Vec<PriceRow>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response(symbol, resp)
    }

    #[test]
    fn parses_rows_with_explicit_dates() {
        // 2024-01-02 14:30 UTC, 2024-01-03 14:30 UTC, 2024-01-04 14:30 UTC
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704205800,1704292200,1704378600],
            "indicators":{"quote":[{
                "open":[187.15,184.22,null],
                "high":[188.44,185.88,null],
                "low":[183.89,183.43,null],
                "close":[185.64,184.25,null],
                "volume":[82488700,58414500,null]
            }]}
        }],"error":null}}"#;

        let rows = parse("AAPL", json).unwrap();
        assert_eq!(rows.len(), 2, "all-null day is skipped");
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(rows[0].close, Some(185.64));
        assert_eq!(rows[0].volume, Some(82_488_700.0));
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[test]
    fn dates_follow_exchange_offset() {
        // Mon 2024-01-08 10:00 AEDT open is 2024-01-07 23:00 UTC
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"BHP.AX","exchangeTimezoneName":"Australia/Sydney","gmtoffset":39600},
            "timestamp":[1704668400,1704754800],
            "indicators":{"quote":[{
                "open":[45.10,45.32],"high":[45.60,45.90],"low":[44.95,45.01],
                "close":[45.40,45.70],"volume":[5123400,4987200]
            }]}
        }],"error":null}}"#;

        let rows = parse("BHP.AX", json).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 8));
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 9));
    }

    #[test]
    fn us_offset_keeps_session_day() {
        // 2024-01-02 09:30 EST open
        let json = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":-18000},
            "timestamp":[1704205800],
            "indicators":{"quote":[{
                "open":[187.15],"high":[188.44],"low":[183.89],
                "close":[185.64],"volume":[82488700]
            }]}
        }],"error":null}}"#;

        let rows = parse("AAPL", json).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn null_close_is_kept_as_missing() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704205800],
            "indicators":{"quote":[{
                "open":[187.15],"high":[188.44],"low":[183.89],
                "close":[null],"volume":[100]
            }]}
        }],"error":null}}"#;

        let rows = parse("AAPL", json).unwrap();
        assert_eq!(rows[0].close, None);
        assert_eq!(rows[0].open, Some(187.15));
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,"error":{
            "code":"Not Found","description":"No data found, symbol may be delisted"
        }}}"#;
        let err = parse("ZZZZ", json).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { ref symbol } if symbol == "ZZZZ"));
    }

    #[test]
    fn other_errors_map_to_format_changed() {
        let json = r#"{"chart":{"result":null,"error":{
            "code":"Bad Request","description":"Invalid input - interval=1d is not supported"
        }}}"#;
        assert!(matches!(
            parse("AAPL", json),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn missing_timestamps_is_format_error() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(matches!(
            parse("AAPL", json),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn chart_url_carries_range() {
        let provider = YahooProvider::new()
            .unwrap()
            .with_base_url("http://localhost:9/chart/");
        assert_eq!(
            provider.chart_url("AAPL", Period::SixMonths),
            "http://localhost:9/chart/AAPL?range=6mo&interval=1d&includeAdjustedClose=true"
        );
    }
}
