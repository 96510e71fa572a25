//! CSV price cache adapter.
//!
//! Reads `<base_path>/<ticker>.csv` with a header row, the date in the first
//! column and the closing price in the last column (`Date,Close_Price`).

use crate::domain::error::GoldenCrossError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_points(&self, ticker: &str) -> Result<Vec<PricePoint>, GoldenCrossError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| GoldenCrossError::DataRetrieval {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| GoldenCrossError::DataRetrieval {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| GoldenCrossError::DataRetrieval {
                reason: format!("row {}: missing date column", row + 1),
            })?;
            let date = parse_date(date_str).ok_or_else(|| GoldenCrossError::DataRetrieval {
                reason: format!("row {}: invalid date {:?}", row + 1, date_str),
            })?;

            let price_str = match record.iter().skip(1).last() {
                Some(s) if !s.trim().is_empty() => s.trim(),
                _ => {
                    tracing::debug!(%date, "skipping row without price");
                    continue;
                }
            };
            let price: f64 = price_str.parse().map_err(|e| GoldenCrossError::DataRetrieval {
                reason: format!("row {}: invalid price {:?}: {}", row + 1, price_str, e),
            })?;

            points.push(PricePoint::new(date, price));
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

/// `YYYY-MM-DD`, ignoring any trailing time component.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.trim().split([' ', 'T']).next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, GoldenCrossError> {
        let points: Vec<PricePoint> = self
            .read_points(ticker)?
            .into_iter()
            .filter(|p| start_date.is_none_or(|start| p.date >= start))
            .filter(|p| end_date.is_none_or(|end| p.date <= end))
            .collect();

        tracing::debug!(ticker, rows = points.len(), "prices loaded");
        PriceSeries::new(points)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GoldenCrossError> {
        let points = self.read_points(ticker)?;
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, points.len())),
            _ => None,
        })
    }
}
