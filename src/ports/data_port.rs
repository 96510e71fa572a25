//! Price source port trait.
//!
//! Retrieval (download, caching) lives behind this seam; the domain only ever
//! sees a validated [`PriceSeries`].

use crate::domain::error::GoldenCrossError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices for `ticker`, optionally clipped to an inclusive date range.
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, GoldenCrossError>;

    /// (first date, last date, observation count), or `None` when nothing is stored.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GoldenCrossError>;
}
