//! Closing price series.

use chrono::NaiveDate;

use super::error::GoldenCrossError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Date-ordered closing prices for a single asset.
///
/// Construction enforces the series invariants: at least one observation,
/// dates strictly increasing and every price strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, GoldenCrossError> {
        if points.is_empty() {
            return Err(GoldenCrossError::EmptyInput);
        }

        for (i, point) in points.iter().enumerate() {
            // written as a negated comparison so NaN is rejected too
            if !(point.price > 0.0) {
                return Err(GoldenCrossError::NonPositivePrice {
                    date: point.date,
                    price: point.price,
                });
            }
            if i > 0 {
                let prev = points[i - 1].date;
                if point.date == prev {
                    return Err(GoldenCrossError::DuplicateDate { date: point.date });
                }
                if point.date < prev {
                    return Err(GoldenCrossError::UnsortedDates {
                        index: i,
                        date: point.date,
                    });
                }
            }
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Never panics: `new` rejects an empty series.
    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    /// Never panics: `new` rejects an empty series.
    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }
}
