//! Archive periods.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::{Error, InvalidInputError};

/// An inclusive range of creation times: a whole year or a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Period {
    /// The period covering `year`, or only `month` of it when given.
    ///
    /// # Errors
    ///
    /// Returns an error for a month outside 1..=12 or an unrepresentable
    /// year.
    pub fn month(year: i32, month: Option<u32>) -> Result<Self, Error> {
        let invalid = || Error::InvalidInput(InvalidInputError::Period { year, month });

        let (first, last) = match month {
            Some(m) if (1..=12).contains(&m) => (m, m),
            Some(_) => return Err(invalid()),
            None => (1, 12),
        };

        let from = NaiveDate::from_ymd_opt(year, first, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(invalid)?;
        let last_day = last_day_of_month(year, last).ok_or_else(invalid)?;
        let to = NaiveDate::from_ymd_opt(year, last, last_day)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .ok_or_else(invalid)?;

        Ok(Self {
            from: from.and_utc(),
            to: to.and_utc(),
        })
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        &self.from <= dt && dt <= &self.to
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(first_of_next.pred_opt()?.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn single_month() {
        let period = Period::month(2022, Some(1)).unwrap();
        assert_eq!((period.from.year(), period.from.month(), period.from.day()), (2022, 1, 1));
        assert_eq!((period.to.year(), period.to.month(), period.to.day()), (2022, 1, 31));
        assert_eq!(period.to.hour(), 23);
    }

    #[test]
    fn leap_february() {
        let period = Period::month(2024, Some(2)).unwrap();
        assert_eq!(period.to.day(), 29);

        let period = Period::month(2023, Some(2)).unwrap();
        assert_eq!(period.to.day(), 28);
    }

    #[test]
    fn whole_year() {
        let period = Period::month(2022, None).unwrap();
        assert_eq!((period.from.month(), period.from.day()), (1, 1));
        assert_eq!((period.to.month(), period.to.day()), (12, 31));
    }

    #[test]
    fn bad_month_fails() {
        assert!(Period::month(2022, Some(0)).is_err());
        assert!(Period::month(2022, Some(13)).is_err());
    }

    #[test]
    fn contains_is_inclusive() {
        let period = Period::month(2022, Some(3)).unwrap();
        assert!(period.contains(&period.from));
        assert!(period.contains(&period.to));
        assert!(!period.contains(&(period.to + chrono::Duration::seconds(1))));
    }
}
