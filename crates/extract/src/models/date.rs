use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use time::{Date, Month};

use crate::consts;
use crate::error::{Error, ErrorKind};

/// A publication date at whatever granularity the site exposes.
///
/// Douban lists publication dates as `2017-2-1`, `2017-2` or just `2017`;
/// parsing keeps the coarsest granularity that is actually present instead
/// of inventing a day or month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishDate {
    Year(i32),
    YearMonth(i32, Month),
    Full(Date),
}

impl PublishDate {
    pub fn year(&self) -> i32 {
        match self {
            PublishDate::Year(y) => *y,
            PublishDate::YearMonth(y, _) => *y,
            PublishDate::Full(date) => date.year(),
        }
    }
}

fn month_from_number(n: u8) -> Option<Month> {
    Month::try_from(n).ok()
}

impl FromStr for PublishDate {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(captures) = consts::YEAR_MONTH_DAY_REGEX.captures(trimmed)
            && let (Ok(year), Ok(month), Ok(day)) = (
                captures[1].parse::<i32>(),
                captures[2].parse::<u8>(),
                captures[3].parse::<u8>(),
            )
            && let Some(month) = month_from_number(month)
            && let Ok(date) = Date::from_calendar_date(year, month, day)
        {
            return Ok(PublishDate::Full(date));
        }
        if let Some(captures) = consts::YEAR_MONTH_REGEX.captures(trimmed)
            && let (Ok(year), Ok(month)) = (captures[1].parse::<i32>(), captures[2].parse::<u8>())
            && let Some(month) = month_from_number(month)
        {
            return Ok(PublishDate::YearMonth(year, month));
        }
        // Fall back to the first plausible year anywhere in the value; the
        // site occasionally wraps dates in prose ("2017年2月").
        if let Some(captures) = consts::YEAR_REGEX.captures(trimmed)
            && let Ok(year) = captures[1].parse::<i32>()
        {
            return Ok(PublishDate::Year(year));
        }
        exn::bail!(ErrorKind::ParseError {
            field: "published",
            value: s.to_string(),
        })
    }
}

impl Display for PublishDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PublishDate::Year(y) => write!(f, "{y}"),
            PublishDate::YearMonth(y, m) => write!(f, "{y}-{}", *m as u8),
            PublishDate::Full(date) => write!(f, "{}-{}-{}", date.year(), date.month() as u8, date.day()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2017-2-1", PublishDate::Full(Date::from_calendar_date(2017, Month::February, 1).unwrap()))]
    #[case("2017-02-01", PublishDate::Full(Date::from_calendar_date(2017, Month::February, 1).unwrap()))]
    #[case("2017-2", PublishDate::YearMonth(2017, Month::February))]
    #[case("2017", PublishDate::Year(2017))]
    #[case(" 2017年2月 ", PublishDate::Year(2017))]
    fn parses_to_coarsest_granularity(#[case] input: &str, #[case] expected: PublishDate) {
        assert_eq!(input.parse::<PublishDate>().unwrap(), expected);
    }

    #[rstest]
    #[case("2017-13")] // no thirteenth month, but the year survives
    #[case("2017-2-31")] // no such day, but the year survives
    fn invalid_components_degrade_to_year(#[case] input: &str) {
        assert_eq!(input.parse::<PublishDate>().unwrap(), PublishDate::Year(2017));
    }

    #[rstest]
    #[case("unknown")]
    #[case("")]
    fn unparseable(#[case] input: &str) {
        let err = input.parse::<PublishDate>().unwrap_err();
        assert!(matches!(&*err, crate::error::ErrorKind::ParseError { field: "published", .. }));
    }

    #[test]
    fn year_accessor() {
        assert_eq!("2017-2-1".parse::<PublishDate>().unwrap().year(), 2017);
    }
}
