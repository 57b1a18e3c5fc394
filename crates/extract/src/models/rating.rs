use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// An average rating on the normalized 0.0–10.0 scale.
///
/// Douban publishes averages on a 0–10 scale, so site values pass through
/// unchanged apart from clamping. This is the single place the scale is
/// defined; any future source on a different scale converts here.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating(f32);

impl Rating {
    pub const MAX: f32 = 10.0;

    /// Build a rating from a raw site value, clamping into range.
    pub fn from_site_value(value: f32) -> Self {
        Self(value.clamp(0.0, Self::MAX))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl FromStr for Rating {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(Self::from_site_value(value)),
            _ => exn::bail!(ErrorKind::ParseError {
                field: "rating",
                value: s.to_string(),
            }),
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("8.9", 8.9)]
    #[case(" 7.0 ", 7.0)]
    #[case("11.5", 10.0)] // clamped
    #[case("-1", 0.0)] // clamped
    fn parses_and_clamps(#[case] input: &str, #[case] expected: f32) {
        assert_eq!(input.parse::<Rating>().unwrap().value(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("NaN")]
    #[case("high")]
    fn rejects_garbage(#[case] input: &str) {
        assert!(input.parse::<Rating>().is_err());
    }

    #[test]
    fn display_one_decimal() {
        assert_eq!("8.9".parse::<Rating>().unwrap().to_string(), "8.9");
    }
}
