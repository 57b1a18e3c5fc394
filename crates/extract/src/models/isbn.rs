use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// A checksum-validated ISBN.
///
/// Construction goes through [`FromStr`], which strips hyphens and spaces
/// and verifies the check digit, so a value of this type is always a valid
/// identifier. Invalid checksums are rejected rather than carried along.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Isbn {
    /// 10-digit form (final digit may be `X`).
    Ten(String),
    /// 13-digit form.
    Thirteen(String),
}

impl Isbn {
    /// The bare digit string, suitable for identifier search queries.
    pub fn digits(&self) -> &str {
        match self {
            Isbn::Ten(s) | Isbn::Thirteen(s) => s,
        }
    }

    /// Convert to the 13-digit form (978 prefix, recomputed check digit).
    pub fn to_isbn13(&self) -> String {
        match self {
            Isbn::Thirteen(s) => s.clone(),
            Isbn::Ten(s) => {
                let mut digits: Vec<u32> = "978".chars().chain(s.chars().take(9)).map(|c| c.to_digit(10).unwrap_or(0)).collect();
                let check = isbn13_check_digit(&digits);
                digits.push(check);
                digits.into_iter().map(|d| char::from_digit(d, 10).unwrap()).collect()
            }
        }
    }
}

fn isbn13_check_digit(first_twelve: &[u32]) -> u32 {
    let sum: u32 = first_twelve.iter().enumerate().map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 }).sum();
    (10 - (sum % 10)) % 10
}

fn valid_isbn10(chars: &[char]) -> bool {
    let mut sum: u32 = 0;
    for (i, c) in chars.iter().enumerate() {
        let value = match c {
            'X' | 'x' if i == 9 => 10,
            c => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

fn valid_isbn13(chars: &[char]) -> bool {
    let Some(digits) = chars.iter().map(|c| c.to_digit(10)).collect::<Option<Vec<u32>>>() else {
        return false;
    };
    let (check, rest) = digits.split_last().unwrap();
    *check == isbn13_check_digit(rest)
}

impl FromStr for Isbn {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
        let chars: Vec<char> = cleaned.chars().collect();
        match chars.len() {
            10 if valid_isbn10(&chars) => Ok(Isbn::Ten(cleaned.to_uppercase())),
            13 if valid_isbn13(&chars) => Ok(Isbn::Thirteen(cleaned)),
            _ => exn::bail!(ErrorKind::ParseError {
                field: "isbn",
                value: s.to_string(),
            }),
        }
    }
}

impl Display for Isbn {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.digits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("9780441013593")]
    #[case("978-0-441-01359-3")]
    #[case("9787536692930")]
    fn valid_thirteen(#[case] input: &str) {
        let isbn: Isbn = input.parse().unwrap();
        assert!(matches!(isbn, Isbn::Thirteen(_)));
    }

    #[rstest]
    #[case("0441013597")]
    #[case("0-441-01359-7")]
    #[case("080442957X")]
    fn valid_ten(#[case] input: &str) {
        let isbn: Isbn = input.parse().unwrap();
        assert!(matches!(isbn, Isbn::Ten(_)));
    }

    #[rstest]
    #[case("9780441013594")] // bad check digit
    #[case("0441013598")] // bad check digit
    #[case("12345")]
    #[case("not an isbn")]
    #[case("")]
    fn invalid(#[case] input: &str) {
        let err = input.parse::<Isbn>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::ParseError { field: "isbn", .. }));
    }

    #[test]
    fn ten_to_thirteen() {
        let isbn: Isbn = "0441013597".parse().unwrap();
        assert_eq!(isbn.to_isbn13(), "9780441013593");
    }

    #[test]
    fn thirteen_to_thirteen_is_identity() {
        let isbn: Isbn = "9780441013593".parse().unwrap();
        assert_eq!(isbn.to_isbn13(), "9780441013593");
    }

    #[test]
    fn digits_strips_separators() {
        let isbn: Isbn = "978-0-441-01359-3".parse().unwrap();
        assert_eq!(isbn.digits(), "9780441013593");
    }
}
