//! Incidence reason codes.

use std::{fmt, str::FromStr};

use crate::codec::FieldError;

/// Two-digit code explaining why a line was not served.
///
/// The protocol reserves `00`–`99`; well-known values have associated
/// constants, anything else is carried through untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReasonCode(u8);

impl ReasonCode {
    /// No reason supplied.
    pub const UNSPECIFIED: Self = Self(0);
    /// Supplier has no stock.
    pub const OUT_OF_STOCK: Self = Self(1);
    /// Article withdrawn from the catalogue.
    pub const DISCONTINUED: Self = Self(2);
    /// Supplier does not recognise the article code.
    pub const UNKNOWN_ARTICLE: Self = Self(3);
    /// Article requires authorisation the customer lacks.
    pub const RESTRICTED: Self = Self(4);
    /// Temporary supply problem at the manufacturer.
    pub const TEMPORARILY_UNAVAILABLE: Self = Self(5);
    /// Requested quantity exceeds the per-order limit.
    pub const QUANTITY_LIMIT: Self = Self(6);

    /// Build a reason code from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Overflow`] when `value` exceeds two digits.
    pub fn new(value: u8) -> Result<Self, FieldError> {
        if value > 99 {
            return Err(FieldError::Overflow {
                field: "reason",
                value: u64::from(value),
                width: 2,
            });
        }
        Ok(Self(value))
    }

    /// Numeric value of the code.
    #[must_use]
    pub const fn value(self) -> u8 { self.0 }

    /// Human-readable description for well-known codes.
    #[must_use]
    pub fn description(self) -> Option<&'static str> {
        match self {
            Self::UNSPECIFIED => Some("unspecified"),
            Self::OUT_OF_STOCK => Some("out of stock"),
            Self::DISCONTINUED => Some("discontinued"),
            Self::UNKNOWN_ARTICLE => Some("unknown article"),
            Self::RESTRICTED => Some("restricted article"),
            Self::TEMPORARILY_UNAVAILABLE => Some("temporarily unavailable"),
            Self::QUANTITY_LIMIT => Some("quantity limit exceeded"),
            _ => None,
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:02}", self.0) }
}

impl FromStr for ReasonCode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::InvalidCharacters { field: "reason" });
        }
        let value = s
            .parse::<u8>()
            .map_err(|_| FieldError::InvalidCharacters { field: "reason" })?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ReasonCode;

    #[rstest]
    #[case("01", ReasonCode::OUT_OF_STOCK)]
    #[case("00", ReasonCode::UNSPECIFIED)]
    #[case("42", ReasonCode::new(42).expect("two digits"))]
    fn parses_two_digit_codes(#[case] raw: &str, #[case] expected: ReasonCode) {
        assert_eq!(raw.parse::<ReasonCode>(), Ok(expected));
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("1")]
    #[case("1a")]
    #[case("100")]
    #[case(" 1")]
    fn rejects_malformed_codes(#[case] raw: &str) {
        assert!(raw.parse::<ReasonCode>().is_err());
    }

    #[test]
    fn unknown_codes_have_no_description() {
        let code = ReasonCode::new(77).expect("two digits");
        assert_eq!(code.description(), None);
        assert_eq!(ReasonCode::OUT_OF_STOCK.description(), Some("out of stock"));
    }
}
