//! The fixed set of display currencies a user can choose between.
//!
//! Currency is a display label only, there is no conversion between
//! currencies anywhere in the application.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The error returned when a string does not name a supported currency.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{0} is not a supported currency")]
pub struct ParseCurrencyError(pub String);

/// A supported display currency.
///
/// Parsing accepts either the ISO code (e.g. `"USD"`) or the currency
/// symbol (e.g. `"$"`), but the code is the canonical form used for
/// storage and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// Indian rupee (₹).
    INR,
    /// United States dollar ($).
    USD,
    /// Euro (€).
    EUR,
    /// Pound sterling (£).
    GBP,
    /// Japanese yen (¥).
    JPY,
}

impl Currency {
    /// The currency assigned to users who have not picked one.
    pub const BASE: Currency = Currency::INR;

    /// The ISO code for the currency.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }

    /// The display symbol for the currency.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
        }
    }
}

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "INR" | "₹" => Ok(Currency::INR),
            "USD" | "$" => Ok(Currency::USD),
            "EUR" | "€" => Ok(Currency::EUR),
            "GBP" | "£" => Ok(Currency::GBP),
            "JPY" | "¥" => Ok(Currency::JPY),
            other => Err(ParseCurrencyError(other.to_owned())),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Currency, ParseCurrencyError};

    #[test]
    fn parse_accepts_iso_codes() {
        assert_eq!(Currency::from_str("INR"), Ok(Currency::INR));
        assert_eq!(Currency::from_str("USD"), Ok(Currency::USD));
        assert_eq!(Currency::from_str("JPY"), Ok(Currency::JPY));
    }

    #[test]
    fn parse_accepts_symbol_aliases() {
        assert_eq!(Currency::from_str("₹"), Ok(Currency::INR));
        assert_eq!(Currency::from_str("$"), Ok(Currency::USD));
        assert_eq!(Currency::from_str("€"), Ok(Currency::EUR));
        assert_eq!(Currency::from_str("£"), Ok(Currency::GBP));
        assert_eq!(Currency::from_str("¥"), Ok(Currency::JPY));
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(
            Currency::from_str("XXX"),
            Err(ParseCurrencyError("XXX".to_owned()))
        );
        assert_eq!(
            Currency::from_str("usd"),
            Err(ParseCurrencyError("usd".to_owned()))
        );
    }

    #[test]
    fn serializes_as_iso_code() {
        assert_eq!(
            serde_json::to_string(&Currency::EUR).unwrap(),
            "\"EUR\"".to_owned()
        );
    }
}
