use std::fmt;

/// Every amount in the billing pipeline is an integer number of cents.
/// A car renting at €20.00 a day has `price_per_day = 2000`.
pub type Cents = i64;

/// Fractional cents used while a price is accumulated, before truncation.
/// One cent is `CENT_FRACTIONS` units, so percentage discounts stay exact.
pub(crate) type CentFractions = i128;

pub(crate) const CENT_FRACTIONS: CentFractions = 100;

/// Format cents for display.
/// Example: 2000 -> "20.00", -55 -> "-0.55"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal amount typed by a user into cents.
/// Example: "20" -> 2000, "0.1" -> 10, "12.345" -> 1234 (extra digits are dropped)
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if units.is_empty() && fraction.is_empty() {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }

    let units: Cents = if units.is_empty() {
        0
    } else {
        parse_digits(units, input)?
    };

    let fraction: String = fraction.chars().chain("00".chars()).take(2).collect();
    let fraction = parse_digits(&fraction, input)?;

    let cents = units * 100 + fraction;
    Ok(if negative { -cents } else { cents })
}

fn parse_digits(digits: &str, input: &str) -> Result<Cents, ParseCentsError> {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }
    digits
        .parse()
        .map_err(|_| ParseCentsError::InvalidFormat(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat(String),
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat(input) => {
                write!(f, "invalid money amount '{}'", input)
            }
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(2000), "20.00");
        assert_eq!(format_cents(10), "0.10");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-55), "-0.55");
        assert_eq!(format_cents(-12345), "-123.45");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("20"), Ok(2000));
        assert_eq!(parse_cents("20.00"), Ok(2000));
        assert_eq!(parse_cents("0.1"), Ok(10));
        assert_eq!(parse_cents(".05"), Ok(5));
        assert_eq!(parse_cents("7."), Ok(700));
        assert_eq!(parse_cents("12.345"), Ok(1234));
        assert_eq!(parse_cents("-3.50"), Ok(-350));
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert!(parse_cents("").is_err());
        assert!(parse_cents(".").is_err());
        assert!(parse_cents("ten").is_err());
        assert!(parse_cents("1.2.3").is_err());
        assert!(parse_cents("+5").is_err());
    }
}
