//! Money token normalization.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::ExtractionError;

/// Currency codes that may prefix a token once symbols are stripped ("CA$12.00").
const CURRENCY_CODES: [&str; 5] = ["CAD", "USD", "CA", "US", "C"];

/// Parse a money token such as `"$1,234.56"`, `"-$0.76"` or `"(12.34)"`.
///
/// Currency symbols, thousands separators and whitespace are dropped. A value
/// wrapped in parentheses or carrying a leading minus is negative. The result
/// keeps the precision of the input; use [`round_money`] to bring it to cents.
pub fn parse_money(token: &str) -> Result<Decimal, ExtractionError> {
    let malformed = || ExtractionError::MalformedMoneyValue {
        value: token.to_string(),
    };

    let cleaned: String = token
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '$' | '€' | '£'))
        .collect();

    let mut negative = false;
    let mut body = cleaned.as_str();

    if body.len() >= 2 && body.starts_with('(') && body.ends_with(')') {
        negative = true;
        body = &body[1..body.len() - 1];
    }

    body = strip_currency_code(body);
    if let Some(rest) = body.strip_prefix(['-', '−']) {
        negative = true;
        body = strip_currency_code(rest);
    }

    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Err(malformed());
    }

    let value = Decimal::from_str(body).map_err(|_| malformed())?;
    Ok(if negative { -value } else { value })
}

fn strip_currency_code(s: &str) -> &str {
    CURRENCY_CODES
        .iter()
        .find_map(|code| s.strip_prefix(code))
        .unwrap_or(s)
}

/// Round to cents (half away from zero) and fix the scale at two digits.
///
/// Zero always comes back as positive `0.00`.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return Decimal::new(0, 2);
    }
    rounded.rescale(2);
    rounded
}

/// Format an amount with exactly two fraction digits ("-0.76", "5.00").
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}
