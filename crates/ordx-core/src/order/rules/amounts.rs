//! Money field rules and the policies that resolve their matches.
//!
//! Each field pairs a labeled pattern with a [`FieldPolicy`]. How many
//! matches count and which sign the result carries is configuration on the
//! rule, never a branch on the field name.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::money::{parse_money, round_money};
use super::patterns::{is_percentage, DELIVERY, DISCOUNT, SUBTOTAL, TAXES, TOTAL};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::order::OrderAmounts;

/// Monetary fields of an order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoneyField {
    Subtotal,
    Discount,
    Delivery,
    Taxes,
    Total,
}

impl fmt::Display for MoneyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoneyField::Subtotal => "subtotal",
            MoneyField::Discount => "discount",
            MoneyField::Delivery => "delivery",
            MoneyField::Taxes => "taxes",
            MoneyField::Total => "total",
        };
        f.write_str(name)
    }
}

/// Which matches of a rule contribute to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Only the first occurrence counts; later ones are ignored.
    FirstMatch,
    /// Every occurrence counts and the values are summed.
    SumAllMatches,
}

/// How the sign of the resolved value is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignPolicy {
    /// Keep the sign the money token carries.
    AsWritten,
    /// Sum magnitudes and negate. Source signs are ignored.
    ForceNegative,
}

/// Resolution policy for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    pub matching: MatchPolicy,
    pub sign: SignPolicy,
}

impl FieldPolicy {
    pub const fn new(matching: MatchPolicy, sign: SignPolicy) -> Self {
        Self { matching, sign }
    }

    /// Resolve raw tokens into the field value, rounded to cents.
    ///
    /// No tokens resolve to `0.00`. A malformed token, or one that would
    /// overflow the running sum, is logged and counts as zero.
    pub fn resolve<'a>(&self, field: MoneyField, tokens: impl IntoIterator<Item = &'a str>) -> Decimal {
        let limit = match self.matching {
            MatchPolicy::FirstMatch => 1,
            MatchPolicy::SumAllMatches => usize::MAX,
        };

        let mut sum = Decimal::ZERO;
        for token in tokens.into_iter().take(limit) {
            match parse_money(token) {
                Ok(value) => {
                    let value = match self.sign {
                        SignPolicy::AsWritten => value,
                        SignPolicy::ForceNegative => value.abs(),
                    };
                    match sum.checked_add(round_money(value)) {
                        Some(total) => sum = total,
                        None => warn!(%field, token, "sum overflows, counting as zero"),
                    }
                }
                Err(e) => {
                    warn!(%field, token, "{e}, counting as zero");
                }
            }
        }

        match self.sign {
            SignPolicy::AsWritten => round_money(sum),
            SignPolicy::ForceNegative => round_money(-sum),
        }
    }
}

/// A labeled-proximity rule for one money field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: MoneyField,
    pattern: &'static Regex,
    policy: FieldPolicy,
}

impl FieldRule {
    /// Create a rule. The pattern must expose an `amount` capture group.
    pub fn new(field: MoneyField, pattern: &'static Regex, policy: FieldPolicy) -> Self {
        Self {
            field,
            pattern,
            policy,
        }
    }

    pub fn field(&self) -> MoneyField {
        self.field
    }

    pub fn policy(&self) -> FieldPolicy {
        self.policy
    }

    /// Locate and resolve the field in normalized text.
    pub fn resolve(&self, text: &str) -> Decimal {
        let matches: Vec<ExtractionMatch<String>> = match self.policy.matching {
            MatchPolicy::FirstMatch => self.extract(text).into_iter().collect(),
            MatchPolicy::SumAllMatches => self.extract_all(text),
        };

        let value = self
            .policy
            .resolve(self.field, matches.iter().map(|m| m.value.as_str()));

        debug!(field = %self.field, matches = matches.len(), %value, "resolved money field");
        value
    }

    /// Percentages ("10.5% off") are not money and yield no match.
    fn to_match(text: &str, caps: &regex::Captures<'_>) -> Option<ExtractionMatch<String>> {
        let amount = caps.name("amount")?;
        if is_percentage(text, amount.end()) {
            return None;
        }
        let full = caps.get(0)?;
        Some(
            ExtractionMatch::new(amount.as_str().to_string(), full.as_str().trim_end())
                .with_position(full.start(), full.end()),
        )
    }
}

impl FieldExtractor for FieldRule {
    /// The raw money token, before normalization.
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern
            .captures_iter(text)
            .find_map(|caps| Self::to_match(text, &caps))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| Self::to_match(text, &caps))
            .collect()
    }
}

lazy_static! {
    /// The rule set used for every order, in output order.
    pub static ref FIELD_RULES: [FieldRule; 5] = [
        FieldRule::new(
            MoneyField::Subtotal,
            &SUBTOTAL,
            FieldPolicy::new(MatchPolicy::FirstMatch, SignPolicy::AsWritten),
        ),
        FieldRule::new(
            MoneyField::Discount,
            &DISCOUNT,
            FieldPolicy::new(MatchPolicy::SumAllMatches, SignPolicy::ForceNegative),
        ),
        FieldRule::new(
            MoneyField::Delivery,
            &DELIVERY,
            FieldPolicy::new(MatchPolicy::FirstMatch, SignPolicy::AsWritten),
        ),
        FieldRule::new(
            MoneyField::Taxes,
            &TAXES,
            FieldPolicy::new(MatchPolicy::FirstMatch, SignPolicy::AsWritten),
        ),
        FieldRule::new(
            MoneyField::Total,
            &TOTAL,
            FieldPolicy::new(MatchPolicy::FirstMatch, SignPolicy::AsWritten),
        ),
    ];
}

/// Extract all money fields from normalized order text.
///
/// Absent fields resolve to `0.00`; this never fails.
pub fn extract_amounts(text: &str) -> OrderAmounts {
    let mut amounts = OrderAmounts::default();
    for rule in FIELD_RULES.iter() {
        amounts.set(rule.field(), rule.resolve(text));
    }
    amounts
}
