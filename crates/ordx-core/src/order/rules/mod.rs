//! Rule-based field extractors for order confirmation pages.

pub mod amounts;
pub mod metadata;
pub mod money;
pub mod patterns;

pub use amounts::{extract_amounts, FieldPolicy, FieldRule, MatchPolicy, MoneyField, SignPolicy, FIELD_RULES};
pub use metadata::{extract_customer_name, extract_order_date, extract_payment, PaymentInfo};
pub use money::{format_money, parse_money, round_money};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value located in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched (label included).
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
