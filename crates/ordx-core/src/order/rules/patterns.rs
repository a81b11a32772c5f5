//! Common regex patterns for order confirmation pages.
//!
//! Every money pattern exposes its numeric token as the `amount` group.
//! All of them run over whitespace-collapsed text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Labeled totals (amounts like 1,234.56 or 1234.56, exactly two fraction digits)
    pub static ref SUBTOTAL: Regex = Regex::new(
        r"(?i)\b(?P<label>Sub[\s-]?total)\b\s*(?:\(\d+\s+items?\)\s*)?:?\s*(?:CA?\$|US\$|\$|€|£)?\s*(?P<amount>[0-9]{1,3}(?:,[0-9]{3})+\.[0-9]{2}|[0-9]+\.[0-9]{2})\b"
    ).unwrap();

    pub static ref TOTAL: Regex = Regex::new(
        r"(?i)\b(?P<label>Total)\b\s*:?\s*(?:CA?\$|US\$|\$|€|£)?\s*(?P<amount>[0-9]{1,3}(?:,[0-9]{3})+\.[0-9]{2}|[0-9]+\.[0-9]{2})\b"
    ).unwrap();

    pub static ref TAXES: Regex = Regex::new(
        r"(?i)\b(?P<label>Tax(?:es)?)\b\s*:?\s*(?:CA?\$|US\$|\$|€|£)?\s*(?P<amount>[0-9]{1,3}(?:,[0-9]{3})+\.[0-9]{2}|[0-9]+\.[0-9]{2})\b"
    ).unwrap();

    // Delivery: label, optional "fee", at most one separator, then a currency
    // symbol. Anything else after the label ("from store", "on Oct 20") fails.
    pub static ref DELIVERY: Regex = Regex::new(
        r"(?i)\b(?P<label>(?:Delivery|Shipping)(?:\s+fee)?)\b(?:\s?[:\-–]\s?|\s)?(?:CA?\$|US\$|\$|€|£)\s?(?P<amount>[0-9]{1,3}(?:,[0-9]{3})+\.[0-9]{2}|[0-9]+\.[0-9]{2})\b"
    ).unwrap();

    // Discount family. The token is deliberately loose so that garbage such as
    // "1.2.3" still matches and is reported as malformed. The token is greedy
    // and ends the pattern, so it is always the whole number; percentages are
    // rejected afterwards with `is_percentage`.
    pub static ref DISCOUNT: Regex = Regex::new(
        r"(?i)\b(?P<label>Savings|Multisave\s+Discount|(?:[a-z]+\s+)*?Discount)\b\s*:?\s*[-−]?\s*(?:CA?\$|US\$|\$|€|£)?\s*[-−]?(?P<amount>[0-9][0-9,]*(?:\.[0-9]+)*)"
    ).unwrap();

    // Order dates
    pub static ref DATE_DELIVERED: Regex = Regex::new(
        r"(?i)\bDelivered\s+on\s+([a-z]{3,9}\s+\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_HEADER: Regex = Regex::new(
        r"(?is)\b([a-z]{3}\s+\d{1,2},\s+\d{4})\b.*?\bOrder\s*#"
    ).unwrap();

    pub static ref DATE_FULL: Regex = Regex::new(
        r"(?i)\b([a-z]{3})\s+(\d{1,2}),\s*(\d{4})\b"
    ).unwrap();

    // Payment
    pub static ref PAYMENT_SECTION: Regex = Regex::new(
        r"(?i)payment\s+method"
    ).unwrap();

    /// Card brands in priority order; the first brand found wins.
    pub static ref PAYMENT_BRANDS: Vec<Regex> = [
        r"(?i)Apple\s*Pay",
        r"(?i)Google\s*Pay",
        r"(?i)PayPal",
        r"(?i)Visa",
        r"(?i)Master\s*Card|Mastercard",
        r"(?i)American\s*Express|Amex",
        r"(?i)Discover",
        r"(?i)Debit(?:\s*Card)?",
        r"(?i)Credit\s*Card",
        r"(?i)Walmart\s*Gift\s*Card|Gift\s*Card",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    pub static ref ENDING_IN: Regex = Regex::new(
        r"(?i)Ending\s+in\s*(\d{4})"
    ).unwrap();

    // Customer name: first token after the "Address" heading
    pub static ref ADDRESS_NAME: Regex = Regex::new(
        r"(?i)\bAddress\s+(\p{L}[\p{L}'\-]+)"
    ).unwrap();

    // Item tiles
    pub static ref QTY: Regex = Regex::new(
        r"(?i)\bQty\s*:?\s*([0-9]+)\b"
    ).unwrap();

    pub static ref PRICE: Regex = Regex::new(
        r"\$\s?([0-9]{1,3}(?:,[0-9]{3})+\.[0-9]{2}|[0-9]+\.[0-9]{2})"
    ).unwrap();

    // Email links
    pub static ref URL: Regex = Regex::new(
        r"https?://\S+"
    ).unwrap();

    pub static ref ORDER_NUMBER: Regex = Regex::new(
        r"(?i)/orders/(\d+)"
    ).unwrap();

    pub static ref PERIOD: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})$"
    ).unwrap();
}

/// True when the number ending at byte `end` of `text` is a percentage
/// ("10.5%", "1.5 % off").
pub fn is_percentage(text: &str, end: usize) -> bool {
    text.get(end..)
        .is_some_and(|rest| rest.trim_start().starts_with('%'))
}
