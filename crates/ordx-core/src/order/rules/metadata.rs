//! Non-monetary order fields: date, payment descriptor and customer name.

use serde::{Deserialize, Serialize};

use super::patterns::{
    ADDRESS_NAME, DATE_DELIVERED, DATE_FULL, DATE_HEADER, ENDING_IN, PAYMENT_BRANDS,
    PAYMENT_SECTION,
};

/// Extract the order date as displayed ("Oct 19, 2025").
///
/// "Delivered on ..." is preferred over the header date. A date without a
/// year borrows one from the first full date in the text.
pub fn extract_order_date(text: &str) -> Option<String> {
    let date = DATE_DELIVERED
        .captures(text)
        .or_else(|| DATE_HEADER.captures(text))
        .map(|caps| caps[1].split_whitespace().collect::<Vec<_>>().join(" "))?;

    if date.contains(',') {
        return Some(date);
    }

    let mut parts = date.split(' ');
    match (parts.next(), parts.next(), DATE_FULL.captures(text)) {
        (Some(month), Some(day), Some(full)) => Some(format!("{month} {day}, {}", &full[3])),
        _ => Some(date),
    }
}

/// Payment card details found on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Normalized brand name ("Visa", "Mastercard", "Amex", ...).
    pub brand: Option<String>,
    /// Last four digits of the card.
    pub last4: Option<String>,
}

impl PaymentInfo {
    /// Masked descriptor ("****1529"), present only when the last four digits are known.
    pub fn descriptor(&self) -> Option<String> {
        self.last4.as_ref().map(|digits| format!("****{digits}"))
    }
}

/// Extract payment brand and last four digits.
///
/// Both are looked up in the `window` characters following the
/// "Payment method" heading, or in the whole text when there is none. The
/// last four digits fall back to the whole text.
pub fn extract_payment(text: &str, window: usize) -> PaymentInfo {
    let section = match PAYMENT_SECTION.find(text) {
        Some(m) => {
            let rest = &text[m.start()..];
            let end = rest
                .char_indices()
                .nth(window)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            &rest[..end]
        }
        None => text,
    };

    let brand = PAYMENT_BRANDS.iter().find_map(|re| {
        re.find(section).map(|m| {
            m.as_str()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .replace("Master Card", "Mastercard")
                .replace("American Express", "Amex")
        })
    });

    let last4 = ENDING_IN
        .captures(section)
        .or_else(|| ENDING_IN.captures(text))
        .map(|caps| caps[1].to_string());

    PaymentInfo { brand, last4 }
}

/// Extract the customer's first name from the delivery address block.
pub fn extract_customer_name(text: &str) -> Option<String> {
    ADDRESS_NAME
        .captures(text)
        .map(|caps| caps[1].to_string())
}
