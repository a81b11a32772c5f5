//! Order numbers from "order delivered" notification emails.

mod links;
mod period;

pub use links::{decode_candidates, extract_urls};
pub use period::Period;

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::EmailError;

/// Placeholder substituted by [`order_url`].
pub const ORDER_NO_PLACEHOLDER: &str = "{order_no}";

/// A notification email, as exported from the mailbox.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailMessage {
    pub subject: String,
    /// Local received time.
    pub received: Option<NaiveDateTime>,
    pub html_body: String,
    pub text_body: String,
}

impl EmailMessage {
    /// Case-insensitive comparison of the trimmed subject.
    pub fn subject_matches(&self, filter: &str) -> bool {
        self.subject.trim().to_lowercase() == filter.trim().to_lowercase()
    }

    /// Order numbers linked from this message, in discovery order.
    pub fn order_numbers(&self) -> Vec<String> {
        let mut candidates = decode_candidates(&self.html_body);
        candidates.extend(decode_candidates(&self.text_body));

        let urls: Vec<String> = candidates.iter().flat_map(|s| extract_urls(s)).collect();
        for url in &urls {
            candidates.extend(decode_candidates(url));
        }

        candidates
            .iter()
            .flat_map(|s| links::order_numbers_in(s).map(str::to_string))
            .collect()
    }
}

/// Keep messages received within the period. Messages without a received
/// time are kept.
pub fn filter_messages<'a>(messages: &'a [EmailMessage], period: &Period) -> Vec<&'a EmailMessage> {
    messages
        .iter()
        .filter(|m| m.received.is_none_or(|when| period.contains(when)))
        .collect()
}

/// Sorted, de-duplicated order numbers from all messages.
///
/// With a non-blank `subject_filter`, only messages whose subject equals it
/// (ignoring case and surrounding whitespace) are scanned.
pub fn extract_order_numbers<'a>(
    messages: impl IntoIterator<Item = &'a EmailMessage>,
    subject_filter: Option<&str>,
) -> Vec<String> {
    let filter = subject_filter.filter(|f| !f.trim().is_empty());
    let mut numbers = BTreeSet::new();
    let mut scanned = 0usize;

    for message in messages {
        if let Some(filter) = filter {
            if !message.subject_matches(filter) {
                debug!("Skipping message with subject {:?}", message.subject);
                continue;
            }
        }
        scanned += 1;
        numbers.extend(message.order_numbers());
    }

    info!(
        "Found {} unique order numbers in {} messages",
        numbers.len(),
        scanned
    );
    numbers.into_iter().collect()
}

/// Order page URL for an order number.
pub fn order_url(template: &str, order_no: &str) -> Result<String, EmailError> {
    if !template.contains(ORDER_NO_PLACEHOLDER) {
        return Err(EmailError::InvalidUrl(format!(
            "{template:?} has no {ORDER_NO_PLACEHOLDER} placeholder"
        )));
    }

    let url = template.replace(ORDER_NO_PLACEHOLDER, order_no);
    Url::parse(&url).map_err(|e| EmailError::InvalidUrl(format!("{url:?}: {e}")))?;
    Ok(url)
}
