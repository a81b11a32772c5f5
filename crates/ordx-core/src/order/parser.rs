//! Rule-based order parser: text in, one `OrderSummary` out.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::order::{OrderItem, OrderSummary};

use super::html::{parse_item_tiles, visible_text};
use super::normalize::normalize_text;
use super::rules::{extract_amounts, extract_customer_name, extract_order_date, extract_payment};
use super::{OrderExtractor, Result};

/// Identity of the order a page belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSource {
    pub order_id: String,
    pub url: String,
}

impl OrderSource {
    pub fn new(order_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            url: url.into(),
        }
    }
}

/// Result of order extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted order.
    pub order: OrderSummary,
    /// Whitespace-normalized text the rules ran on.
    pub normalized_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for order parsing.
pub trait OrderParser {
    /// Parse an order from visible page text, with already-parsed items.
    fn parse(&self, text: &str, source: &OrderSource, items: Vec<OrderItem>)
        -> Result<ExtractionResult>;
}

/// Order parser driven by the static field rule table.
#[derive(Debug, Clone)]
pub struct RuleOrderParser {
    /// Characters after "Payment method" searched for card details.
    payment_window: usize,
    /// Whether to log records whose total resolved to zero.
    warn_on_zero_total: bool,
}

impl RuleOrderParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            payment_window: config.payment_window,
            warn_on_zero_total: config.warn_on_zero_total,
        }
    }

    /// Set the payment search window.
    pub fn with_payment_window(mut self, window: usize) -> Self {
        self.payment_window = window;
        self
    }

    /// Set zero-total warnings.
    pub fn with_zero_total_warning(mut self, enabled: bool) -> Self {
        self.warn_on_zero_total = enabled;
        self
    }

    /// Parse an HTML order page: visible text plus item tiles.
    pub fn parse_html(&self, html: &str, source: &OrderSource) -> Result<ExtractionResult> {
        let text = visible_text(html);
        let items = parse_item_tiles(html);
        debug!(
            "Order {}: {} chars of visible text, {} item tiles",
            source.order_id,
            text.len(),
            items.len()
        );
        self.parse(&text, source, items)
    }
}

impl Default for RuleOrderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderParser for RuleOrderParser {
    fn parse(
        &self,
        text: &str,
        source: &OrderSource,
        items: Vec<OrderItem>,
    ) -> Result<ExtractionResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!(
            "Parsing order {} from {} characters of text",
            source.order_id,
            text.len()
        );

        let text = normalize_text(text);

        let date = extract_order_date(&text);
        if date.is_none() {
            warnings.push("Could not extract order date".to_string());
        }

        let payment = extract_payment(&text, self.payment_window).descriptor();
        if payment.is_none() {
            warnings.push("Could not extract payment card".to_string());
        }

        let name = extract_customer_name(&text);
        let amounts = extract_amounts(&text);

        let order = OrderSummary::builder(source.order_id.as_str(), source.url.as_str())
            .date(date)
            .payment(payment)
            .name(name)
            .amounts(amounts)
            .items(items)
            .build()?;

        if order.total().is_zero() {
            if self.warn_on_zero_total {
                warn!("Order {} resolved to a zero total", order.order_id());
            }
            warnings.push("Total resolved to 0.00".to_string());
        }

        debug!(
            "Extracted order {}: total {}, {} items",
            order.order_id(),
            order.total(),
            order.items().len()
        );

        Ok(ExtractionResult {
            order,
            normalized_text: text,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl OrderExtractor for RuleOrderParser {
    fn extract_from_html(&self, html: &str, source: &OrderSource) -> Result<OrderSummary> {
        self.parse_html(html, source).map(|r| r.order)
    }

    fn extract_from_text(&self, text: &str, source: &OrderSource) -> Result<OrderSummary> {
        self.parse(text, source, Vec::new()).map(|r| r.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn source() -> OrderSource {
        OrderSource::new("200013456789", "https://www.walmart.ca/en/orders/200013456789")
    }

    const PAGE_TEXT: &str = "Oct 19, 2025 Order# 200013456789 Delivered on Oct 20 \
        Delivery from store, 12 items Subtotal $44.83 Item: Pasta $1.97 \
        Multisave Discount $0.50 Taxes $0.32 Total $43.79 \
        Payment method Visa Ending in 1529 Address Jane Doe 12 Main St";

    #[test]
    fn test_parse_full_page() {
        let result = RuleOrderParser::new()
            .parse(PAGE_TEXT, &source(), Vec::new())
            .unwrap();
        let order = &result.order;

        assert_eq!(order.order_id(), "200013456789");
        assert_eq!(order.date(), Some("Oct 20, 2025"));
        assert_eq!(order.payment(), Some("****1529"));
        assert_eq!(order.name(), Some("Jane"));
        assert_eq!(order.subtotal(), dec!(44.83));
        assert_eq!(order.discount(), dec!(-0.50));
        assert_eq!(order.delivery(), dec!(0.00));
        assert_eq!(order.taxes(), dec!(0.32));
        assert_eq!(order.total(), dec!(43.79));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_text_yields_defaulted_record() {
        let result = RuleOrderParser::new().parse("", &source(), Vec::new()).unwrap();
        assert!(result.order.amounts().is_zero());
        assert_eq!(result.order.payment(), None);
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn test_missing_order_id() {
        let err = RuleOrderParser::new()
            .parse(PAGE_TEXT, &OrderSource::new("", ""), Vec::new())
            .unwrap_err();
        assert_eq!(err, ExtractionError::MissingField("order_id".to_string()));
    }

    #[test]
    fn test_idempotent() {
        let parser = RuleOrderParser::new();
        let first = parser.extract_from_text(PAGE_TEXT, &source()).unwrap();
        let second = parser.extract_from_text(PAGE_TEXT, &source()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_layout_whitespace_is_normalized() {
        let text = "Subtotal\n  $75.71\n\tMultisave\u{00a0}Discount\n$0.76 Taxes $5.00\nTotal\n$80.71";
        let order = RuleOrderParser::new().extract_from_text(text, &source()).unwrap();
        assert_eq!(order.subtotal(), dec!(75.71));
        assert_eq!(order.discount(), dec!(-0.76));
        assert_eq!(order.total(), dec!(80.71));
    }

    #[test]
    fn test_parse_html() {
        let html = r#"<html><body>
            <div>Subtotal</div><div>$3.94</div>
            <div data-testid="itemtile-stack">
              <span data-testid="productName">Pasta</span>
              <span class="bill-item-quantity">Qty 2</span>
              <span data-testid="line-price">$1.97</span>
            </div>
            <div>Total</div><div>$3.94</div>
        </body></html>"#;

        let order = RuleOrderParser::new().extract_from_html(html, &source()).unwrap();
        assert_eq!(order.subtotal(), dec!(3.94));
        assert_eq!(order.total(), dec!(3.94));
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].quantity(), 2);
    }

    #[test]
    fn test_payment_window() {
        let text = "Payment method Ending in 4242 and much later Visa Total $1.00";
        let parser = RuleOrderParser::new().with_payment_window(10);
        let order = parser.extract_from_text(text, &source()).unwrap();
        assert_eq!(order.payment(), Some("****4242"));
    }
}
