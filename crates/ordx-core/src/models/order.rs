//! Order summary records produced from confirmation pages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::order::rules::amounts::MoneyField;
use crate::order::rules::money::{format_money, round_money};

/// A single line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product name as displayed.
    name: String,

    /// Quantity ordered (at least 1).
    quantity: u32,

    /// Price per unit, rounded to cents.
    unit_price: Decimal,
}

impl OrderItem {
    /// Create an item. A zero quantity becomes 1 and negative prices become 0.00.
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.max(1),
            unit_price: round_money(unit_price.max(Decimal::ZERO)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

/// The five money fields of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAmounts {
    pub subtotal: Decimal,
    /// Always zero or negative.
    pub discount: Decimal,
    /// 0.00 when the page shows no delivery or shipping fee.
    pub delivery: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

impl OrderAmounts {
    pub fn get(&self, field: MoneyField) -> Decimal {
        match field {
            MoneyField::Subtotal => self.subtotal,
            MoneyField::Discount => self.discount,
            MoneyField::Delivery => self.delivery,
            MoneyField::Taxes => self.taxes,
            MoneyField::Total => self.total,
        }
    }

    pub fn set(&mut self, field: MoneyField, value: Decimal) {
        let slot = match field {
            MoneyField::Subtotal => &mut self.subtotal,
            MoneyField::Discount => &mut self.discount,
            MoneyField::Delivery => &mut self.delivery,
            MoneyField::Taxes => &mut self.taxes,
            MoneyField::Total => &mut self.total,
        };
        *slot = value;
    }

    /// True when every field resolved to zero.
    pub fn is_zero(&self) -> bool {
        [self.subtotal, self.discount, self.delivery, self.taxes, self.total]
            .iter()
            .all(Decimal::is_zero)
    }
}

/// One parsed order. Built through [`OrderSummary::builder`] and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    order_id: String,
    url: String,

    /// Order date as displayed on the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,

    /// Masked payment descriptor ("****1529").
    #[serde(skip_serializing_if = "Option::is_none")]
    payment: Option<String>,

    /// Customer first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(flatten)]
    amounts: OrderAmounts,

    #[serde(default)]
    items: Vec<OrderItem>,
}

impl OrderSummary {
    /// Start building a summary for an order.
    pub fn builder(order_id: impl Into<String>, url: impl Into<String>) -> OrderSummaryBuilder {
        OrderSummaryBuilder {
            order_id: order_id.into(),
            url: url.into(),
            ..OrderSummaryBuilder::default()
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn payment(&self) -> Option<&str> {
        self.payment.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn amounts(&self) -> OrderAmounts {
        self.amounts
    }

    pub fn subtotal(&self) -> Decimal {
        self.amounts.subtotal
    }

    pub fn discount(&self) -> Decimal {
        self.amounts.discount
    }

    pub fn delivery(&self) -> Decimal {
        self.amounts.delivery
    }

    pub fn taxes(&self) -> Decimal {
        self.amounts.taxes
    }

    pub fn total(&self) -> Decimal {
        self.amounts.total
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Render the plain-text summary written next to each order.
    ///
    /// One labeled line per field, money with two fraction digits, then one
    /// line per item.
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            format!("Order: {}", self.order_id),
            format!("URL: {}", self.url),
            format!("Date: {}", self.date().unwrap_or("")),
            format!("Payment: {}", self.payment().unwrap_or("N/A")),
            format!("Name: {}", self.name().unwrap_or("")),
            format!("Subtotal: {}", format_money(self.amounts.subtotal)),
            format!("Discount: {}", format_money(self.amounts.discount)),
            format!("Delivery: {}", format_money(self.amounts.delivery)),
            format!("Taxes: {}", format_money(self.amounts.taxes)),
            format!("Total: {}", format_money(self.amounts.total)),
            "Items:".to_string(),
        ];

        for item in &self.items {
            lines.push(format!(
                "- {} | Qty: {} | Price: {}",
                item.name,
                item.quantity,
                format_money(item.unit_price)
            ));
        }

        lines.join("\n")
    }

    /// Check the money fields against each other and return any issues found.
    ///
    /// The builder never enforces these. Pages show the subtotal either
    /// before or after the discount, so the total is accepted against both.
    pub fn check_totals(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let a = &self.amounts;

        if a.total.is_zero() {
            issues.push("Total is zero".to_string());
        }

        let tolerance = Decimal::new(1, 2);
        let before_discount = a.subtotal + a.delivery + a.taxes;
        let after_discount = before_discount + a.discount;
        let matches = |expected: Decimal| (expected - a.total).abs() <= tolerance;

        if !matches(before_discount) && !matches(after_discount) {
            issues.push(format!(
                "Subtotal + delivery + taxes ({}, or {} after discount) differs from total ({})",
                format_money(before_discount),
                format_money(after_discount),
                format_money(a.total)
            ));
        }

        issues
    }
}

/// Builder for [`OrderSummary`].
#[derive(Debug, Clone, Default)]
pub struct OrderSummaryBuilder {
    order_id: String,
    url: String,
    date: Option<String>,
    payment: Option<String>,
    name: Option<String>,
    amounts: OrderAmounts,
    items: Vec<OrderItem>,
}

impl OrderSummaryBuilder {
    pub fn date(mut self, date: Option<String>) -> Self {
        self.date = date;
        self
    }

    pub fn payment(mut self, payment: Option<String>) -> Self {
        self.payment = payment;
        self
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn amounts(mut self, amounts: OrderAmounts) -> Self {
        self.amounts = amounts;
        self
    }

    pub fn items(mut self, items: Vec<OrderItem>) -> Self {
        self.items = items;
        self
    }

    /// Build the summary.
    ///
    /// Fails only without an order id. Money fields are rounded to cents and
    /// the discount is forced to zero or below.
    pub fn build(self) -> Result<OrderSummary, ExtractionError> {
        let order_id = self.order_id.trim().to_string();
        if order_id.is_empty() {
            return Err(ExtractionError::MissingField("order_id".to_string()));
        }

        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let a = self.amounts;
        let amounts = OrderAmounts {
            subtotal: round_money(a.subtotal),
            discount: round_money(-a.discount.abs()),
            delivery: round_money(a.delivery),
            taxes: round_money(a.taxes),
            total: round_money(a.total),
        };

        Ok(OrderSummary {
            order_id,
            url: self.url.trim().to_string(),
            date: non_blank(self.date),
            payment: non_blank(self.payment),
            name: non_blank(self.name),
            amounts,
            items: self.items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample() -> OrderSummary {
        OrderSummary::builder("200013456789", "https://www.walmart.ca/en/orders/200013456789")
            .date(Some("Oct 20, 2025".to_string()))
            .payment(Some("****1529".to_string()))
            .name(Some("Jane".to_string()))
            .amounts(OrderAmounts {
                subtotal: dec!(75.71),
                discount: dec!(0.76),
                delivery: Decimal::ZERO,
                taxes: dec!(5),
                total: dec!(80.71),
            })
            .items(vec![
                OrderItem::new("Pasta", 2, dec!(1.97)),
                OrderItem::new("Bananas", 0, dec!(0.3)),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_order_id() {
        let err = OrderSummary::builder("  ", "https://example.com").build();
        assert_eq!(err, Err(ExtractionError::MissingField("order_id".to_string())));
    }

    #[test]
    fn test_builder_forces_discount_negative() {
        let order = sample();
        assert_eq!(order.discount(), dec!(-0.76));
        assert_eq!(order.delivery(), dec!(0.00));
    }

    #[test]
    fn test_builder_defaults() {
        let order = OrderSummary::builder("1", "")
            .date(Some("   ".to_string()))
            .build()
            .unwrap();
        assert_eq!(order.date(), None);
        assert!(order.amounts().is_zero());
        assert!(order.items().is_empty());
    }

    #[test]
    fn test_render_text() {
        let expected = "\
Order: 200013456789
URL: https://www.walmart.ca/en/orders/200013456789
Date: Oct 20, 2025
Payment: ****1529
Name: Jane
Subtotal: 75.71
Discount: -0.76
Delivery: 0.00
Taxes: 5.00
Total: 80.71
Items:
- Pasta | Qty: 2 | Price: 1.97
- Bananas | Qty: 1 | Price: 0.30";
        assert_eq!(sample().render_text(), expected);
    }

    #[test]
    fn test_render_text_defaults() {
        let order = OrderSummary::builder("1", "u").build().unwrap();
        let text = order.render_text();
        assert!(text.contains("Payment: N/A\n"));
        assert!(text.contains("Discount: 0.00\n"));
        assert!(text.ends_with("Items:"));
    }

    #[test]
    fn test_check_totals() {
        assert!(sample().check_totals().is_empty());

        let order = OrderSummary::builder("1", "u")
            .amounts(OrderAmounts {
                subtotal: dec!(10.00),
                total: dec!(12.00),
                ..OrderAmounts::default()
            })
            .build()
            .unwrap();
        assert_eq!(order.check_totals().len(), 1);

        let after_discount = OrderSummary::builder("2", "u")
            .amounts(OrderAmounts {
                subtotal: dec!(100.00),
                discount: dec!(3.75),
                taxes: dec!(6.00),
                total: dec!(102.25),
                ..OrderAmounts::default()
            })
            .build()
            .unwrap();
        assert!(after_discount.check_totals().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["order_id"], "200013456789");
        assert_eq!(json["discount"], "-0.76");
        assert_eq!(json["items"][0]["quantity"], 2);
    }
}
