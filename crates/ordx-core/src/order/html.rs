//! HTML order pages: visible text and item tiles.

use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use super::normalize::normalize_text;
use super::rules::money::parse_money;
use super::rules::patterns::{PRICE, QTY};
use crate::models::order::OrderItem;

/// Elements whose text never reaches the rendered page.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Extract the visible text of an HTML document, whitespace-normalized.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut pieces: Vec<String> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let piece = text.trim();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
    }

    normalize_text(&pieces.join(" "))
}

/// Parse line items from the item tiles of an order page.
///
/// Tiles without a product name or with a zero price are skipped.
pub fn parse_item_tiles(html: &str) -> Vec<OrderItem> {
    let document = Html::parse_document(html);
    let (Some(tile), Some(name), Some(quantity), Some(price)) = (
        selector("div[data-testid='itemtile-stack']"),
        selector("[data-testid='productName']"),
        selector(".bill-item-quantity"),
        selector("[data-testid='line-price']"),
    ) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for element in document.select(&tile) {
        let Some(title) = first_text(&element, &name) else {
            continue;
        };

        let qty = first_text(&element, &quantity)
            .and_then(|text| QTY.captures(&text).and_then(|c| c[1].parse::<u32>().ok()))
            .unwrap_or(1);

        let unit_price = first_text(&element, &price)
            .and_then(|text| {
                PRICE
                    .captures(&text)
                    .and_then(|c| parse_money(&c[1]).ok())
            })
            .unwrap_or(Decimal::ZERO);

        if unit_price.is_zero() {
            debug!("Skipping item tile without a price: {}", title);
            continue;
        }

        items.push(OrderItem::new(title, qty, unit_price));
    }

    debug!("Parsed {} item tiles", items.len());
    items
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| normalize_text(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}
