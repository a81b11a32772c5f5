//! Order field extraction module.

pub mod html;
pub mod normalize;
mod parser;
pub mod rules;

pub use html::{parse_item_tiles, visible_text};
pub use normalize::normalize_text;
pub use parser::{ExtractionResult, OrderParser, OrderSource, RuleOrderParser};

use crate::error::ExtractionError;
use crate::models::order::OrderSummary;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for order extractors.
pub trait OrderExtractor {
    /// Extract an order from an HTML page.
    fn extract_from_html(&self, html: &str, source: &OrderSource) -> Result<OrderSummary>;

    /// Extract an order from plain visible text.
    fn extract_from_text(&self, text: &str, source: &OrderSource) -> Result<OrderSummary>;
}
