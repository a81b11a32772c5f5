//! Core library for order confirmation parsing.
//!
//! This crate provides:
//! - Visible-text extraction and whitespace normalization of order pages
//! - Rule-based money field extraction (subtotal, discount, delivery, taxes, total)
//! - Order metadata (date, payment card, customer name) and item tiles
//! - Order numbers from "order delivered" notification emails

pub mod email;
pub mod error;
pub mod models;
pub mod order;

pub use email::{extract_order_numbers, filter_messages, order_url, EmailMessage, Period};
pub use error::{EmailError, ExtractionError, OrdxError, Result};
pub use models::config::OrdxConfig;
pub use models::order::{OrderAmounts, OrderItem, OrderSummary};
pub use order::{ExtractionResult, OrderExtractor, OrderParser, OrderSource, RuleOrderParser};
