//! Data models for orders and configuration.

pub mod config;
pub mod order;

pub use config::{EmailConfig, ExtractionConfig, OrdxConfig, OutputConfig};
pub use order::{OrderAmounts, OrderItem, OrderSummary, OrderSummaryBuilder};
