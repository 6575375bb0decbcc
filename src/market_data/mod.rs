pub mod price_series;

// Re-export the series types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use price_series::{PriceBar, PriceSeries, PriceSummary};
