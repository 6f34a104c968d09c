pub mod asset;
pub mod catalog;
pub mod fx_rates;
pub mod market_config;
