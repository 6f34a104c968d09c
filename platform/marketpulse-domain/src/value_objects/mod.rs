pub mod currency;
pub mod historical_point;
pub mod instrument_type;
