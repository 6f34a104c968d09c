pub mod currency;
pub mod history;
pub mod live_store;
pub mod random_walk;
