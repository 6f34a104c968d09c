pub mod clock;
pub mod random_source;
