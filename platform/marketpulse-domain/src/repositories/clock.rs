pub trait Clock {
    /// Current time in epoch milliseconds.
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now_millis: i64,
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now_millis
    }
}
