/// Supplies successive uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandomSource {
    values: Vec<f64>,
    idx: usize,
    draws: u64,
}

impl ScriptedRandomSource {
    pub fn new(values: Vec<f64>) -> Result<Self, String> {
        if values.is_empty() {
            return Err("scripted random source needs at least one value".to_string());
        }
        if let Some(bad) = values.iter().find(|v| !(0.0..1.0).contains(*v)) {
            return Err(format!("scripted value out of [0, 1): {bad}"));
        }
        Ok(Self {
            values,
            idx: 0,
            draws: 0,
        })
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Result<Self, String> {
        Self::new(vec![value])
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for ScriptedRandomSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.idx];
        self.idx = (self.idx + 1) % self.values.len();
        self.draws = self.draws.saturating_add(1);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_values_and_counts_draws() {
        let mut source = ScriptedRandomSource::new(vec![0.1, 0.2]).unwrap();
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.next_unit(), 0.2);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn rejects_values_outside_unit_interval() {
        assert!(ScriptedRandomSource::new(vec![1.0]).is_err());
        assert!(ScriptedRandomSource::new(vec![-0.1]).is_err());
        assert!(ScriptedRandomSource::new(Vec::new()).is_err());
    }
}
