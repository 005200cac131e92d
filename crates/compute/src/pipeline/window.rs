use std::collections::VecDeque;

/// Bounded FIFO of the most recent values.
///
/// Statistics are recomputed from the retained values on every call rather
/// than maintained as running sums, so results depend only on the values in
/// the window and never on how they got there.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    /// Retained values (oldest first).
    values: VecDeque<f64>,
    /// Maximum number of values to keep.
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn mean(&self) -> f64 {
        let Some(&first) = self.values.front() else {
            return 0.0;
        };
        // Summation rounding must not move the mean of a constant window.
        if self.values.iter().all(|&v| v == first) {
            return first;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Sample standard deviation (n − 1 denominator); 0 below two values.
    pub fn sample_stddev(&self) -> f64 {
        if self.values.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (self.values.len() - 1) as f64;
        variance.sqrt()
    }
}
