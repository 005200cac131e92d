use super::window::RollingWindow;

/// Trailing moving average of the gap.
///
/// The window grows up to `window` values, so the first points are averaged
/// over whatever history exists instead of being left undefined.
#[derive(Debug, Clone)]
pub struct TrendTracker {
    window: RollingWindow,
}

impl TrendTracker {
    pub fn new(window: usize) -> Self {
        Self {
            window: RollingWindow::new(window.max(1)),
        }
    }

    /// Add the next value and return the trend at that point.
    pub fn update(&mut self, value: f64) -> f64 {
        self.window.push(value);
        self.window.mean()
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}

/// Trend column for a whole series.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut tracker = TrendTracker::new(window);
    values.iter().map(|&v| tracker.update(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_is_its_own_trend() {
        assert_eq!(trailing_mean(&[4.2], 3), vec![4.2]);
    }

    #[test]
    fn prefix_uses_available_points() {
        let t = trailing_mean(&[2.0, 4.0, 9.0, 1.0], 3);
        assert!((t[0] - 2.0).abs() < 1e-12);
        assert!((t[1] - 3.0).abs() < 1e-12);
        assert!((t[2] - 5.0).abs() < 1e-12);
        assert!((t[3] - 14.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn window_of_one_is_identity() {
        let values = [1.0, -3.0, 8.5];
        assert_eq!(trailing_mean(&values, 1), values.to_vec());
    }

    #[test]
    fn reset_forgets_history() {
        let mut tracker = TrendTracker::new(3);
        tracker.update(100.0);
        tracker.reset();
        assert_eq!(tracker.update(1.0), 1.0);
    }

    #[test]
    fn empty_input_gives_empty_trend() {
        assert!(trailing_mean(&[], 3).is_empty());
    }
}
