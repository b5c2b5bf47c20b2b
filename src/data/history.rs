//! In-memory value history for sparklines and change indicators.

use std::collections::{HashMap, VecDeque};

use gaugewatch_types::HistoryPoint;

use super::alert::DashboardData;

/// Maximum number of values kept per monitor.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks recent values per monitor.
///
/// Values are recorded once per refresh. Monitors without a current value
/// are skipped, so a gap in the data does not flatten the sparkline.
#[derive(Debug, Clone, Default)]
pub struct History {
    values: HashMap<String, VecDeque<f64>>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current value of every monitor.
    pub fn record(&mut self, data: &DashboardData) {
        for row in &data.monitors {
            if let Some(value) = row.monitor.current_value {
                self.push(&row.monitor.id, value);
            }
        }
    }

    /// Prime a monitor's history from backend history points, oldest first.
    pub fn seed(&mut self, id: &str, points: &[HistoryPoint]) {
        let values = self.values.entry(id.to_string()).or_default();
        values.clear();
        let skip = points.len().saturating_sub(MAX_HISTORY_SIZE);
        values.extend(points.iter().skip(skip).map(|p| p.value));
    }

    fn push(&mut self, id: &str, value: f64) {
        let values = self.values.entry(id.to_string()).or_default();
        values.push_back(value);
        if values.len() > MAX_HISTORY_SIZE {
            values.pop_front();
        }
    }

    /// Number of values held for a monitor.
    pub fn len(&self, id: &str) -> usize {
        self.values.get(id).map_or(0, VecDeque::len)
    }

    /// Sparkline levels (0-7) scaled between the min and max seen.
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, id: &str) -> Vec<u8> {
        let Some(values) = self.values.get(id) else {
            return Vec::new();
        };
        if values.len() < 2 {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        values
            .iter()
            .map(|&v| {
                if range <= 0.0 {
                    return 3;
                }
                let normalized = ((v - min) / range * 7.0).round() as u8;
                normalized.min(7)
            })
            .collect()
    }

    /// Difference between the last two recorded values.
    pub fn change(&self, id: &str) -> Option<f64> {
        let values = self.values.get(id)?;
        let len = values.len();
        if len < 2 {
            return None;
        }
        Some(values[len - 1] - values[len - 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Annotations;
    use gaugewatch_types::{Dashboard, Monitor, Timestamp};

    fn data(values: &[(&str, Option<f64>)]) -> DashboardData {
        let mut dashboard = Dashboard::new();
        dashboard.monitors = values
            .iter()
            .map(|(id, v)| {
                let mut m = Monitor::new(*id);
                m.current_value = *v;
                m
            })
            .collect();
        DashboardData::from_dashboard(&dashboard, &Annotations::default())
    }

    #[test]
    fn test_sparkline_needs_two_values() {
        let mut history = History::new();
        history.record(&data(&[("m1", Some(1.0))]));
        assert!(history.sparkline("m1").is_empty());
        assert!(history.sparkline("unknown").is_empty());
    }

    #[test]
    fn test_sparkline_scales_to_range() {
        let mut history = History::new();
        for v in [0.0, 50.0, 100.0] {
            history.record(&data(&[("m1", Some(v))]));
        }
        assert_eq!(history.sparkline("m1"), vec![0, 4, 7]);
        assert_eq!(history.change("m1"), Some(50.0));
    }

    #[test]
    fn test_flat_history_is_mid_level() {
        let mut history = History::new();
        history.record(&data(&[("m1", Some(5.0))]));
        history.record(&data(&[("m1", Some(5.0))]));
        assert_eq!(history.sparkline("m1"), vec![3, 3]);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let mut history = History::new();
        history.record(&data(&[("m1", Some(1.0))]));
        history.record(&data(&[("m1", None)]));
        assert_eq!(history.len("m1"), 1);
    }

    #[test]
    fn test_history_is_capped() {
        let mut history = History::new();
        for i in 0..(MAX_HISTORY_SIZE + 10) {
            history.record(&data(&[("m1", Some(i as f64))]));
        }
        assert_eq!(history.len("m1"), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_seed_replaces_history() {
        let mut history = History::new();
        history.record(&data(&[("m1", Some(99.0))]));
        let points: Vec<HistoryPoint> = (0..3)
            .map(|i| HistoryPoint {
                at: Timestamp(i),
                value: i as f64,
            })
            .collect();
        history.seed("m1", &points);
        assert_eq!(history.len("m1"), 3);
        assert_eq!(history.change("m1"), Some(1.0));
    }
}
