//! Sort strategies for the monitors and alerts views.
//!
//! Every strategy is a total order over [`MonitorRow`]s and sorting is stable,
//! so rows with equal keys keep the order the backend returned them in.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::alert::MonitorRow;

/// How to order rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortStrategy {
    /// Case-insensitive display name, ascending.
    #[default]
    Name,
    /// Current value, descending; rows without a value go last.
    Value,
    /// Most recently updated first.
    LastUpdated,
    /// Breached first, then by name.
    AlertStatus,
    /// Breached first, then by severity rank.
    Status,
    /// Severity rank, then breached first.
    Level,
    /// Position in the user's custom order; unlisted rows follow by name.
    Custom,
}

/// Strategies offered by the monitors view, in cycling order.
pub const MONITOR_STRATEGIES: &[SortStrategy] = &[
    SortStrategy::Name,
    SortStrategy::Value,
    SortStrategy::LastUpdated,
    SortStrategy::AlertStatus,
    SortStrategy::Custom,
];

/// Strategies offered by the alerts view, in cycling order.
pub const ALERT_STRATEGIES: &[SortStrategy] = &[
    SortStrategy::Status,
    SortStrategy::Level,
    SortStrategy::Name,
    SortStrategy::Value,
    SortStrategy::LastUpdated,
    SortStrategy::Custom,
];

impl SortStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortStrategy::Name => "name",
            SortStrategy::Value => "value",
            SortStrategy::LastUpdated => "last_updated",
            SortStrategy::AlertStatus => "alert_status",
            SortStrategy::Status => "status",
            SortStrategy::Level => "level",
            SortStrategy::Custom => "custom",
        }
    }

    /// The strategy after this one in `cycle`, wrapping around.
    ///
    /// A strategy not in `cycle` moves to its first entry.
    pub fn next_in(self, cycle: &[SortStrategy]) -> Self {
        match cycle.iter().position(|s| *s == self) {
            Some(i) => cycle[(i + 1) % cycle.len()],
            None => cycle.first().copied().unwrap_or_default(),
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "name" => Ok(Self::Name),
            "value" => Ok(Self::Value),
            "lastupdated" | "updated" => Ok(Self::LastUpdated),
            "alertstatus" => Ok(Self::AlertStatus),
            "status" => Ok(Self::Status),
            "level" | "severity" => Ok(Self::Level),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("unknown sort strategy: {}", s.trim())),
        }
    }
}

/// Positions of ids in a custom order; the first occurrence of an id wins.
pub fn order_index(ids: &[String]) -> HashMap<&str, usize> {
    let mut index = HashMap::with_capacity(ids.len());
    for (pos, id) in ids.iter().enumerate() {
        index.entry(id.as_str()).or_insert(pos);
    }
    index
}

fn by_name(a: &MonitorRow, b: &MonitorRow) -> Ordering {
    a.name().to_lowercase().cmp(&b.name().to_lowercase())
}

/// Breached rows first.
fn by_breach(a: &MonitorRow, b: &MonitorRow) -> Ordering {
    b.breached.cmp(&a.breached)
}

fn by_value_desc(a: &MonitorRow, b: &MonitorRow) -> Ordering {
    let a = a.monitor.current_value.unwrap_or(f64::NEG_INFINITY);
    let b = b.monitor.current_value.unwrap_or(f64::NEG_INFINITY);
    b.total_cmp(&a)
}

/// Compare two rows under `strategy`.
///
/// `custom` is only consulted by [`SortStrategy::Custom`]; build it with
/// [`order_index`].
pub fn compare(
    a: &MonitorRow,
    b: &MonitorRow,
    strategy: SortStrategy,
    custom: &HashMap<&str, usize>,
) -> Ordering {
    match strategy {
        SortStrategy::Name => by_name(a, b),
        SortStrategy::Value => by_value_desc(a, b),
        SortStrategy::LastUpdated => b.monitor.last_updated.cmp(&a.monitor.last_updated),
        SortStrategy::AlertStatus => by_breach(a, b).then_with(|| by_name(a, b)),
        SortStrategy::Status => {
            by_breach(a, b).then_with(|| a.severity_rank().cmp(&b.severity_rank()))
        }
        SortStrategy::Level => {
            a.severity_rank().cmp(&b.severity_rank()).then_with(|| by_breach(a, b))
        }
        SortStrategy::Custom => {
            match (custom.get(a.id()), custom.get(b.id())) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => by_name(a, b),
            }
        }
    }
}

/// Stable sort of rows (or references to rows) under `strategy`.
pub fn sort_rows<T: Borrow<MonitorRow>>(rows: &mut [T], strategy: SortStrategy, custom_order: &[String]) {
    let custom = order_index(custom_order);
    rows.sort_by(|a, b| compare(a.borrow(), b.borrow(), strategy, &custom));
}

/// Move pinned rows to the front in pin-list order, keeping the rest as sorted.
pub fn pin_first<T: Borrow<MonitorRow>>(rows: &mut [T], pinned: &[String]) {
    if pinned.is_empty() {
        return;
    }
    let index = order_index(pinned);
    rows.sort_by_key(|row| index.get(row.borrow().id()).copied().unwrap_or(usize::MAX));
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaugewatch_types::{AlertThresholdConfig, Monitor, Severity, Timestamp};

    fn row(id: &str, name: &str, value: Option<f64>) -> MonitorRow {
        let mut builder = Monitor::builder(id).display_name(name);
        if let Some(v) = value {
            builder = builder.value(v);
        }
        MonitorRow::new(builder.build(), None)
    }

    fn alert_row(id: &str, value: f64, upper: f64, severity: Option<Severity>) -> MonitorRow {
        let monitor = Monitor::builder(id).display_name(id).value(value).build();
        let mut config = AlertThresholdConfig::builder(id).upper(upper);
        config = match severity {
            Some(s) => config.severity(s),
            None => config.unknown_severity(),
        };
        MonitorRow::new(monitor, Some(config.build()))
    }

    fn ids(rows: &[MonitorRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id()).collect()
    }

    fn ids_of(order: &[&str]) -> Vec<String> {
        order.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_name_is_case_insensitive_and_idempotent() {
        let mut rows = vec![row("1", "beta", None), row("2", "Alpha", None), row("3", "gamma", None)];
        sort_rows(&mut rows, SortStrategy::Name, &[]);
        assert_eq!(ids(&rows), vec!["2", "1", "3"]);

        let once = ids(&rows).join(",");
        sort_rows(&mut rows, SortStrategy::Name, &[]);
        assert_eq!(ids(&rows).join(","), once);
    }

    #[test]
    fn test_equal_names_keep_fetch_order() {
        let mut rows = vec![row("a", "Same", None), row("b", "same", None), row("c", "SAME", None)];
        sort_rows(&mut rows, SortStrategy::Name, &[]);
        assert_eq!(ids(&rows), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_value_descending_missing_last() {
        let mut rows = vec![
            row("none", "n", None),
            row("low", "l", Some(-5.0)),
            row("high", "h", Some(10.0)),
            row("zero", "z", Some(0.0)),
        ];
        sort_rows(&mut rows, SortStrategy::Value, &[]);
        assert_eq!(ids(&rows), vec!["high", "zero", "low", "none"]);
    }

    #[test]
    fn test_last_updated_newest_first() {
        let mut a = row("a", "a", None);
        a.monitor.last_updated = Timestamp(10);
        let mut b = row("b", "b", None);
        b.monitor.last_updated = Timestamp(30);
        let mut rows = vec![a, b];
        sort_rows(&mut rows, SortStrategy::LastUpdated, &[]);
        assert_eq!(ids(&rows), vec!["b", "a"]);
    }

    #[test]
    fn test_alert_status_breached_first_regardless_of_name() {
        let mut rows = vec![
            alert_row("aaa", 1.0, 100.0, Some(Severity::Low)),
            alert_row("zzz", 150.0, 100.0, Some(Severity::Low)),
            row("bbb", "bbb", Some(1.0)),
        ];
        sort_rows(&mut rows, SortStrategy::AlertStatus, &[]);
        assert_eq!(ids(&rows), vec!["zzz", "aaa", "bbb"]);
    }

    #[test]
    fn test_status_breached_then_rank() {
        let mut rows = vec![
            alert_row("low-ok", 1.0, 100.0, Some(Severity::Low)),
            alert_row("unknown-hot", 200.0, 100.0, None),
            alert_row("crit-ok", 1.0, 100.0, Some(Severity::Critical)),
            alert_row("high-hot", 200.0, 100.0, Some(Severity::High)),
        ];
        sort_rows(&mut rows, SortStrategy::Status, &[]);
        assert_eq!(ids(&rows), vec!["high-hot", "unknown-hot", "crit-ok", "low-ok"]);
    }

    #[test]
    fn test_level_rank_then_breached() {
        let mut rows = vec![
            alert_row("unknown", 1.0, 100.0, None),
            alert_row("high-ok", 1.0, 100.0, Some(Severity::High)),
            alert_row("high-hot", 200.0, 100.0, Some(Severity::High)),
            alert_row("crit", 1.0, 100.0, Some(Severity::Critical)),
        ];
        sort_rows(&mut rows, SortStrategy::Level, &[]);
        assert_eq!(ids(&rows), vec!["crit", "high-hot", "high-ok", "unknown"]);
    }

    #[test]
    fn test_custom_listed_first_in_list_order() {
        let mut rows = vec![
            row("a", "Zed", None),
            row("b", "bee", None),
            row("c", "Cat", None),
            row("d", "ant", None),
        ];
        sort_rows(&mut rows, SortStrategy::Custom, &ids_of(&["c", "a", "missing"]));
        assert_eq!(ids(&rows), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_custom_unlisted_equal_names_keep_fetch_order() {
        let mut rows = vec![
            row("u2", "Disk", None),
            row("u1", "disk", None),
            row("x", "cpu", None),
            row("u3", "DISK", None),
            row("l", "zz", None),
        ];
        sort_rows(&mut rows, SortStrategy::Custom, &ids_of(&["l"]));
        assert_eq!(ids(&rows), vec!["l", "x", "u2", "u1", "u3"]);

        // Sorting again changes nothing
        sort_rows(&mut rows, SortStrategy::Custom, &ids_of(&["l"]));
        assert_eq!(ids(&rows), vec!["l", "x", "u2", "u1", "u3"]);
    }

    #[test]
    fn test_custom_duplicate_ids_use_first_position() {
        let mut rows = vec![row("a", "a", None), row("b", "b", None)];
        sort_rows(&mut rows, SortStrategy::Custom, &ids_of(&["b", "a", "b"]));
        assert_eq!(ids(&rows), vec!["b", "a"]);
    }

    #[test]
    fn test_pin_first_keeps_rest_sorted() {
        let mut rows = vec![
            row("a", "a", None),
            row("b", "b", None),
            row("c", "c", None),
            row("d", "d", None),
        ];
        pin_first(&mut rows, &ids_of(&["d", "b"]));
        assert_eq!(ids(&rows), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_sort_references() {
        let rows = vec![row("2", "b", None), row("1", "a", None)];
        let mut refs: Vec<&MonitorRow> = rows.iter().collect();
        sort_rows(&mut refs, SortStrategy::Name, &[]);
        assert_eq!(refs[0].id(), "1");
    }

    #[test]
    fn test_strategy_parse_and_cycle() {
        assert_eq!("lastUpdated".parse::<SortStrategy>(), Ok(SortStrategy::LastUpdated));
        assert_eq!("alert_status".parse::<SortStrategy>(), Ok(SortStrategy::AlertStatus));
        assert!("random".parse::<SortStrategy>().is_err());

        assert_eq!(SortStrategy::Custom.next_in(MONITOR_STRATEGIES), SortStrategy::Name);
        assert_eq!(SortStrategy::Level.next_in(MONITOR_STRATEGIES), SortStrategy::Name);
        assert_eq!(SortStrategy::Status.next_in(ALERT_STRATEGIES), SortStrategy::Level);
    }
}
