use super::aggregate::{GroupStat, GroupedResult};
use std::cmp::Ordering;

/// Presentation order applied to a dimension's groups.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOrdering {
    /// Order in which keys were first seen.
    FirstSeen,
    /// Fixed label sequence; only labels present in the sequence are kept.
    Domain(Vec<&'static str>),
    /// Leading integer of the key, e.g. `"7-12"` before `"13-24"`.
    NumericPrefix,
    /// `YYYY-MM` keys by year, then month.
    Chronological,
    RateDescending,
    SumDescending,
    CountDescending,
}

pub type RankedGroups = Vec<(String, GroupStat)>;

impl GroupOrdering {
    pub fn rank(&self, grouped: &GroupedResult) -> RankedGroups {
        match self {
            Self::FirstSeen => collect(grouped),
            Self::Domain(labels) => by_domain(grouped, labels),
            Self::NumericPrefix => by_key(grouped, leading_integer),
            Self::Chronological => by_key(grouped, year_month),
            Self::RateDescending => by_metric(grouped, GroupStat::rate),
            Self::SumDescending => by_metric(grouped, |stat| stat.sum),
            Self::CountDescending => by_metric(grouped, |stat| stat.total as f64),
        }
    }
}

fn collect(grouped: &GroupedResult) -> RankedGroups {
    grouped
        .iter()
        .map(|(key, stat)| (key.to_string(), *stat))
        .collect()
}

fn by_domain(grouped: &GroupedResult, labels: &[&'static str]) -> RankedGroups {
    labels
        .iter()
        .filter_map(|label| grouped.get(label).map(|stat| (label.to_string(), *stat)))
        .collect()
}

/// Keys the parser understands come first in ascending order; the rest keep
/// their first-seen order behind them.
fn by_key<K, F>(grouped: &GroupedResult, parse: F) -> RankedGroups
where
    K: Ord,
    F: Fn(&str) -> Option<K>,
{
    let mut keyed: Vec<(Option<K>, String, GroupStat)> = grouped
        .iter()
        .map(|(key, stat)| (parse(key), key.to_string(), *stat))
        .collect();

    keyed.sort_by(|(left, ..), (right, ..)| match (left, right) {
        (Some(left), Some(right)) => left.cmp(right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed
        .into_iter()
        .map(|(_, key, stat)| (key, stat))
        .collect()
}

/// Descending by `metric`; `sort_by` is stable so ties keep first-seen order.
fn by_metric<F>(grouped: &GroupedResult, metric: F) -> RankedGroups
where
    F: Fn(&GroupStat) -> f64,
{
    let mut ranked = collect(grouped);
    ranked.sort_by(|(_, left), (_, right)| metric(right).total_cmp(&metric(left)));
    ranked
}

fn leading_integer(key: &str) -> Option<i64> {
    let digits: String = key
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn year_month(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.trim().split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok().filter(|m| (1..=12).contains(m))?;
    Some((year, month))
}
