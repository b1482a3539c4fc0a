use super::binning::BinTable;
use super::record::{Record, UNKNOWN_LABEL};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;

/// Outcome count, record count and measure sum for one dimension value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupStat {
    pub positive: usize,
    pub total: usize,
    pub sum: f64,
}

impl GroupStat {
    /// Share of positive outcomes; `0.0` for an empty group.
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.positive as f64 / self.total as f64
        }
    }

    fn observe(&mut self, positive: bool, amount: f64) {
        self.total += 1;
        if positive {
            self.positive += 1;
        }
        self.sum += amount;
    }
}

/// Dimension values in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedResult {
    groups: IndexMap<String, GroupStat>,
}

impl GroupedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, key: String, positive: bool, amount: f64) {
        self.groups.entry(key).or_default().observe(positive, amount);
    }

    pub fn get(&self, key: &str) -> Option<&GroupStat> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupStat)> {
        self.groups.iter().map(|(key, stat)| (key.as_str(), stat))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum of group totals; equals the record count for a complete pass.
    pub fn total_records(&self) -> usize {
        self.groups.values().map(|stat| stat.total).sum()
    }
}

/// How a record is turned into a dimension key.
#[derive(Debug, Clone, Copy)]
pub enum KeyExtractor {
    /// Raw categorical value; zero and blank cells become `"Unknown"`.
    Field(&'static str),
    /// `"Yes"` when the field holds `"Yes"`, `"No"` for anything else.
    YesNo(&'static str),
    /// Numeric value mapped through a bucket table.
    Binned {
        field: &'static str,
        table: BinTable,
    },
    /// `YYYY-MM` month of a date field.
    Month(&'static str),
    Custom(fn(&Record) -> String),
}

impl KeyExtractor {
    pub fn extract(&self, record: &Record) -> String {
        match self {
            Self::Field(field) => record.dimension_key(field),
            Self::YesNo(field) if record.is_yes(field) => "Yes".to_string(),
            Self::YesNo(_) => "No".to_string(),
            Self::Binned { field, table } => table.bin(record.number(field)).to_string(),
            Self::Month(field) => record
                .text(field)
                .and_then(month_key)
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            Self::Custom(extract) => extract(record),
        }
    }
}

/// The binary event whose rate is tracked per group.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    /// Field holds the literal `"Yes"`.
    FieldIsYes(&'static str),
    Custom(fn(&Record) -> bool),
}

impl Outcome {
    pub fn holds(&self, record: &Record) -> bool {
        match self {
            Self::FieldIsYes(field) => record.is_yes(field),
            Self::Custom(predicate) => predicate(record),
        }
    }
}

/// Per-record amount summed into every group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Measure {
    #[default]
    None,
    Field(&'static str),
    Product(&'static str, &'static str),
}

impl Measure {
    pub fn amount(&self, record: &Record) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Field(field) => record.number(field),
            Self::Product(left, right) => record.number(left) * record.number(right),
        }
    }
}

/// Groups records by one extractor, counting outcomes with `predicate`.
pub fn aggregate<E, P>(records: &[Record], extractor: E, predicate: P) -> GroupedResult
where
    E: Fn(&Record) -> String,
    P: Fn(&Record) -> bool,
{
    let mut grouped = GroupedResult::new();
    for record in records {
        grouped.observe(extractor(record), predicate(record), 0.0);
    }
    grouped
}

/// Dataset-wide totals gathered alongside the groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiTotals {
    pub records: usize,
    pub positive: usize,
    pub measure_sum: f64,
    /// Measure summed over records where the outcome holds.
    pub positive_measure_sum: f64,
    field_sums: IndexMap<&'static str, f64>,
}

impl KpiTotals {
    pub fn outcome_rate(&self) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            self.positive as f64 / self.records as f64
        }
    }

    pub fn sum(&self, field: &str) -> f64 {
        self.field_sums.get(field).copied().unwrap_or(0.0)
    }

    pub fn mean(&self, field: &str) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            self.sum(field) / self.records as f64
        }
    }
}

/// Everything one pass over the dataset produces.
#[derive(Debug, Clone, Default)]
pub struct AggregationOutput {
    pub totals: KpiTotals,
    pub groups: IndexMap<String, GroupedResult>,
}

/// Dimensions, outcome, measure and numeric KPI fields evaluated together.
#[derive(Debug, Clone)]
pub struct AggregationPlan {
    outcome: Outcome,
    measure: Measure,
    numeric_fields: Vec<&'static str>,
    dimensions: Vec<(String, KeyExtractor)>,
}

impl AggregationPlan {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            measure: Measure::None,
            numeric_fields: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    pub fn measure(mut self, measure: Measure) -> Self {
        self.measure = measure;
        self
    }

    pub fn numeric_field(mut self, field: &'static str) -> Self {
        self.numeric_fields.push(field);
        self
    }

    pub fn dimension(mut self, name: impl Into<String>, extractor: KeyExtractor) -> Self {
        self.dimensions.push((name.into(), extractor));
        self
    }

    /// Single pass: each record is visited once for every KPI and dimension.
    pub fn run(&self, records: &[Record]) -> AggregationOutput {
        let mut totals = KpiTotals {
            field_sums: self.numeric_fields.iter().map(|field| (*field, 0.0)).collect(),
            ..KpiTotals::default()
        };
        let mut groups: IndexMap<String, GroupedResult> = self
            .dimensions
            .iter()
            .map(|(name, _)| (name.clone(), GroupedResult::new()))
            .collect();

        for record in records {
            let positive = self.outcome.holds(record);
            let amount = self.measure.amount(record);

            totals.records += 1;
            totals.measure_sum += amount;
            if positive {
                totals.positive += 1;
                totals.positive_measure_sum += amount;
            }
            for (field, sum) in totals.field_sums.iter_mut() {
                *sum += record.number(field);
            }

            for ((_, extractor), grouped) in self.dimensions.iter().zip(groups.values_mut()) {
                grouped.observe(extractor.extract(record), positive, amount);
            }
        }

        AggregationOutput { totals, groups }
    }
}

fn month_key(raw: &str) -> Option<String> {
    let date = parse_date(raw)?;
    Some(format!("{:04}-{:02}", date.year(), date.month()))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }

    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
