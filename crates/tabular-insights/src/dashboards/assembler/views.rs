use super::super::definitions::DashboardKind;
use super::super::record::Record;
use super::super::risk::{RiskAssessment, RiskFactor, RiskTier};
use indexmap::IndexMap;
use serde::Serialize;

/// Headline figure; numbers stay raw so renderers choose the formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KpiValue {
    Number(f64),
    Text(String),
}

impl KpiValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for KpiValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<usize> for KpiValue {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<String> for KpiValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for KpiValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    pub label: String,
    pub positive: usize,
    pub total: usize,
    pub rate: f64,
    pub sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEntry {
    pub score: f64,
    pub tier: RiskTier,
    pub tier_label: &'static str,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub factors: Vec<RiskFactor>,
    pub record: Record,
}

impl RiskEntry {
    pub fn new(assessment: RiskAssessment, record: Record) -> Self {
        Self {
            score: assessment.score,
            tier: assessment.tier,
            tier_label: assessment.tier.label(),
            factors: assessment.factors,
            record,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResult {
    pub dashboard: DashboardKind,
    pub dashboard_label: &'static str,
    pub record_count: usize,
    pub kpis: IndexMap<String, KpiValue>,
    pub groups: IndexMap<String, Vec<GroupEntry>>,
    pub risk_list: Vec<RiskEntry>,
}

impl DashboardResult {
    pub fn kpi(&self, name: &str) -> Option<&KpiValue> {
        self.kpis.get(name)
    }

    pub fn group(&self, dimension: &str) -> Option<&[GroupEntry]> {
        self.groups.get(dimension).map(Vec::as_slice)
    }
}
