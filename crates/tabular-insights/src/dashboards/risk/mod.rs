//! Heuristic risk scoring for individual records.
//!
//! Scores are fixed weighted sums of record attributes, not model output.
//! Each [`RiskProfile`] carries its own factor table, clamp range and tier
//! cut points.

mod jitter;
mod profiles;

pub use jitter::{Jitter, MAX_JITTER};

use super::aggregate::GroupedResult;
use super::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Named scoring profile with its clamp range and strict tier cut points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    /// Customer churn: contract, tenure, charges and missing support services.
    ChurnRisk,
    /// Employee attrition: department attrition rate plus workload signals.
    AttritionRisk,
}

impl RiskProfile {
    pub const fn clamp_range(self) -> (f64, f64) {
        match self {
            Self::ChurnRisk => (15.0, 95.0),
            Self::AttritionRisk => (0.0, 100.0),
        }
    }

    /// `(high_above, medium_above)`; both comparisons are strict.
    pub const fn tier_cuts(self) -> (f64, f64) {
        match self {
            Self::ChurnRisk => (70.0, 40.0),
            Self::AttritionRisk => (25.0, 15.0),
        }
    }

    pub fn tier(self, score: f64) -> RiskTier {
        let (high, medium) = self.tier_cuts();
        if score > high {
            RiskTier::High
        } else if score > medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

/// Contribution of one rule to a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub factor: &'static str,
    pub points: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub tier: RiskTier,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub factors: Vec<RiskFactor>,
}

/// Applies a [`RiskProfile`] to records.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    profile: RiskProfile,
    jitter: Jitter,
    /// Outcome rate in percent per category, used by [`RiskProfile::AttritionRisk`].
    baseline: IndexMap<String, f64>,
}

impl RiskScorer {
    pub fn churn(jitter: Jitter) -> Self {
        Self {
            profile: RiskProfile::ChurnRisk,
            jitter,
            baseline: IndexMap::new(),
        }
    }

    /// Baseline rates come from the department groups of the current pass.
    pub fn attrition(departments: &GroupedResult, jitter: Jitter) -> Self {
        let baseline = departments
            .iter()
            .map(|(department, stat)| (department.to_string(), stat.rate() * 100.0))
            .collect();

        Self {
            profile: RiskProfile::AttritionRisk,
            jitter,
            baseline,
        }
    }

    pub fn profile(&self) -> RiskProfile {
        self.profile
    }

    pub fn score(&self, record: &Record) -> RiskAssessment {
        let factors = match self.profile {
            RiskProfile::ChurnRisk => profiles::churn_factors(record),
            RiskProfile::AttritionRisk => profiles::attrition_factors(record, &self.baseline),
        };

        let raw: f64 = factors.iter().map(|factor| factor.points).sum();
        let (floor, ceiling) = self.profile.clamp_range();
        let score = (raw + self.jitter.offset(record)).clamp(floor, ceiling);

        RiskAssessment {
            score,
            tier: self.profile.tier(score),
            factors,
        }
    }
}
