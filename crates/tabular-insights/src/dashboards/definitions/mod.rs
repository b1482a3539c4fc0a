//! Per-dataset dashboard configuration.
//!
//! A definition only lists what to aggregate and how to present it; all
//! grouping, ranking and scoring runs through the shared engine.

mod hr;
mod retail;
mod telecom;

use super::aggregate::{AggregationOutput, AggregationPlan, KeyExtractor, Measure, Outcome};
use super::assembler::views::KpiValue;
use super::loader::RowGate;
use super::ranking::GroupOrdering;
use super::record::Record;
use super::risk::RiskProfile;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for text KPIs computed over an empty dataset.
pub const NO_DATA: &str = "No data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardKind {
    Hr,
    Retail,
    Telecom,
}

impl DashboardKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Hr, Self::Retail, Self::Telecom]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::Retail => "retail",
            Self::Telecom => "telecom",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hr => "HR Attrition",
            Self::Retail => "Retail Sales",
            Self::Telecom => "Telecom Churn",
        }
    }

    /// File name looked up under the configured data directory.
    pub const fn data_file(self) -> &'static str {
        match self {
            Self::Hr => "hr-attrition.csv",
            Self::Retail => "retail-shopping.csv",
            Self::Telecom => "telco-churn.csv",
        }
    }

    pub const fn row_gate(self) -> RowGate {
        match self {
            Self::Hr => RowGate::RequireField("EmployeeNumber"),
            Self::Retail => RowGate::MorePopulatedThan(1),
            Self::Telecom => RowGate::RequireField("customerID"),
        }
    }

    pub fn definition(self) -> DashboardDefinition {
        match self {
            Self::Hr => hr::definition(),
            Self::Retail => retail::definition(),
            Self::Telecom => telecom::definition(),
        }
    }
}

impl fmt::Display for DashboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDashboard(pub String);

impl fmt::Display for UnknownDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown dashboard '{}' (expected one of: hr, retail, telecom)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDashboard {}

impl FromStr for DashboardKind {
    type Err = UnknownDashboard;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hr" | "attrition" => Ok(Self::Hr),
            "retail" | "sales" => Ok(Self::Retail),
            "telecom" | "telco" | "churn" => Ok(Self::Telecom),
            _ => Err(UnknownDashboard(raw.to_string())),
        }
    }
}

/// One grouped table on a dashboard.
#[derive(Debug, Clone)]
pub struct DimensionSpec {
    pub name: &'static str,
    pub extractor: KeyExtractor,
    pub ordering: GroupOrdering,
}

impl DimensionSpec {
    pub fn new(name: &'static str, extractor: KeyExtractor, ordering: GroupOrdering) -> Self {
        Self {
            name,
            extractor,
            ordering,
        }
    }
}

/// Which records get a risk score and how.
#[derive(Debug, Clone)]
pub struct RiskSpec {
    pub profile: RiskProfile,
    pub id_field: &'static str,
    pub eligible: fn(&Record) -> bool,
    /// Dimension whose group rates seed [`RiskProfile::AttritionRisk`].
    pub baseline_dimension: Option<&'static str>,
}

/// Inputs available when a dashboard derives its KPIs.
pub struct KpiInputs<'a> {
    pub output: &'a AggregationOutput,
    pub high_risk: usize,
}

pub type KpiBuilder = fn(&KpiInputs<'_>) -> IndexMap<String, KpiValue>;

#[derive(Debug, Clone)]
pub struct DashboardDefinition {
    pub kind: DashboardKind,
    pub outcome: Outcome,
    pub measure: Measure,
    pub numeric_fields: Vec<&'static str>,
    pub dimensions: Vec<DimensionSpec>,
    pub risk: Option<RiskSpec>,
    pub kpis: KpiBuilder,
}

impl DashboardDefinition {
    pub fn plan(&self) -> AggregationPlan {
        let plan = self
            .numeric_fields
            .iter()
            .fold(
                AggregationPlan::new(self.outcome).measure(self.measure),
                |plan, field| plan.numeric_field(*field),
            );

        self.dimensions
            .iter()
            .fold(plan, |plan, dimension| {
                plan.dimension(dimension.name, dimension.extractor)
            })
    }
}
