//! Aggregation engine behind the HR, retail and telecom dashboards.

pub mod aggregate;
pub mod assembler;
pub mod binning;
pub mod definitions;
pub mod filter;
pub mod loader;
pub mod ranking;
pub mod record;
pub mod risk;
mod router;
pub mod service;

pub use aggregate::{aggregate, AggregationPlan, GroupStat, GroupedResult, KeyExtractor, Outcome};
pub use assembler::views::{DashboardResult, GroupEntry, KpiValue, RiskEntry};
pub use assembler::{assemble, AssemblyOptions};
pub use definitions::{DashboardDefinition, DashboardKind, UnknownDashboard};
pub use filter::{apply_filters, FieldFilter, FilterParseError};
pub use loader::{LoadOptions, RecordLoadError, RecordLoader, RowGate};
pub use ranking::GroupOrdering;
pub use record::{FieldValue, Record};
pub use risk::{Jitter, RiskProfile, RiskScorer, RiskTier};
pub use router::dashboard_router;
pub use service::{
    DashboardRequest, DashboardResponse, DashboardService, DashboardSettings, DataSource,
};
