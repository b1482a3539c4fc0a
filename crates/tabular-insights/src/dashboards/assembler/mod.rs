pub mod views;

use super::aggregate::GroupedResult;
use super::definitions::{DashboardDefinition, KpiInputs, RiskSpec};
use super::record::Record;
use super::risk::{Jitter, RiskProfile, RiskScorer, RiskTier};
use indexmap::IndexMap;
use tracing::debug;
use views::{DashboardResult, GroupEntry, RiskEntry};

/// Per-call presentation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyOptions {
    /// Maximum number of entries in the risk list.
    pub risk_limit: usize,
    /// Half-width of the seeded score jitter; `0.0` disables it.
    pub jitter_amplitude: f64,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            risk_limit: 10,
            jitter_amplitude: 0.0,
        }
    }
}

/// Builds every KPI, grouped table and the risk list for one dashboard.
///
/// An empty `records` slice is valid input and produces zeroed KPIs.
pub fn assemble(
    definition: &DashboardDefinition,
    records: &[Record],
    options: &AssemblyOptions,
) -> DashboardResult {
    let output = definition.plan().run(records);

    let groups: IndexMap<String, Vec<GroupEntry>> = definition
        .dimensions
        .iter()
        .map(|dimension| {
            let entries = output
                .groups
                .get(dimension.name)
                .map(|grouped| {
                    dimension
                        .ordering
                        .rank(grouped)
                        .into_iter()
                        .map(|(label, stat)| GroupEntry {
                            label,
                            positive: stat.positive,
                            total: stat.total,
                            rate: stat.rate(),
                            sum: stat.sum,
                        })
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            (dimension.name.to_string(), entries)
        })
        .collect();

    let (risk_list, high_risk) = match &definition.risk {
        Some(spec) => {
            let baseline = spec
                .baseline_dimension
                .and_then(|name| output.groups.get(name));
            score_records(spec, baseline, records, options)
        }
        None => (Vec::new(), 0),
    };

    let kpis = (definition.kpis)(&KpiInputs {
        output: &output,
        high_risk,
    });

    debug!(
        dashboard = %definition.kind,
        records = records.len(),
        dimensions = definition.dimensions.len(),
        risk_entries = risk_list.len(),
        "assembled dashboard"
    );

    DashboardResult {
        dashboard: definition.kind,
        dashboard_label: definition.kind.label(),
        record_count: output.totals.records,
        kpis,
        groups,
        risk_list,
    }
}

/// Scores eligible records, returning the top entries by score together with
/// the number of eligible records in the high tier.
fn score_records(
    spec: &RiskSpec,
    baseline: Option<&GroupedResult>,
    records: &[Record],
    options: &AssemblyOptions,
) -> (Vec<RiskEntry>, usize) {
    let jitter = Jitter::seeded(options.jitter_amplitude, spec.id_field);
    let scorer = match spec.profile {
        RiskProfile::ChurnRisk => RiskScorer::churn(jitter),
        RiskProfile::AttritionRisk => {
            let empty = GroupedResult::new();
            RiskScorer::attrition(baseline.unwrap_or(&empty), jitter)
        }
    };

    let mut entries: Vec<RiskEntry> = records
        .iter()
        .filter(|record| (spec.eligible)(record))
        .map(|record| RiskEntry::new(scorer.score(record), record.clone()))
        .collect();

    let high_risk = entries
        .iter()
        .filter(|entry| entry.tier == RiskTier::High)
        .count();

    entries.sort_by(|left, right| right.score.total_cmp(&left.score));
    entries.truncate(options.risk_limit);

    (entries, high_risk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::definitions::{DashboardKind, NO_DATA};

    fn customer(id: &str, contract: &str, tenure: i64, churn: &str) -> Record {
        Record::new()
            .with("customerID", id)
            .with("Contract", contract)
            .with("tenure", tenure)
            .with("MonthlyCharges", 50.0)
            .with("TechSupport", "Yes")
            .with("OnlineSecurity", "Yes")
            .with("InternetService", "DSL")
            .with("PaymentMethod", "Mailed check")
            .with("Churn", churn)
    }

    #[test]
    fn empty_input_is_not_an_error() {
        for kind in DashboardKind::ordered() {
            let result = assemble(&kind.definition(), &[], &AssemblyOptions::default());
            assert_eq!(result.record_count, 0);
            assert!(result.risk_list.is_empty());
            assert!(result.groups.values().all(Vec::is_empty));
            for value in result.kpis.values() {
                match value.as_number() {
                    Some(number) => assert_eq!(number, 0.0),
                    None => assert_eq!(value.as_text(), Some(NO_DATA)),
                }
            }
        }
    }

    #[test]
    fn risk_list_excludes_churned_and_sorts_by_score() {
        let records = vec![
            customer("A", "Two year", 60, "No"),
            customer("B", "Month-to-month", 2, "No"),
            customer("C", "Month-to-month", 1, "Yes"),
            customer("D", "One year", 8, "No"),
        ];
        let result = assemble(
            &DashboardKind::Telecom.definition(),
            &records,
            &AssemblyOptions::default(),
        );

        let ids: Vec<String> = result
            .risk_list
            .iter()
            .map(|entry| entry.record.category("customerID"))
            .collect();
        assert_eq!(ids, vec!["B", "D", "A"]);
        assert_eq!(result.risk_list[0].score, 60.0);
        assert_eq!(result.risk_list[0].tier_label, "Medium");
        assert_eq!(result.risk_list[2].score, 15.0);
    }

    #[test]
    fn risk_limit_truncates_but_high_risk_counts_all() {
        let records: Vec<Record> = (0..5)
            .map(|index| {
                customer(&format!("C{index}"), "Month-to-month", 1, "No")
                    .with("MonthlyCharges", 99.0)
                    .with("TechSupport", "No")
            })
            .collect();
        let options = AssemblyOptions {
            risk_limit: 2,
            ..AssemblyOptions::default()
        };
        let result = assemble(&DashboardKind::Telecom.definition(), &records, &options);

        assert_eq!(result.risk_list.len(), 2);
        assert_eq!(
            result.kpi("high_risk_customers").and_then(|v| v.as_number()),
            Some(5.0)
        );
    }
}
