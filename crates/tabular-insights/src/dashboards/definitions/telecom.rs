use super::super::aggregate::{KeyExtractor, Measure, Outcome};
use super::super::assembler::views::KpiValue;
use super::super::binning::TENURE_BANDS;
use super::super::ranking::GroupOrdering;
use super::super::record::Record;
use super::super::risk::RiskProfile;
use super::{DashboardDefinition, DashboardKind, DimensionSpec, KpiInputs, RiskSpec};
use indexmap::IndexMap;

pub(super) fn definition() -> DashboardDefinition {
    DashboardDefinition {
        kind: DashboardKind::Telecom,
        outcome: Outcome::FieldIsYes("Churn"),
        measure: Measure::None,
        numeric_fields: vec!["tenure", "MonthlyCharges"],
        dimensions: vec![
            DimensionSpec::new(
                "churn",
                KeyExtractor::YesNo("Churn"),
                GroupOrdering::Domain(vec!["Yes", "No"]),
            ),
            DimensionSpec::new(
                "contract",
                KeyExtractor::Field("Contract"),
                GroupOrdering::FirstSeen,
            ),
            DimensionSpec::new(
                "internet_service",
                KeyExtractor::Field("InternetService"),
                GroupOrdering::FirstSeen,
            ),
            DimensionSpec::new(
                "tenure_group",
                KeyExtractor::Binned {
                    field: "tenure",
                    table: TENURE_BANDS,
                },
                GroupOrdering::Domain(TENURE_BANDS.labels()),
            ),
            DimensionSpec::new(
                "payment_method",
                KeyExtractor::Field("PaymentMethod"),
                GroupOrdering::RateDescending,
            ),
        ],
        risk: Some(RiskSpec {
            profile: RiskProfile::ChurnRisk,
            id_field: "customerID",
            eligible: is_active_customer,
            baseline_dimension: None,
        }),
        kpis,
    }
}

fn is_active_customer(record: &Record) -> bool {
    !record.is_yes("Churn")
}

fn kpis(inputs: &KpiInputs<'_>) -> IndexMap<String, KpiValue> {
    let totals = &inputs.output.totals;
    IndexMap::from([
        ("total_customers".to_string(), KpiValue::from(totals.records)),
        ("churn_rate".to_string(), KpiValue::from(totals.outcome_rate())),
        ("avg_tenure".to_string(), KpiValue::from(totals.mean("tenure"))),
        ("avg_monthly_charges".to_string(), KpiValue::from(totals.mean("MonthlyCharges"))),
        ("high_risk_customers".to_string(), KpiValue::from(inputs.high_risk)),
    ])
}
