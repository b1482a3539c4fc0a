use super::super::aggregate::{KeyExtractor, Measure, Outcome};
use super::super::assembler::views::KpiValue;
use super::super::binning::{AGE_BANDS, INCOME_BANDS};
use super::super::ranking::GroupOrdering;
use super::super::record::Record;
use super::super::risk::RiskProfile;
use super::{DashboardDefinition, DashboardKind, DimensionSpec, KpiInputs, RiskSpec};
use indexmap::IndexMap;

pub(super) fn definition() -> DashboardDefinition {
    DashboardDefinition {
        kind: DashboardKind::Hr,
        outcome: Outcome::FieldIsYes("Attrition"),
        measure: Measure::None,
        numeric_fields: vec!["Age", "YearsAtCompany", "MonthlyIncome"],
        dimensions: vec![
            DimensionSpec::new(
                "attrition",
                KeyExtractor::YesNo("Attrition"),
                GroupOrdering::Domain(vec!["Yes", "No"]),
            ),
            DimensionSpec::new(
                "department",
                KeyExtractor::Field("Department"),
                GroupOrdering::FirstSeen,
            ),
            DimensionSpec::new(
                "job_role",
                KeyExtractor::Field("JobRole"),
                GroupOrdering::RateDescending,
            ),
            DimensionSpec::new(
                "age_band",
                KeyExtractor::Binned {
                    field: "Age",
                    table: AGE_BANDS,
                },
                GroupOrdering::Domain(AGE_BANDS.labels()),
            ),
            DimensionSpec::new(
                "income_band",
                KeyExtractor::Binned {
                    field: "MonthlyIncome",
                    table: INCOME_BANDS,
                },
                GroupOrdering::Domain(INCOME_BANDS.labels()),
            ),
            DimensionSpec::new(
                "overtime",
                KeyExtractor::YesNo("OverTime"),
                GroupOrdering::Domain(vec!["Yes", "No"]),
            ),
        ],
        risk: Some(RiskSpec {
            profile: RiskProfile::AttritionRisk,
            id_field: "EmployeeNumber",
            eligible: is_current_employee,
            baseline_dimension: Some("department"),
        }),
        kpis,
    }
}

fn is_current_employee(record: &Record) -> bool {
    !record.is_yes("Attrition")
}

fn kpis(inputs: &KpiInputs<'_>) -> IndexMap<String, KpiValue> {
    let totals = &inputs.output.totals;
    IndexMap::from([
        ("total_employees".to_string(), KpiValue::from(totals.records)),
        ("attrition_rate".to_string(), KpiValue::from(totals.outcome_rate())),
        ("avg_age".to_string(), KpiValue::from(totals.mean("Age"))),
        ("avg_years_at_company".to_string(), KpiValue::from(totals.mean("YearsAtCompany"))),
        ("avg_monthly_income".to_string(), KpiValue::from(totals.mean("MonthlyIncome"))),
        ("high_risk_employees".to_string(), KpiValue::from(inputs.high_risk)),
    ])
}
