use super::super::record::Record;
use super::RiskFactor;
use indexmap::IndexMap;

pub(crate) fn churn_factors(record: &Record) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    match record.text("Contract") {
        Some("Month-to-month") => factors.push(RiskFactor {
            factor: "contract",
            points: 35.0,
            notes: "month-to-month contract".to_string(),
        }),
        Some("One year") => factors.push(RiskFactor {
            factor: "contract",
            points: 15.0,
            notes: "one year contract".to_string(),
        }),
        _ => {}
    }

    let tenure = record.number("tenure");
    let tenure_points = if tenure < 6.0 {
        25.0
    } else if tenure < 12.0 {
        15.0
    } else if tenure < 24.0 {
        5.0
    } else {
        0.0
    };
    if tenure_points > 0.0 {
        factors.push(RiskFactor {
            factor: "tenure",
            points: tenure_points,
            notes: format!("{tenure:.0} month(s) of tenure"),
        });
    }

    let monthly = record.number("MonthlyCharges");
    let charge_points = if monthly > 90.0 {
        20.0
    } else if monthly > 70.0 {
        10.0
    } else {
        0.0
    };
    if charge_points > 0.0 {
        factors.push(RiskFactor {
            factor: "monthly_charges",
            points: charge_points,
            notes: format!("monthly charges {monthly:.2}"),
        });
    }

    for (field, factor) in [
        ("TechSupport", "no_tech_support"),
        ("OnlineSecurity", "no_online_security"),
    ] {
        if record.text(field) == Some("No") {
            factors.push(RiskFactor {
                factor,
                points: 10.0,
                notes: format!("{field} not subscribed"),
            });
        }
    }

    if record.text("InternetService") == Some("Fiber optic") {
        factors.push(RiskFactor {
            factor: "internet_service",
            points: 5.0,
            notes: "fiber optic service".to_string(),
        });
    }

    factors
}

pub(crate) fn attrition_factors(
    record: &Record,
    department_rates: &IndexMap<String, f64>,
) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    let department = record.category("Department");
    let base = department_rates.get(&department).copied().unwrap_or(0.0);
    if base > 0.0 {
        factors.push(RiskFactor {
            factor: "department_rate",
            points: base,
            notes: format!("{department} attrition rate {base:.1}%"),
        });
    }

    if record.is_yes("OverTime") {
        factors.push(RiskFactor {
            factor: "overtime",
            points: 8.0,
            notes: "works overtime".to_string(),
        });
    }

    let years = record.number("YearsAtCompany");
    if years < 2.0 {
        factors.push(RiskFactor {
            factor: "years_at_company",
            points: 5.0,
            notes: format!("{years:.0} year(s) at company"),
        });
    }

    if record.number("JobSatisfaction") == 1.0 {
        factors.push(RiskFactor {
            factor: "job_satisfaction",
            points: 4.0,
            notes: "lowest job satisfaction rating".to_string(),
        });
    }

    factors
}
