use super::super::aggregate::{KeyExtractor, Measure, Outcome};
use super::super::assembler::views::KpiValue;
use super::super::ranking::GroupOrdering;
use super::super::record::Record;
use super::{DashboardDefinition, DashboardKind, DimensionSpec, KpiInputs, NO_DATA};
use indexmap::IndexMap;

const QUANTITY: &str = "quantity";
const PRICE: &str = "price";
const REVENUE_BY_CATEGORY: &str = "revenue_by_category";

pub(super) fn definition() -> DashboardDefinition {
    DashboardDefinition {
        kind: DashboardKind::Retail,
        outcome: Outcome::Custom(is_counted_order),
        measure: Measure::Product(QUANTITY, PRICE),
        numeric_fields: Vec::new(),
        dimensions: vec![
            DimensionSpec::new(
                "revenue_by_month",
                KeyExtractor::Month("invoice_date"),
                GroupOrdering::Chronological,
            ),
            DimensionSpec::new(
                REVENUE_BY_CATEGORY,
                KeyExtractor::Field("category"),
                GroupOrdering::SumDescending,
            ),
            DimensionSpec::new(
                "gender",
                KeyExtractor::Field("gender"),
                GroupOrdering::FirstSeen,
            ),
            DimensionSpec::new(
                "payment_method",
                KeyExtractor::Field("payment_method"),
                GroupOrdering::CountDescending,
            ),
        ],
        risk: None,
        kpis,
    }
}

/// Only lines with a positive amount count as orders.
fn is_counted_order(record: &Record) -> bool {
    record.number(QUANTITY) * record.number(PRICE) > 0.0
}

fn kpis(inputs: &KpiInputs<'_>) -> IndexMap<String, KpiValue> {
    let totals = &inputs.output.totals;
    let revenue = totals.positive_measure_sum;
    let orders = totals.positive;
    let avg_basket = if orders > 0 {
        revenue / orders as f64
    } else {
        0.0
    };

    // strict comparison: the first category seen wins a tie
    let top_category = inputs
        .output
        .groups
        .get(REVENUE_BY_CATEGORY)
        .and_then(|categories| {
            categories
                .iter()
                .fold(None::<(&str, f64)>, |best, (category, stat)| match best {
                    Some((_, top)) if stat.sum <= top => best,
                    _ if stat.sum > 0.0 => Some((category, stat.sum)),
                    _ => best,
                })
        })
        .map(|(category, _)| category.to_string())
        .unwrap_or_else(|| NO_DATA.to_string());

    IndexMap::from([
        ("total_revenue".to_string(), KpiValue::from(revenue)),
        ("total_orders".to_string(), KpiValue::from(orders)),
        ("avg_basket".to_string(), KpiValue::from(avg_basket)),
        ("top_category".to_string(), KpiValue::from(top_category)),
    ])
}
