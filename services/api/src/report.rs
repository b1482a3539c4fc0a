use crate::cli::DashboardArgs;
use std::io::{self, Write};
use tabular_insights::config::AppConfig;
use tabular_insights::dashboards::{
    DashboardKind, DashboardRequest, DashboardResponse, DashboardService, KpiValue,
};
use tabular_insights::error::AppError;
use tabular_insights::telemetry;
use tracing::info;

const GROUP_ROWS: usize = 8;

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let DashboardArgs {
        dashboard,
        csv,
        filters,
        risk_limit,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = DashboardService::new(config.dashboards.settings());

    let response = match csv {
        Some(path) => {
            info!(dashboard = %dashboard, path = %path.display(), "loading records");
            service.build_from_path(dashboard, &path, filters, risk_limit)?
        }
        None => service.build(
            dashboard,
            DashboardRequest {
                filters,
                risk_limit,
                ..DashboardRequest::default()
            },
        )?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &response)?;
        writeln!(out)?;
    } else {
        render_dashboard(&mut out, &response)?;
    }
    Ok(())
}

pub(crate) fn render_dashboard<W: Write>(
    out: &mut W,
    response: &DashboardResponse,
) -> io::Result<()> {
    let result = &response.result;
    writeln!(
        out,
        "{} dashboard ({} records, source: {:?})",
        result.dashboard_label, result.record_count, response.data_source
    )?;
    if let Some(warning) = &response.warning {
        writeln!(out, "warning: {warning}")?;
    }
    for filter in &response.filters {
        writeln!(out, "filter: {} = {}", filter.field, filter.value)?;
    }

    writeln!(out, "\nKPIs")?;
    for (name, value) in &result.kpis {
        writeln!(out, "- {}: {}", name, format_kpi(name, value))?;
    }

    for (dimension, entries) in &result.groups {
        writeln!(out, "\n{dimension}")?;
        if entries.is_empty() {
            writeln!(out, "  (no data)")?;
        }
        for entry in entries.iter().take(GROUP_ROWS) {
            write!(
                out,
                "  - {}: {}/{} ({:.1}%)",
                entry.label,
                entry.positive,
                entry.total,
                entry.rate * 100.0
            )?;
            if entry.sum != 0.0 {
                write!(out, " | {:.2}", entry.sum)?;
            }
            writeln!(out)?;
        }
        if entries.len() > GROUP_ROWS {
            writeln!(out, "  ... {} more", entries.len() - GROUP_ROWS)?;
        }
    }

    if !result.risk_list.is_empty() {
        let id_field = id_field(result.dashboard);
        writeln!(out, "\nRisk list")?;
        for entry in &result.risk_list {
            let id = id_field
                .and_then(|field| entry.record.identifier(field))
                .unwrap_or_else(|| "-".to_string());
            writeln!(out, "  - {}: {:.1} ({})", id, entry.score, entry.tier_label)?;
        }
    }
    Ok(())
}

fn id_field(kind: DashboardKind) -> Option<&'static str> {
    kind.definition().risk.map(|risk| risk.id_field)
}

fn format_kpi(name: &str, value: &KpiValue) -> String {
    match value {
        KpiValue::Text(text) => text.clone(),
        KpiValue::Number(number) if name.ends_with("_rate") => format!("{:.1}%", number * 100.0),
        KpiValue::Number(number) if number.fract() == 0.0 => format!("{number:.0}"),
        KpiValue::Number(number) => format!("{number:.2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabular_insights::dashboards::{DashboardSettings, FieldFilter, Record};

    fn telecom_response() -> DashboardResponse {
        let records = vec![
            Record::new()
                .with("customerID", "7590-VHVEG")
                .with("Contract", "Month-to-month")
                .with("tenure", 1_i64)
                .with("MonthlyCharges", 29.85)
                .with("Churn", "No"),
            Record::new()
                .with("customerID", "3668-QPYBK")
                .with("Contract", "Month-to-month")
                .with("tenure", 2_i64)
                .with("MonthlyCharges", 53.85)
                .with("Churn", "Yes"),
        ];
        DashboardService::new(DashboardSettings::default())
            .build(
                DashboardKind::Telecom,
                DashboardRequest {
                    records: Some(records),
                    filters: vec![FieldFilter::new("Contract", "Month-to-month")],
                    ..DashboardRequest::default()
                },
            )
            .expect("dashboard builds")
    }

    #[test]
    fn renders_kpis_groups_and_risk_list() {
        let mut out = Vec::new();
        render_dashboard(&mut out, &telecom_response()).expect("render succeeds");
        let text = String::from_utf8(out).expect("utf8 output");

        assert!(text.starts_with("Telecom Churn dashboard (2 records"));
        assert!(text.contains("filter: Contract = Month-to-month"));
        assert!(text.contains("- churn_rate: 50.0%"));
        assert!(text.contains("- total_customers: 2"));
        assert!(text.contains("  - Month-to-month: 1/2 (50.0%)"));
        assert!(text.contains("  - 7590-VHVEG:"));
        assert!(!text.contains("3668-QPYBK:"));
    }

    #[test]
    fn file_backed_run_reports_file_source() {
        let path = std::env::temp_dir().join(format!("report-telco-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "customerID,Contract,tenure,MonthlyCharges,Churn\n7590-VHVEG,Month-to-month,1,29.85,No\n",
        )
        .expect("write temp csv");
        let response = DashboardService::new(DashboardSettings::default())
            .build_from_path(DashboardKind::Telecom, &path, Vec::new(), None)
            .expect("dashboard builds");
        std::fs::remove_file(&path).ok();

        let mut out = Vec::new();
        render_dashboard(&mut out, &response).expect("render succeeds");
        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.starts_with("Telecom Churn dashboard (1 records, source: DataFile)"));
    }

    #[test]
    fn formats_kpi_values() {
        assert_eq!(format_kpi("churn_rate", &KpiValue::Number(0.2654)), "26.5%");
        assert_eq!(format_kpi("total_orders", &KpiValue::Number(12.0)), "12");
        assert_eq!(format_kpi("avg_basket", &KpiValue::Number(31.4567)), "31.46");
        assert_eq!(format_kpi("top_category", &KpiValue::from("Books")), "Books");
    }
}
