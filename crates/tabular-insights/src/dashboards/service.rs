use super::assembler::views::DashboardResult;
use super::assembler::{assemble, AssemblyOptions};
use super::definitions::DashboardKind;
use super::filter::{apply_filters, FieldFilter};
use super::loader::{LoadOptions, RecordLoadError, RecordLoader};
use super::record::Record;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where dashboard data files live and how results are presented.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub data_dir: PathBuf,
    pub risk_limit: usize,
    pub jitter_amplitude: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            risk_limit: 10,
            jitter_amplitude: 0.0,
        }
    }
}

/// Inline data and filters for one dashboard computation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardRequest {
    /// Parsed records; take precedence over `csv`.
    #[serde(default)]
    pub records: Option<Vec<Record>>,
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
    #[serde(default)]
    pub risk_limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Inline,
    Csv,
    DataFile,
    /// The data file could not be loaded; the dashboard is empty.
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub data_source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FieldFilter>,
    #[serde(flatten)]
    pub result: DashboardResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardListing {
    pub dashboard: DashboardKind,
    pub label: &'static str,
    pub data_file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardServiceError {
    #[error("could not load {dashboard} records: {source}")]
    Load {
        dashboard: DashboardKind,
        #[source]
        source: RecordLoadError,
    },
}

/// Loads, filters and assembles dashboards. Holds configuration only; every
/// call recomputes from its own records.
#[derive(Debug, Clone, Default)]
pub struct DashboardService {
    settings: DashboardSettings,
}

impl DashboardService {
    pub fn new(settings: DashboardSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn data_path(&self, kind: DashboardKind) -> PathBuf {
        self.settings.data_dir.join(kind.data_file())
    }

    pub fn listings(&self) -> Vec<DashboardListing> {
        DashboardKind::ordered()
            .into_iter()
            .map(|kind| DashboardListing {
                dashboard: kind,
                label: kind.label(),
                data_file: self.data_path(kind),
            })
            .collect()
    }

    pub fn load_file(&self, kind: DashboardKind) -> Result<Vec<Record>, RecordLoadError> {
        load_path(&self.data_path(kind), kind)
    }

    pub fn build(
        &self,
        kind: DashboardKind,
        request: DashboardRequest,
    ) -> Result<DashboardResponse, DashboardServiceError> {
        let DashboardRequest {
            records,
            csv,
            filters,
            risk_limit,
        } = request;

        let (records, data_source, warning) = match (records, csv) {
            (Some(records), _) => (records, DataSource::Inline, None),
            (None, Some(csv)) => {
                let options = LoadOptions::with_gate(kind.row_gate());
                let records = RecordLoader::from_reader(Cursor::new(csv.into_bytes()), &options)
                    .map_err(|source| DashboardServiceError::Load {
                        dashboard: kind,
                        source,
                    })?;
                (records, DataSource::Csv, None)
            }
            (None, None) => match self.load_file(kind) {
                Ok(records) => (records, DataSource::DataFile, None),
                Err(err) => {
                    let path = self.data_path(kind);
                    warn!(dashboard = %kind, path = %path.display(), error = %err, "dashboard data unavailable, serving empty dashboard");
                    (
                        Vec::new(),
                        DataSource::Unavailable,
                        Some(format!("{}: {err}", path.display())),
                    )
                }
            },
        };

        Ok(self.respond(kind, records, data_source, warning, filters, risk_limit))
    }

    /// Builds from a CSV file outside the data directory. Unlike the default
    /// data file, a file that cannot be read is an error.
    pub fn build_from_path(
        &self,
        kind: DashboardKind,
        path: &Path,
        filters: Vec<FieldFilter>,
        risk_limit: Option<usize>,
    ) -> Result<DashboardResponse, DashboardServiceError> {
        let records = load_path(path, kind).map_err(|source| DashboardServiceError::Load {
            dashboard: kind,
            source,
        })?;
        Ok(self.respond(kind, records, DataSource::DataFile, None, filters, risk_limit))
    }

    fn respond(
        &self,
        kind: DashboardKind,
        records: Vec<Record>,
        data_source: DataSource,
        warning: Option<String>,
        filters: Vec<FieldFilter>,
        risk_limit: Option<usize>,
    ) -> DashboardResponse {
        let records = if filters.is_empty() {
            records
        } else {
            apply_filters(&records, &filters)
        };

        let options = AssemblyOptions {
            risk_limit: risk_limit.unwrap_or(self.settings.risk_limit),
            jitter_amplitude: self.settings.jitter_amplitude,
        };
        let result = assemble(&kind.definition(), &records, &options);

        info!(
            dashboard = %kind,
            ?data_source,
            records = result.record_count,
            filters = filters.len(),
            "dashboard computed"
        );

        DashboardResponse {
            data_source,
            warning,
            filters,
            result,
        }
    }
}

fn load_path(path: &Path, kind: DashboardKind) -> Result<Vec<Record>, RecordLoadError> {
    RecordLoader::from_path(path, kind.row_gate())
}
