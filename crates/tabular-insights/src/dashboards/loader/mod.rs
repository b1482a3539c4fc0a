mod parser;

use super::record::Record;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Decides whether a parsed CSV row is a real record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowGate {
    /// The field must hold a value (drops blank trailing lines).
    RequireField(&'static str),
    /// More than this many cells must be populated.
    MorePopulatedThan(usize),
    AcceptAll,
}

impl RowGate {
    pub fn admits(&self, record: &Record) -> bool {
        match self {
            Self::RequireField(field) => record.identifier(field).is_some(),
            Self::MorePopulatedThan(minimum) => record.populated() > *minimum,
            Self::AcceptAll => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub gate: RowGate,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            gate: RowGate::AcceptAll,
        }
    }
}

impl LoadOptions {
    pub fn with_gate(gate: RowGate) -> Self {
        Self {
            gate,
            ..Self::default()
        }
    }

    /// Tab-separated for `.tsv` files, comma otherwise.
    pub fn for_path(path: &Path, gate: RowGate) -> Self {
        let is_tsv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);

        Self {
            delimiter: if is_tsv { b'\t' } else { b',' },
            gate,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordLoadError {
    #[error("failed to read records: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// CSV source for dashboard records.
pub struct RecordLoader;

impl RecordLoader {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        gate: RowGate,
    ) -> Result<Vec<Record>, RecordLoadError> {
        let path = path.as_ref();
        let options = LoadOptions::for_path(path, gate);
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, &options)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        options: &LoadOptions,
    ) -> Result<Vec<Record>, RecordLoadError> {
        let (records, skipped) = parser::parse_records(reader, options.delimiter, &options.gate)?;
        debug!(loaded = records.len(), skipped, "parsed tabular records");
        Ok(records)
    }
}
