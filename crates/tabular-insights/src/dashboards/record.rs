use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label substituted whenever a categorical field is missing or blank.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A single cell of a tabular record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Missing,
}

impl FieldValue {
    /// Infers the cell type the way the CSV loader does: blank cells are
    /// missing, finite numbers are numeric, everything else stays text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Number(value),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            Self::Text(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Flat field-name to value mapping, one per entity. Column order is kept.
///
/// All field reads go through the accessors below so that default
/// substitution lives in one place: numeric reads fall back to `0.0` and
/// categorical reads fall back to [`UNKNOWN_LABEL`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Count of cells holding an actual value.
    pub fn populated(&self) -> usize {
        self.fields
            .values()
            .filter(|value| !matches!(value, FieldValue::Missing))
            .count()
    }

    /// Numeric read; malformed, missing and non-finite values coerce to `0.0`.
    pub fn number(&self, field: &str) -> f64 {
        self.get(field)
            .and_then(FieldValue::as_number)
            .unwrap_or(0.0)
    }

    /// Categorical read; missing or blank values become [`UNKNOWN_LABEL`].
    pub fn category(&self, field: &str) -> String {
        match self.get(field) {
            Some(FieldValue::Text(raw)) if !raw.trim().is_empty() => raw.trim().to_string(),
            Some(FieldValue::Number(value)) if value.is_finite() => format_number(*value),
            _ => UNKNOWN_LABEL.to_string(),
        }
    }

    /// Grouping key; like [`Record::category`] but a numeric zero also reads
    /// as [`UNKNOWN_LABEL`].
    pub fn dimension_key(&self, field: &str) -> String {
        match self.get(field) {
            Some(FieldValue::Number(value)) if *value == 0.0 => UNKNOWN_LABEL.to_string(),
            _ => self.category(field),
        }
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.get(field) {
            Some(FieldValue::Text(raw)) => Some(raw.trim()).filter(|value| !value.is_empty()),
            _ => None,
        }
    }

    pub fn is_yes(&self, field: &str) -> bool {
        self.text(field) == Some("Yes")
    }

    /// Identifier used for seeding; numeric ids are rendered like categories.
    pub fn identifier(&self, field: &str) -> Option<String> {
        match self.get(field) {
            Some(FieldValue::Missing) | None => None,
            Some(_) => Some(self.category(field)).filter(|id| id != UNKNOWN_LABEL),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_distinguishes_numbers_text_and_blanks() {
        assert_eq!(FieldValue::infer(" 42 "), FieldValue::Number(42.0));
        assert_eq!(FieldValue::infer("29.85"), FieldValue::Number(29.85));
        assert_eq!(FieldValue::infer("Yes"), FieldValue::Text("Yes".into()));
        assert_eq!(FieldValue::infer("   "), FieldValue::Missing);
        assert_eq!(FieldValue::infer("NaN"), FieldValue::Text("NaN".into()));
    }

    #[test]
    fn numeric_reads_coerce_malformed_values_to_zero() {
        let record = Record::new()
            .with("Age", 41)
            .with("MonthlyCharges", "70.35")
            .with("TotalCharges", "n/a")
            .with("Tenure", FieldValue::Missing);

        assert_eq!(record.number("Age"), 41.0);
        assert_eq!(record.number("MonthlyCharges"), 70.35);
        assert_eq!(record.number("TotalCharges"), 0.0);
        assert_eq!(record.number("Tenure"), 0.0);
        assert_eq!(record.number("Absent"), 0.0);
    }

    #[test]
    fn categorical_reads_substitute_unknown() {
        let record = Record::new()
            .with("Department", "  Sales ")
            .with("JobRole", "")
            .with("JobLevel", 2)
            .with("Rate", 0.5)
            .with("Gender", FieldValue::Missing);

        assert_eq!(record.category("Department"), "Sales");
        assert_eq!(record.category("JobRole"), UNKNOWN_LABEL);
        assert_eq!(record.category("JobLevel"), "2");
        assert_eq!(record.category("Rate"), "0.5");
        assert_eq!(record.category("Gender"), UNKNOWN_LABEL);
        assert_eq!(record.category("Absent"), UNKNOWN_LABEL);
    }

    #[test]
    fn dimension_keys_treat_zero_as_unknown() {
        let record = Record::new()
            .with("SeniorCitizen", 0)
            .with("JobLevel", 2)
            .with("Contract", "Two year");

        assert_eq!(record.dimension_key("SeniorCitizen"), UNKNOWN_LABEL);
        assert_eq!(record.category("SeniorCitizen"), "0");
        assert_eq!(record.dimension_key("JobLevel"), "2");
        assert_eq!(record.dimension_key("Contract"), "Two year");
        assert_eq!(record.dimension_key("Absent"), UNKNOWN_LABEL);
    }

    #[test]
    fn identifier_skips_missing_values() {
        let record = Record::new()
            .with("customerID", "7590-VHVEG")
            .with("EmployeeNumber", 17)
            .with("Blank", FieldValue::Missing);

        assert_eq!(record.identifier("customerID").as_deref(), Some("7590-VHVEG"));
        assert_eq!(record.identifier("EmployeeNumber").as_deref(), Some("17"));
        assert!(record.identifier("Blank").is_none());
    }

    #[test]
    fn serializes_as_flat_json_object() {
        let record = Record::new()
            .with("Churn", "No")
            .with("tenure", 12)
            .with("TotalCharges", FieldValue::Missing);
        let json = serde_json::to_value(&record).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({ "Churn": "No", "tenure": 12.0, "TotalCharges": null })
        );

        let back: Record = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, record);
    }
}
