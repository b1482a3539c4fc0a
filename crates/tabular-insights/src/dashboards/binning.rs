//! Fixed bucket tables for continuous fields.
//!
//! Every table is a list of half-open `[lo, hi)` intervals followed by an
//! unbounded top bucket. Values under the first cut land in the first bucket
//! and a value sitting exactly on a cut belongs to the bucket above it.

/// Boundary table mapping a value to a bucket label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinTable {
    pub name: &'static str,
    cuts: &'static [(f64, &'static str)],
    top: &'static str,
}

impl BinTable {
    pub const fn new(
        name: &'static str,
        cuts: &'static [(f64, &'static str)],
        top: &'static str,
    ) -> Self {
        Self { name, cuts, top }
    }

    /// Non-finite input is treated as `0.0`, matching the record accessors.
    pub fn bin(&self, value: f64) -> &'static str {
        let value = if value.is_finite() { value } else { 0.0 };
        self.cuts
            .iter()
            .find(|(upper, _)| value < *upper)
            .map(|(_, label)| *label)
            .unwrap_or(self.top)
    }

    /// Bucket labels from lowest to highest.
    pub fn labels(&self) -> Vec<&'static str> {
        self.cuts
            .iter()
            .map(|(_, label)| *label)
            .chain(std::iter::once(self.top))
            .collect()
    }
}

pub const AGE_BANDS: BinTable = BinTable::new(
    "age_band",
    &[
        (25.0, "Under 25"),
        (30.0, "25-29"),
        (35.0, "30-34"),
        (40.0, "35-39"),
        (45.0, "40-44"),
        (50.0, "45-49"),
    ],
    "50+",
);

/// Tenure in months.
pub const TENURE_BANDS: BinTable = BinTable::new(
    "tenure_group",
    &[
        (7.0, "0-6 months"),
        (13.0, "7-12 months"),
        (25.0, "13-24 months"),
        (49.0, "25-48 months"),
    ],
    "49+ months",
);

/// Monthly income or salary.
pub const INCOME_BANDS: BinTable = BinTable::new(
    "income_band",
    &[
        (3_000.0, "Under 3K"),
        (6_000.0, "3K-6K"),
        (10_000.0, "6K-10K"),
        (15_000.0, "10K-15K"),
    ],
    "15K+",
);

pub fn age_band(age: f64) -> &'static str {
    AGE_BANDS.bin(age)
}

pub fn tenure_group(months: f64) -> &'static str {
    TENURE_BANDS.bin(months)
}

pub fn income_band(monthly_income: f64) -> &'static str {
    INCOME_BANDS.bin(monthly_income)
}
