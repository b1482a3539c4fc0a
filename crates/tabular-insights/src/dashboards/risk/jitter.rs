use super::super::record::Record;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Largest accepted amplitude; scores are clamped to `0..=100` anyway.
pub const MAX_JITTER: f64 = 100.0;

/// Display noise added to risk scores before clamping.
///
/// `Seeded` derives the offset from the record identifier so repeated runs
/// over the same data produce the same scores.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Jitter {
    #[default]
    Off,
    Seeded {
        amplitude: f64,
        id_field: &'static str,
    },
}

impl Jitter {
    /// Non-positive or non-finite amplitudes disable jitter; larger ones are
    /// capped at [`MAX_JITTER`].
    pub fn seeded(amplitude: f64, id_field: &'static str) -> Self {
        if amplitude.is_finite() && amplitude > 0.0 {
            Self::Seeded {
                amplitude: amplitude.min(MAX_JITTER),
                id_field,
            }
        } else {
            Self::Off
        }
    }

    /// Uniform offset in `[-amplitude, amplitude]`; zero without an identifier.
    pub fn offset(&self, record: &Record) -> f64 {
        let Self::Seeded {
            amplitude,
            id_field,
        } = self
        else {
            return 0.0;
        };

        let Some(id) = record.identifier(id_field) else {
            return 0.0;
        };

        let mut rng = Pcg32::seed_from_u64(seed_for(id_field, &id));
        rng.random_range(-*amplitude..=*amplitude)
    }
}

fn seed_for(field: &str, id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    field.hash(&mut hasher);
    id.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_and_degenerate_amplitudes_add_nothing() {
        let record = Record::new().with("customerID", "0001");
        assert_eq!(Jitter::Off.offset(&record), 0.0);
        assert_eq!(Jitter::seeded(0.0, "customerID"), Jitter::Off);
        assert_eq!(Jitter::seeded(f64::NAN, "customerID"), Jitter::Off);
    }

    #[test]
    fn huge_amplitudes_are_capped() {
        let jitter = Jitter::seeded(1e308, "customerID");
        assert_eq!(
            jitter,
            Jitter::Seeded {
                amplitude: MAX_JITTER,
                id_field: "customerID"
            }
        );
        let offset = jitter.offset(&Record::new().with("customerID", "7590-VHVEG"));
        assert!((-MAX_JITTER..=MAX_JITTER).contains(&offset));
    }

    #[test]
    fn records_without_identifier_are_not_jittered() {
        let jitter = Jitter::seeded(5.0, "customerID");
        assert_eq!(jitter.offset(&Record::new().with("tenure", 3)), 0.0);
    }

    #[test]
    fn offset_is_stable_per_identifier() {
        let jitter = Jitter::seeded(5.0, "customerID");
        let record = Record::new().with("customerID", "7795-CFOCW");
        let offset = jitter.offset(&record);
        assert_eq!(offset, jitter.offset(&record.clone()));
        assert!((-5.0..=5.0).contains(&offset));
    }
}
