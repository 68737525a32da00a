use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Outcome – binary mission outcome class
// ---------------------------------------------------------------------------

/// Mission outcome as stored in the `class` column (0 = failure, 1 = success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Both classes in ascending class-code order.
    pub const ALL: [Outcome; 2] = [Outcome::Failure, Outcome::Success];

    /// Interpret a class code.  Anything other than 0 / 1 is rejected.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Outcome::Failure),
            1 => Some(Outcome::Success),
            _ => None,
        }
    }

    /// The numeric class code (0 or 1).
    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Failure => "Failure",
            Outcome::Success => "Success",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the launch table
// ---------------------------------------------------------------------------

/// A single historical launch, validated at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    /// Launch site identifier, e.g. `KSC LC-39A`.
    pub site: String,
    /// Payload mass in kilograms (finite, non-negative).
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    /// Display-only category used to colour scatter points.
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the immutable, loaded table
// ---------------------------------------------------------------------------

/// The full launch table plus indices computed once at construction.
///
/// Never mutated after construction; share it behind an `Arc` when several
/// owners need it.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    sites: BTreeSet<String>,
    booster_categories: BTreeSet<String>,
    min_payload: f64,
    max_payload: f64,
}

impl LaunchDataset {
    /// Build the site / booster indices and payload bounds.
    ///
    /// Returns `None` for an empty record list, which has no bounds.
    pub fn from_records(records: Vec<LaunchRecord>) -> Option<Self> {
        let first = records.first()?;
        let mut min_payload = first.payload_mass_kg;
        let mut max_payload = first.payload_mass_kg;
        let mut sites = BTreeSet::new();
        let mut booster_categories = BTreeSet::new();

        for rec in &records {
            min_payload = min_payload.min(rec.payload_mass_kg);
            max_payload = max_payload.max(rec.payload_mass_kg);
            sites.insert(rec.site.clone());
            booster_categories.insert(rec.booster_category.clone());
        }

        Some(LaunchDataset {
            records,
            sites,
            booster_categories,
            min_payload,
            max_payload,
        })
    }

    /// All records in load order.
    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// `(min, max)` payload mass over the whole table.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min_payload, self.max_payload)
    }

    /// Distinct launch sites present in the data.
    pub fn sites(&self) -> &BTreeSet<String> {
        &self.sites
    }

    pub fn booster_categories(&self) -> &BTreeSet<String> {
        &self.booster_categories
    }

    /// Upper end of the selectable payload range: the maximum payload rounded
    /// up to a whole number of slider steps.  Never below the maximum payload,
    /// which fractional steps can otherwise undershoot by a rounding error.
    pub fn range_ceiling(&self, step: f64) -> f64 {
        if step > 0.0 {
            ((self.max_payload / step).ceil() * step).max(self.max_payload)
        } else {
            self.max_payload
        }
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[cfg(test)]
pub fn record(site: &str, payload_mass_kg: f64, class: i64, booster: &str) -> LaunchRecord {
    LaunchRecord {
        site: site.to_string(),
        payload_mass_kg,
        outcome: Outcome::from_class(class).expect("fixture class must be 0 or 1"),
        booster_category: booster.to_string(),
    }
}

/// Ten launches across four sites, 6 successes and 4 failures.
/// `KSC LC-39A` has exactly 3 launches (2 successes, 1 failure).
#[cfg(test)]
pub fn sample_dataset() -> LaunchDataset {
    LaunchDataset::from_records(vec![
        record("CCAFS LC-40", 0.0, 0, "v1.0"),
        record("CCAFS LC-40", 525.0, 0, "v1.0"),
        record("CCAFS LC-40", 2000.0, 1, "v1.1"),
        record("VAFB SLC-4E", 500.0, 0, "v1.1"),
        record("VAFB SLC-4E", 9600.0, 1, "FT"),
        record("KSC LC-39A", 2490.0, 1, "FT"),
        record("KSC LC-39A", 5300.0, 1, "B4"),
        record("KSC LC-39A", 6000.0, 0, "FT"),
        record("CCAFS SLC-40", 4600.0, 1, "B5"),
        record("CCAFS SLC-40", 3669.0, 1, "FT"),
    ])
    .expect("fixture is not empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_class_codes() {
        assert_eq!(Outcome::from_class(0), Some(Outcome::Failure));
        assert_eq!(Outcome::from_class(1), Some(Outcome::Success));
        assert_eq!(Outcome::from_class(2), None);
        assert_eq!(Outcome::from_class(-1), None);
        assert_eq!(Outcome::Success.class(), 1);
        assert_eq!(Outcome::Failure.to_string(), "0");
    }

    #[test]
    fn bounds_cover_all_payloads() {
        let ds = sample_dataset();
        assert_eq!(ds.bounds(), (0.0, 9600.0));
        assert_eq!(ds.len(), 10);
        assert!(!ds.is_empty());
    }

    #[test]
    fn sites_are_derived_from_data() {
        let ds = LaunchDataset::from_records(vec![
            record("Omelek", 180.0, 1, "F1"),
            record("Omelek", 165.0, 0, "F1"),
        ])
        .unwrap();
        let sites: Vec<&str> = ds.sites().iter().map(String::as_str).collect();
        assert_eq!(sites, vec!["Omelek"]);

        let ds = sample_dataset();
        assert_eq!(ds.sites().len(), 4);
        assert!(ds.sites().contains("CCAFS SLC-40"));
        assert_eq!(ds.booster_categories().len(), 5);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        assert!(LaunchDataset::from_records(Vec::new()).is_none());
    }

    #[test]
    fn ceiling_rounds_up_to_step() {
        let ds = sample_dataset();
        assert_eq!(ds.range_ceiling(1000.0), 10000.0);
        assert_eq!(ds.range_ceiling(100.0), 9600.0);
        assert_eq!(ds.range_ceiling(0.0), 9600.0);
    }

    #[test]
    fn fractional_step_ceiling_covers_max_payload() {
        let ds = LaunchDataset::from_records(vec![
            record("A", 100.0, 1, "FT"),
            record("A", 923.1, 0, "FT"),
        ])
        .unwrap();
        assert!(ds.range_ceiling(0.3) >= 923.1);
        assert!(ds.range_ceiling(0.7) >= 923.1);
    }

    #[test]
    fn ceiling_never_below_max_payload() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let max = rng.gen_range(0.0..20_000.0);
            let ds = LaunchDataset::from_records(vec![record("A", max, 1, "FT")]).unwrap();
            for step in [0.3, 0.7, 25.5, 1000.0] {
                let ceiling = ds.range_ceiling(step);
                assert!(ceiling >= ds.bounds().1, "max {max}, step {step}, ceiling {ceiling}");
                assert!(ceiling < max + step + 1e-6, "max {max}, step {step}, ceiling {ceiling}");
            }
        }
    }
}
