use std::fmt;

use super::model::{LaunchDataset, LaunchRecord};

/// Sentinel value the site selector uses for "every site".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Site selection
// ---------------------------------------------------------------------------

/// Either the "ALL" wildcard or one launch site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a raw selector value against the sites present in `dataset`.
    /// Returns `None` for a value that is neither "ALL" nor a known site.
    pub fn parse(raw: &str, dataset: &LaunchDataset) -> Option<Self> {
        if raw == ALL_SITES {
            Some(SiteSelection::All)
        } else if dataset.sites().contains(raw) {
            Some(SiteSelection::Site(raw.to_string()))
        } else {
            None
        }
    }

    /// Whether `record` falls inside this site scope.
    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => record.site == *site,
        }
    }

    /// Raw selector value ("ALL" or the site name).
    pub fn value(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(site) => site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => write!(f, "All Sites"),
            SiteSelection::Site(site) => write!(f, "{site}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload range
// ---------------------------------------------------------------------------

/// A closed payload interval `[low, high]` in kilograms.
///
/// Built only by [`PayloadRange::new`] or [`PayloadRange::full`], so
/// `0 <= low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    /// Validate an interval against the selectable ceiling.  The ends are
    /// never swapped: `low > high` is rejected.
    pub fn new(low: f64, high: f64, ceiling: f64) -> Option<Self> {
        let valid = low.is_finite()
            && high.is_finite()
            && low >= 0.0
            && low <= high
            && high <= ceiling;
        valid.then_some(PayloadRange { low, high })
    }

    /// `[0, ceiling]`, the default selection.
    pub fn full(ceiling: f64) -> Self {
        PayloadRange {
            low: 0.0,
            high: ceiling.max(0.0),
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Inclusive on both ends.
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] kg", self.low, self.high)
    }
}

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Records inside `site`, in load order.
pub fn site_scope<'a>(
    dataset: &'a LaunchDataset,
    site: &'a SiteSelection,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset.records().iter().filter(move |r| site.matches(r))
}

/// Records inside `range` and then inside `site`, in load order.
pub fn payload_scope<'a>(
    dataset: &'a LaunchDataset,
    site: &'a SiteSelection,
    range: PayloadRange,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |r| range.contains(r.payload_mass_kg))
        .filter(move |r| site.matches(r))
}
