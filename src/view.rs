use std::collections::BTreeMap;

use crate::data::filter::{payload_scope, site_scope, PayloadRange, SiteSelection};
use crate::data::model::{LaunchDataset, Outcome};

// ---------------------------------------------------------------------------
// Outcome aggregation (pie view)
// ---------------------------------------------------------------------------

/// Launch counts per outcome class within a site scope.
///
/// Only classes that occur in scope have an entry in `counts`; use
/// [`OutcomeAggregation::count`] to read a class that may be absent.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeAggregation {
    pub scope: SiteSelection,
    pub counts: BTreeMap<Outcome, usize>,
    pub title: String,
}

impl OutcomeAggregation {
    pub fn count(&self, outcome: Outcome) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Number of launches in scope.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Percentage of in-scope launches with `outcome`; `None` when the scope is empty.
    pub fn share(&self, outcome: Outcome) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.count(outcome) as f64 * 100.0 / total as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Group the site-scoped launches by outcome class and count them.
pub fn derive_outcome_aggregation(
    dataset: &LaunchDataset,
    site: &SiteSelection,
) -> OutcomeAggregation {
    let mut counts = BTreeMap::new();
    for rec in site_scope(dataset, site) {
        *counts.entry(rec.outcome).or_insert(0) += 1;
    }

    let title = match site {
        SiteSelection::All => "Total Success Launches for All Sites".to_string(),
        SiteSelection::Site(name) => {
            format!("Total Success and Failure Launches for site {name}")
        }
    };

    OutcomeAggregation {
        scope: site.clone(),
        counts,
        title,
    }
}

// ---------------------------------------------------------------------------
// Filtered scatter set (payload vs. outcome view)
// ---------------------------------------------------------------------------

/// One plotted launch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub site: String,
    /// Colour partition key; never used for filtering.
    pub booster_category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredScatterSet {
    pub scope: SiteSelection,
    pub range: PayloadRange,
    /// Matching launches in load order.
    pub points: Vec<ScatterPoint>,
    pub title: String,
}

impl FilteredScatterSet {
    /// Points grouped by booster category, one series per colour.
    pub fn series(&self) -> BTreeMap<&str, Vec<&ScatterPoint>> {
        let mut series: BTreeMap<&str, Vec<&ScatterPoint>> = BTreeMap::new();
        for p in &self.points {
            series.entry(p.booster_category.as_str()).or_default().push(p);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Keep launches with `low <= payload <= high`, then narrow to `site`.
pub fn derive_filtered_scatter_set(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: PayloadRange,
) -> FilteredScatterSet {
    let points = payload_scope(dataset, site, range)
        .map(|rec| ScatterPoint {
            payload_mass_kg: rec.payload_mass_kg,
            outcome: rec.outcome,
            site: rec.site.clone(),
            booster_category: rec.booster_category.clone(),
        })
        .collect();

    let title = match site {
        SiteSelection::All => "Payload vs. Outcome for All Launch Sites".to_string(),
        SiteSelection::Site(name) => format!("Payload vs. Outcome for {name}"),
    };

    FilteredScatterSet {
        scope: site.clone(),
        range,
        points,
        title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{record, sample_dataset};

    fn full_range() -> PayloadRange {
        PayloadRange::new(0.0, 10000.0, 10000.0).unwrap()
    }

    #[test]
    fn all_sites_aggregation() {
        let ds = sample_dataset();
        let agg = derive_outcome_aggregation(&ds, &SiteSelection::All);
        assert_eq!(agg.count(Outcome::Success), 6);
        assert_eq!(agg.count(Outcome::Failure), 4);
        assert_eq!(agg.total(), ds.len());
        assert_eq!(agg.title, "Total Success Launches for All Sites");
    }

    #[test]
    fn single_site_aggregation_ignores_other_sites() {
        let ds = sample_dataset();
        let site = SiteSelection::Site("KSC LC-39A".into());
        let agg = derive_outcome_aggregation(&ds, &site);
        let expected: BTreeMap<Outcome, usize> =
            [(Outcome::Success, 2), (Outcome::Failure, 1)].into_iter().collect();
        assert_eq!(agg.counts, expected);
        assert_eq!(
            agg.title,
            "Total Success and Failure Launches for site KSC LC-39A"
        );
    }

    #[test]
    fn aggregation_counts_sum_to_scope_size() {
        let ds = sample_dataset();
        for site in ds.sites() {
            let scope = SiteSelection::Site(site.clone());
            let agg = derive_outcome_aggregation(&ds, &scope);
            let in_scope = ds.records().iter().filter(|r| &r.site == site).count();
            assert_eq!(agg.total(), in_scope, "site {site}");
        }
    }

    #[test]
    fn single_class_site_has_no_entry_for_missing_class() {
        let ds = sample_dataset();
        let agg = derive_outcome_aggregation(&ds, &SiteSelection::Site("CCAFS SLC-40".into()));
        assert_eq!(agg.count(Outcome::Success), 2);
        assert_eq!(agg.count(Outcome::Failure), 0);
        assert!(!agg.counts.contains_key(&Outcome::Failure));
        assert_eq!(agg.share(Outcome::Success), Some(100.0));
    }

    #[test]
    fn empty_scope_yields_empty_aggregation() {
        let ds = sample_dataset();
        let agg = derive_outcome_aggregation(&ds, &SiteSelection::Site("Boca Chica".into()));
        assert!(agg.is_empty());
        assert_eq!(agg.total(), 0);
        assert_eq!(agg.share(Outcome::Success), None);
    }

    #[test]
    fn shares_are_percentages() {
        let ds = sample_dataset();
        let agg = derive_outcome_aggregation(&ds, &SiteSelection::All);
        assert_eq!(agg.share(Outcome::Success), Some(60.0));
        assert_eq!(agg.share(Outcome::Failure), Some(40.0));
    }

    #[test]
    fn scatter_respects_range_and_site() {
        let ds = sample_dataset();
        let range = PayloadRange::new(2000.0, 6000.0, 10000.0).unwrap();

        let set = derive_filtered_scatter_set(&ds, &SiteSelection::All, range);
        assert!(set
            .points
            .iter()
            .all(|p| (2000.0..=6000.0).contains(&p.payload_mass_kg)));
        assert_eq!(set.len(), 6);
        assert_eq!(set.title, "Payload vs. Outcome for All Launch Sites");

        let site = SiteSelection::Site("CCAFS LC-40".into());
        let set = derive_filtered_scatter_set(&ds, &site, range);
        assert_eq!(set.len(), 1);
        assert!(set.points.iter().all(|p| p.site == "CCAFS LC-40"));
        assert_eq!(set.title, "Payload vs. Outcome for CCAFS LC-40");
    }

    #[test]
    fn scatter_includes_boundary_payloads() {
        let ds = sample_dataset();
        let range = PayloadRange::new(525.0, 2000.0, 10000.0).unwrap();
        let payloads: Vec<f64> = derive_filtered_scatter_set(&ds, &SiteSelection::All, range)
            .points
            .iter()
            .map(|p| p.payload_mass_kg)
            .collect();
        assert_eq!(payloads, vec![525.0, 2000.0]);
    }

    #[test]
    fn scatter_preserves_load_order_and_tags_booster() {
        let ds = LaunchDataset::from_records(vec![
            record("A", 300.0, 1, "FT"),
            record("B", 100.0, 0, "v1.0"),
            record("A", 200.0, 1, "B5"),
        ])
        .unwrap();
        let set = derive_filtered_scatter_set(&ds, &SiteSelection::All, full_range());
        let order: Vec<(f64, &str)> = set
            .points
            .iter()
            .map(|p| (p.payload_mass_kg, p.booster_category.as_str()))
            .collect();
        assert_eq!(order, vec![(300.0, "FT"), (100.0, "v1.0"), (200.0, "B5")]);

        let series = set.series();
        assert_eq!(series.keys().copied().collect::<Vec<_>>(), vec!["B5", "FT", "v1.0"]);
    }

    #[test]
    fn derivations_are_idempotent() {
        let ds = sample_dataset();
        let site = SiteSelection::Site("VAFB SLC-4E".into());
        let range = PayloadRange::new(0.0, 9600.0, 10000.0).unwrap();
        assert_eq!(
            derive_outcome_aggregation(&ds, &site),
            derive_outcome_aggregation(&ds, &site)
        );
        assert_eq!(
            derive_filtered_scatter_set(&ds, &site, range),
            derive_filtered_scatter_set(&ds, &site, range)
        );
    }
}
