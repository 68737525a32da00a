use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::color::BoosterColorMap;
use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::loader::{load_file, LoadError};
use crate::data::model::LaunchDataset;
use crate::view::{
    derive_filtered_scatter_set, derive_outcome_aggregation, FilteredScatterSet,
    OutcomeAggregation,
};

// ---------------------------------------------------------------------------
// Input state and events
// ---------------------------------------------------------------------------

/// A complete, validated snapshot of both input controls.
///
/// Replaced as a whole on every accepted event, never patched field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

/// Events emitted by the two input controls.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    SiteChanged(String),
    PayloadRangeChanged { low: f64, high: f64 },
}

/// The two derived views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    OutcomeAggregation,
    FilteredScatter,
}

impl InputEvent {
    /// Dispatch table: the views an event invalidates.  The aggregation only
    /// depends on the site, the scatter on both inputs.
    pub fn affected_views(&self) -> &'static [ViewKind] {
        match self {
            InputEvent::SiteChanged(_) => &[ViewKind::OutcomeAggregation, ViewKind::FilteredScatter],
            InputEvent::PayloadRangeChanged { .. } => &[ViewKind::FilteredScatter],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("invalid payload range [{low}, {high}]: expected 0 <= low <= high <= {ceiling}")]
    InvalidInputRange { low: f64, high: f64, ceiling: f64 },
    #[error("unknown launch site '{0}'")]
    UnknownSiteSelection(String),
}

// ---------------------------------------------------------------------------
// Dashboard: one session over one dataset
// ---------------------------------------------------------------------------

/// Owns the input state and both derived views for a single dataset.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<LaunchDataset>,
    ceiling: f64,
    input: InputState,
    aggregation: OutcomeAggregation,
    scatter: FilteredScatterSet,
}

impl Dashboard {
    /// Start with every site selected and the full `[0, ceiling]` payload range.
    pub fn new(dataset: Arc<LaunchDataset>, slider_step: f64) -> Self {
        let ceiling = dataset.range_ceiling(slider_step);
        let input = InputState {
            site: SiteSelection::All,
            payload: PayloadRange::full(ceiling),
        };
        let aggregation = derive_outcome_aggregation(&dataset, &input.site);
        let scatter = derive_filtered_scatter_set(&dataset, &input.site, input.payload);

        Dashboard {
            dataset,
            ceiling,
            input,
            aggregation,
            scatter,
        }
    }

    pub fn dataset(&self) -> &LaunchDataset {
        &self.dataset
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Largest selectable payload.
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn aggregation(&self) -> &OutcomeAggregation {
        &self.aggregation
    }

    pub fn scatter(&self) -> &FilteredScatterSet {
        &self.scatter
    }

    /// Validate `event` into the next input state without applying it.
    pub fn validate(&self, event: &InputEvent) -> Result<InputState, InputError> {
        match event {
            InputEvent::SiteChanged(raw) => {
                let site = SiteSelection::parse(raw, &self.dataset)
                    .ok_or_else(|| InputError::UnknownSiteSelection(raw.clone()))?;
                Ok(InputState {
                    site,
                    payload: self.input.payload,
                })
            }
            InputEvent::PayloadRangeChanged { low, high } => {
                let payload = PayloadRange::new(*low, *high, self.ceiling).ok_or(
                    InputError::InvalidInputRange {
                        low: *low,
                        high: *high,
                        ceiling: self.ceiling,
                    },
                )?;
                Ok(InputState {
                    site: self.input.site.clone(),
                    payload,
                })
            }
        }
    }

    /// Apply one input event.  A rejected event leaves the input state and
    /// both views untouched; an accepted one returns the views it recomputed.
    pub fn dispatch(&mut self, event: &InputEvent) -> Result<&'static [ViewKind], InputError> {
        let next = self.validate(event)?;
        let views = event.affected_views();

        for view in views {
            match view {
                ViewKind::OutcomeAggregation => {
                    self.aggregation = derive_outcome_aggregation(&self.dataset, &next.site);
                }
                ViewKind::FilteredScatter => {
                    self.scatter =
                        derive_filtered_scatter_set(&self.dataset, &next.site, next.payload);
                }
            }
        }
        log::debug!("{event:?} -> {next:?}, recomputed {views:?}");
        self.input = next;
        Ok(views)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub dashboard: Dashboard,

    /// Booster category colours for the loaded dataset.
    pub colors: BoosterColorMap,

    /// File the current dataset came from.
    pub source: PathBuf,

    pub slider_step: f64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: LaunchDataset, source: PathBuf, slider_step: f64) -> Self {
        let colors = BoosterColorMap::new(dataset.booster_categories());
        Self {
            dashboard: Dashboard::new(Arc::new(dataset), slider_step),
            colors,
            source,
            slider_step,
            status_message: None,
        }
    }

    /// Forward a control event; rejections become the status message.
    pub fn handle(&mut self, event: InputEvent) {
        match self.dashboard.dispatch(&event) {
            Ok(_) => self.status_message = None,
            Err(e) => {
                log::warn!("Rejected {event:?}: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Replace the dataset and reset the inputs to their defaults.  On
    /// failure the current dataset stays loaded.
    pub fn load_dataset(&mut self, path: &Path) -> Result<(), LoadError> {
        match load_file(path) {
            Ok(dataset) => {
                *self = AppState::new(dataset, path.to_path_buf(), self.slider_step);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{sample_dataset, Outcome};

    fn dashboard() -> Dashboard {
        Dashboard::new(Arc::new(sample_dataset()), 1000.0)
    }

    fn range(low: f64, high: f64) -> InputEvent {
        InputEvent::PayloadRangeChanged { low, high }
    }

    #[test]
    fn defaults_cover_everything() {
        let d = dashboard();
        assert_eq!(d.input().site, SiteSelection::All);
        assert_eq!(d.ceiling(), 10000.0);
        assert_eq!(d.input().payload.low(), 0.0);
        assert_eq!(d.input().payload.high(), 10000.0);
        assert_eq!(d.aggregation().total(), 10);
        assert_eq!(d.scatter().len(), 10);
    }

    #[test]
    fn site_change_recomputes_both_views() {
        let mut d = dashboard();
        let views = d
            .dispatch(&InputEvent::SiteChanged("KSC LC-39A".into()))
            .unwrap();
        assert_eq!(views, &[ViewKind::OutcomeAggregation, ViewKind::FilteredScatter]);
        assert_eq!(d.aggregation().count(Outcome::Success), 2);
        assert_eq!(d.aggregation().count(Outcome::Failure), 1);
        assert_eq!(d.scatter().len(), 3);
    }

    #[test]
    fn range_change_only_recomputes_scatter() {
        let mut d = dashboard();
        let before = d.aggregation().clone();
        let views = d.dispatch(&range(2000.0, 6000.0)).unwrap();
        assert_eq!(views, &[ViewKind::FilteredScatter]);
        assert_eq!(d.aggregation(), &before);
        assert!(d
            .scatter()
            .points
            .iter()
            .all(|p| p.payload_mass_kg >= 2000.0 && p.payload_mass_kg <= 6000.0));
    }

    #[test]
    fn inverted_range_is_rejected_and_state_kept() {
        let mut d = dashboard();
        d.dispatch(&range(1000.0, 9000.0)).unwrap();
        let input = d.input().clone();
        let scatter = d.scatter().clone();

        let err = d.dispatch(&range(6000.0, 2000.0)).unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidInputRange {
                low: 6000.0,
                high: 2000.0,
                ceiling: 10000.0
            }
        );
        assert_eq!(d.input(), &input);
        assert_eq!(d.scatter(), &scatter);
    }

    #[test]
    fn out_of_bounds_range_is_rejected() {
        let mut d = dashboard();
        assert!(d.dispatch(&range(-100.0, 500.0)).is_err());
        assert!(d.dispatch(&range(0.0, 10000.5)).is_err());
        assert_eq!(d.input().payload.high(), 10000.0);
    }

    #[test]
    fn unknown_site_is_rejected() {
        let mut d = dashboard();
        d.dispatch(&InputEvent::SiteChanged("VAFB SLC-4E".into()))
            .unwrap();
        let err = d
            .dispatch(&InputEvent::SiteChanged("Boca Chica".into()))
            .unwrap_err();
        assert_eq!(err, InputError::UnknownSiteSelection("Boca Chica".into()));
        assert_eq!(d.input().site, SiteSelection::Site("VAFB SLC-4E".into()));
        assert_eq!(d.aggregation().total(), 2);
    }

    #[test]
    fn site_and_range_combine() {
        let mut d = dashboard();
        d.dispatch(&range(2000.0, 6000.0)).unwrap();
        d.dispatch(&InputEvent::SiteChanged("CCAFS SLC-40".into()))
            .unwrap();
        assert_eq!(d.scatter().len(), 2);
        assert_eq!(d.input().payload.low(), 2000.0);

        // back to ALL keeps the range
        d.dispatch(&InputEvent::SiteChanged("ALL".into())).unwrap();
        assert_eq!(d.scatter().len(), 6);
        assert_eq!(d.aggregation().total(), 10);
    }

    #[test]
    fn range_with_no_launches_for_site() {
        let mut d = dashboard();
        d.dispatch(&InputEvent::SiteChanged("VAFB SLC-4E".into()))
            .unwrap();
        d.dispatch(&range(1000.0, 2000.0)).unwrap();
        assert!(d.scatter().is_empty());
    }

    #[test]
    fn app_state_reports_rejections() {
        let mut app = AppState::new(sample_dataset(), PathBuf::from("sample.csv"), 1000.0);
        app.handle(range(6000.0, 2000.0));
        assert!(app.status_message.is_some());
        app.handle(range(2000.0, 6000.0));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn fractional_step_keeps_heaviest_launch_selectable() {
        use crate::data::model::record;

        let ds = LaunchDataset::from_records(vec![
            record("A", 100.0, 1, "FT"),
            record("A", 923.1, 0, "FT"),
        ])
        .unwrap();
        let mut d = Dashboard::new(Arc::new(ds), 0.3);
        assert!(d.ceiling() >= 923.1);
        assert_eq!(d.scatter().len(), 2);
        assert!(d.dispatch(&range(0.0, 923.1)).is_ok());
        assert_eq!(d.scatter().len(), 2);
    }

    #[test]
    fn failed_reload_keeps_current_dataset() {
        let mut app = AppState::new(sample_dataset(), PathBuf::from("sample.csv"), 1000.0);
        app.handle(InputEvent::SiteChanged("KSC LC-39A".into()));

        let dir = tempfile::tempdir().unwrap();
        assert!(app.load_dataset(&dir.path().join("absent.csv")).is_err());
        assert_eq!(app.dashboard.dataset().len(), 10);
        assert_eq!(app.source, PathBuf::from("sample.csv"));
        assert_eq!(
            app.dashboard.input().site,
            SiteSelection::Site("KSC LC-39A".into())
        );
        assert!(app.status_message.is_some());
    }

    #[test]
    fn reload_resets_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launches.csv");
        std::fs::write(
            &path,
            "Launch Site,Payload Mass (kg),class,Booster Version Category\n\
             Omelek,180,1,F1\n",
        )
        .unwrap();

        let mut app = AppState::new(sample_dataset(), PathBuf::from("sample.csv"), 1000.0);
        app.handle(InputEvent::SiteChanged("KSC LC-39A".into()));
        app.load_dataset(&path).unwrap();

        assert_eq!(app.dashboard.input().site, SiteSelection::All);
        assert_eq!(app.dashboard.ceiling(), 1000.0);
        assert_eq!(app.source, path);
        assert!(app.dashboard.dataset().sites().contains("Omelek"));
    }
}
