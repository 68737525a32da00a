use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Outcome;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed slice colours for the outcome pie.
pub fn outcome_color(outcome: Outcome) -> Color32 {
    match outcome {
        Outcome::Success => Color32::from_rgb(99, 110, 250),
        Outcome::Failure => Color32::from_rgb(239, 85, 59),
    }
}

// ---------------------------------------------------------------------------
// Booster colour map: category → Color32
// ---------------------------------------------------------------------------

/// Maps every booster category in the dataset to a distinct colour.
///
/// Built from the whole dataset, not the filtered view, so a category keeps
/// its colour while the filters change.
#[derive(Debug, Clone)]
pub struct BoosterColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl BoosterColorMap {
    pub fn new(categories: &BTreeSet<String>) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories.iter().cloned().zip(palette).collect();

        BoosterColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a booster category.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (category → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(&str, Color32)> {
        self.mapping.iter().map(|(k, c)| (k.as_str(), *c)).collect()
    }
}
