use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Align2, FontId, Mesh, Pos2, Sense, Shape, Ui, Vec2};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points};

use crate::color::{outcome_color, BoosterColorMap};
use crate::data::model::Outcome;
use crate::view::{FilteredScatterSet, OutcomeAggregation};

const PIE_HEIGHT: f32 = 260.0;
/// Hole radius as a fraction of the pie radius.
const DONUT_HOLE: f32 = 0.3;

// ---------------------------------------------------------------------------
// Outcome pie
// ---------------------------------------------------------------------------

/// Donut chart of the outcome aggregation, labelled with count and share.
pub fn outcome_pie(ui: &mut Ui, agg: &OutcomeAggregation) {
    ui.heading(&agg.title);

    let size = Vec2::new(ui.available_width(), PIE_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let text_color = ui.visuals().text_color();

    let total = agg.total();
    if total == 0 {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No launches in scope",
            FontId::proportional(16.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let center = rect.center();
    let radius = rect.width().min(rect.height()) * 0.45;
    let mut start = -FRAC_PI_2;
    let mut labels = Vec::new();

    for (&outcome, &count) in &agg.counts {
        let sweep = TAU * count as f32 / total as f32;
        painter.add(Shape::mesh(wedge(center, radius, start, sweep, outcome)));

        let mid = start + sweep / 2.0;
        let share = agg.share(outcome).unwrap_or(0.0);
        labels.push((polar(center, radius * 0.68, mid), format!("{count}\n{share:.1}%")));
        start += sweep;
    }

    painter.circle_filled(center, radius * DONUT_HOLE, ui.visuals().panel_fill);

    for (pos, text) in labels {
        painter.text(
            pos,
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(13.0),
            egui::Color32::WHITE,
        );
    }

    // Legend
    let mut y = rect.top() + 12.0;
    for outcome in Outcome::ALL.iter().rev() {
        let x = rect.right() - 110.0;
        painter.circle_filled(Pos2::new(x, y), 5.0, outcome_color(*outcome));
        painter.text(
            Pos2::new(x + 12.0, y),
            Align2::LEFT_CENTER,
            format!("{} ({})", outcome, outcome.label()),
            FontId::proportional(13.0),
            text_color,
        );
        y += 18.0;
    }
}

fn polar(center: Pos2, r: f32, angle: f32) -> Pos2 {
    center + Vec2::angled(angle) * r
}

/// Triangle fan covering one slice.
fn wedge(center: Pos2, radius: f32, start: f32, sweep: f32, outcome: Outcome) -> Mesh {
    let color = outcome_color(outcome);
    let segments = ((sweep / TAU) * 96.0).ceil().max(1.0) as u32;

    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);
    for i in 0..=segments {
        let angle = start + sweep * i as f32 / segments as f32;
        mesh.colored_vertex(polar(center, radius, angle), color);
    }
    for i in 1..=segments {
        mesh.add_triangle(0, i, i + 1);
    }
    mesh
}

// ---------------------------------------------------------------------------
// Payload vs. outcome scatter
// ---------------------------------------------------------------------------

/// Scatter of payload mass against outcome class, one series per booster
/// category.
pub fn payload_scatter(
    ui: &mut Ui,
    scatter: &FilteredScatterSet,
    colors: &BoosterColorMap,
    ceiling: f64,
) {
    ui.heading(&scatter.title);

    Plot::new("payload_scatter")
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("Launch Outcome")
        .include_x(0.0)
        .include_x(ceiling)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in scatter.series() {
                let xy: PlotPoints = points
                    .iter()
                    .map(|p| [p.payload_mass_kg, p.outcome.class() as f64])
                    .collect();

                plot_ui.points(
                    Points::new(xy)
                        .name(category)
                        .color(colors.color_for(category).gamma_multiply(0.8))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(5.0),
                );
            }
        });
}
