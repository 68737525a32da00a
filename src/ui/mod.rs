//! egui front end: control panels feed [`crate::state::InputEvent`]s in,
//! plots render the derived views out.

pub mod panels;
pub mod plot;
