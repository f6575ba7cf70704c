//! Frame Renderer (C7).
//!
//! Converts the field planes into a W·H·3 RGB image in `Simulation::image`,
//! then overlays the aggregated boundary mask in black. Grounded on the
//! teacher's `fdtd.rs` visualization helpers and the original C header's
//! `VisualizationFunction` enum (`VIS_TE_LIN_EZ_RGB`, `VIS_TE_SQR_RGB`), of
//! which only the two the spec concretely defines (TE-1, TE-2) are built —
//! see `SPEC_FULL.md` §10 for why the other three named variants are not
//! invented here.

use crate::grid::Simulation;

/// Diverging-colormap bounds for TE-1.
const EZ_MIN: f32 = -10.0;
const EZ_MAX: f32 = 100.0;

/// Squared-magnitude bounds for TE-2.
const MIN_FIELD: f32 = 0.0;
const MAX_FIELD: f32 = 100.0;

/// Which colormap the renderer applies this frame. The Controller cycles
/// through variants on command; a future third variant slots in here
/// without touching the cycling logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visualization {
    /// Diverging colormap driven by signed Ez alone.
    Te1,
    /// Tri-channel squared-magnitude of the transverse field.
    Te2,
}

impl Default for Visualization {
    fn default() -> Self {
        Visualization::Te1
    }
}

impl Visualization {
    /// The other variant, for the Controller's cycle-visualization command.
    pub fn next(self) -> Self {
        match self {
            Visualization::Te1 => Visualization::Te2,
            Visualization::Te2 => Visualization::Te1,
        }
    }
}

/// Renders `sim.image` from the current field state using `sim.visualization`,
/// then overlays boundaries in black if `draw_boundaries` is set.
pub fn render(sim: &mut Simulation, draw_boundaries: bool) {
    match sim.visualization {
        Visualization::Te1 => render_te1(sim),
        Visualization::Te2 => render_te2(sim),
    }

    if draw_boundaries {
        draw_material_boundaries(sim);
    }
}

/// TE-1: `n = (Ez - EZ_MIN) / (EZ_MAX - EZ_MIN)`, B = `min(2n, 1)`,
/// R = `n < 0.5 ? 2n : 2(1-n)`, G = `max(0, 2(n - 0.5))`.
fn render_te1(sim: &mut Simulation) {
    let width = sim.width;
    let height = sim.height;

    for y in 0..height {
        for x in 0..width {
            let idx = sim.index(x, y);
            let n = (sim.ez[idx] - EZ_MIN) / (EZ_MAX - EZ_MIN);

            let b = (2.0 * n).min(1.0);
            let r = if n < 0.5 { 2.0 * n } else { 2.0 * (1.0 - n) };
            let g = (2.0 * (n - 0.5)).max(0.0);

            let pixel = idx * 3;
            sim.image[pixel] = r;
            sim.image[pixel + 1] = g;
            sim.image[pixel + 2] = b;
        }
    }
}

/// TE-2: R = `Ez^2 / (MAX_FIELD - MIN_FIELD)`, G = `Hx^2 / (...)`,
/// B = `Hy^2 / (...)`.
fn render_te2(sim: &mut Simulation) {
    let width = sim.width;
    let height = sim.height;
    let span = MAX_FIELD - MIN_FIELD;

    for y in 0..height {
        for x in 0..width {
            let idx = sim.index(x, y);
            let r = (sim.ez[idx] * sim.ez[idx]) / span;
            let g = (sim.hx[idx] * sim.hx[idx]) / span;
            let b = (sim.hy[idx] * sim.hy[idx]) / span;

            let pixel = idx * 3;
            sim.image[pixel] = r;
            sim.image[pixel + 1] = g;
            sim.image[pixel + 2] = b;
        }
    }
}

/// Overlays every material's boundary in solid black over whatever colormap
/// already wrote `sim.image` this frame.
fn draw_material_boundaries(sim: &mut Simulation) {
    for (idx, &mask) in sim.boundary_mask.iter().enumerate() {
        if mask != 0.0 {
            let pixel = idx * 3;
            sim.image[pixel] = 0.0;
            sim.image[pixel + 1] = 0.0;
            sim.image[pixel + 2] = 0.0;
        }
    }
}
