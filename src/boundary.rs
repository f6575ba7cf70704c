//! Boundary Policies (C5).
//!
//! Three outer-edge treatments: `Natural` (no-op, fields simply terminate),
//! `Pec` (perfect electric conductor — zero the outer ring every sub-step),
//! and `Pml` (uniaxial perfectly matched layer — graded conductivity ramp
//! feeding the lossy update in `fdtd.rs`). Grounded on the teacher's
//! `cpml.rs` (`CPMLCoeffs::new`'s polynomial grading), simplified from the
//! teacher's convolutional auxiliary-field CPML to the uniaxial σ-only PML
//! the spec names — no ψ auxiliary fields, no α/κ stretching, just σ baked
//! into `Simulation::sigma` and consumed by the lossy leapfrog update.

use crate::grid::Simulation;

/// Outer-edge treatment applied once per E/H sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// No boundary treatment; outermost cells update like any interior cell.
    Natural,
    /// Perfect electric conductor: Ez, Hx, Hy forced to zero on the outermost ring.
    Pec,
    /// Uniaxial PML: graded conductivity ramp absorbs outgoing waves.
    Pml,
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        BoundaryPolicy::Natural
    }
}

/// Tunables for [`BoundaryPolicy::Pml`]. Defaults match the spec's stated
/// values (100 layers, peak conductivity 1e-4, linear grading). An
/// implementation accepts the three in this order and clamps a missing tail
/// to defaults — see [`PmlParams::from_tail`].
#[derive(Debug, Clone, Copy)]
pub struct PmlParams {
    pub layers: usize,
    pub peak_conductivity: f32,
    pub polynomial_order: u32,
}

impl Default for PmlParams {
    fn default() -> Self {
        PmlParams {
            layers: 100,
            peak_conductivity: 1e-4,
            polynomial_order: 1,
        }
    }
}

impl PmlParams {
    /// Builds params from an ordered tail of optional values (as parsed from
    /// a scene file's `Boundary = PML, <layers>, <peak>, <order>` line),
    /// filling any missing trailing values from [`PmlParams::default`].
    pub fn from_tail(layers: Option<usize>, peak_conductivity: Option<f32>, polynomial_order: Option<u32>) -> Self {
        let default = PmlParams::default();
        PmlParams {
            layers: layers.unwrap_or(default.layers),
            peak_conductivity: peak_conductivity.unwrap_or(default.peak_conductivity),
            polynomial_order: polynomial_order.unwrap_or(default.polynomial_order),
        }
    }
}

/// Fills `sim.sigma` with the graded PML ramp. For every cell within
/// `layers` of any edge, `d = layers - 1 - min(i, W-1-i, j, H-1-j)` and
/// `sigma = peak_conductivity * (d / (layers-1))^polynomial_order`.
pub fn init_pml_sigma(sim: &mut Simulation) {
    let PmlParams {
        layers,
        peak_conductivity,
        polynomial_order,
    } = sim.pml;

    sim.sigma.fill(0.0);

    if layers < 2 {
        return;
    }

    let width = sim.width;
    let height = sim.height;
    let order = polynomial_order as f32;
    let denom = (layers - 1) as f32;

    for y in 0..height {
        for x in 0..width {
            let dist_left = x;
            let dist_right = width.saturating_sub(1 + x);
            let dist_top = y;
            let dist_bottom = height.saturating_sub(1 + y);
            let min_dist = dist_left.min(dist_right).min(dist_top).min(dist_bottom);

            if min_dist < layers {
                let depth = (layers - 1 - min_dist) as f32;
                let sigma = peak_conductivity * (depth / denom).powf(order);
                let idx = sim.index(x, y);
                sim.sigma[idx] = sigma;
            }
        }
    }
}

/// Zeroes Ez, Hx, Hy on the outermost ring of cells. Applied after each E
/// (respectively H) sub-step when `sim.boundary == BoundaryPolicy::Pec`.
pub fn apply_pec(sim: &mut Simulation) {
    let (width, height) = (sim.width, sim.height);
    if width == 0 || height == 0 {
        return;
    }

    for x in 0..width {
        let top = sim.index(x, 0);
        let bottom = sim.index(x, height - 1);
        zero_cell(sim, top);
        zero_cell(sim, bottom);
    }
    for y in 0..height {
        let left = sim.index(0, y);
        let right = sim.index(width - 1, y);
        zero_cell(sim, left);
        zero_cell(sim, right);
    }
}

fn zero_cell(sim: &mut Simulation, idx: usize) {
    sim.ez[idx] = 0.0;
    sim.hx[idx] = 0.0;
    sim.hy[idx] = 0.0;
}
