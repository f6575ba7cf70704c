//! Scalar CPU compute path: direct nested loops over the grid in row-major
//! order, one cell per iteration — no data-parallel dispatch, just the
//! stepper and renderer called in sequence.

use crate::error::MaxwellError;
use crate::grid::Simulation;

pub fn step_and_render(sim: &mut Simulation, draw_boundaries: bool) -> Result<(), MaxwellError> {
    crate::fdtd::step(sim)?;
    crate::render::render(sim, draw_boundaries);
    Ok(())
}
