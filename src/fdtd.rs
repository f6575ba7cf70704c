//! FDTD Stepper (C4).
//!
//! The scalar (CPU-path) numerical core: one leapfrog pair per [`step`] —
//! source injection, E update (with PML loss), boundary enforcement, H
//! update, boundary enforcement again if the policy requires it. The
//! accelerator backend (`backend::accelerator`) launches kernels computing
//! the identical arithmetic; this module is also where that contract is
//! pinned down and tested. Grounded on the teacher's `fdtd.rs::update_h`/
//! `update_e`/`step`, generalized from the teacher's uniform Courant-number
//! update to the spec's per-cell ε/μ/σ update.

use crate::boundary::{apply_pec, BoundaryPolicy};
use crate::grid::Simulation;

/// Refuses to advance if the stored `dt` no longer satisfies the CFL bound
/// for the stored `dx`/`dy`. In practice this can only happen if a caller
/// mutates `dx`/`dy`/`dt` after construction; `Simulation::new` already
/// enforces it once.
pub fn step(sim: &mut Simulation) -> Result<(), crate::error::MaxwellError> {
    crate::grid::check_cfl(sim.dx, sim.dy, sim.dt)?;

    crate::source::inject(sim);
    update_e(sim);
    if sim.boundary == BoundaryPolicy::Pec {
        apply_pec(sim);
    }
    update_h(sim);
    if sim.boundary == BoundaryPolicy::Pec {
        apply_pec(sim);
    }

    sim.time += sim.dt;
    sim.frame += 1;

    Ok(())
}

/// E update on the interior `1 <= i < W-1, 1 <= j < H-1`:
/// `Ez += (dt/ε) * ((Hy[i,j]-Hy[i-1,j])/dx - (Hx[i,j]-Hx[i,j-1])/dy) - (dt*σ/ε) * Ez`.
/// Evaluated against the pre-update Ez (ordinary leapfrog).
fn update_e(sim: &mut Simulation) {
    let (width, height, dx, dy, dt) = (sim.width, sim.height, sim.dx, sim.dy, sim.dt);
    if width < 2 || height < 2 {
        return;
    }

    for j in 1..height - 1 {
        for i in 1..width - 1 {
            let idx = sim.index(i, j);
            let idx_im1 = sim.index(i - 1, j);
            let idx_jm1 = sim.index(i, j - 1);

            let curl_h = (sim.hy[idx] - sim.hy[idx_im1]) / dx - (sim.hx[idx] - sim.hx[idx_jm1]) / dy;
            let eps = sim.epsilon[idx];
            let sigma = sim.sigma[idx];
            let ez = sim.ez[idx];

            sim.ez[idx] = ez + (dt / eps) * curl_h - (dt * sigma / eps) * ez;
        }
    }
}

/// H update on `0 <= i < W-1, 0 <= j < H-1`:
/// `Hx -= (dt/(μ*dy)) * (Ez[i,j+1]-Ez[i,j])`, `Hy += (dt/(μ*dx)) * (Ez[i+1,j]-Ez[i,j])`.
fn update_h(sim: &mut Simulation) {
    let (width, height, dx, dy, dt) = (sim.width, sim.height, sim.dx, sim.dy, sim.dt);
    if width < 2 || height < 2 {
        return;
    }

    for j in 0..height - 1 {
        for i in 0..width - 1 {
            let idx = sim.index(i, j);
            let idx_ip1 = sim.index(i + 1, j);
            let idx_jp1 = sim.index(i, j + 1);
            let mu = sim.mu[idx];

            sim.hx[idx] -= (dt / (mu * dy)) * (sim.ez[idx_jp1] - sim.ez[idx]);
            sim.hy[idx] += (dt / (mu * dx)) * (sim.ez[idx_ip1] - sim.ez[idx]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::PmlParams;
    use crate::grid::FieldComponent;
    use crate::source::Source;

    fn small_sim(boundary: BoundaryPolicy) -> Simulation {
        Simulation::new(16, 16, 0.01, 0.01, 1e-12, boundary, PmlParams::default()).unwrap()
    }

    #[test]
    fn step_advances_time_and_frame_exactly_once() {
        let mut sim = small_sim(BoundaryPolicy::Natural);
        step(&mut sim).unwrap();
        assert!((sim.time - sim.dt).abs() < 1e-20);
        assert_eq!(sim.frame, 1);
    }

    #[test]
    fn h_update_responds_to_ez_gradient() {
        let mut sim = small_sim(BoundaryPolicy::Natural);
        let center = sim.index(8, 8);
        sim.ez[center] = 1.0;
        update_h(&mut sim);
        let left = sim.index(7, 8);
        assert_ne!(sim.hy[left], 0.0);
    }

    #[test]
    fn e_update_leaves_boundary_untouched_before_boundary_policy_runs() {
        let mut sim = small_sim(BoundaryPolicy::Natural);
        sim.hy.fill(1.0);
        update_e(&mut sim);
        let corner = sim.index(0, 0);
        assert_eq!(sim.ez[corner], 0.0);
    }

    #[test]
    fn pec_boundary_is_reapplied_after_h_update() {
        let mut sim = small_sim(BoundaryPolicy::Pec);
        sim.hy.fill(1.0);
        step(&mut sim).unwrap();
        let edge = sim.index(0, 5);
        assert_eq!(sim.ez[edge], 0.0);
        assert_eq!(sim.hx[edge], 0.0);
        assert_eq!(sim.hy[edge], 0.0);
    }

    #[test]
    fn source_injection_happens_before_e_update_in_same_step() {
        let mut sim = small_sim(BoundaryPolicy::Natural);
        sim.add_source(Source::SineLinFreq {
            x: 8,
            y: 8,
            frequency: 1e9,
            phase: std::f32::consts::FRAC_PI_2,
            component: FieldComponent::Ez,
        })
        .unwrap();
        step(&mut sim).unwrap();
        let idx = sim.index(8, 8);
        assert_ne!(sim.ez[idx], 0.0);
    }

    #[test]
    fn stepping_refuses_to_start_on_cfl_violation() {
        let mut sim = small_sim(BoundaryPolicy::Natural);
        sim.dt = 1.0;
        assert!(step(&mut sim).is_err());
    }

    #[test]
    fn pml_sigma_damps_ez_growth_relative_to_natural() {
        let mut natural = small_sim(BoundaryPolicy::Natural);
        let mut pml = Simulation::new(16, 16, 0.01, 0.01, 1e-12, BoundaryPolicy::Pml, PmlParams {
            layers: 4,
            peak_conductivity: 1.0,
            polynomial_order: 1,
        })
        .unwrap();

        for sim in [&mut natural, &mut pml] {
            let idx = sim.index(1, 8);
            sim.ez[idx] = 10.0;
            sim.hy.fill(1.0);
        }

        update_e(&mut natural);
        update_e(&mut pml);

        let idx = natural.index(1, 8);
        assert!(pml.ez[idx] < natural.ez[idx]);
    }
}
