//! Source Evaluator (C3).
//!
//! Sources are stateless additive injections evaluated fresh each step from
//! the simulation's elapsed time — no internal phase accumulator, so
//! reordering or skipping steps cannot desynchronize a source from the
//! field. Grounded on the teacher's `sources.rs::SourceFunction::evaluate`
//! (a `Waveform`-driven closure over elapsed time), narrowed to the single
//! `SineLinFreq` variant the spec names; the teacher's plane-wave, phased
//! array, Gaussian beam, and spectrum analyzer machinery has no counterpart
//! here and is not carried forward.

use crate::grid::{FieldComponent, Simulation};

/// A single source term. Currently only linear-frequency sinusoids are
/// supported, injected additively into one named field component at one grid
/// cell.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    SineLinFreq {
        x: usize,
        y: usize,
        frequency: f32,
        phase: f32,
        component: FieldComponent,
    },
}

impl Source {
    /// Value this source contributes at elapsed time `time` (seconds).
    fn evaluate(&self, time: f32) -> f32 {
        match *self {
            Source::SineLinFreq { frequency, phase, .. } => {
                (2.0 * std::f32::consts::PI * frequency * time + phase).sin()
            }
        }
    }

    fn target(&self) -> (usize, usize, FieldComponent) {
        match *self {
            Source::SineLinFreq { x, y, component, .. } => (x, y, component),
        }
    }
}

/// Adds every source's contribution into its target field component at
/// `sim.time`, additively (does not overwrite). Out-of-bounds source
/// coordinates are silently skipped — the scene loader is responsible for
/// rejecting those at load time (§7.6, unknown/invalid keys are warnings,
/// not fatal).
pub fn inject(sim: &mut Simulation) {
    let time = sim.time;
    let width = sim.width;
    let height = sim.height;

    for i in 0..sim.sources().len() {
        let source = sim.sources()[i];
        let (x, y, component) = source.target();
        if x >= width || y >= height {
            continue;
        }
        let idx = sim.index(x, y);
        let value = source.evaluate(time);

        match component {
            FieldComponent::Ez => sim.ez[idx] += value,
            FieldComponent::Hx => sim.hx[idx] += value,
            FieldComponent::Hy => sim.hy[idx] += value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{BoundaryPolicy, PmlParams};

    fn small_sim() -> Simulation {
        Simulation::new(8, 8, 1.0, 1.0, 1e-12, BoundaryPolicy::Natural, PmlParams::default()).unwrap()
    }

    #[test]
    fn injection_is_additive_not_overwriting() {
        let mut sim = small_sim();
        sim.add_source(Source::SineLinFreq {
            x: 4,
            y: 4,
            frequency: 1.0,
            phase: std::f32::consts::FRAC_PI_2,
            component: FieldComponent::Ez,
        })
        .unwrap();
        let idx = sim.index(4, 4);
        sim.ez[idx] = 10.0;
        inject(&mut sim);
        assert!(sim.ez[idx] > 10.0);
    }

    #[test]
    fn source_is_stateless_across_calls_at_same_time() {
        let mut sim = small_sim();
        sim.add_source(Source::SineLinFreq {
            x: 2,
            y: 2,
            frequency: 3.0,
            phase: 0.0,
            component: FieldComponent::Hx,
        })
        .unwrap();
        inject(&mut sim);
        let idx = sim.index(2, 2);
        let first = sim.hx[idx];
        sim.hx[idx] = 0.0;
        inject(&mut sim);
        assert_eq!(sim.hx[idx], first);
    }

    #[test]
    fn out_of_bounds_source_is_skipped_not_fatal() {
        let mut sim = small_sim();
        sim.add_source(Source::SineLinFreq {
            x: 999,
            y: 999,
            frequency: 1.0,
            phase: 0.0,
            component: FieldComponent::Ez,
        })
        .unwrap();
        inject(&mut sim);
        assert!(sim.ez.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn evaluate_matches_sine_formula() {
        let source = Source::SineLinFreq {
            x: 0,
            y: 0,
            frequency: 2.0,
            phase: 0.0,
            component: FieldComponent::Ez,
        };
        let expected = (2.0 * std::f32::consts::PI * 2.0 * 0.25_f32).sin();
        assert!((source.evaluate(0.25) - expected).abs() < 1e-6);
    }
}
