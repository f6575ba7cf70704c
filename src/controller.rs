//! Simulation Controller (C8).
//!
//! Process-wide control-flag record plus the per-loop-turn logic that
//! applies them synchronously. Commands arriving from the external event
//! layer (A2) only ever set these booleans; the controller reads and clears
//! them at the top of the next turn, so a late observation delays a user
//! action by at most one frame. Grounded on the event/state-flag pattern in
//! `freddiehaddad-oxidized`'s terminal-driven main loop, adapted to the
//! spec's six named flags.

use std::time::Instant;

use crate::backend::Backend;
use crate::error::MaxwellError;
use crate::grid::Simulation;
use crate::render::Visualization;

/// The six process-wide advisory flags plus the FPS bookkeeping state.
pub struct Controller {
    pub running: bool,
    pub pending_reset: bool,
    pub pending_cycle_vis: bool,
    pub pending_report_fps: bool,
    pub draw_boundaries: bool,
    pub just_resumed: bool,

    start_time: Instant,
    frames_since_resume: u64,
}

impl Default for Controller {
    fn default() -> Self {
        Controller {
            running: true,
            pending_reset: false,
            pending_cycle_vis: false,
            pending_report_fps: false,
            draw_boundaries: false,
            just_resumed: false,
            start_time: Instant::now(),
            frames_since_resume: 0,
        }
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller::default()
    }

    /// One loop turn: applies pending commands in order, then (if running)
    /// injects sources, advances the stepper, and renders a frame via the
    /// supplied backend.
    pub fn tick(&mut self, sim: &mut Simulation, backend: &mut Backend) -> Result<(), MaxwellError> {
        if self.pending_report_fps {
            let elapsed = self.start_time.elapsed().as_secs_f64();
            let fps = if elapsed > 0.0 {
                (self.frames_since_resume as f64 / elapsed).round() as i64
            } else {
                0
            };
            tracing::info!(target: "controller", fps, "frames per second");
            self.pending_report_fps = false;
        }

        if self.pending_cycle_vis {
            sim.visualization = next_visualization(sim.visualization);
            self.pending_cycle_vis = false;
        }

        if self.pending_reset {
            sim.reset();
            crate::render::render(sim, self.draw_boundaries);
            self.pending_reset = false;
        }

        if self.just_resumed {
            self.start_time = Instant::now();
            self.frames_since_resume = 0;
            self.just_resumed = false;
        }

        if self.running {
            backend.step_and_render(sim, self.draw_boundaries)?;
            self.frames_since_resume += 1;
        }

        Ok(())
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
        if self.running {
            self.just_resumed = true;
        }
    }
}

/// Advances the visualization selector modulo the number of variants. A
/// third variant added to [`Visualization`] only needs a case added here.
fn next_visualization(current: Visualization) -> Visualization {
    current.next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ComputeTarget;
    use crate::boundary::{BoundaryPolicy, PmlParams};

    fn setup() -> (Simulation, Backend) {
        let sim = Simulation::new(16, 16, 0.01, 0.01, 1e-12, BoundaryPolicy::Natural, PmlParams::default()).unwrap();
        let backend = Backend::new(ComputeTarget::Cpu, 16, 16);
        (sim, backend)
    }

    #[test]
    fn running_advances_frame_counter() {
        let (mut sim, mut backend) = setup();
        let mut controller = Controller::new();
        controller.tick(&mut sim, &mut backend).unwrap();
        assert_eq!(sim.frame, 1);
    }

    #[test]
    fn paused_controller_does_not_advance_frame() {
        let (mut sim, mut backend) = setup();
        let mut controller = Controller::new();
        controller.running = false;
        controller.tick(&mut sim, &mut backend).unwrap();
        assert_eq!(sim.frame, 0);
    }

    #[test]
    fn pending_reset_zeroes_time_and_clears_flag() {
        let (mut sim, mut backend) = setup();
        let mut controller = Controller::new();
        controller.tick(&mut sim, &mut backend).unwrap();
        assert_eq!(sim.frame, 1);

        controller.pending_reset = true;
        controller.running = false;
        controller.tick(&mut sim, &mut backend).unwrap();
        assert_eq!(sim.frame, 0);
        assert!(!controller.pending_reset);
    }

    #[test]
    fn pending_cycle_vis_advances_and_clears() {
        let (mut sim, mut backend) = setup();
        let mut controller = Controller::new();
        controller.running = false;
        let before = sim.visualization;
        controller.pending_cycle_vis = true;
        controller.tick(&mut sim, &mut backend).unwrap();
        assert_ne!(sim.visualization, before);
        assert!(!controller.pending_cycle_vis);
    }

    #[test]
    fn just_resumed_resets_fps_counters() {
        let (mut sim, mut backend) = setup();
        let mut controller = Controller::new();
        controller.tick(&mut sim, &mut backend).unwrap();
        controller.just_resumed = true;
        controller.tick(&mut sim, &mut backend).unwrap();
        assert!(!controller.just_resumed);
        assert_eq!(controller.frames_since_resume, 1);
    }
}
