//! Frame Presenter (A3).
//!
//! Stands in for "an external presenter uploads the frame to a GPU texture"
//! (spec §6's closing sentence): periodically snapshots `Simulation::image`
//! to a binary PPM (P6) file. Grounded on the original C source's
//! `updateImage` (the GLFW texture-upload counterpart this headless
//! reimplementation replaces) — same handoff contract, different sink.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::MaxwellError;
use crate::grid::Simulation;

/// Writes every `snapshot_every`-th frame to `snapshot_dir/frame_<N>.ppm`.
pub struct Presenter {
    snapshot_dir: PathBuf,
    snapshot_every: u64,
}

impl Presenter {
    pub fn new(snapshot_dir: impl Into<PathBuf>, snapshot_every: u64) -> Result<Self, MaxwellError> {
        let snapshot_dir = snapshot_dir.into();
        fs::create_dir_all(&snapshot_dir)
            .map_err(|e| MaxwellError::resource(format!("cannot create snapshot dir: {e}")))?;
        Ok(Presenter {
            snapshot_dir,
            snapshot_every: snapshot_every.max(1),
        })
    }

    /// Writes a PPM snapshot if `sim.frame` is a multiple of `snapshot_every`.
    /// No-op otherwise — this is advisory presentation, not part of the hot
    /// stepping path's contract.
    pub fn present(&self, sim: &Simulation) -> Result<(), MaxwellError> {
        if sim.frame % self.snapshot_every != 0 {
            return Ok(());
        }
        let path = self.snapshot_dir.join(format!("frame_{:08}.ppm", sim.frame));
        write_ppm(&path, sim.width, sim.height, &sim.image)
    }
}

fn write_ppm(path: &Path, width: usize, height: usize, image: &[f32]) -> Result<(), MaxwellError> {
    let file = File::create(path).map_err(|e| MaxwellError::resource(format!("cannot write {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(format!("P6\n{width} {height}\n255\n").as_bytes())
        .map_err(|e| MaxwellError::resource(e.to_string()))?;

    let mut bytes = Vec::with_capacity(width * height * 3);
    for &channel in image {
        bytes.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
    }
    writer.write_all(&bytes).map_err(|e| MaxwellError::resource(e.to_string()))?;

    Ok(())
}
