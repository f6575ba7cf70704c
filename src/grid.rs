//! Grid & Field Store (C1).
//!
//! Owns the 2-D scalar field planes and the geometry constants every other
//! component reads or mutates. Memory layout mirrors the teacher's flat,
//! row-major `Vec<f32>` arrays for cache-friendly access; nothing here does
//! bounds checking inside hot loops — callers obey the range guards stated
//! for the stepper (C4).

use crate::boundary::{BoundaryPolicy, PmlParams};
use crate::error::MaxwellError;
use crate::materials::Material;
use crate::render::Visualization;
use crate::source::Source;

/// Vacuum permittivity, F/m.
pub const EPSILON_0: f32 = 8.854e-12;
/// Vacuum permeability, H/m.
pub const MU_0: f32 = 1.2566e-6;
/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f32 = 299_792_458.0;
/// CFL safety margin baked into the stability contract.
pub const CFL_SAFETY: f32 = 0.9;

/// Static cap on the number of sources a scene may declare.
pub const MAX_SOURCES: usize = 1000;
/// Static cap on the number of materials a scene may declare.
pub const MAX_MATERIALS: usize = 1000;

/// Target field component a source injects into, or that a cell read refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldComponent {
    Ez,
    Hx,
    Hy,
}

/// The complete simulation state: field planes, geometry constants, and the
/// per-frame presentation artifacts (RGB image, aggregated boundary mask).
///
/// Field arrays and the image buffer are allocated once at construction and
/// live for the process's duration; only [`Simulation::reset`] zeroes them,
/// it never reallocates.
pub struct Simulation {
    pub width: usize,
    pub height: usize,
    pub dx: f32,
    pub dy: f32,
    pub dt: f32,
    pub time: f32,
    pub frame: u64,

    pub visualization: Visualization,
    pub boundary: BoundaryPolicy,
    pub pml: PmlParams,

    pub ez: Vec<f32>,
    pub hx: Vec<f32>,
    pub hy: Vec<f32>,
    /// Reserved for future TM-mode support; allocated, zero-initialized,
    /// never updated (spec Non-goals).
    pub ex: Vec<f32>,
    pub ey: Vec<f32>,
    pub hz: Vec<f32>,

    pub epsilon: Vec<f32>,
    pub mu: Vec<f32>,
    pub sigma: Vec<f32>,

    /// W·H·3 RGB image in [0, 1], row-major, produced by the renderer (C7).
    pub image: Vec<f32>,
    /// W·H aggregated boundary mask: logical OR of every material's own mask.
    pub boundary_mask: Vec<f32>,

    sources: Vec<Source>,
    materials: Vec<Material>,
}

impl Simulation {
    /// Linear index for cell (x, y): `k = y * width + x`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Allocate a new, empty (vacuum-filled) simulation grid.
    ///
    /// Fails with [`MaxwellError::Resource`] only in the (practically
    /// unreachable on real hardware) case of integer overflow computing the
    /// cell count; fails with [`MaxwellError::Stability`] if `dt` violates
    /// the CFL bound for the given `dx`/`dy`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: usize,
        height: usize,
        dx: f32,
        dy: f32,
        dt: f32,
        boundary: BoundaryPolicy,
        pml: PmlParams,
    ) -> Result<Self, MaxwellError> {
        let cells = width
            .checked_mul(height)
            .ok_or_else(|| MaxwellError::resource("grid dimensions overflow cell count"))?;

        check_cfl(dx, dy, dt)?;

        let mut sim = Simulation {
            width,
            height,
            dx,
            dy,
            dt,
            time: 0.0,
            frame: 0,
            visualization: Visualization::default(),
            boundary,
            pml,
            ez: vec![0.0; cells],
            hx: vec![0.0; cells],
            hy: vec![0.0; cells],
            ex: vec![0.0; cells],
            ey: vec![0.0; cells],
            hz: vec![0.0; cells],
            epsilon: vec![EPSILON_0; cells],
            mu: vec![MU_0; cells],
            sigma: vec![0.0; cells],
            image: vec![0.0; cells * 3],
            boundary_mask: vec![0.0; cells],
            sources: Vec::new(),
            materials: Vec::new(),
        };

        if matches!(sim.boundary, BoundaryPolicy::Pml) {
            crate::boundary::init_pml_sigma(&mut sim);
        }

        Ok(sim)
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Register a source, enforcing the static cap (invariant 6).
    pub fn add_source(&mut self, source: Source) -> Result<(), MaxwellError> {
        if self.sources.len() >= MAX_SOURCES {
            return Err(MaxwellError::capacity(format!(
                "source count exceeds cap of {MAX_SOURCES}"
            )));
        }
        self.sources.push(source);
        Ok(())
    }

    /// Burn a material into ε/μ and compute its boundary mask, enforcing the
    /// static cap (invariant 6). Re-aggregates the overlay mask afterwards.
    pub fn add_material(&mut self, material: Material) -> Result<(), MaxwellError> {
        if self.materials.len() >= MAX_MATERIALS {
            return Err(MaxwellError::capacity(format!(
                "material count exceeds cap of {MAX_MATERIALS}"
            )));
        }
        crate::materials::apply_material(&material, self.width, self.height, &mut self.epsilon, &mut self.mu);
        self.materials.push(material);
        self.recompute_boundary_mask();
        Ok(())
    }

    /// Logical OR of every material's own boundary mask (invariant 5).
    pub fn recompute_boundary_mask(&mut self) {
        self.boundary_mask.fill(0.0);
        for material in &self.materials {
            let mask = crate::materials::compute_boundary_mask(material, self.width, self.height);
            for (dst, src) in self.boundary_mask.iter_mut().zip(mask.iter()) {
                if *src != 0.0 {
                    *dst = 1.0;
                }
            }
        }
    }

    /// Zero all field planes and `time`/`frame`, then re-apply the retained
    /// materials from scratch. Sources are untouched (they are stateless).
    pub fn reset(&mut self) {
        self.ez.fill(0.0);
        self.hx.fill(0.0);
        self.hy.fill(0.0);
        self.ex.fill(0.0);
        self.ey.fill(0.0);
        self.hz.fill(0.0);
        self.epsilon.fill(EPSILON_0);
        self.mu.fill(MU_0);
        self.sigma.fill(0.0);
        self.time = 0.0;
        self.frame = 0;
        self.visualization = crate::render::Visualization::default();

        let materials = std::mem::take(&mut self.materials);
        for material in &materials {
            crate::materials::apply_material(material, self.width, self.height, &mut self.epsilon, &mut self.mu);
        }
        self.materials = materials;
        self.recompute_boundary_mask();

        if matches!(self.boundary, BoundaryPolicy::Pml) {
            crate::boundary::init_pml_sigma(self);
        }
    }
}

/// Invariant 1: `dt <= 0.9 / (c * sqrt(1/dx^2 + 1/dy^2))`.
pub fn check_cfl(dx: f32, dy: f32, dt: f32) -> Result<(), MaxwellError> {
    let bound = CFL_SAFETY / (SPEED_OF_LIGHT * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt());
    if dt > bound {
        return Err(MaxwellError::stability(format!(
            "dt={dt} exceeds CFL bound {bound} for dx={dx}, dy={dy}"
        )));
    }
    Ok(())
}
