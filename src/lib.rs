//! maxwell — a 2-D TE-mode FDTD electromagnetic simulator.
//!
//! Advances Ez, Hx, Hy on a Yee-staggered grid under a leapfrog update with
//! spatially varying ε, μ, σ, behind a pluggable CPU/accelerator compute
//! backend. See `SPEC_FULL.md` for the full component breakdown.
//!
//! Author: Mehmet Gümüş (github.com/SpaceEngineerSS)

pub mod backend;
pub mod boundary;
pub mod config;
pub mod controller;
pub mod error;
pub mod fdtd;
pub mod grid;
pub mod materials;
pub mod presenter;
pub mod render;
pub mod source;

pub use error::{AcceleratorError, MaxwellError};
pub use grid::{FieldComponent, Simulation};
