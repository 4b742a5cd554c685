//! Kernel-based discretisation and explicit time stepping for a scalar field
//! carried by particles on a line.
//!
//! Components, leaves first: [`kernel`] (smoothing kernels), [`particle`]
//! (the particle collection), [`reorder`] (lockstep position sort),
//! [`config`] (time stepping and per-step options), [`solver`] (density,
//! field and position updates) and [`init`] (initial layouts).

pub mod config;
pub mod init;
pub mod kernel;
pub mod particle;
pub mod reorder;
pub mod solver;

pub use config::{Boundary, FieldMode, PositionUpdate, Rate, RateSource, StepConfig, TimeConfig};
pub use kernel::{gaussian_kernel, GaussianKernel, Kernel, KernelOrder};
pub use particle::{ParticleSet, Tag};
pub use solver::RiemannSolver1D;
