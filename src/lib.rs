//! One-dimensional meshless (SPH) transport of a scalar field.
//!
//! The [`core`] module holds the solver; with the `python` feature the crate
//! also builds a Python extension module exposing the same operations.

pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::core::{ParticleSet, RiemannSolver1D, StepConfig, Tag};
pub use crate::error::{Error, Result};
