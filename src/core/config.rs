//! Solver configuration: time stepping, per-step options and the coupling rate.

use crate::error::{Error, Result};

/// Step size and intended stop time.
///
/// `tf` is stored for the driver; individual operations never compare against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeConfig {
    pub dt: f64,
    pub tf: f64,
}

impl TimeConfig {
    /// Errors: `Error::InvalidParam` unless `dt` is finite and > 0 and `tf` is finite and >= 0.
    pub fn new(dt: f64, tf: f64) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "dt must be finite and > 0, got {dt}"
            )));
        }
        if !tf.is_finite() || tf < 0.0 {
            return Err(Error::InvalidParam(format!(
                "tf must be finite and >= 0, got {tf}"
            )));
        }
        Ok(Self { dt, tf })
    }
}

/// How the field is advanced by `update_field_euler`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldMode {
    /// `dphi_i/dt = -(1/rho_i) sum_j W'(x_i - x_j) (phi_j - phi_i)`.
    #[default]
    Diffusion,
    /// Rate taken from the field itself:
    /// `dphi_i/dt = -(phi_i/rho_i) sum_j W'(x_i - x_j) phi_j`.
    FieldCoupling,
}

/// Boundary treatment for position updates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Boundary {
    /// No wrapping; particles may leave any nominal domain.
    #[default]
    Open,
    /// Wrap once into `[a, b)` after each displacement.
    Periodic { a: f64, b: f64 },
}

impl Boundary {
    /// Periodic boundary on `[a, b)`.
    ///
    /// Errors: `Error::InvalidParam` unless both ends are finite and `a < b`.
    pub fn periodic(a: f64, b: f64) -> Result<Self> {
        if !a.is_finite() || !b.is_finite() || a >= b {
            return Err(Error::InvalidParam(format!(
                "periodic domain requires finite a < b, got ({a}, {b})"
            )));
        }
        Ok(Self::Periodic { a, b })
    }
}

/// Where the advection rate of a position update comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RateSource {
    /// The rate stored in the solver.
    #[default]
    External,
    /// Each particle's current field value.
    Field,
}

/// Options for `update_position_euler`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionUpdate {
    pub boundary: Boundary,
    pub rate_source: RateSource,
}

impl PositionUpdate {
    pub fn periodic(mut self, a: f64, b: f64) -> Result<Self> {
        self.boundary = Boundary::periodic(a, b)?;
        Ok(self)
    }

    pub fn field_rate(mut self) -> Self {
        self.rate_source = RateSource::Field;
        self
    }
}

/// Options for one full step (density, field, position).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepConfig {
    pub field_mode: FieldMode,
    pub position: PositionUpdate,
}

impl StepConfig {
    pub fn field_mode(mut self, mode: FieldMode) -> Self {
        self.field_mode = mode;
        self
    }

    pub fn position(mut self, position: PositionUpdate) -> Self {
        self.position = position;
        self
    }
}

/// Coupling rate (EGN): uniform over real particles, or one value per particle.
#[derive(Debug, Clone, PartialEq)]
pub enum Rate {
    Uniform(f64),
    PerParticle(Vec<f64>),
}

impl Rate {
    /// Rate for particle `i`.
    #[inline]
    pub fn at(&self, i: usize) -> f64 {
        match self {
            Rate::Uniform(v) => *v,
            Rate::PerParticle(v) => v[i],
        }
    }

    pub(crate) fn validate(&self, n: usize) -> Result<()> {
        match self {
            Rate::Uniform(v) if !v.is_finite() => {
                Err(Error::InvalidParam(format!("rate must be finite, got {v}")))
            }
            Rate::Uniform(_) => Ok(()),
            Rate::PerParticle(v) if v.len() != n => Err(Error::InconsistentParticleSet(format!(
                "per-particle rate has length {}, expected {n}",
                v.len()
            ))),
            Rate::PerParticle(v) => match v.iter().position(|r| !r.is_finite()) {
                Some(i) => Err(Error::InvalidParam(format!(
                    "rate of particle {i} is not finite"
                ))),
                None => Ok(()),
            },
        }
    }
}

impl From<f64> for Rate {
    fn from(v: f64) -> Self {
        Rate::Uniform(v)
    }
}

impl From<Vec<f64>> for Rate {
    fn from(v: Vec<f64>) -> Self {
        Rate::PerParticle(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_config_validation() {
        assert!(TimeConfig::new(0.01, 1.0).is_ok());
        assert!(TimeConfig::new(0.0, 1.0).is_err());
        assert!(TimeConfig::new(0.01, f64::INFINITY).is_err());
        assert!(TimeConfig::new(0.01, -1.0).is_err());
    }

    #[test]
    fn defaults_are_diffusion_open_external() {
        let c = StepConfig::default();
        assert_eq!(c.field_mode, FieldMode::Diffusion);
        assert_eq!(c.position.boundary, Boundary::Open);
        assert_eq!(c.position.rate_source, RateSource::External);
    }

    #[test]
    fn periodic_domain_validated() -> Result<()> {
        let p = PositionUpdate::default().periodic(-1.0, 1.0)?.field_rate();
        assert_eq!(p.boundary, Boundary::Periodic { a: -1.0, b: 1.0 });
        assert_eq!(p.rate_source, RateSource::Field);
        assert!(Boundary::periodic(1.0, 1.0).is_err());
        assert!(Boundary::periodic(f64::NAN, 1.0).is_err());
        Ok(())
    }

    #[test]
    fn rate_lookup_and_validation() {
        let r = Rate::from(vec![1.0, 2.0]);
        assert_eq!(r.at(1), 2.0);
        assert!(r.validate(2).is_ok());
        assert!(matches!(
            r.validate(3),
            Err(Error::InconsistentParticleSet(_))
        ));
        assert_eq!(Rate::from(5.0).at(42), 5.0);
        assert!(Rate::Uniform(f64::NAN).validate(1).is_err());
    }
}
