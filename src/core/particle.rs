use crate::core::kernel::check_smoothing_length;
use crate::error::{Error, Result};

/// Role of a particle in the kernel sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Mobile, physically meaningful particle.
    Real,
    /// Fixed mirror particle used to impose boundary conditions; never advected.
    Ghost,
}

impl Tag {
    #[inline]
    pub fn is_real(self) -> bool {
        matches!(self, Tag::Real)
    }

    /// Integer encoding used at the Python boundary: 1 = real, 0 = ghost.
    #[inline]
    pub fn as_i32(self) -> i32 {
        match self {
            Tag::Real => 1,
            Tag::Ghost => 0,
        }
    }
}

impl TryFrom<i64> for Tag {
    type Error = Error;

    fn try_from(v: i64) -> Result<Self> {
        match v {
            1 => Ok(Tag::Real),
            0 => Ok(Tag::Ghost),
            other => Err(Error::InvalidParam(format!(
                "tag must be 1 (real) or 0 (ghost), got {other}"
            ))),
        }
    }
}

/// Structure-of-arrays particle collection.
///
/// Index `i` refers to the same physical particle in every attribute. The
/// smoothing length is stored per particle for compatibility, but the solver
/// only ever reads `h[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    /// Optional label.
    pub name: String,
    /// Positions.
    pub x: Vec<f64>,
    /// Density estimates (> 0 once `update_rho` has run).
    pub rho: Vec<f64>,
    /// Scalar field values.
    pub phi: Vec<f64>,
    /// Real/ghost tags.
    pub tag: Vec<Tag>,
    /// Smoothing lengths.
    pub h: Vec<f64>,
}

impl ParticleSet {
    /// Build a particle set from parallel attribute vectors.
    ///
    /// Errors:
    /// - `Error::InconsistentParticleSet` if the vectors differ in length or are empty.
    /// - `Error::InvalidParam` if any position is not finite or `h[0]` is not finite and > 0.
    pub fn new(
        x: Vec<f64>,
        rho: Vec<f64>,
        phi: Vec<f64>,
        tag: Vec<Tag>,
        h: Vec<f64>,
    ) -> Result<Self> {
        let set = Self {
            name: String::new(),
            x,
            rho,
            phi,
            tag,
            h,
        };
        set.validate()?;
        if !set.x.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidParam("positions must be finite".into()));
        }
        Ok(set)
    }

    /// Build an all-real particle set with zero density and a uniform smoothing length.
    pub fn real(x: Vec<f64>, phi: Vec<f64>, h: f64) -> Result<Self> {
        let n = x.len();
        Self::new(x, vec![0.0; n], phi, vec![Tag::Real; n], vec![h; n])
    }

    /// Attach a label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Check that all attributes share a common, non-zero length and `h` is usable.
    pub fn validate(&self) -> Result<()> {
        let n = self.x.len();
        if self.h.is_empty() {
            return Err(Error::InconsistentParticleSet("h is empty".into()));
        }
        if n == 0 {
            return Err(Error::InconsistentParticleSet(
                "particle set has no particles".into(),
            ));
        }
        let lengths = [
            ("rho", self.rho.len()),
            ("phi", self.phi.len()),
            ("tag", self.tag.len()),
            ("h", self.h.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(Error::InconsistentParticleSet(format!(
                    "{name} has length {len}, expected {n} (length of x)"
                )));
            }
        }
        check_smoothing_length(self.h[0])
    }

    /// Shared smoothing length, taken from the first particle.
    pub fn smoothing_length(&self) -> Result<f64> {
        let h = *self
            .h
            .first()
            .ok_or_else(|| Error::InconsistentParticleSet("h is empty".into()))?;
        check_smoothing_length(h)?;
        Ok(h)
    }

    /// Number of real (mobile) particles.
    pub fn num_real(&self) -> usize {
        self.tag.iter().filter(|t| t.is_real()).count()
    }

    /// Sum of the field over real particles.
    pub fn total_field(&self) -> f64 {
        self.phi
            .iter()
            .zip(&self.tag)
            .filter(|(_, t)| t.is_real())
            .map(|(p, _)| p)
            .sum()
    }

    /// True if positions are in non-decreasing order.
    pub fn is_sorted(&self) -> bool {
        self.x.windows(2).all(|w| w[0] <= w[1])
    }

    /// Fail at the first density that is not finite and > 0.
    pub(crate) fn check_density(&self) -> Result<()> {
        match self.rho.iter().position(|r| !(r.is_finite() && *r > 0.0)) {
            Some(index) => Err(Error::SingularDensity {
                index,
                rho: self.rho[index],
            }),
            None => Ok(()),
        }
    }
}
