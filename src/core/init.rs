//! Initial particle layouts.

use crate::core::particle::{ParticleSet, Tag};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

fn check_domain(n: usize, a: f64, b: f64, h_factor: f64) -> Result<f64> {
    if n == 0 {
        return Err(Error::InvalidParam("n must be > 0".into()));
    }
    if !a.is_finite() || !b.is_finite() || a >= b {
        return Err(Error::InvalidParam(format!(
            "domain requires finite a < b, got ({a}, {b})"
        )));
    }
    if !h_factor.is_finite() || h_factor <= 0.0 {
        return Err(Error::InvalidParam("h_factor must be finite and > 0".into()));
    }
    Ok((b - a) / n as f64)
}

/// `n` real particles at the cell centres of `[a, b)`, with `h = h_factor * spacing`
/// and the field sampled from `phi`. Densities start at zero.
pub fn uniform_lattice(
    n: usize,
    a: f64,
    b: f64,
    h_factor: f64,
    phi: impl Fn(f64) -> f64,
) -> Result<ParticleSet> {
    let dx = check_domain(n, a, b, h_factor)?;
    let x: Vec<f64> = (0..n).map(|k| a + (k as f64 + 0.5) * dx).collect();
    let field = x.iter().map(|&xi| phi(xi)).collect();
    ParticleSet::real(x, field, h_factor * dx)
}

/// Like [`uniform_lattice`], with each position shifted by a uniform draw in
/// `[-jitter, jitter] * spacing`. `jitter` must lie in `[0, 0.5)` so particles
/// stay inside their cells. `seed = None` draws a fresh seed.
pub fn jittered_lattice(
    n: usize,
    a: f64,
    b: f64,
    h_factor: f64,
    jitter: f64,
    seed: Option<u64>,
    phi: impl Fn(f64) -> f64,
) -> Result<ParticleSet> {
    let dx = check_domain(n, a, b, h_factor)?;
    if !(0.0..0.5).contains(&jitter) {
        return Err(Error::InvalidParam(format!(
            "jitter must lie in [0, 0.5), got {jitter}"
        )));
    }
    let mut rng: StdRng = match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    };
    let x: Vec<f64> = (0..n)
        .map(|k| {
            let offset = if jitter > 0.0 {
                rng.random_range(-jitter..=jitter)
            } else {
                0.0
            };
            a + (k as f64 + 0.5 + offset) * dx
        })
        .collect();
    let field = x.iter().map(|&xi| phi(xi)).collect();
    ParticleSet::real(x, field, h_factor * dx)
}

impl ParticleSet {
    /// Append a ghost mirror, across `a` and across `b`, of every real particle
    /// lying within `width` of that wall. Ghosts copy the field value and
    /// smoothing length of their source. The set is re-sorted afterwards.
    ///
    /// Returns the number of ghosts added.
    pub fn add_mirror_ghosts(&mut self, a: f64, b: f64, width: f64) -> Result<usize> {
        self.validate()?;
        if !a.is_finite() || !b.is_finite() || a >= b {
            return Err(Error::InvalidParam(format!(
                "domain requires finite a < b, got ({a}, {b})"
            )));
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidParam("ghost width must be finite and > 0".into()));
        }

        let mut ghosts = Vec::new();
        for i in 0..self.len() {
            if !self.tag[i].is_real() {
                continue;
            }
            let xi = self.x[i];
            if xi - a <= width {
                ghosts.push((2.0 * a - xi, i));
            }
            if b - xi <= width {
                ghosts.push((2.0 * b - xi, i));
            }
        }

        let added = ghosts.len();
        for (xg, src) in ghosts {
            self.x.push(xg);
            self.rho.push(self.rho[src]);
            self.phi.push(self.phi[src]);
            self.tag.push(Tag::Ghost);
            self.h.push(self.h[src]);
        }
        self.reorder()?;
        Ok(added)
    }
}
