use crate::core::config::{
    Boundary, FieldMode, PositionUpdate, Rate, RateSource, StepConfig, TimeConfig,
};
use crate::core::kernel::{GaussianKernel, Kernel, KernelOrder};
use crate::core::particle::ParticleSet;
use crate::core::reorder::apply_permutation;
use crate::error::{Error, Result};

/// Relative tolerance used when comparing elapsed time against `tf`.
const EPS_TIME: f64 = 1e-9;

/// Explicit SPH transport solver for a scalar field on a line.
///
/// Per step the driver calls, in order: [`update_rho`](Self::update_rho),
/// [`update_field_euler`](Self::update_field_euler) and
/// [`update_position_euler`](Self::update_position_euler) (which re-sorts the
/// particles). [`step`](Self::step) does all three.
///
/// All pairwise sums are O(N^2). The particle count is fixed at construction.
#[derive(Debug, Clone)]
pub struct RiemannSolver1D<K: Kernel = GaussianKernel> {
    pub particles: ParticleSet,
    phi_initial: Vec<f64>,
    kernel: K,
    rate: Rate,
    nopart: usize,
    time: Option<TimeConfig>,
    elapsed: f64,
    steps: u64,
    // per-step scratch
    rel: Vec<f64>,
    w: Vec<f64>,
}

impl RiemannSolver1D<GaussianKernel> {
    /// Solver with the truncated Gaussian kernel.
    pub fn gaussian(particles: ParticleSet, rate: impl Into<Rate>) -> Result<Self> {
        let phi_initial = particles.phi.clone();
        Self::new(particles, phi_initial, GaussianKernel, rate)
    }
}

impl<K: Kernel> RiemannSolver1D<K> {
    /// Create a solver over `particles`.
    ///
    /// `phi_initial` is kept for reference only; stepping never reads it.
    ///
    /// Errors:
    /// - `Error::InconsistentParticleSet` if the particle attributes disagree in length,
    ///   or a per-particle rate does not have one entry per particle.
    /// - `Error::InvalidParam` for a non-finite rate or unusable smoothing length.
    pub fn new(
        particles: ParticleSet,
        phi_initial: Vec<f64>,
        kernel: K,
        rate: impl Into<Rate>,
    ) -> Result<Self> {
        particles.validate()?;
        let nopart = particles.len();
        let rate = rate.into();
        rate.validate(nopart)?;
        Ok(Self {
            particles,
            phi_initial,
            kernel,
            rate,
            nopart,
            time: None,
            elapsed: 0.0,
            steps: 0,
            rel: Vec::with_capacity(nopart),
            w: Vec::with_capacity(nopart),
        })
    }

    /// Set the step size and the intended stop time.
    pub fn configure_solver(&mut self, dt: f64, tf: f64) -> Result<()> {
        self.time = Some(TimeConfig::new(dt, tf)?);
        Ok(())
    }

    /// Number of particles (fixed for the solver's lifetime).
    pub fn num_particles(&self) -> usize {
        self.nopart
    }

    pub fn time_config(&self) -> Option<TimeConfig> {
        self.time
    }

    /// Step size, or `Error::NotConfigured`.
    pub fn dt(&self) -> Result<f64> {
        self.time.map(|t| t.dt).ok_or(Error::NotConfigured)
    }

    /// Simulated time advanced by [`step`](Self::step).
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of completed [`step`](Self::step) calls.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn phi_initial(&self) -> &[f64] {
        &self.phi_initial
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn rate(&self) -> &Rate {
        &self.rate
    }

    /// Replace the coupling rate.
    pub fn set_rate(&mut self, rate: impl Into<Rate>) -> Result<()> {
        let rate = rate.into();
        rate.validate(self.nopart)?;
        self.rate = rate;
        Ok(())
    }

    /// Give the particle set back to the caller.
    pub fn into_particles(self) -> ParticleSet {
        self.particles
    }

    /// True once the elapsed time has reached `tf`.
    pub fn is_finished(&self) -> bool {
        match self.time {
            Some(t) => self.elapsed + EPS_TIME * t.dt >= t.tf,
            None => false,
        }
    }

    /// Recompute `rho_i = sum_j W(x_i - x_j, h)` over all particles, self term included.
    pub fn update_rho(&mut self) -> Result<()> {
        let h = self.check_particles()?;
        for i in 0..self.nopart {
            kernel_row(
                &self.kernel,
                &self.particles.x,
                i,
                h,
                KernelOrder::Value,
                &mut self.rel,
                &mut self.w,
            )?;
            self.particles.rho[i] = self.w.iter().sum();
        }
        log::trace!("density updated for {} particles", self.nopart);
        Ok(())
    }

    /// Advance the field by one explicit Euler step.
    ///
    /// Every rate is computed from the old field and density; the new field is
    /// committed only after the whole pass.
    ///
    /// Errors:
    /// - `Error::NotConfigured` before `configure_solver`.
    /// - `Error::SingularDensity` if any density is not finite and > 0.
    pub fn update_field_euler(&mut self, mode: FieldMode) -> Result<()> {
        let dt = self.dt()?;
        let h = self.check_particles()?;
        self.particles.check_density()?;

        let mut phi_new = vec![0.0; self.nopart];
        for (i, out) in phi_new.iter_mut().enumerate() {
            kernel_row(
                &self.kernel,
                &self.particles.x,
                i,
                h,
                KernelOrder::Derivative,
                &mut self.rel,
                &mut self.w,
            )?;
            let phi = &self.particles.phi;
            let rho_i = self.particles.rho[i];
            let dphi = match mode {
                FieldMode::Diffusion => {
                    let sum: f64 = self
                        .w
                        .iter()
                        .zip(phi)
                        .map(|(dw, &phi_j)| dw * (phi_j - phi[i]))
                        .sum();
                    -sum / rho_i
                }
                FieldMode::FieldCoupling => {
                    let sum: f64 = self.w.iter().zip(phi).map(|(dw, &phi_j)| dw * phi_j).sum();
                    -phi[i] * sum / rho_i
                }
            };
            *out = phi[i] + dt * dphi;
        }

        self.particles.phi = phi_new;
        log::debug!(
            "field updated ({mode:?}, dt = {dt}); total real field = {}",
            self.particles.total_field()
        );
        Ok(())
    }

    /// Reinterpolate the field: `phi_i = (1/rho_i) sum_j W(x_i - x_j, h) phi_j`.
    ///
    /// Errors: `Error::SingularDensity` if any density is not finite and > 0.
    pub fn compute_phi(&mut self) -> Result<()> {
        let h = self.check_particles()?;
        self.particles.check_density()?;

        let mut sph_phi = vec![0.0; self.nopart];
        for (i, out) in sph_phi.iter_mut().enumerate() {
            kernel_row(
                &self.kernel,
                &self.particles.x,
                i,
                h,
                KernelOrder::Value,
                &mut self.rel,
                &mut self.w,
            )?;
            let sum: f64 = self
                .w
                .iter()
                .zip(&self.particles.phi)
                .map(|(w, phi_j)| w * phi_j)
                .sum();
            *out = sum / self.particles.rho[i];
        }
        self.particles.phi = sph_phi;
        Ok(())
    }

    /// Move every real particle by `dt * rate`, apply the boundary, then re-sort.
    ///
    /// Returns the sort permutation (`perm[new] = old`).
    ///
    /// Errors:
    /// - `Error::NotConfigured` before `configure_solver`.
    /// - `Error::InvalidDisplacement` if a periodic step would move a particle
    ///   by at least the period. No position is changed in that case.
    pub fn update_position_euler(&mut self, opts: &PositionUpdate) -> Result<Vec<usize>> {
        let dt = self.dt()?;
        self.check_particles()?;

        let mut x_new = self.particles.x.clone();
        let mut wrapped = 0usize;
        for (i, xi) in x_new.iter_mut().enumerate() {
            if !self.particles.tag[i].is_real() {
                continue;
            }
            let rate = match opts.rate_source {
                RateSource::External => self.rate.at(i),
                RateSource::Field => self.particles.phi[i],
            };
            let displacement = dt * rate;
            let moved = *xi + displacement;
            *xi = match opts.boundary {
                Boundary::Open => moved,
                Boundary::Periodic { a, b } => {
                    let period = b - a;
                    if displacement.abs() >= period {
                        return Err(Error::InvalidDisplacement {
                            index: i,
                            displacement,
                            period,
                        });
                    }
                    if moved >= b {
                        wrapped += 1;
                        log::trace!("particle {i} wrapped from {moved} across upper bound {b}");
                        moved - period
                    } else if moved <= a {
                        wrapped += 1;
                        log::trace!("particle {i} wrapped from {moved} across lower bound {a}");
                        moved + period
                    } else {
                        moved
                    }
                }
            };
            if !xi.is_finite() {
                return Err(Error::InvalidParam(format!(
                    "position of particle {i} became non-finite (rate = {rate})"
                )));
            }
        }

        self.particles.x = x_new;
        if wrapped > 0 {
            log::debug!("{wrapped} particles wrapped across the periodic boundary");
        }
        self.reorder()
    }

    /// Sort every per-particle attribute by position, including a per-particle rate.
    pub fn reorder(&mut self) -> Result<Vec<usize>> {
        self.check_particles()?;
        let perm = self.particles.reorder()?;
        if let Rate::PerParticle(values) = &mut self.rate {
            apply_permutation(values, &perm)?;
        }
        Ok(perm)
    }

    /// One full step: density, field, position. Advances the elapsed time by `dt`.
    pub fn step(&mut self, config: &StepConfig) -> Result<()> {
        let dt = self.dt()?;
        self.update_rho()?;
        self.update_field_euler(config.field_mode)?;
        self.update_position_euler(&config.position)?;
        self.steps += 1;
        self.elapsed += dt;
        log::debug!("step {} done, t = {}", self.steps, self.elapsed);
        Ok(())
    }

    /// Step until the elapsed time reaches `tf`. Returns the number of steps taken.
    pub fn run(&mut self, config: &StepConfig) -> Result<u64> {
        if self.time.is_none() {
            return Err(Error::NotConfigured);
        }
        let start = self.steps;
        while !self.is_finished() {
            if let Err(e) = self.step(config) {
                log::warn!("run stopped at t = {} after error: {e}", self.elapsed);
                return Err(e);
            }
        }
        Ok(self.steps - start)
    }

    fn check_particles(&self) -> Result<f64> {
        self.particles.validate()?;
        if self.particles.len() != self.nopart {
            return Err(Error::InconsistentParticleSet(format!(
                "particle count changed from {} to {}",
                self.nopart,
                self.particles.len()
            )));
        }
        self.particles.smoothing_length()
    }
}

/// Evaluate the kernel for `x_i - x_j` over all `j`, into `w`.
fn kernel_row<K: Kernel>(
    kernel: &K,
    x: &[f64],
    i: usize,
    h: f64,
    order: KernelOrder,
    rel: &mut Vec<f64>,
    w: &mut Vec<f64>,
) -> Result<()> {
    let xi = x[i];
    rel.clear();
    rel.extend(x.iter().map(|&xj| xi - xj));
    w.clear();
    w.resize(x.len(), 0.0);
    kernel.evaluate_into(rel, h, order, w)
}
