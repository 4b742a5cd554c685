use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the solver core.
///
/// Every failure is detected inside the offending operation and returned
/// immediately. A step that fails may leave the particle set partially
/// updated; callers must re-seed state before stepping again.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter (non-finite step size, NaN position, bad domain, ...).
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Kernel evaluated with a derivative order other than 0 or 1.
    #[error("invalid kernel order {0}: expected 0 (value) or 1 (first derivative)")]
    InvalidKernelOrder(u8),

    /// A density used as a divisor is zero, negative or not finite.
    #[error("singular density at particle {index}: rho = {rho}")]
    SingularDensity { index: usize, rho: f64 },

    /// Parallel particle attributes disagree in length, or `h` is empty.
    #[error("inconsistent particle set: {0}")]
    InconsistentParticleSet(String),

    /// Periodic wrap requested for a displacement at least as large as the period.
    #[error("displacement {displacement} of particle {index} is not smaller than the period {period}")]
    InvalidDisplacement {
        index: usize,
        displacement: f64,
        period: f64,
    },

    /// A time-stepping operation was invoked before `configure_solver`.
    #[error("solver not configured: call configure_solver(dt, tf) first")]
    NotConfigured,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::SingularDensity { index: 3, rho: 0.0 };
        let msg = format!("{e}");
        assert!(msg.contains("singular density"));
        assert!(msg.contains("particle 3"));
    }

    #[test]
    fn kernel_order_error_names_order() {
        let msg = Error::InvalidKernelOrder(2).to_string();
        assert!(msg.contains("order 2"));
    }

    #[test]
    fn result_type_alias_compiles() -> Result<()> {
        Ok(())
    }
}
