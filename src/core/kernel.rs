//! Smoothing kernels for one-dimensional SPH sums.

use crate::error::{Error, Result};
use std::f64::consts::PI;

/// Support radius of the truncated Gaussian, in units of `h`.
pub const GAUSSIAN_SUPPORT: f64 = 3.0;

/// Derivative order of a kernel evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelOrder {
    /// W(d, h)
    Value,
    /// dW/dd (d, h)
    Derivative,
}

impl TryFrom<u8> for KernelOrder {
    type Error = Error;

    fn try_from(order: u8) -> Result<Self> {
        match order {
            0 => Ok(Self::Value),
            1 => Ok(Self::Derivative),
            other => Err(Error::InvalidKernelOrder(other)),
        }
    }
}

/// A radially symmetric smoothing kernel with compact support.
///
/// `d` is always the relative position `x_i - x_j`; the derivative is taken
/// with respect to `d`.
pub trait Kernel {
    /// Kernel value `W(d, h)`.
    fn value(&self, d: f64, h: f64) -> f64;

    /// First derivative `W'(d, h)`.
    fn derivative(&self, d: f64, h: f64) -> f64;

    /// Distance beyond which the kernel and its derivative vanish.
    fn support_radius(&self, h: f64) -> f64;

    #[inline]
    fn evaluate(&self, d: f64, h: f64, order: KernelOrder) -> f64 {
        match order {
            KernelOrder::Value => self.value(d, h),
            KernelOrder::Derivative => self.derivative(d, h),
        }
    }

    /// Evaluate elementwise over `d`, writing into `out` (same length).
    fn evaluate_into(&self, d: &[f64], h: f64, order: KernelOrder, out: &mut [f64]) -> Result<()> {
        check_smoothing_length(h)?;
        if d.len() != out.len() {
            return Err(Error::InvalidParam(format!(
                "output length {} does not match input length {}",
                out.len(),
                d.len()
            )));
        }
        for (o, &di) in out.iter_mut().zip(d) {
            *o = self.evaluate(di, h, order);
        }
        Ok(())
    }

    /// Batch evaluation with an integer order (0 = value, 1 = derivative).
    ///
    /// Errors:
    /// - `Error::InvalidKernelOrder` for any other order.
    /// - `Error::InvalidParam` if `h` is not finite and > 0.
    fn evaluate_batch(&self, d: &[f64], h: f64, order: u8) -> Result<Vec<f64>> {
        let order = KernelOrder::try_from(order)?;
        let mut out = vec![0.0; d.len()];
        self.evaluate_into(d, h, order, &mut out)?;
        Ok(out)
    }
}

/// Validate a smoothing length.
pub fn check_smoothing_length(h: f64) -> Result<()> {
    if !h.is_finite() || h <= 0.0 {
        return Err(Error::InvalidParam(format!(
            "smoothing length must be finite and > 0, got {h}"
        )));
    }
    Ok(())
}

/// Gaussian kernel truncated at `3h`:
/// `W(d, h) = exp(-(d/h)^2) / (sqrt(pi) h)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaussianKernel;

impl GaussianKernel {
    #[inline]
    fn sigma(h: f64) -> f64 {
        1.0 / (PI.sqrt() * h)
    }
}

impl Kernel for GaussianKernel {
    #[inline]
    fn value(&self, d: f64, h: f64) -> f64 {
        let q = (d / h).abs();
        if q <= GAUSSIAN_SUPPORT {
            Self::sigma(h) * (-q * q).exp()
        } else {
            0.0
        }
    }

    #[inline]
    fn derivative(&self, d: f64, h: f64) -> f64 {
        let q = d / h;
        if q.abs() <= GAUSSIAN_SUPPORT {
            -2.0 * q * Self::sigma(h) * (-q * q).exp() / h
        } else {
            0.0
        }
    }

    #[inline]
    fn support_radius(&self, h: f64) -> f64 {
        GAUSSIAN_SUPPORT * h
    }
}

/// Batch Gaussian kernel with integer order, the free-function form used by
/// callers that do not hold a kernel value.
pub fn gaussian_kernel(d: &[f64], h: f64, order: u8) -> Result<Vec<f64>> {
    GaussianKernel.evaluate_batch(d, h, order)
}
