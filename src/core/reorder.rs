//! Position sort applied in lockstep to every per-particle attribute.

use crate::core::particle::ParticleSet;
use crate::error::{Error, Result};
use ordered_float::NotNan;

/// Permutation that sorts `x` ascending: `perm[new] = old`.
///
/// Ties keep their current relative order. NaN positions are rejected.
pub fn sort_permutation(x: &[f64]) -> Result<Vec<usize>> {
    let keys = x
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            NotNan::new(v)
                .map_err(|_| Error::InvalidParam(format!("position of particle {i} is NaN")))
        })
        .collect::<Result<Vec<_>>>()?;
    let mut perm: Vec<usize> = (0..x.len()).collect();
    perm.sort_by_key(|&i| keys[i]);
    Ok(perm)
}

/// Gather `values` through `perm` so that `values[new] = old_values[perm[new]]`.
pub fn apply_permutation<T: Clone>(values: &mut Vec<T>, perm: &[usize]) -> Result<()> {
    if values.len() != perm.len() {
        return Err(Error::InconsistentParticleSet(format!(
            "cannot permute {} values with a permutation of length {}",
            values.len(),
            perm.len()
        )));
    }
    let permuted: Vec<T> = perm.iter().map(|&old| values[old].clone()).collect();
    *values = permuted;
    Ok(())
}

impl ParticleSet {
    /// Sort all attributes by position and return the permutation applied.
    pub fn reorder(&mut self) -> Result<Vec<usize>> {
        self.validate()?;
        let perm = sort_permutation(&self.x)?;
        if perm.iter().enumerate().all(|(new, &old)| new == old) {
            return Ok(perm);
        }
        apply_permutation(&mut self.x, &perm)?;
        apply_permutation(&mut self.rho, &perm)?;
        apply_permutation(&mut self.phi, &perm)?;
        apply_permutation(&mut self.tag, &perm)?;
        apply_permutation(&mut self.h, &perm)?;
        Ok(perm)
    }
}
