use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{
    FieldMode, GaussianKernel, ParticleSet, PositionUpdate, Rate, RiemannSolver1D, StepConfig,
    Tag,
};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_vec(arr: &PyReadonlyArray1<'_, f64>) -> PyResult<Vec<f64>> {
    Ok(arr.as_slice().map_err(py_err)?.to_vec())
}

fn mode_from_flag(field: bool) -> FieldMode {
    if field {
        FieldMode::FieldCoupling
    } else {
        FieldMode::Diffusion
    }
}

fn position_update(periodic: Option<(f64, f64)>, field: bool) -> PyResult<PositionUpdate> {
    let mut opts = PositionUpdate::default();
    if let Some((a, b)) = periodic {
        opts = opts.periodic(a, b).map_err(py_err)?;
    }
    if field {
        opts = opts.field_rate();
    }
    Ok(opts)
}

/// Python-facing wrapper around the Rust solver.
///
/// API:
/// - __new__(x, phi, tag, h, egn, rho=None, phi_initial=None)
/// - configure_solver(dt, tf)
/// - update_rho(), update_field_euler(field=False), compute_phi()
/// - update_position_euler(periodic=None, field=False) -> permutation
/// - reorder() -> permutation, step(...), run(...)
/// - x, rho, phi, tag -> np.ndarray
#[pyclass(name = "RiemannSolver1D")]
pub struct PyRiemannSolver1D {
    solver: RiemannSolver1D<GaussianKernel>,
}

#[pymethods]
impl PyRiemannSolver1D {
    /// Parameters
    /// - x, phi: float64 arrays of length N
    /// - tag: int64 array of length N, 1 = real (mobile), 0 = ghost (fixed)
    /// - h: smoothing length, scalar
    /// - egn: scalar rate or float64 array of length N
    /// - rho: optional initial densities (default zeros)
    /// - phi_initial: optional reference field (default: copy of phi)
    ///
    /// Errors: raises ValueError on inconsistent lengths or invalid values.
    #[new]
    #[pyo3(signature = (x, phi, tag, h, egn, rho=None, phi_initial=None))]
    fn new(
        x: PyReadonlyArray1<'_, f64>,
        phi: PyReadonlyArray1<'_, f64>,
        tag: PyReadonlyArray1<'_, i64>,
        h: f64,
        egn: &Bound<'_, PyAny>,
        rho: Option<PyReadonlyArray1<'_, f64>>,
        phi_initial: Option<PyReadonlyArray1<'_, f64>>,
    ) -> PyResult<Self> {
        let x = to_vec(&x)?;
        let phi = to_vec(&phi)?;
        let n = x.len();
        let tag = tag
            .as_slice()
            .map_err(py_err)?
            .iter()
            .map(|&t| Tag::try_from(t))
            .collect::<crate::error::Result<Vec<_>>>()
            .map_err(py_err)?;
        let rho = match rho {
            Some(r) => to_vec(&r)?,
            None => vec![0.0; n],
        };
        let phi_initial = match phi_initial {
            Some(p) => to_vec(&p)?,
            None => phi.clone(),
        };
        let rate = match egn.extract::<f64>() {
            Ok(v) => Rate::Uniform(v),
            Err(_) => Rate::PerParticle(egn.extract::<Vec<f64>>()?),
        };
        let particles = ParticleSet::new(x, rho, phi, tag, vec![h; n]).map_err(py_err)?;
        let solver =
            RiemannSolver1D::new(particles, phi_initial, GaussianKernel, rate).map_err(py_err)?;
        Ok(Self { solver })
    }

    /// Set the step size `dt` and the intended stop time `tf`.
    fn configure_solver(&mut self, dt: f64, tf: f64) -> PyResult<()> {
        self.solver.configure_solver(dt, tf).map_err(py_err)
    }

    fn update_rho(&mut self, py: Python<'_>) -> PyResult<()> {
        py.detach(|| self.solver.update_rho()).map_err(py_err)
    }

    /// Euler field update; `field=True` selects field-coupling mode.
    #[pyo3(signature = (field=false))]
    fn update_field_euler(&mut self, py: Python<'_>, field: bool) -> PyResult<()> {
        py.detach(|| self.solver.update_field_euler(mode_from_flag(field)))
            .map_err(py_err)
    }

    fn compute_phi(&mut self, py: Python<'_>) -> PyResult<()> {
        py.detach(|| self.solver.compute_phi()).map_err(py_err)
    }

    /// Euler position update followed by a re-sort. Returns the permutation applied.
    ///
    /// Parameters
    /// - periodic: optional (a, b) domain for a single periodic wrap
    /// - field: if True, each particle moves with its own field value
    #[pyo3(signature = (periodic=None, field=false))]
    fn update_position_euler(
        &mut self,
        periodic: Option<(f64, f64)>,
        field: bool,
    ) -> PyResult<Vec<usize>> {
        let opts = position_update(periodic, field)?;
        self.solver.update_position_euler(&opts).map_err(py_err)
    }

    fn reorder(&mut self) -> PyResult<Vec<usize>> {
        self.solver.reorder().map_err(py_err)
    }

    /// One full step (density, field, position).
    #[pyo3(signature = (periodic=None, field_mode=false, field_rate=false))]
    fn step(
        &mut self,
        periodic: Option<(f64, f64)>,
        field_mode: bool,
        field_rate: bool,
    ) -> PyResult<()> {
        let config = StepConfig::default()
            .field_mode(mode_from_flag(field_mode))
            .position(position_update(periodic, field_rate)?);
        self.solver.step(&config).map_err(py_err)
    }

    /// Step until `tf` is reached; returns the number of steps taken.
    #[pyo3(signature = (periodic=None, field_mode=false, field_rate=false))]
    fn run(
        &mut self,
        py: Python<'_>,
        periodic: Option<(f64, f64)>,
        field_mode: bool,
        field_rate: bool,
    ) -> PyResult<u64> {
        let config = StepConfig::default()
            .field_mode(mode_from_flag(field_mode))
            .position(position_update(periodic, field_rate)?);
        py.detach(|| self.solver.run(&config)).map_err(py_err)
    }

    #[getter]
    fn x<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.solver.particles.x.clone().into_pyarray(py)
    }

    #[getter]
    fn rho<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.solver.particles.rho.clone().into_pyarray(py)
    }

    #[getter]
    fn phi<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.solver.particles.phi.clone().into_pyarray(py)
    }

    #[getter]
    fn tag<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<i32>> {
        self.solver
            .particles
            .tag
            .iter()
            .map(|t| t.as_i32())
            .collect::<Vec<_>>()
            .into_pyarray(py)
    }

    #[getter]
    fn phi_initial<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.solver.phi_initial().to_vec().into_pyarray(py)
    }

    /// Simulated time advanced by step()/run().
    #[getter]
    fn time(&self) -> f64 {
        self.solver.elapsed()
    }

    #[getter]
    fn nopart(&self) -> usize {
        self.solver.num_particles()
    }
}

/// Free-function kernel: `kernel(d, h, order)` with order 0 (value) or 1 (derivative).
#[pyfunction]
fn kernel<'py>(
    py: Python<'py>,
    d: PyReadonlyArray1<'py, f64>,
    h: f64,
    order: u8,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let d = d.as_slice().map_err(py_err)?;
    let w = crate::core::gaussian_kernel(d, h, order).map_err(py_err)?;
    Ok(w.into_pyarray(py))
}

/// The riemann1d Python module entry point.
#[pymodule]
fn riemann1d(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRiemannSolver1D>()?;
    m.add_function(wrap_pyfunction!(kernel, m)?)?;
    Ok(())
}
