use approx::assert_relative_eq;
use riemann1d::core::{Boundary, ParticleSet, PositionUpdate, RiemannSolver1D, StepConfig, Tag};
use riemann1d::error::{Error, Result};

fn five(phi: Vec<f64>, rate: f64, dt: f64) -> Result<RiemannSolver1D> {
    let particles = ParticleSet::real(vec![-0.8, -0.4, 0.0, 0.4, 0.8], phi, 0.3)?;
    let mut solver = RiemannSolver1D::gaussian(particles, rate)?;
    solver.configure_solver(dt, 1.0)?;
    Ok(solver)
}

#[test]
fn wraps_once_across_upper_bound() -> Result<()> {
    let eps = 0.05;
    let displacement = 0.1;
    let particles = ParticleSet::real(vec![1.0 - eps], vec![0.0], 0.1)?;
    let mut solver = RiemannSolver1D::gaussian(particles, 1.0)?;
    solver.configure_solver(displacement, 1.0)?;
    solver.update_position_euler(&PositionUpdate::default().periodic(-1.0, 1.0)?)?;
    assert_relative_eq!(solver.particles.x[0], -1.0 + (displacement - eps), epsilon = 1e-12);
    Ok(())
}

#[test]
fn wraps_once_across_lower_bound() -> Result<()> {
    let particles = ParticleSet::real(vec![-0.95], vec![0.0], 0.1)?;
    let mut solver = RiemannSolver1D::gaussian(particles, -1.0)?;
    solver.configure_solver(0.1, 1.0)?;
    solver.update_position_euler(&PositionUpdate::default().periodic(-1.0, 1.0)?)?;
    assert_relative_eq!(solver.particles.x[0], 0.95, epsilon = 1e-12);
    Ok(())
}

#[test]
fn landing_on_upper_bound_wraps_to_lower() -> Result<()> {
    let particles = ParticleSet::real(vec![0.5], vec![0.0], 0.1)?;
    let mut solver = RiemannSolver1D::gaussian(particles, 1.0)?;
    solver.configure_solver(0.5, 1.0)?;
    solver.update_position_euler(&PositionUpdate::default().periodic(-1.0, 1.0)?)?;
    assert_eq!(solver.particles.x[0], -1.0);
    Ok(())
}

#[test]
fn open_boundary_lets_particles_leave() -> Result<()> {
    let mut solver = five(vec![0.0; 5], 5.0, 0.1)?;
    solver.update_position_euler(&PositionUpdate::default())?;
    assert_relative_eq!(solver.particles.x[4], 1.3, epsilon = 1e-12);
    Ok(())
}

/// Uniform rate 5 with dt = 0.1: the particle at 0.8 reaches 1.3 and wraps to -0.7.
#[test]
fn five_particle_periodic_shift() -> Result<()> {
    let mut solver = five(vec![1.0, 2.0, 3.0, 4.0, 5.0], 5.0, 0.1)?;
    let perm = solver.update_position_euler(&PositionUpdate::default().periodic(-1.0, 1.0)?)?;

    let expected = [-0.7, -0.3, 0.1, 0.5, 0.9];
    for (x, e) in solver.particles.x.iter().zip(expected) {
        assert_relative_eq!(*x, e, epsilon = 1e-12);
    }
    assert!(solver.particles.is_sorted());
    assert_eq!(perm, vec![4, 0, 1, 2, 3]);
    assert_eq!(solver.particles.phi, vec![5.0, 1.0, 2.0, 3.0, 4.0]);
    Ok(())
}

#[test]
fn full_periodic_step_keeps_positions_sorted() -> Result<()> {
    let mut solver = five(vec![1.0, 0.0, 0.0, 0.0, 0.0], 5.0, 0.1)?;
    let config = StepConfig::default().position(PositionUpdate {
        boundary: Boundary::periodic(-1.0, 1.0)?,
        ..PositionUpdate::default()
    });
    solver.step(&config)?;
    assert!(solver.particles.is_sorted());
    assert!(solver.particles.x.iter().all(|&x| (-1.0..1.0).contains(&x)));
    assert!(solver.particles.rho.iter().all(|&r| r > 0.0));
    assert_relative_eq!(solver.elapsed(), 0.1);
    Ok(())
}

/// Rate 5 with dt = 0.5 moves every particle by more than the period.
#[test]
fn displacement_beyond_period_is_rejected() -> Result<()> {
    let mut solver = five(vec![1.0, 0.0, 0.0, 0.0, 0.0], 5.0, 0.5)?;
    let before = solver.particles.x.clone();
    let err = solver
        .update_position_euler(&PositionUpdate::default().periodic(-1.0, 1.0)?)
        .unwrap_err();
    match err {
        Error::InvalidDisplacement {
            displacement,
            period,
            ..
        } => {
            assert_relative_eq!(displacement, 2.5);
            assert_relative_eq!(period, 2.0);
        }
        other => panic!("expected InvalidDisplacement, got {other:?}"),
    }
    assert_eq!(solver.particles.x, before);
    Ok(())
}

#[test]
fn field_rate_with_periodic_wrap() -> Result<()> {
    let particles = ParticleSet::real(vec![-0.5, 0.9], vec![1.0, 2.0], 0.1)?;
    let mut solver = RiemannSolver1D::gaussian(particles, 0.0)?;
    solver.configure_solver(0.1, 1.0)?;
    solver.update_position_euler(&PositionUpdate::default().periodic(-1.0, 1.0)?.field_rate())?;
    // 0.9 + 0.2 = 1.1 wraps to -0.9 and sorts first
    assert_relative_eq!(solver.particles.x[0], -0.9, epsilon = 1e-12);
    assert_relative_eq!(solver.particles.x[1], -0.4, epsilon = 1e-12);
    assert_eq!(solver.particles.phi, vec![2.0, 1.0]);
    Ok(())
}

#[test]
fn ghosts_outside_domain_are_not_wrapped() -> Result<()> {
    let particles = ParticleSet::new(
        vec![-1.1, 0.0, 1.1],
        vec![1.0; 3],
        vec![0.0; 3],
        vec![Tag::Ghost, Tag::Real, Tag::Ghost],
        vec![0.2; 3],
    )?;
    let mut solver = RiemannSolver1D::gaussian(particles, 1.0)?;
    solver.configure_solver(0.1, 1.0)?;
    solver.update_position_euler(&PositionUpdate::default().periodic(-1.0, 1.0)?)?;
    assert_eq!(solver.particles.x[0], -1.1);
    assert_eq!(solver.particles.x[2], 1.1);
    Ok(())
}
