use proptest::prelude::*;
use riemann1d::core::{ParticleSet, PositionUpdate, RiemannSolver1D, Tag};

fn labelled(x: Vec<f64>) -> ParticleSet {
    let n = x.len();
    let rho = (0..n).map(|i| 1.0 + 2.0 * i as f64).collect();
    let phi = (0..n).map(|i| i as f64).collect();
    let tag = (0..n)
        .map(|i| if i % 3 == 0 { Tag::Ghost } else { Tag::Real })
        .collect();
    ParticleSet {
        name: "labelled".into(),
        x,
        rho,
        phi,
        tag,
        h: vec![0.1; n],
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128, .. ProptestConfig::default()
    })]

    /// Each particle's attributes travel with its position.
    #[test]
    fn reorder_preserves_identity(x in proptest::collection::vec(-10.0f64..10.0, 1..60)) {
        let mut p = labelled(x.clone());
        let before = p.clone();
        let perm = p.reorder().map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert!(p.is_sorted());
        let mut seen = perm.clone();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..x.len()).collect::<Vec<_>>());

        for (new, &old) in perm.iter().enumerate() {
            // phi carries the original index as a label
            prop_assert_eq!(p.phi[new], old as f64);
            prop_assert_eq!(p.x[new], before.x[old]);
            prop_assert_eq!(p.rho[new], before.rho[old]);
            prop_assert_eq!(p.tag[new], before.tag[old]);
        }

        let min_old = (0..x.len())
            .min_by(|&a, &b| before.x[a].total_cmp(&before.x[b]))
            .unwrap_or(0);
        prop_assert_eq!(p.x[0], before.x[min_old]);
        prop_assert_eq!(p.rho[0], before.rho[min_old]);
    }

    /// Position updates always leave the set sorted, whatever the per-particle rates.
    #[test]
    fn position_update_leaves_set_sorted(
        rates in proptest::collection::vec(-3.0f64..3.0, 2..30),
        periodic in any::<bool>()
    ) {
        let n = rates.len();
        let x: Vec<f64> = (0..n).map(|i| -0.9 + 1.8 * i as f64 / n as f64).collect();
        let p = labelled(x);
        let mut solver = RiemannSolver1D::gaussian(p, rates)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        solver.configure_solver(0.1, 1.0).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut opts = PositionUpdate::default();
        if periodic {
            opts = opts.periodic(-1.0, 1.0).map_err(|e| TestCaseError::fail(e.to_string()))?;
        }
        solver.update_position_euler(&opts).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(solver.particles.is_sorted());
        prop_assert_eq!(solver.particles.len(), n);
        if periodic {
            for &x in &solver.particles.x {
                prop_assert!((-1.0..=1.0).contains(&x), "x = {}", x);
            }
        }
    }
}
