use topo_core::functions::{Camelback, DoubleWell, Quadratic, Schwefel};
use topo_core::{curvature, finite_difference_hessian, Bounds, Potential};

fn numeric_gradient(potential: &dyn Potential, x: &[f64]) -> Vec<f64> {
    let mut probe = x.to_vec();
    (0..x.len())
        .map(|i| {
            let h = 1e-6 * x[i].abs().max(1.0);
            probe[i] = x[i] + h;
            let up = potential.value(&probe);
            probe[i] = x[i] - h;
            let down = potential.value(&probe);
            probe[i] = x[i];
            (up - down) / (2.0 * h)
        })
        .collect()
}

fn check_gradient(potential: &dyn Potential, x: &[f64]) {
    let analytic = potential.gradient(x);
    let numeric = numeric_gradient(potential, x);
    for (a, n) in analytic.iter().zip(&numeric) {
        assert!((a - n).abs() < 1e-4 * n.abs().max(1.0), "{a} vs {n}");
    }
}

#[test]
fn analytic_gradients_match_finite_differences() {
    check_gradient(&Schwefel::new(3).unwrap(), &[120.0, -310.5, 42.0]);
    check_gradient(&Camelback::new(), &[0.7, -0.3]);
    check_gradient(&DoubleWell::new(3, 2.0).unwrap(), &[0.4, -0.2, 1.1]);
    let bowl = Quadratic::new(
        Bounds::uniform(2, -5.0, 5.0).unwrap(),
        vec![1.0, 2.0],
        vec![3.0, 0.5],
    )
    .unwrap();
    check_gradient(&bowl, &[-1.0, 4.0]);
}

#[test]
fn analytic_hessians_match_finite_differences() {
    let camel = Camelback::new();
    let x = [0.4, 0.9];
    let analytic = camel.hessian(&x).unwrap();
    let numeric = finite_difference_hessian(&camel, &x, 1e-5);
    for (a, n) in analytic.iter().zip(numeric.iter()) {
        assert!((a - n).abs() < 1e-4, "{a} vs {n}");
    }
}

#[test]
fn double_well_origin_has_one_negative_direction() {
    let well = DoubleWell::new(3, 1.5).unwrap();
    let spectrum = curvature(&well, &[0.0, 0.0, 0.0], 1e-5);
    assert_eq!(spectrum.negative_count(1e-8), 1);
    let (lowest, mode) = spectrum.lowest();
    assert!((lowest + 4.0).abs() < 1e-12);
    assert!((mode[0].abs() - 1.0).abs() < 1e-12);
    assert!(spectrum.eigenvalues.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn schwefel_falls_back_to_numeric_curvature() {
    let surface = Schwefel::new(2).unwrap();
    assert!(surface.hessian(&[1.0, 1.0]).is_none());
    let x = [Schwefel::MINIMUM_COORDINATE; 2];
    let spectrum = curvature(&surface, &x, 1e-5);
    assert_eq!(spectrum.negative_count(1e-8), 0);
    assert!(surface.global_minimum_value().abs() < 1e-3);
}
