use nalgebra::DMatrix;
use topo_core::{
    Bounds, Lbfgs, LbfgsConfig, LocalMinimizer, Minimization, MinimumId, Potential,
    TransitionStateId,
};

struct Tilted {
    bounds: Bounds,
}

impl Potential for Tilted {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn value(&self, x: &[f64]) -> f64 {
        x[0]
    }

    fn gradient(&self, _x: &[f64]) -> Vec<f64> {
        vec![1.0]
    }
}

struct Identity;

impl LocalMinimizer for Identity {
    fn minimize(&self, potential: &dyn Potential, start: &[f64]) -> Minimization {
        Minimization {
            point: start.to_vec(),
            value: potential.value(start),
            gradient_norm: 0.0,
            converged: true,
            iterations: 0,
        }
    }
}

fn assert_send_sync<T: Send + Sync + ?Sized>() {}

#[test]
fn traits_are_object_safe_and_thread_safe() {
    assert_send_sync::<dyn Potential>();
    assert_send_sync::<dyn LocalMinimizer>();

    let potential: Box<dyn Potential> = Box::new(Tilted {
        bounds: Bounds::new(&[(-1.0, 1.0)]).unwrap(),
    });
    let minimizers: Vec<Box<dyn LocalMinimizer>> =
        vec![Box::new(Identity), Box::new(Lbfgs::new(LbfgsConfig::default()))];

    assert_eq!(potential.name(), "potential");
    assert_eq!(potential.dimension(), 1);
    assert!(potential.hessian(&[0.0]).is_none());
    assert_eq!(potential.value_and_gradient(&[0.5]), (0.5, vec![1.0]));

    let identity = minimizers[0].minimize(potential.as_ref(), &[0.25]);
    assert_eq!(identity.point, vec![0.25]);

    // A constant slope drives the bounded minimiser onto the lower face.
    let bounded = minimizers[1].minimize(potential.as_ref(), &[0.25]);
    assert!(bounded.converged);
    assert_eq!(bounded.point, vec![-1.0]);
}

#[test]
fn identifiers_round_trip_raw_values() {
    let minimum = MinimumId::from_raw(3);
    let ts = TransitionStateId::from_raw(5);
    assert_eq!(minimum.as_raw(), 3);
    assert_eq!(minimum.index(), 3);
    assert_eq!(ts.as_raw(), 5);
    assert!(MinimumId::from_raw(1) < minimum);
    let _ = DMatrix::<f64>::identity(1, 1);
}
