use criterion::{black_box, criterion_group, criterion_main, Criterion};
use topo_core::functions::{Camelback, DoubleWell};
use topo_core::Lbfgs;
use topo_network::SimilarityComparer;
use topo_search::{HefConfig, HybridEigenvectorFollowing, NebConfig, NudgedElasticBand};

fn bench_searches(c: &mut Criterion) {
    let camel = Camelback::new();
    let neb = NudgedElasticBand::new(NebConfig::default()).unwrap();
    c.bench_function("neb_camelback", |b| {
        b.iter(|| {
            black_box(
                neb.run(&camel, &[0.089_842, -0.712_656], &[-0.089_842, 0.712_656])
                    .unwrap(),
            )
        });
    });

    let well = DoubleWell::new(6, 1.5).unwrap();
    let hef = HybridEigenvectorFollowing::new(HefConfig::default()).unwrap();
    let comparer = SimilarityComparer::absolute(1e-2, 1e-4, 6).unwrap();
    let minimizer = Lbfgs::default();
    let seed = [0.2, 0.1, -0.1, 0.05, 0.0, -0.05];
    c.bench_function("hef_double_well", |b| {
        b.iter(|| black_box(hef.run(&well, &minimizer, &comparer, &seed).unwrap()));
    });
}

criterion_group!(benches, bench_searches);
criterion_main!(benches);
