use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use doublet_lattice::geometry::{AeroGrid, Panel};
use doublet_lattice::influence::{build_unsteady_ajj, Method};
use doublet_lattice::math::{R3, Scalar};

fn rect_wing(nx: usize, ny: usize) -> AeroGrid {
    let chord = 1.0 / nx as Scalar;
    let width = 4.0 / ny as Scalar;
    let mut panels = Vec::new();
    for i in 0..nx {
        for j in 0..ny {
            let x0 = i as Scalar * chord;
            let y0 = -2.0 + j as Scalar * width;
            panels.push(Panel::from_corners(
                (i * ny + j) as u32,
                [
                    R3::new(x0, y0, 0.0),
                    R3::new(x0 + chord, y0, 0.0),
                    R3::new(x0 + chord, y0 + width, 0.0),
                    R3::new(x0, y0 + width, 0.0),
                ],
            ));
        }
    }
    AeroGrid::new(panels).unwrap()
}

fn bench_unsteady_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("unsteady_ajj");
    let grid = rect_wing(4, 10);
    for method in [Method::Parabolic, Method::Quartic] {
        group.bench_function(BenchmarkId::new(format!("{method}"), grid.n()), |b| {
            b.iter(|| build_unsteady_ajj(&grid, 0.3, 0.5, method));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_unsteady_build);
criterion_main!(benches);
