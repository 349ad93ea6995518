//! Benchmarks for LSCM parameterization.

use criterion::{criterion_group, criterion_main, Criterion};
use conformap::algo::parameterize::{conformal_energy_matrix, SolverOptions};
use conformap::prelude::*;
use nalgebra::Point3;

fn create_grid_mesh(n: usize) -> TriMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    // Create a gently curved grid so the result is not a plain rescale
    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f64 / n as f64, j as f64 / n as f64);
            vertices.push(Point3::new(x, y, 0.25 * (x * x - y * y)));
        }
    }

    // Create triangles
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_energy_assembly(c: &mut Criterion) {
    let mesh = create_grid_mesh(50);
    c.bench_function("assemble_energy_50x50", |b| {
        b.iter(|| conformal_energy_matrix(&mesh))
    });
}

fn bench_lscm(c: &mut Criterion) {
    let mut group = c.benchmark_group("lscm");
    group.sample_size(20);

    let mesh = create_grid_mesh(30);
    group.bench_function("cholesky_30x30", |b| {
        b.iter(|| lscm(&mesh, &LSCMOptions::default()).unwrap())
    });

    let cg = SolverOptions::conjugate_gradient().with_max_iterations(10_000);
    let options = LSCMOptions::default().with_solver(cg.clone());
    group.bench_function("cg_30x30", |b| b.iter(|| lscm(&mesh, &options).unwrap()));

    let parallel = LSCMOptions::default().with_solver(cg.parallel());
    group.bench_function("cg_parallel_30x30", |b| {
        b.iter(|| lscm(&mesh, &parallel).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_energy_assembly, bench_lscm);
criterion_main!(benches);
