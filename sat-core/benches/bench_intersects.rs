use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sat_core::{intersects, rotate_all, P2};

/// Regular polygon with `n` vertices around `center`.
fn regular_polygon(center: P2, radius: f64, n: usize) -> Vec<P2> {
    (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            P2::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            )
        })
        .collect()
}

/// Sweep a rotating rectangle past a fixed one, the way the demo does.
fn sweep_rectangles() -> usize {
    let fixed = regular_polygon(P2::new(425.0, 240.0), 35.0, 4);
    let mut hits = 0;
    for step in 0..1000 {
        let x = step as f64 * 0.85;
        let mut moving = vec![
            P2::new(x, 100.0),
            P2::new(x + 100.0, 100.0),
            P2::new(x + 100.0, 250.0),
            P2::new(x, 250.0),
        ];
        rotate_all(&mut moving, P2::new(x + 50.0, 175.0), step as f64 * 0.36);
        if intersects(&moving, &fixed) {
            hits += 1;
        }
    }
    hits
}

pub fn intersects_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Intersects Group");

    group.bench_function("sweep_rectangles", |bencher| {
        bencher.iter(|| sweep_rectangles())
    });

    // Worst case: overlapping polygons test every axis of both.
    let a = regular_polygon(P2::new(0.0, 0.0), 10.0, 32);
    let b = regular_polygon(P2::new(1.0, 1.0), 10.0, 32);
    group.bench_function("overlapping_32_gons", |bencher| {
        bencher.iter(|| intersects(black_box(&a), black_box(&b)))
    });
}

criterion_group!(benches, intersects_benchmark);
criterion_main!(benches);
