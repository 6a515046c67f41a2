use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use specthermo::edge::{EdgeLocator, EdgeMethod, EdgeParameters, EdgeSearchState};
use specthermo::smoothing::smooth_boxcar;
use specthermo::spectrum::Spectrum;

/// Noisy absorption edge at 60 % of the range
fn generate_spectrum(points: usize) -> Spectrum {
    let edge = points as f64 * 0.6;
    let wavelengths: Vec<f64> = (0..points).map(|i| 400.0 + i as f64 * 0.5).collect();
    let intensities = (0..points)
        .map(|i| {
            let x = i as f64;
            let base = if x < edge { 1000.0 } else { 1000.0 + 80.0 * (x - edge) };
            base + (x * 0.37).sin() * 5.0
        })
        .collect();
    Spectrum::new(wavelengths, intensities).expect("valid spectrum")
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");

    for points in [256, 1024, 2048] {
        let spectrum = generate_spectrum(points);
        group.throughput(Throughput::Elements(points as u64));

        for method in [EdgeMethod::Constant, EdgeMethod::Inchworm, EdgeMethod::InchwormVit] {
            let locator = EdgeLocator::new(EdgeParameters {
                method,
                ..Default::default()
            });
            group.bench_with_input(
                BenchmarkId::new(method.to_string(), points),
                &spectrum,
                |b, spectrum| {
                    b.iter(|| {
                        let mut state = EdgeSearchState::default();
                        black_box(locator.locate(black_box(spectrum), &mut state))
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_windowed_search(c: &mut Criterion) {
    let spectrum = generate_spectrum(2048);
    let locator = EdgeLocator::new(EdgeParameters::default());
    let mut state = EdgeSearchState::default();
    let _ = locator.locate(&spectrum, &mut state);

    c.bench_function("locate_with_memory_2048", |b| {
        b.iter(|| {
            let mut state = state;
            black_box(locator.locate(black_box(&spectrum), &mut state))
        })
    });
}

fn bench_smoothing(c: &mut Criterion) {
    let spectrum = generate_spectrum(2048);
    let mut group = c.benchmark_group("smooth_boxcar");
    for half in [2usize, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(half), &half, |b, &half| {
            b.iter(|| black_box(smooth_boxcar(black_box(spectrum.intensities()), half)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_locate, bench_windowed_search, bench_smoothing);
criterion_main!(benches);
