use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use det_score::cache::IouCache;
use det_score::evaluator::{calculate_final_score, search_best_cutoff};
use det_score::matching::calculate_precision;
use det_score::metrics::calculate_iou;
use det_score::scorer::calculate_image_precision;
use det_score::threshold::{generate_cutoff_range, COMPETITION_IOU_THRESHOLDS};
use det_score::types::{BoundingBox, BoxFormat, ImageRecord, Prediction};

fn offset_boxes(n: usize, shift: f64) -> Vec<BoundingBox> {
    (0..n)
        .map(|i| {
            let offset = (i as f64) * 12.0 + shift;
            BoundingBox::new(offset, offset, offset + 50.0, offset + 50.0)
        })
        .collect()
}

fn record(n: usize) -> ImageRecord {
    let gts = offset_boxes(n, 0.0);
    let predictions = offset_boxes(n, 3.0)
        .into_iter()
        .enumerate()
        .map(|(i, b)| Prediction::new(b, 0.99 - i as f64 / (n as f64 * 2.0)))
        .collect();
    ImageRecord::new(gts, predictions)
}

fn bench_iou(c: &mut Criterion) {
    let gt = BoundingBox::new(10.0, 10.0, 60.0, 60.0);
    let pred = BoundingBox::new(30.0, 30.0, 80.0, 80.0);

    c.bench_function("iou_single", |b| {
        b.iter(|| calculate_iou(black_box(&gt), black_box(&pred), BoxFormat::Corners));
    });
}

fn bench_greedy_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy_matching");

    for size in [10, 50, 100, 500].iter() {
        let gts = offset_boxes(*size, 0.0);
        let preds = offset_boxes(*size, 3.0);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut cache = IouCache::new(gts.len(), preds.len());
                black_box(calculate_precision(&gts, &preds, 0.5, BoxFormat::Corners, &mut cache))
            });
        });
    }
    group.finish();
}

fn bench_image_precision(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_precision");

    for size in [10, 50, 100].iter() {
        let r = record(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                calculate_image_precision(
                    black_box(&r.gt_boxes),
                    black_box(&r.predictions),
                    &COMPETITION_IOU_THRESHOLDS,
                    BoxFormat::Corners,
                )
            });
        });
    }
    group.finish();
}

fn bench_dataset(c: &mut Criterion) {
    let records: Vec<ImageRecord> = (0..200).map(|_| record(40)).collect();
    let candidates = generate_cutoff_range(0.2, 0.5, 0.01).unwrap();

    c.bench_function("final_score_200_images", |b| {
        b.iter(|| calculate_final_score(black_box(&records), 0.4));
    });

    c.bench_function("cutoff_search_200_images", |b| {
        b.iter(|| search_best_cutoff(black_box(&records), &candidates));
    });
}

criterion_group!(
    benches,
    bench_iou,
    bench_greedy_matching,
    bench_image_precision,
    bench_dataset
);
criterion_main!(benches);
