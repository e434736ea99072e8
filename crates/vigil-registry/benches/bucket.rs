use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vigil_registry::bucket::{advance_streak, day_bucket, seconds_until_rollover};

fn bench_bucket_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket");

    group.bench_function("advance_streak", |b| {
        b.iter(|| {
            let mut marker = None;
            for day in 0..365u64 {
                let update = advance_streak(black_box(day * 86_400 + 17), marker);
                marker = Some((update.day, update.streak));
            }
            black_box(marker);
        });
    });

    group.bench_function("rollover", |b| {
        b.iter(|| {
            let now = black_box(1_234_567_890u64);
            black_box(seconds_until_rollover(now, day_bucket(now)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_bucket_arithmetic);
criterion_main!(benches);
