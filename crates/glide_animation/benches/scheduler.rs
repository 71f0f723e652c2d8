use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glide_animation::{fn_target, Easing, LoopType, TweenScheduler};
use glide_core::Vec3;

fn easing_benchmark(c: &mut Criterion) {
    c.bench_function("elastic_out_apply", |b| {
        b.iter(|| black_box(Easing::ElasticOut.apply(black_box(0.37))))
    });
    c.bench_function("cubic_bezier_apply", |b| {
        let ease = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);
        b.iter(|| black_box(ease.apply(black_box(0.37))))
    });
}

fn scheduler_advance_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_advance");

    for count in [10, 100, 1000].iter() {
        let mut scheduler = TweenScheduler::new();
        for i in 0..*count {
            scheduler
                .tween(
                    fn_target(|v: Vec3| {
                        black_box(v);
                    }),
                    Vec3::ZERO,
                    Vec3::new(i as f32, 1.0, 2.0),
                    1.0,
                )
                .ease(Easing::QuadInOut)
                .looping(LoopType::PingPong, 0.0)
                .start()
                .ok();
        }

        group.bench_function(format!("{}_tweens", count), |b| {
            b.iter(|| scheduler.advance(black_box(1.0 / 60.0)))
        });
    }
    group.finish();
}

fn pooled_churn_benchmark(c: &mut Criterion) {
    let mut scheduler = TweenScheduler::new();
    c.bench_function("start_and_finish_100_tweens", |b| {
        b.iter(|| {
            for _ in 0..100 {
                scheduler
                    .tween(fn_target(|_: f32| {}), 0.0, 1.0, 0.01)
                    .start()
                    .ok();
            }
            scheduler.advance(1.0);
        })
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    scheduler_advance_benchmark,
    pooled_churn_benchmark
);
criterion_main!(benches);
