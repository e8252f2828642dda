use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use posekit_core::{combine, Clip, Track, TrackProperty};

fn mk_clip(name: &str, bones: usize, samples: usize, duration: f32) -> Clip {
    let times: Vec<f32> = (0..samples)
        .map(|i| duration * i as f32 / (samples - 1) as f32)
        .collect();
    let tracks = (0..bones)
        .map(|b| {
            let values = times.iter().flat_map(|_| [0.0, 0.0, 0.0, 1.0]).collect();
            Track::new(format!("Bone_{b}"), TrackProperty::Rotation, times.clone(), values)
        })
        .collect();
    Clip::new(name, duration, tracks)
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_clips");
    for &bones in &[16usize, 64, 128] {
        let clips: Vec<Clip> = (0..4)
            .map(|i| mk_clip(&format!("clip{i}"), bones, 60, 1.0 + i as f32))
            .collect();
        let refs: Vec<&Clip> = clips.iter().collect();
        group.bench_with_input(BenchmarkId::from_parameter(bones), &refs, |b, refs| {
            b.iter(|| black_box(combine(black_box(refs))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_combine);
criterion_main!(benches);
