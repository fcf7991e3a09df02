use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use attriblend_api_core::{AttrKind, AttrValue, Selector};
use attriblend_blend_core::{BlendMode, BlendOpConfig, BlendOpsManager, Dataset, PointTable};

const POINTS: usize = 4096;

fn dataset() -> Dataset {
    let mut t = PointTable::new(POINTS);
    t.ensure_attribute("Mass", AttrKind::Double);
    t.ensure_attribute("Velocity", AttrKind::Vec3);
    for i in 0..POINTS {
        let x = i as f64;
        t.write_attribute("Mass", i, &AttrValue::Double(x * 0.25));
        t.write_attribute("Velocity", i, &AttrValue::vec3(x, -x, x * 0.5));
    }
    Dataset::new(t)
}

fn deck() -> Vec<BlendOpConfig> {
    vec![
        BlendOpConfig::new(BlendMode::Average, Selector::parse("Mass").unwrap()),
        BlendOpConfig::new(BlendMode::Lerp, Selector::parse("Velocity").unwrap()),
        BlendOpConfig::new(BlendMode::UnsignedMax, Selector::parse("Mass").unwrap())
            .with_output(
                attriblend_blend_core::OutputMode::New,
                Some(Selector::parse("Peak").unwrap()),
            ),
    ]
}

fn pairwise_pass(c: &mut Criterion) {
    let ds = dataset();
    let mut mgr = BlendOpsManager::new(&ds);
    mgr.init(deck(), &ds, None).unwrap();
    c.bench_function("pairwise_pass_4096", |b| {
        b.iter(|| {
            for i in 0..POINTS {
                mgr.blend(black_box(i), i, 0.5);
            }
        })
    });
}

fn multi_source_pass(c: &mut Criterion) {
    let ds = dataset();
    let mut mgr = BlendOpsManager::new(&ds);
    mgr.init(deck(), &ds, None).unwrap();
    let mut trackers = Vec::new();
    c.bench_function("multi_blend_8x_fanin", |b| {
        b.iter(|| {
            mgr.init_trackers(&mut trackers);
            for t in 0..(POINTS / 8) {
                mgr.begin_multi_blend(t, &mut trackers);
                for s in 0..8 {
                    mgr.multi_blend(t * 8 + s, t, 0.75, &mut trackers);
                }
                mgr.end_multi_blend(t, &mut trackers);
            }
            black_box(&trackers);
        })
    });
}

criterion_group!(benches, pairwise_pass, multi_source_pass);
criterion_main!(benches);
