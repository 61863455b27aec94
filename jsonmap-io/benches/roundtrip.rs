use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsonmap_format::Context;
use jsonmap_test_utils::{test_mapper, InnerThing, OuterSliceThing};

fn generate_record(count: usize) -> OuterSliceThing {
    OuterSliceThing {
        inner_things: (0..count)
            .map(|i| InnerThing {
                foo: format!("item{}", i % 1000),
                an_int: (i % 11) as i64,
                a_bool: i % 2 == 0,
            })
            .collect(),
    }
}

fn bench_marshal(c: &mut Criterion) {
    let mapper = test_mapper();
    let ctx = Context::empty();
    let mut group = c.benchmark_group("marshal");

    for count in [10usize, 1_000] {
        let record = generate_record(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &record, |b, record| {
            b.iter(|| mapper.marshal(&ctx, black_box(record)).unwrap())
        });
    }

    group.finish();
}

fn bench_unmarshal(c: &mut Criterion) {
    let mapper = test_mapper();
    let ctx = Context::empty();
    let mut group = c.benchmark_group("unmarshal");

    for count in [10usize, 1_000] {
        let data = mapper.marshal(&ctx, &generate_record(count)).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| {
                let mut dst = OuterSliceThing::default();
                mapper.unmarshal(&ctx, black_box(data), &mut dst).unwrap();
                dst
            })
        });
    }

    group.finish();
}

fn bench_rejection(c: &mut Criterion) {
    let mapper = test_mapper();
    let ctx = Context::empty();
    let data = br#"{"inner_things": [{"foo": "", "an_int": 99, "a_bool": 1}]}"#;

    c.bench_function("unmarshal_rejected", |b| {
        b.iter(|| {
            let mut dst = OuterSliceThing::default();
            mapper
                .unmarshal(&ctx, black_box(data), &mut dst)
                .unwrap_err()
        })
    });
}

criterion_group!(benches, bench_marshal, bench_unmarshal, bench_rejection);
criterion_main!(benches);
