use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use structlist_core::{
    DynamicList, FieldType, OwnerRef, Sequence, SliceSpec, SortOptions, StructList, Value,
};

fn values(len: usize) -> Vec<Value> {
    (0..len as i64).rev().map(Value::Int).collect()
}

fn field(len: usize) -> StructList<i64> {
    StructList::with_values(FieldType::Int, OwnerRef::detached(), values(len)).unwrap()
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for size in [256, 4096, 65536] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, &size| {
            b.iter(|| {
                let mut list = DynamicList::new();
                for i in 0..size as i64 {
                    list.append(Value::Int(i)).unwrap();
                }
                black_box(list)
            });
        });
        group.bench_with_input(BenchmarkId::new("synchronized", size), &size, |b, &size| {
            b.iter(|| {
                let mut list = field(0);
                for i in 0..size as i64 {
                    list.append(Value::Int(i)).unwrap();
                }
                black_box(list)
            });
        });
    }

    group.finish();
}

fn bench_extend(c: &mut Criterion) {
    let mut group = c.benchmark_group("extend");

    for size in [256, 4096, 65536] {
        let items = values(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| {
                let mut list = field(16);
                list.extend(items.clone()).unwrap();
                black_box(list)
            });
        });
    }

    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");

    for size in [256, 4096, 65536] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sort", size), &size, |b, &size| {
            b.iter_batched(
                || field(size),
                |mut list| {
                    list.sort(&SortOptions::new()).unwrap();
                    list
                },
                criterion::BatchSize::LargeInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("del_slice", size), &size, |b, &size| {
            b.iter_batched(
                || field(size),
                |mut list| {
                    list.del_slice(&SliceSpec::stepped(2)).unwrap();
                    list
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append, bench_extend, bench_rebuild);
criterion_main!(benches);
