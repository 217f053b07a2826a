use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use resurs::{Load, ResourceCache, Storage};

const N_OPS: u32 = 10000;

pub fn insertion_10000(c: &mut Criterion) {
    c.bench_with_input(BenchmarkId::new("insertion", N_OPS), &N_OPS, |b, &size| {
        b.iter(|| {
            let mut storage: Storage<usize> = Storage::with_capacity(size);
            for _ in 0..size {
                storage.add(black_box(10));
            }
        })
    });
}

pub fn get_or_create_10000(c: &mut Criterion) {
    c.bench_with_input(
        BenchmarkId::new("get_or_create", N_OPS),
        &N_OPS,
        |b, &size| {
            b.iter(|| {
                let mut cache: ResourceCache<u32, u32> = ResourceCache::new(0);
                // Every key is requested twice, half of the calls are hits.
                for i in 0..size {
                    let key = black_box(i / 2);
                    cache
                        .get_or_create(key, |k| Ok::<_, ()>(Load::Created(*k)))
                        .expect("infallible");
                }
            })
        },
    );
}

criterion_group!(benches, insertion_10000, get_or_create_10000);
criterion_main!(benches);
