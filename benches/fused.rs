use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chained::hashmap::HashMap;

const KEYS: u64 = 10_000;

fn filled() -> HashMap<u64, u64> {
    let mut map: HashMap<_, _> = HashMap::new();
    map.extend((0..KEYS).map(|i| (i, i)));
    map
}

fn bench_add_or_get(c: &mut Criterion) {
    c.bench_function("add_or_get", |b| {
        let mut map = filled();

        b.iter(|| {
            for i in 0..(2 * KEYS) {
                let mut value = i;
                let _ = black_box(map.add_or_get(i % (KEYS + 100), &mut value));
            }
        })
    });
}

fn bench_contains_then_get(c: &mut Criterion) {
    c.bench_function("contains_then_get", |b| {
        let mut map = filled();

        b.iter(|| {
            for i in 0..(2 * KEYS) {
                let key = i % (KEYS + 100);

                let value = if map.contains_key(&key) {
                    map[&key]
                } else {
                    map.insert(key, i);
                    i
                };

                black_box(value);
            }
        })
    });
}

fn bench_swap(c: &mut Criterion) {
    c.bench_function("try_swap", |b| {
        let mut map = filled();

        b.iter(|| {
            let mut value = 0;

            for i in 0..KEYS {
                let _ = black_box(map.try_swap(&i, &mut value));
            }
        })
    });
}

fn bench_churn(c: &mut Criterion) {
    c.bench_function("remove_reinsert_defragment", |b| {
        let mut map = filled();

        b.iter(|| {
            for i in (0..KEYS).step_by(3) {
                let _ = map.remove(&i);
            }

            black_box(map.defragment(false));

            for i in (0..KEYS).step_by(3) {
                let _ = map.try_add_new(i, i);
            }
        })
    });
}

criterion_group!(benches, bench_add_or_get, bench_contains_then_get, bench_swap, bench_churn);
criterion_main!(benches);
