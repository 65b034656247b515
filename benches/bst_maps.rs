use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ordered_treap::treap::{TreapMap, TreapSet};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

const NUM_OF_OPERATIONS: usize = 100;

fn random_pairs() -> Vec<(u32, u32)> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS)
        .map(|_| (rng.next_u32(), rng.next_u32()))
        .collect()
}

fn bench_btreemap_insert(c: &mut Criterion) {
    let pairs = random_pairs();
    c.bench_function("bench btreemap insert", move |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &(key, val) in &pairs {
                map.insert(key, val);
            }
            map
        })
    });
}

fn bench_btreemap_get(c: &mut Criterion) {
    let pairs = random_pairs();
    let map: BTreeMap<u32, u32> = pairs.iter().cloned().collect();

    c.bench_function("bench btreemap get", move |b| {
        b.iter(|| {
            for (key, _) in &pairs {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_btreemap_index_assign(c: &mut Criterion) {
    let pairs = random_pairs();
    c.bench_function("bench btreemap index assign", move |b| {
        b.iter(|| {
            let mut map: BTreeMap<u32, u32> = BTreeMap::new();
            for pair in pairs.windows(2) {
                *map.entry(pair[0].0).or_default() = pair[1].0;
            }
            map
        })
    });
}

fn bench_treap_insert(c: &mut Criterion) {
    let pairs = random_pairs();
    c.bench_function("bench treap insert", move |b| {
        b.iter(|| {
            let mut map = TreapMap::with_seed(1);
            for &(key, val) in &pairs {
                map.insert(key, val);
            }
            map
        })
    });
}

fn bench_treap_get(c: &mut Criterion) {
    let pairs = random_pairs();
    let map: TreapMap<u32, u32> = pairs.iter().cloned().collect();

    c.bench_function("bench treap get", move |b| {
        b.iter(|| {
            for (key, _) in &pairs {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_treap_index_assign(c: &mut Criterion) {
    let pairs = random_pairs();
    c.bench_function("bench treap index assign", move |b| {
        b.iter(|| {
            let mut map: TreapMap<u32, u32> = TreapMap::with_seed(1);
            for pair in pairs.windows(2) {
                *map.get_or_insert_default(pair[0].0) = pair[1].0;
            }
            map
        })
    });
}

fn bench_treap_hinted_insert(c: &mut Criterion) {
    let mut keys: Vec<u32> = random_pairs().into_iter().map(|(key, _)| key).collect();
    keys.sort();
    c.bench_function("bench treap hinted insert", move |b| {
        b.iter(|| {
            let mut set = TreapSet::with_seed(1);
            for &key in &keys {
                let end = set.end();
                set.insert_with_hint(end, key);
            }
            set
        })
    });
}

fn bench_btreeset_sorted_insert(c: &mut Criterion) {
    let mut keys: Vec<u32> = random_pairs().into_iter().map(|(key, _)| key).collect();
    keys.sort();
    c.bench_function("bench btreeset sorted insert", move |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &key in &keys {
                set.insert(key);
            }
            set
        })
    });
}

criterion_group!(
    benches,
    bench_btreemap_get,
    bench_btreemap_insert,
    bench_btreemap_index_assign,
    bench_btreeset_sorted_insert,
    bench_treap_get,
    bench_treap_insert,
    bench_treap_index_assign,
    bench_treap_hinted_insert,
);
criterion_main!(benches);
