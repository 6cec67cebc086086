#[macro_use]
extern crate criterion;

use criterion::Criterion;
use rand::{thread_rng, Rng};
use rstree::RandomizedTree;

use std::collections::BTreeSet;

// generate 1 million 7-digit random positive integers
fn generate_random_numbers() -> Vec<i32> {
    let mut rng = thread_rng();

    (0..1_000_000)
        .map(|_| rng.gen_range(1_000_000..10_000_000))
        .collect()
}

fn bench_inserts(c: &mut Criterion) {
    c.bench_function("Insert one million 7-digit random positive integers", |b| {
        let digits = generate_random_numbers();
        b.iter(|| {
            let mut tree = RandomizedTree::with_seed(42);
            digits.iter().for_each(|digit| tree.insert(*digit));
            tree.len()
        })
    });
    c.bench_function("Insert one million sorted integers", |b| {
        b.iter(|| {
            let mut tree = RandomizedTree::with_seed(42);
            (0..1_000_000).for_each(|key| tree.insert(key));
            tree.height()
        })
    });
    c.bench_function(
        "Insert one million 7-digit random positive integers: BTreeSet",
        |b| {
            let digits = generate_random_numbers();
            b.iter(|| {
                let mut set = BTreeSet::new();
                digits.iter().for_each(|digit| {
                    set.insert(*digit);
                });
                set.len()
            })
        },
    );
}

fn bench_queries(c: &mut Criterion) {
    let digits = generate_random_numbers();
    let mut tree = RandomizedTree::with_seed(42);
    tree.extend(digits.iter().copied());

    c.bench_function("Search 1000 keys in a one million key tree", |b| {
        b.iter(|| {
            digits[..1000]
                .iter()
                .filter(|digit| tree.contains(digit))
                .count()
        })
    });
    c.bench_function("10 smallest keys of a one million key tree", |b| {
        b.iter(|| tree.smallest(10))
    });
    c.bench_function("Remove and reinsert 1000 keys in a one million key tree", |b| {
        b.iter(|| {
            for digit in &digits[..1000] {
                tree.remove(digit);
            }
            for digit in &digits[..1000] {
                tree.insert(*digit);
            }
        })
    });
}

criterion_group!(benches, bench_inserts, bench_queries);
criterion_main!(benches);
