use anagram_form::{find_anagrams, find_duplicates, has_duplicate, parse_candidates};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::SmallRng};

const ALPHABET: &[u8] = b"eilnst";

fn word_list(len: usize, seed: u64) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            (0..6)
                .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
                .collect()
        })
        .collect()
}

fn bench_find_anagrams(c: &mut Criterion) {
    for &len in &[10usize, 100, 1_000] {
        let candidates = word_list(len, 7);
        c.bench_with_input(
            BenchmarkId::new("find_anagrams", len),
            &candidates,
            |b, candidates| {
                b.iter(|| black_box(find_anagrams("Listen", candidates).len()));
            },
        );
    }
}

fn bench_duplicates(c: &mut Criterion) {
    for &len in &[10usize, 100, 1_000] {
        let candidates = word_list(len, 11);
        c.bench_with_input(
            BenchmarkId::new("find_duplicates", len),
            &candidates,
            |b, candidates| {
                b.iter(|| black_box(find_duplicates(candidates).len()));
            },
        );
        c.bench_with_input(
            BenchmarkId::new("has_duplicate", len),
            &candidates,
            |b, candidates| {
                b.iter(|| black_box(has_duplicate(candidates)));
            },
        );
    }
}

fn bench_parse(c: &mut Criterion) {
    let raw = word_list(500, 3).join(" , ");
    c.bench_function("parse_candidates::500", |b| {
        b.iter(|| black_box(parse_candidates(&raw).len()));
    });
}

criterion_group!(benches, bench_find_anagrams, bench_duplicates, bench_parse);
criterion_main!(benches);
