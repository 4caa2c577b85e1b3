use command_tree::{CommandRegistry, CommandTree};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEGMENTS: &[&str] = &[
    "admin", "user", "add", "remove", "list", "reload", "config", "get", "set", "math",
];

fn random_paths(count: usize, max_depth: usize) -> Vec<Vec<String>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let depth = rng.gen_range(1..=max_depth);
            (0..depth)
                .map(|_| SEGMENTS[rng.gen_range(0..SEGMENTS.len())].to_string())
                .collect()
        })
        .collect()
}

fn build_tree(paths: &[Vec<String>]) -> CommandTree<String, usize> {
    let mut tree = CommandTree::new();
    for (i, path) in paths.iter().enumerate() {
        tree.add_chain(path.iter().cloned(), Some(i));
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let paths = random_paths(1_000, 5);
    c.bench_function("add_chain 1000 paths", |b| {
        b.iter(|| build_tree(black_box(&paths)))
    });
}

fn bench_lookup(c: &mut Criterion) {
    let paths = random_paths(1_000, 5);
    let tree = build_tree(&paths);
    let queries: Vec<Vec<String>> = paths
        .iter()
        .map(|p| {
            let mut q = p.clone();
            q.push("arg".to_string());
            q
        })
        .collect();

    c.bench_function("get_value_ignored", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(tree.get_value_ignored(q));
            }
        })
    });

    c.bench_function("get_child_furthest", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(tree.get_child_furthest(q).depth);
            }
        })
    });
}

fn bench_registry(c: &mut Criterion) {
    let mut registry = CommandRegistry::new();
    for (i, path) in random_paths(500, 4).iter().enumerate() {
        let _ = registry.register(&path.join("."), i);
    }
    let args = ["user", "add", "bob"];

    c.bench_function("registry resolve", |b| {
        b.iter(|| black_box(registry.resolve("admin", &args)))
    });
    c.bench_function("registry complete", |b| {
        b.iter(|| black_box(registry.complete("admin", &["user", "r"])))
    });
}

criterion_group!(benches, bench_insert, bench_lookup, bench_registry);
criterion_main!(benches);
