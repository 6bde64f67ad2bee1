//! Constraint evaluation benchmarks
//!
//! Measures batch evaluation over a generated content tree with varying:
//! - Tuple counts (100, 1000, 10000)
//! - Executors (sync, rayon with 2/4/8 workers)
//!
//! Run benchmarks: `cargo bench --bench constraint_evaluation`
//!
//! Compare specific groups:
//! ```
//! cargo bench --bench constraint_evaluation -- "tuple_count"
//! cargo bench --bench constraint_evaluation -- "worker_scaling"
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use sylvan::traits::NodeId;
use sylvan::types::{Name, Path, Value};
use sylvan::{
    Constraint, ConstraintFilter, ExecutorKind, FilterConfig, InMemoryTree, NamespaceResolver,
    NodeTuple, QomFactory, Unparser,
};

/// A tree of `count` leaves spread over 10 folders, each leaf with a size.
fn generate_tree(count: usize) -> (Arc<InMemoryTree>, Vec<NodeTuple<NodeId>>) {
    let mut tree = InMemoryTree::new();
    let mut tuples = Vec::with_capacity(count);
    for i in 0..count {
        let path = Path::from_names([
            Name::local("content"),
            Name::local(format!("folder{}", i % 10)),
            Name::local(format!("item{}", i)),
        ]);
        let node = tree.add_path(&path).expect("bench node");
        tree.set_property(node, Name::local("size"), vec![Value::Long((i % 100) as i64)])
            .expect("bench property");
        tree.set_property(node, Name::local("title"), vec![Value::String(format!("Item number {}", i))])
            .expect("bench property");
        tuples.push(NodeTuple::new().with("s", node));
    }
    (Arc::new(tree), tuples)
}

/// Typical listing constraint: structural test plus two value comparisons.
fn listing_constraint(f: &QomFactory) -> Constraint {
    f.and(
        f.descendant_node("s", "/content/folder3").expect("valid"),
        f.or(
            f.comparison(
                f.property_value("s", "size").expect("valid"),
                ">",
                f.literal(50i64),
            )
            .expect("valid"),
            f.comparison(
                f.lower_case(f.property_value("s", "title").expect("valid")),
                "LIKE",
                f.literal("%number 1%"),
            )
            .expect("valid"),
        ),
    )
}

fn filter(tree: Arc<InMemoryTree>, config: FilterConfig) -> ConstraintFilter<InMemoryTree> {
    let f = QomFactory::new(Arc::new(NamespaceResolver::new()));
    ConstraintFilter::builder()
        .with_navigator(tree)
        .with_constraint(listing_constraint(&f))
        .with_config(config)
        .build()
        .expect("filter builds")
}

/// Benchmark batch evaluation with varying tuple counts
fn bench_tuple_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("tuple_count");
    for count in [100, 1000, 10000] {
        let (tree, tuples) = generate_tree(count);
        let sync = filter(tree.clone(), FilterConfig::new().with_executor(ExecutorKind::Sync));
        let parallel = filter(tree, FilterConfig::new());
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("sync", count), &tuples, |b, tuples| {
            b.iter(|| black_box(sync.evaluate_all(tuples.clone()).expect("evaluates")))
        });
        group.bench_with_input(
            BenchmarkId::new(parallel.executor_name(), count),
            &tuples,
            |b, tuples| b.iter(|| black_box(parallel.evaluate_all(tuples.clone()).expect("evaluates"))),
        );
    }
    group.finish();
}

/// Benchmark dedicated rayon pools of different sizes
#[cfg(feature = "rayon-executor")]
fn bench_worker_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_scaling");
    let (tree, tuples) = generate_tree(10000);
    group.throughput(Throughput::Elements(tuples.len() as u64));
    for workers in [2, 4, 8] {
        let config = FilterConfig::new()
            .with_executor(ExecutorKind::Rayon)
            .with_worker_threads(workers);
        let filter = filter(tree.clone(), config);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &tuples, |b, tuples| {
            b.iter(|| black_box(filter.evaluate_all(tuples.clone()).expect("evaluates")))
        });
    }
    group.finish();
}

#[cfg(not(feature = "rayon-executor"))]
fn bench_worker_scaling(_c: &mut Criterion) {}

/// Benchmark rendering a constraint back to statement text
fn bench_unparse(c: &mut Criterion) {
    let resolver = NamespaceResolver::new();
    let f = QomFactory::new(Arc::new(NamespaceResolver::new()));
    let constraint = listing_constraint(&f);
    let unparser = Unparser::new(&resolver);
    c.bench_function("unparse_constraint", |b| {
        b.iter(|| black_box(unparser.render_constraint(&constraint).expect("renders")))
    });
}

criterion_group!(benches, bench_tuple_count, bench_worker_scaling, bench_unparse);
criterion_main!(benches);
