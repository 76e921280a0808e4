use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keel::alloc::uninit;
use keel::{Allocator, Deque, List, StdAlloc, TrackingAllocator, Vector};

fn bench_alloc_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("Single Allocation");

    group.bench_function("Box::new(u64)", |b| {
        b.iter(|| {
            black_box(Box::new(42u64));
        })
    });

    group.bench_function("StdAlloc<u64>", |b| {
        let alloc = StdAlloc::<u64>::new();
        b.iter(|| {
            if let Ok(p) = alloc.allocate(1) {
                unsafe {
                    black_box(p.as_ptr()).write(42);
                    alloc.deallocate(p, 1);
                }
            }
        })
    });

    group.bench_function("TrackingAllocator<u64>", |b| {
        let alloc = TrackingAllocator::<u64>::new();
        b.iter(|| {
            if let Ok(p) = alloc.allocate(1) {
                unsafe {
                    black_box(p.as_ptr()).write(42);
                    alloc.deallocate(p, 1);
                }
            }
        })
    });

    group.finish();
}

fn bench_uninitialized_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("Uninitialized Fill 4096");
    const N: usize = 4096;
    let alloc = StdAlloc::<String>::new();
    let value = "payload".to_string();

    group.bench_function("uninitialized_fill_n", |b| {
        b.iter(|| {
            if let Ok(p) = alloc.allocate(N) {
                unsafe {
                    let end = uninit::uninitialized_fill_n(p.as_ptr(), N, &value);
                    uninit::destroy(p.as_ptr(), end);
                    alloc.deallocate(p, N);
                }
            }
        })
    });

    group.bench_function("Vec::resize", |b| {
        b.iter(|| {
            let mut v: Vec<String> = Vec::with_capacity(N);
            v.resize(N, value.clone());
            black_box(v);
        })
    });

    group.finish();
}

fn bench_containers_tracked(c: &mut Criterion) {
    let mut group = c.benchmark_group("Containers 1000 Pushes");
    const BATCH_SIZE: u64 = 1000;

    group.bench_function("Vector<StdAlloc>", |b| {
        b.iter(|| {
            let mut v: Vector<u64> = Vector::new();
            for i in 0..BATCH_SIZE {
                v.push(i);
            }
            black_box(v);
        })
    });

    group.bench_function("Vector<TrackingAllocator>", |b| {
        b.iter(|| {
            let mut v = Vector::new_in(TrackingAllocator::<u64>::new());
            for i in 0..BATCH_SIZE {
                v.push(i);
            }
            black_box(v);
        })
    });

    group.bench_function("Deque<TrackingAllocator>", |b| {
        b.iter(|| {
            let mut d: Deque<u64, 64, _> = Deque::new_in(TrackingAllocator::new());
            for i in 0..BATCH_SIZE {
                d.push_back(i);
            }
            black_box(d);
        })
    });

    group.bench_function("List<StdAlloc>", |b| {
        b.iter(|| {
            let mut l: List<u64> = List::new();
            for i in 0..BATCH_SIZE {
                l.push_back(i);
            }
            black_box(l);
        })
    });

    group.finish();
}

#[cfg(feature = "alloc-mimalloc")]
fn bench_backends(c: &mut Criterion) {
    use keel::alloc::MimallocAlloc;

    let mut group = c.benchmark_group("Deque Backends 10000");
    group.bench_function("System", |b| {
        b.iter(|| black_box((0..10_000u64).collect::<Deque<u64>>()))
    });
    group.bench_function("mimalloc", |b| {
        b.iter(|| black_box((0..10_000u64).collect::<Deque<u64, 512, MimallocAlloc<u64>>>()))
    });
    group.finish();
}

#[cfg(not(feature = "alloc-mimalloc"))]
fn bench_backends(_: &mut Criterion) {}

criterion_group!(
    benches,
    bench_alloc_single,
    bench_uninitialized_fill,
    bench_containers_tracked,
    bench_backends
);
criterion_main!(benches);
