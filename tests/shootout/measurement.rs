//! The measured window only contains container work.
//!
//! This binary counts allocations made by the current thread. A container
//! that stores nothing must then show zero allocations between the two
//! memory readings of a case.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::Arc;

use mapshootout::{
    BenchMap, BenchmarkCase, CaseLabels, ContainerImplementation, Counter, KeyGenerator,
    MemoryProbe, VecSink, Workload,
};

struct CountingAllocator;

thread_local! {
    static ALLOCATIONS: Cell<u64> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static ALLOC: CountingAllocator = CountingAllocator;

/// Reports this thread's allocation count in place of heap bytes.
struct AllocationCounter;

impl MemoryProbe for AllocationCounter {
    fn reclaim_hint(&self) {}

    fn allocated_bytes(&self) -> u64 {
        ALLOCATIONS.with(Cell::get)
    }
}

/// Map that drops every key it receives and keeps only a count.
#[derive(Default)]
struct DiscardingMap {
    inserted: usize,
}

impl<K: Clone + Send> BenchMap<K> for DiscardingMap {
    fn insert(&mut self, _key: K, _value: Counter) -> Option<Counter> {
        self.inserted += 1;
        None
    }

    fn get(&self, _key: &K) -> Option<Counter> {
        None
    }

    fn remove(&mut self, _key: &K) -> Option<Counter> {
        None
    }

    fn len(&self) -> usize {
        self.inserted
    }

    fn clear(&mut self) {
        self.inserted = 0;
    }

    fn visit_all(&self) -> usize {
        0
    }
}

struct Discarding;

impl ContainerImplementation for Discarding {
    fn name(&self) -> &str {
        "Discarding"
    }

    fn create_string_map(&self) -> Box<dyn BenchMap<String>> {
        Box::<DiscardingMap>::default()
    }

    fn create_int_map(&self) -> Box<dyn BenchMap<i64>> {
        Box::<DiscardingMap>::default()
    }
}

fn allocations_while_inserting(workload: Workload) -> i64 {
    let mut generator = KeyGenerator::seeded(0xA110C);
    let keys = generator.generate_string_keys(64, 10_000);
    let case = BenchmarkCase::new(
        Arc::new(Discarding),
        workload,
        CaseLabels::new("largeString", "inserts"),
        keys,
        None,
        generator.shuffle_rng(),
    )
    .unwrap();

    let mut sink = VecSink::new();
    let report = case.execute(&mut sink, &AllocationCounter).unwrap();
    assert_eq!(report.measurement.operations, 10_000);
    assert_eq!(report.entries_after, 10_000);
    report.result.memory_delta_bytes
}

#[test]
fn insert_does_not_allocate_keys_while_measured() {
    assert_eq!(allocations_while_inserting(Workload::Insert), 0);
}

#[test]
fn full_insert_does_not_allocate_keys_while_measured() {
    assert_eq!(allocations_while_inserting(Workload::FullInsert), 0);
}
