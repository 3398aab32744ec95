use escape_sink::prelude::*;

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator;

#[test]
fn test_counting_allocator_is_active() {
    assert!(is_counting());
}

/// Every escaping call allocates exactly one integer
#[test]
fn test_escape_allocates_once_per_call() {
    let mut sink = Sink::new();
    let m = measure(Workload::Escape, 1000, &mut sink);

    assert!(m.counted);
    assert_eq!(m.allocations, 1000);
    assert_eq!(m.bytes, 1000 * std::mem::size_of::<i32>() as u64);
    assert_eq!(m.allocs_per_op(), 1.0);
    assert_eq!(m.bytes_per_op(), 4.0);
}

/// The value path never touches the heap
#[test]
fn test_no_escape_never_allocates() {
    let mut sink = Sink::new();
    let m = measure(Workload::NoEscape, 1000, &mut sink);

    assert!(m.counted);
    assert_eq!(m.allocations, 0);
    assert_eq!(m.bytes, 0);
    assert_eq!(sink.value(), Some(99));
}

/// Thread counters only see the calling thread
#[test]
fn test_counts_are_per_thread() {
    let before = AllocationSnapshot::current();
    let global_before = AllocationSnapshot::global();

    std::thread::spawn(|| {
        let mut sink = Sink::new();
        bench_escape(100, &mut sink);
    })
    .join()
    .unwrap();

    let global_delta = AllocationSnapshot::global().since(&global_before);
    assert!(global_delta.allocations >= 100);

    // Spawning and joining allocates on this thread, but the 100 boxes do not show up here
    let local_delta = AllocationSnapshot::current().since(&before);
    assert!(local_delta.allocations < global_delta.allocations);
}

#[test]
fn test_measure_all_reports_counts() {
    let mut settings = Settings::new();
    settings.config.iterations = 256;
    settings.config.warmup = 8;

    let report = measure_all(&settings).unwrap();
    assert_eq!(report.measurements.len(), 2);

    let escape = &report.measurements[0];
    let no_escape = &report.measurements[1];
    assert_eq!(escape.workload, Workload::Escape);
    assert_eq!(escape.allocations, 256);
    assert_eq!(no_escape.workload, Workload::NoEscape);
    assert_eq!(no_escape.allocations, 0);
}
