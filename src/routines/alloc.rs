use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_derive::Serialize;

static GLOBAL_ALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static GLOBAL_BYTES: AtomicU64 = AtomicU64::new(0);

thread_local! {
    // Const-initialised and without destructors, so touching them from inside the
    // allocator never allocates.
    static THREAD_ALLOCATIONS: Cell<u64> = const { Cell::new(0) };
    static THREAD_BYTES: Cell<u64> = const { Cell::new(0) };
}

/// Global allocator that forwards to [System] and counts every allocation
///
/// Install it in a binary, bench or test crate with
///
/// ```ignore
/// #[global_allocator]
/// static ALLOCATOR: CountingAllocator = CountingAllocator;
/// ```
///
/// Counts are kept both process-wide and per thread. `dealloc` is not counted.
pub struct CountingAllocator;

fn record(size: usize) {
    GLOBAL_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    GLOBAL_BYTES.fetch_add(size as u64, Ordering::Relaxed);
    // Fails only while the thread is being torn down
    let _ = THREAD_ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
    let _ = THREAD_BYTES.try_with(|bytes| bytes.set(bytes.get() + size as u64));
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        record(layout.size());
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        record(layout.size());
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        record(new_size);
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

/// Allocation counters at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AllocationSnapshot {
    pub allocations: u64,
    pub bytes: u64,
}

impl AllocationSnapshot {
    /// Counters of the calling thread
    pub fn current() -> Self {
        AllocationSnapshot {
            allocations: THREAD_ALLOCATIONS.with(|count| count.get()),
            bytes: THREAD_BYTES.with(|bytes| bytes.get()),
        }
    }

    /// Counters summed over every thread of the process
    pub fn global() -> Self {
        AllocationSnapshot {
            allocations: GLOBAL_ALLOCATIONS.load(Ordering::Relaxed),
            bytes: GLOBAL_BYTES.load(Ordering::Relaxed),
        }
    }

    /// Difference between `self` and an earlier snapshot
    pub fn since(&self, earlier: &AllocationSnapshot) -> AllocationSnapshot {
        AllocationSnapshot {
            allocations: self.allocations.saturating_sub(earlier.allocations),
            bytes: self.bytes.saturating_sub(earlier.bytes),
        }
    }
}

/// Whether [CountingAllocator] is the active global allocator
///
/// Makes one probe allocation and checks that the thread counter moved.
pub fn is_counting() -> bool {
    let before = AllocationSnapshot::current();
    let probe = black_box(Box::new(0u8));
    drop(probe);
    AllocationSnapshot::current().since(&before).allocations > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_is_saturating() {
        let earlier = AllocationSnapshot {
            allocations: 10,
            bytes: 100,
        };
        let later = AllocationSnapshot {
            allocations: 4,
            bytes: 400,
        };
        assert_eq!(
            later.since(&earlier),
            AllocationSnapshot {
                allocations: 0,
                bytes: 300
            }
        );
    }

    #[test]
    fn not_counting_without_installation() {
        // The library test crate keeps the system allocator
        assert!(!is_counting());
        assert_eq!(AllocationSnapshot::current(), AllocationSnapshot::default());
    }
}
