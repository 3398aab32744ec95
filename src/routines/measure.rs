use std::fmt;
use std::time::Instant;

use serde_derive::{Deserialize, Serialize};

use crate::harness::{bench_escape, bench_no_escape};
use crate::routines::alloc::{is_counting, AllocationSnapshot};
use crate::structs::sink::Sink;

/// The two producer paths that can be measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    Escape,
    NoEscape,
}

impl Workload {
    pub fn name(&self) -> &'static str {
        match self {
            Workload::Escape => "escape",
            Workload::NoEscape => "no_escape",
        }
    }

    /// Run the workload `iterations` times against `sink`
    pub fn run(&self, iterations: u64, sink: &mut Sink) {
        match self {
            Workload::Escape => bench_escape(iterations, sink),
            Workload::NoEscape => bench_no_escape(iterations, sink),
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Timing and allocation figures for one workload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub workload: Workload,
    pub iterations: u64,
    pub elapsed_ns: u64,
    pub allocations: u64,
    pub bytes: u64,
    /// False when the counting allocator is not installed, in which case
    /// `allocations` and `bytes` carry no information
    pub counted: bool,
}

impl Measurement {
    pub fn ns_per_op(&self) -> f64 {
        per_op(self.elapsed_ns as f64, self.iterations)
    }

    pub fn allocs_per_op(&self) -> f64 {
        per_op(self.allocations as f64, self.iterations)
    }

    pub fn bytes_per_op(&self) -> f64 {
        per_op(self.bytes as f64, self.iterations)
    }
}

fn per_op(total: f64, iterations: u64) -> f64 {
    if iterations == 0 {
        0.0
    } else {
        total / iterations as f64
    }
}

/// Time `iterations` runs of `workload` and count the allocations they make on this thread
pub fn measure(workload: Workload, iterations: u64, sink: &mut Sink) -> Measurement {
    let counted = is_counting();

    let before = AllocationSnapshot::current();
    let start = Instant::now();
    workload.run(iterations, sink);
    let elapsed = start.elapsed();
    let delta = AllocationSnapshot::current().since(&before);

    tracing::debug!(
        "{} finished {} iterations in {:.2?}",
        workload,
        iterations,
        elapsed
    );

    Measurement {
        workload,
        iterations,
        elapsed_ns: elapsed.as_nanos() as u64,
        allocations: delta.allocations,
        bytes: delta.bytes,
        counted,
    }
}
