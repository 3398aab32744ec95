//! escape-sink contrasts two ways of producing an integer:
//! - [producers::escape] hands back a heap pointer whose storage outlives the call
//! - [producers::no_escape] copies the integer out by value, so nothing is allocated
//!
//! Each producer has a wrapper that stores its result into a [structs::sink::Sink], keeping the
//! result observable so the optimiser cannot remove the call. The [harness] loops are driven by
//! criterion (see `benches/escape.rs`), and [entrypoints::run] measures timing and allocation
//! counts per call when [routines::alloc::CountingAllocator] is installed.

/// Entry points for running the producers and measuring them
pub mod entrypoints;
/// Loops for external benchmark runners
pub mod harness;
/// The escaping and non-escaping producers
pub mod producers;

pub mod routines {
    // Allocation counting
    pub mod alloc;
    // Routines for logging
    pub mod logger;
    // Timing and allocation measurement
    pub mod measure;
    // Routines for output
    pub mod output;
    // Routines for settings
    pub mod settings;
}

pub mod structs {
    pub mod sink;
}

pub mod prelude {
    pub use crate::entrypoints::{demonstrate, measure_all, run};
    pub use crate::harness::{bench_escape, bench_no_escape};
    pub use crate::producers::*;
    pub use crate::routines::alloc::{is_counting, AllocationSnapshot, CountingAllocator};
    pub use crate::routines::logger;
    pub use crate::routines::measure::{measure, Measurement, Workload};
    pub use crate::routines::output::{MemoryUsage, OutputFile, Report};
    pub use crate::routines::settings::{read_settings, Settings};
    pub use crate::structs::sink::{Held, Sink};
}

//Tests
mod tests;
