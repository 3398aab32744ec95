//! Loops driven by an external benchmark runner
//!
//! The runner decides the iteration count (criterion passes it through `iter_custom`),
//! and timing or allocation statistics are collected on the runner's side.

use crate::producers::{force_escape, force_no_escape};
use crate::structs::sink::Sink;

/// Call [force_escape] `iterations` times
pub fn bench_escape(iterations: u64, sink: &mut Sink) {
    for _ in 0..iterations {
        force_escape(sink);
    }
}

/// Call [force_no_escape] `iterations` times
pub fn bench_no_escape(iterations: u64, sink: &mut Sink) {
    for _ in 0..iterations {
        force_no_escape(sink);
    }
}
