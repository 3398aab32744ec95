use crate::structs::sink::Sink;

/// Integer produced by the escaping path
pub const ESCAPED_VALUE: i32 = 42;
/// Integer produced by the value path
pub const RETAINED_VALUE: i32 = 99;

/// Produce an integer whose storage outlives this call
///
/// The integer lives on the heap, so the returned pointer stays valid for as long
/// as the caller keeps it. Each call performs exactly one allocation.
#[inline(never)]
pub fn escape() -> Box<i32> {
    Box::new(ESCAPED_VALUE)
}

/// Produce an integer by value
///
/// The local is copied out to the caller and no pointer into this frame is ever exposed,
/// so nothing needs to be allocated.
#[inline(never)]
pub fn no_escape() -> i32 {
    RETAINED_VALUE
}

/// Call [escape] and keep the pointer observable through the sink
pub fn force_escape(sink: &mut Sink) {
    let ptr = escape();
    sink.store_reference(ptr);
}

/// Call [no_escape] and keep the copied value observable through the sink
pub fn force_no_escape(sink: &mut Sink) {
    let val = no_escape();
    sink.store_value(val);
}
