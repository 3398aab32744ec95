use escape_sink::prelude::*;
use eyre::Result;

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator;

/// Measure both producers, reading settings from the path given as the first argument
///
/// Without an argument the built-in defaults are used.
fn main() -> Result<()> {
    let settings = match std::env::args().nth(1) {
        Some(path) => read_settings(path)?,
        None => Settings::new(),
    };

    run(settings)?;
    Ok(())
}
