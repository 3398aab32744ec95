use crate::prelude::*;

use eyre::{Result, WrapErr};
use std::time::Instant;

/// Run both producers once against a fresh sink
///
/// This is what the `escape-sink` binary does. Nothing is logged or printed.
pub fn demonstrate() -> Sink {
    let mut sink = Sink::new();
    force_escape(&mut sink);
    force_no_escape(&mut sink);
    sink
}

/// Measure every configured workload, in order, against one shared sink
///
/// Each workload is warmed up with `config.warmup` iterations first. This does not set up
/// logging or write any files, see [run] for that.
pub fn measure_all(settings: &Settings) -> Result<Report> {
    settings.validate()?;

    let mut sink = Sink::new();
    let mut measurements = Vec::with_capacity(settings.config.workloads.len());

    for workload in &settings.config.workloads {
        if settings.config.warmup > 0 {
            tracing::debug!("Warming up {} for {} iterations", workload, settings.config.warmup);
            workload.run(settings.config.warmup, &mut sink);
        }
        measurements.push(measure(*workload, settings.config.iterations, &mut sink));
    }

    Ok(Report::new(measurements, &sink))
}

/// Primary entrypoint for a measurement run
///
/// Sets up logging, measures the configured workloads and, if `output.write` is set,
/// writes `settings.json`, `report.csv` and `report.json` to the output folder.
pub fn run(settings: Settings) -> Result<Report> {
    let now = Instant::now();
    settings.validate()?;

    logger::setup_log(&settings)?;
    tracing::info!("Starting escape-sink");

    if !is_counting() {
        tracing::warn!(
            "The counting allocator is not installed - allocation counts will be reported as zero"
        );
    }

    // Tell the user where the output files will be written
    match settings.output.write {
        true => tracing::info!("Output files will be written to {}", settings.output.path),
        false => tracing::info!(
            "Output files will not be written - set `write = true` in the [output] section to enable output files"
        ),
    }

    let report = measure_all(&settings)?;

    for m in &report.measurements {
        tracing::info!(
            "{:<10} {:>12} iterations {:>10.2} ns/op {:>6.2} allocs/op {:>8.2} B/op",
            m.workload.to_string(),
            m.iterations,
            m.ns_per_op(),
            m.allocs_per_op(),
            m.bytes_per_op()
        );
    }

    if let Some(memory) = &report.memory {
        tracing::debug!(
            "Process memory: {} bytes physical, {} bytes virtual",
            memory.physical,
            memory.virtual_mem
        );
    }

    if settings.output.write {
        settings
            .write("settings.json")
            .wrap_err("Failed to write settings")?;
        report.write_csv(&settings.output.path)?;
        report.write_json(&settings.output.path)?;
    }

    tracing::info!("Total time: {:.2?}", now.elapsed());
    Ok(report)
}
