use std::fs::{create_dir_all, File, OpenOptions};
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde_derive::Serialize;

use crate::routines::measure::Measurement;
use crate::structs::sink::Sink;

/// Resident and virtual memory of the process, as reported by the operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub physical: usize,
    pub virtual_mem: usize,
}

impl MemoryUsage {
    /// `None` on platforms where `memory-stats` cannot read the figures
    pub fn sample() -> Option<Self> {
        memory_stats::memory_stats().map(|stats| MemoryUsage {
            physical: stats.physical_mem,
            virtual_mem: stats.virtual_mem,
        })
    }
}

/// Result of a measurement run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Local time the report was assembled, RFC 3339
    pub generated: String,
    pub measurements: Vec<Measurement>,
    /// Integer observable through the sink once every workload finished
    pub final_value: Option<i32>,
    pub final_is_reference: bool,
    pub memory: Option<MemoryUsage>,
}

/// One line of `report.csv`
#[derive(Serialize)]
struct Row {
    workload: String,
    iterations: u64,
    elapsed_ns: u64,
    ns_per_op: f64,
    allocations: u64,
    allocs_per_op: f64,
    bytes: u64,
    bytes_per_op: f64,
}

impl Report {
    pub fn new(measurements: Vec<Measurement>, sink: &Sink) -> Self {
        Report {
            generated: chrono::Local::now().to_rfc3339(),
            measurements,
            final_value: sink.value(),
            final_is_reference: sink.is_reference(),
            memory: MemoryUsage::sample(),
        }
    }

    /// Writes `report.csv` to `folder`, one row per workload
    pub fn write_csv(&self, folder: &str) -> Result<PathBuf> {
        let outputfile = OutputFile::new(folder, "report.csv")?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(outputfile.file());

        for m in &self.measurements {
            writer.serialize(Row {
                workload: m.workload.to_string(),
                iterations: m.iterations,
                elapsed_ns: m.elapsed_ns,
                ns_per_op: m.ns_per_op(),
                allocations: m.allocations,
                allocs_per_op: m.allocs_per_op(),
                bytes: m.bytes,
                bytes_per_op: m.bytes_per_op(),
            })?;
        }

        writer.flush()?;
        tracing::debug!("Report written to {:?}", outputfile.relative_path());
        Ok(outputfile.relative_path().to_path_buf())
    }

    /// Writes `report.json` to `folder`
    pub fn write_json(&self, folder: &str) -> Result<PathBuf> {
        let outputfile = OutputFile::new(folder, "report.json")?;
        serde_json::to_writer_pretty(outputfile.file(), self)
            .wrap_err("Failed to serialize report")?;
        tracing::debug!("Report written to {:?}", outputfile.relative_path());
        Ok(outputfile.relative_path().to_path_buf())
    }
}

#[derive(Debug)]
pub struct OutputFile {
    file: File,
    relative_path: PathBuf,
}

impl OutputFile {
    pub fn new(folder: &str, file_name: &str) -> Result<Self> {
        let relative_path = Path::new(&folder).join(file_name);

        if let Some(parent) = relative_path.parent() {
            create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create directories for {:?}", parent))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&relative_path)
            .wrap_err_with(|| format!("Failed to open file: {:?}", relative_path))?;

        Ok(OutputFile {
            file,
            relative_path,
        })
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_owned(self) -> File {
        self.file
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }
}
