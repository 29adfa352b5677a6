//! CSV report output

use crate::resource::{Inventory, Resource};
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Header row of the full report
pub const FULL_HEADER: [&str; 8] = [
    "arn",
    "account id",
    "region",
    "service",
    "service type",
    "resource id",
    "tag key",
    "tag value",
];

/// Report layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One ARN per line, no header
    Arn,
    /// One row per (resource, tag) pair with a header
    #[default]
    Full,
}

/// Write `resources` as CSV to any writer, returning the number of data rows
pub fn write_report<W: Write>(writer: W, resources: &[Resource], format: ReportFormat) -> Result<usize> {
    let mut out = csv::Writer::from_writer(writer);
    let mut rows = 0;

    match format {
        ReportFormat::Arn => {
            for resource in resources {
                out.write_record([resource.arn.as_str()])?;
                rows += 1;
            }
        }
        ReportFormat::Full => {
            out.write_record(FULL_HEADER)?;
            for resource in resources {
                let columns = [
                    resource.arn.as_str(),
                    resource.account_id.as_str(),
                    resource.region.as_str(),
                    resource.service.as_str(),
                    resource.resource_type.as_str(),
                    resource.id.as_str(),
                ];

                if resource.tags.is_empty() {
                    out.write_record(columns.iter().chain(["", ""].iter()))?;
                    rows += 1;
                    continue;
                }

                for tag in &resource.tags {
                    out.write_record(
                        columns
                            .iter()
                            .chain([tag.key.as_str(), tag.value.as_str()].iter()),
                    )?;
                    rows += 1;
                }
            }
        }
    }

    out.flush().context("Failed to flush report")?;
    Ok(rows)
}

/// Report written to a local path, or stdout for `-`
#[derive(Debug, Clone)]
pub struct LocalReport {
    path: PathBuf,
}

impl LocalReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdout(&self) -> bool {
        self.path == Path::new("-")
    }

    /// Write the whole report, returning the number of data rows
    pub fn write(&self, resources: &[Resource], format: ReportFormat) -> Result<usize> {
        if self.is_stdout() {
            let stdout = io::stdout();
            return write_report(stdout.lock(), resources, format);
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create report {}", self.path.display()))?;
        let rows = write_report(BufWriter::new(file), resources, format)
            .with_context(|| format!("Failed to write report {}", self.path.display()))?;

        tracing::info!("Wrote {} rows to {}", rows, self.path.display());
        Ok(rows)
    }
}

/// How a run ended once its report is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every region was collected
    Success,
    /// The report holds partial results; at least one region failed
    RegionsFailed,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::RegionsFailed => 2,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Write the report, then print region failures with their hints to `status`
///
/// The report is always written first, from whatever succeeded. A write
/// failure is returned as an error and no region error is printed.
pub fn finish<W: Write>(
    inventory: &Inventory,
    report: &LocalReport,
    format: ReportFormat,
    mut status: W,
) -> Result<ExitStatus> {
    report.write(&inventory.resources, format)?;

    if inventory.is_complete() {
        writeln!(status, "all done!")?;
        return Ok(ExitStatus::Success);
    }

    for err in &inventory.errors {
        writeln!(status, "{err}")?;
        if let Some(hint) = err.cause.hint() {
            writeln!(status, "  hint: {hint}")?;
        }
    }
    Ok(ExitStatus::RegionsFailed)
}
