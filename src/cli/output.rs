// Output formatting for CLI

use std::io::Write;
use std::path::Path;

use tagsweep::{OutputFormat, RetagSummary};

/// Format and output data
pub struct OutputFormatter {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output the result of retagging one file
    pub fn output_summary(
        &self,
        path: &Path,
        summary: &RetagSummary,
        dry_run: bool,
        writer: &mut impl Write,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "file": path.display().to_string(),
                    "dry_run": dry_run,
                    "summary": summary,
                });
                writeln!(writer, "{}", serde_json::to_string(&value)?)?;
            }
            OutputFormat::Text => {
                if self.quiet {
                    return Ok(());
                }
                let verb = if dry_run { "Would tag" } else { "Tagged" };
                writeln!(
                    writer,
                    "✓ {} {}: {} frames kept, {} tags dropped, {} of {} bytes unrecognized",
                    verb,
                    path.display(),
                    summary.frames,
                    summary.tags_dropped,
                    summary.unrecognized,
                    summary.scanned
                )?;
            }
        }
        Ok(())
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}
