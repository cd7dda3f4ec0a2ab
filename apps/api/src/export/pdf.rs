use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, info};

use crate::export::ExportError;
use crate::render::PageFrame;

/// Wall-clock budget for one external conversion.
pub const EXPORT_TIMEOUT_SECS: u64 = 60;

/// Everything a PDF backend needs to capture the preview.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Standalone HTML page; the resume lives inside the `target_id` element.
    pub html: String,
    pub target_id: &'static str,
    pub page: PageFrame,
}

/// Turns a rendered resume into PDF bytes.
#[async_trait]
pub trait PdfExporter: Send + Sync {
    async fn export(&self, job: &ExportJob) -> Result<Bytes, ExportError>;
}

/// Used when no converter is configured.
pub struct UnconfiguredExporter;

#[async_trait]
impl PdfExporter for UnconfiguredExporter {
    async fn export(&self, _job: &ExportJob) -> Result<Bytes, ExportError> {
        Err(ExportError::NotConfigured)
    }
}

/// Runs `<program> [args..] <input.html> <output.pdf>` in a scratch directory.
pub struct CommandPdfExporter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandPdfExporter {
    /// Splits a command line such as `wkhtmltopdf --quiet` on whitespace.
    /// Returns `None` for a blank command.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            timeout: Duration::from_secs(EXPORT_TIMEOUT_SECS),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl PdfExporter for CommandPdfExporter {
    async fn export(&self, job: &ExportJob) -> Result<Bytes, ExportError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("resume.html");
        let output = scratch.path().join("resume.pdf");
        tokio::fs::write(&input, job.html.as_bytes()).await?;

        debug!(
            program = %self.program,
            target = job.target_id,
            width_mm = job.page.width_mm,
            height_mm = job.page.height_mm,
            "Converting preview to PDF"
        );

        let run = Command::new(&self.program)
            .args(&self.args)
            .arg(&input)
            .arg(&output)
            .kill_on_drop(true)
            .output();
        let result = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| ExportError::Timeout(self.timeout.as_secs()))??;

        if !result.status.success() {
            return Err(ExportError::CommandFailed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let pdf = tokio::fs::read(&output).await?;
        if pdf.is_empty() {
            return Err(ExportError::EmptyOutput);
        }
        info!(bytes = pdf.len(), "PDF export finished");
        Ok(Bytes::from(pdf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageFormat;

    fn job(html: &str) -> ExportJob {
        ExportJob {
            html: html.to_string(),
            target_id: crate::render::RENDER_TARGET_ID,
            page: PageFrame {
                format: PageFormat::A4,
                width_mm: 210.0,
                height_mm: 297.0,
                margins_px: 40,
                crop_to_content: false,
            },
        }
    }

    #[test]
    fn test_command_line_parsing() {
        let exporter = CommandPdfExporter::from_command_line("  wkhtmltopdf --quiet ").unwrap();
        assert_eq!(exporter.program(), "wkhtmltopdf");
        assert_eq!(exporter.args, vec!["--quiet"]);
        assert!(CommandPdfExporter::from_command_line("   ").is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_exporter() {
        let err = UnconfiguredExporter.export(&job("<p/>")).await.unwrap_err();
        assert!(matches!(err, ExportError::NotConfigured));
    }

    #[tokio::test]
    async fn test_command_output_is_returned() {
        // `cp input output` stands in for a real converter.
        let exporter = CommandPdfExporter::from_command_line("cp").unwrap();
        let bytes = exporter.export(&job("<p>hi</p>")).await.unwrap();
        assert_eq!(&bytes[..], b"<p>hi</p>");
    }

    #[tokio::test]
    async fn test_failing_command_reports_status() {
        let exporter = CommandPdfExporter::from_command_line("false").unwrap();
        let err = exporter.export(&job("<p/>")).await.unwrap_err();
        assert!(matches!(err, ExportError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let exporter =
            CommandPdfExporter::from_command_line("definitely-not-a-pdf-renderer-xyz").unwrap();
        let err = exporter.export(&job("<p/>")).await.unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
