//! The run over a directory of PDFs.
//!
//! Each file goes through the same steps, one file at a time: the report
//! header is written, text is read from the first pages, metadata is
//! extracted, then a citation and a summary are generated and appended to
//! the bibliography. Both output files are flushed after every file so an
//! interrupted run leaves readable output up to the last finished file.
//!
//! Failure handling differs by stage:
//!
//! - a PDF that cannot be opened aborts the run
//! - a PDF with no extractable text gets a note in the report and no entry
//! - a metadata extraction failure aborts the run
//! - a citation or summary failure is written as a BibTeX comment and the
//!   run moves on to the next file

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{error, info, warn, Instrument};

use crate::config::{ConfigError, ConfigProvider, PipelineConfig};
use crate::extractor::{ExtractionError, PaperExtractor};
use crate::models::PaperInfo;
use crate::utils::{
    bib_error_comment, bib_summary_comments, find_all_pdfs, format_bib_entry, read_pdf_text,
    PageLimit, PdfExtractError, ProgressReporter, BIB_HEADER,
};

const SEPARATOR: &str = "--------------------------------------------------";

/// Errors that stop a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Pdf(#[from] PdfExtractError),

    #[error("Failed to extract paper info from {path}: {source}")]
    PaperInfo {
        path: PathBuf,
        #[source]
        source: ExtractionError,
    },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// PDF files found under the input directory
    pub found: usize,
    /// Files fully processed, whatever their outcome
    pub processed: usize,
    /// Files with no extractable text
    pub empty: usize,
    /// BibTeX entries written
    pub entries: usize,
    /// Files whose entry was replaced by an error comment
    pub bib_errors: usize,
}

/// Drives discovery, extraction and output for one directory.
pub struct Pipeline<E> {
    config: PipelineConfig,
    extractor: E,
    show_progress: bool,
}

impl<E: PaperExtractor> Pipeline<E> {
    pub fn new(config: PipelineConfig, extractor: E) -> Self {
        Self {
            config,
            extractor,
            show_progress: false,
        }
    }

    /// Build from whatever configuration `provider` supplies
    pub fn from_provider(
        provider: &dyn ConfigProvider,
        extractor: E,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(provider.load()?.pipeline, extractor))
    }

    /// Draw a progress bar on stderr while running
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    fn page_limit(&self) -> PageLimit {
        match self.config.metadata_pages {
            0 => PageLimit::All,
            n => PageLimit::First(n),
        }
    }

    /// Process every PDF under the input directory.
    ///
    /// Both output files are truncated at the start of the run.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        info!("Searching for PDF files in: {}", self.config.input_dir.display());
        let pdf_files = find_all_pdfs(&self.config.input_dir);
        info!("Found {} PDF files.", pdf_files.len());

        let mut summary = RunSummary {
            found: pdf_files.len(),
            ..RunSummary::default()
        };

        let mut report = BufWriter::new(File::create(self.config.report_path())?);
        let mut bib = BufWriter::new(File::create(self.config.bib_path())?);
        bib.write_all(BIB_HEADER.as_bytes())?;
        bib.flush()?;
        report.flush()?;

        if pdf_files.is_empty() {
            info!("No PDF files found in the directory.");
            return Ok(summary);
        }

        let total = pdf_files.len();
        let progress = if self.show_progress {
            ProgressReporter::new("Processing", total)
        } else {
            ProgressReporter::quiet("Processing", total)
        };

        for (i, path) in pdf_files.iter().enumerate() {
            let index = i + 1;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Processing {}/{}: {}", index, total, name);
            progress.set_message(name);

            let span = tracing::info_span!("paper", index);
            self.process_file(index, path, &mut report, &mut bib, &mut summary)
                .instrument(span)
                .await?;

            summary.processed += 1;
            progress.inc();
        }
        progress.finish();

        info!("Processing complete!");
        info!("Processed {} PDF files.", summary.processed);
        Ok(summary)
    }

    async fn process_file<W: Write>(
        &self,
        index: usize,
        path: &Path,
        report: &mut W,
        bib: &mut W,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        writeln!(report, "{}", SEPARATOR)?;
        writeln!(report, "File #{}", index)?;
        writeln!(report, "Path: {}", path.display())?;
        writeln!(report, "{}", SEPARATOR)?;

        let text = read_pdf_text(path, self.page_limit())?;
        if text.trim().is_empty() {
            warn!("No text extracted from {}.", path.display());
            writeln!(report, "No text extracted from this file.")?;
            report.flush()?;
            summary.empty += 1;
            return Ok(());
        }

        let info = self
            .extractor
            .extract_paper_info(&text)
            .await
            .map_err(|source| PipelineError::PaperInfo {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Extracted paper info: {}", info.report_block());
        write!(report, "{}\n\n", info.report_block())?;
        report.flush()?;

        info!("Generating BibTeX entry for: {}", info.title);
        match self.bib_section(&info, &text, path).await {
            Ok((key, section)) => {
                bib.write_all(section.as_bytes())?;
                info!("Added BibTeX entry for: {}", key);
                summary.entries += 1;
            }
            Err(e) => {
                error!("Error generating BibTeX entry for {}: {}", info.title, e);
                bib.write_all(bib_error_comment(&info.title, &e).as_bytes())?;
                summary.bib_errors += 1;
            }
        }
        bib.flush()?;

        Ok(())
    }

    /// The formatted entry plus its comment lines, and the entry's key
    async fn bib_section(
        &self,
        info: &PaperInfo,
        text: &str,
        path: &Path,
    ) -> Result<(String, String), ExtractionError> {
        let entry = self.extractor.generate_bib_entry(info).await?;
        let formatted = format_bib_entry(&entry);

        info!("Generating summary for: {}", info.title);
        let paper_summary = self.extractor.generate_summary(text).await?;

        let section = format!(
            "{}\n{}",
            formatted,
            bib_summary_comments(&paper_summary, path)
        );
        Ok((entry.key, section))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extractor::MockExtractor;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_empty_directory_writes_only_header() {
        let dir = tempdir().unwrap();
        let pipeline = Pipeline::new(PipelineConfig::for_dir(dir.path()), MockExtractor::new());

        let summary = pipeline.run().await.unwrap();
        assert_eq!(summary, RunSummary::default());

        let report = std::fs::read_to_string(dir.path().join("output.txt")).unwrap();
        let bib = std::fs::read_to_string(dir.path().join("references.bib")).unwrap();
        assert!(report.is_empty());
        assert_eq!(bib, BIB_HEADER);
        assert!(pipeline.extractor().calls().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_pdf_aborts_run() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"not a pdf").unwrap();

        let pipeline = Pipeline::new(PipelineConfig::for_dir(dir.path()), MockExtractor::new());
        let result = pipeline.run().await;
        assert!(matches!(result, Err(PipelineError::Pdf(_))));

        let report = std::fs::read_to_string(dir.path().join("output.txt")).unwrap();
        assert!(report.contains("File #1\n"));
        let bib = std::fs::read_to_string(dir.path().join("references.bib")).unwrap();
        assert_eq!(bib, BIB_HEADER);
    }

    #[test]
    fn test_from_provider_uses_pipeline_section() {
        let config = Config {
            pipeline: PipelineConfig {
                metadata_pages: 0,
                ..PipelineConfig::for_dir("/papers")
            },
            ..Config::default()
        };
        let pipeline = Pipeline::from_provider(&config, MockExtractor::new()).unwrap();
        assert_eq!(pipeline.config().input_dir, PathBuf::from("/papers"));
        assert_eq!(pipeline.page_limit(), PageLimit::All);
    }
}
