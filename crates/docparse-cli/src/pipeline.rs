//! Parse pipeline: load templates, parse, project, render, write.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use chrono::{Local, Utc};
use tracing::{debug, info};

use docparse_core::error::ParseError;
use docparse_core::models::config::OcrConfig;
use docparse_core::{
    DocparseError, ParseEngine, ParseOutput, ParseRequest, ReportFormat, ReportMetadata,
    Statistics, Template, TemplateEngine, TemplateSet, project, render, write_report,
};

use crate::console::Console;

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    /// Configuration, OCR models or logging could not be set up.
    SetupError = 1,
    /// Templates or the document could not be parsed.
    ParsingError = 3,
    /// The report could not be written.
    IoError = 4,
}

impl ExitStatus {
    /// Exit status for a library error.
    pub fn of(error: &DocparseError) -> Self {
        match error {
            DocparseError::Config(_) => ExitStatus::SetupError,
            DocparseError::Parse(ParseError::Ocr(ocr)) if ocr.is_setup() => ExitStatus::SetupError,
            DocparseError::Template(_) | DocparseError::Parse(_) => ExitStatus::ParsingError,
            DocparseError::Io(_) => ExitStatus::IoError,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

/// A failed pipeline stage.
#[derive(Debug)]
pub struct Failure {
    pub status: ExitStatus,
    pub error: anyhow::Error,
}

impl Failure {
    pub fn new(status: ExitStatus, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    fn from_error(error: impl Into<DocparseError>, context: String) -> Self {
        let error = error.into();
        Self::new(ExitStatus::of(&error), anyhow::Error::new(error).context(context))
    }
}

/// Everything one run needs, resolved from flags and configuration.
#[derive(Debug, Clone)]
pub struct Options {
    pub input: PathBuf,
    pub templates: Vec<PathBuf>,
    pub output: PathBuf,
    pub page_index: u32,
    pub ocr: bool,
    pub dpi: u32,
    pub format: ReportFormat,
    pub timeout: Option<Duration>,
    pub ocr_config: OcrConfig,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub fields_matched: usize,
    pub total_fields_found: usize,
    pub elapsed: Duration,
    pub format: ReportFormat,
}

/// Run every stage; the first failure aborts the rest.
pub async fn run(options: Options, console: &Console) -> Result<Summary, Failure> {
    let start = Instant::now();

    console.info("Starting document parsing...");
    console.verbose(&format!("Input document: {}", options.input.display()));
    console.verbose(&format!(
        "Templates: {}",
        options
            .templates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    console.verbose(&format!("Output file: {}", options.output.display()));
    console.verbose(&format!("Page index: {}", options.page_index));
    console.verbose(&format!("OCR enabled: {}", options.ocr));
    console.verbose(&format!("DPI: {}", options.dpi));

    let templates = load_templates(&options, console)?;

    let spinner = console.progress("Parsing document...");
    let parse_start = Instant::now();
    let request = ParseRequest::new(&options.input)
        .with_page_index(options.page_index)
        .with_ocr(options.ocr)
        .with_dpi(options.dpi);
    let parsed = parse(request, templates, options.ocr_config.clone(), options.timeout).await;
    spinner.finish_and_clear();
    let (output, templates) = parsed?;
    let parse_time = parse_start.elapsed();
    debug!(
        "Engine reported {:.3}s for {} page(s)",
        output.elapsed.as_secs_f64(),
        output.page_count
    );
    console.success(&format!("Document parsed in {:.2}s", parse_time.as_secs_f64()));

    let spinner = console.progress("Processing results...");
    let projection = project(&output.fields, &templates, options.page_index);
    let stats = Statistics::new(&projection, parse_time);
    spinner.finish_and_clear();
    info!(
        "Matched {} of {} field(s) on page {}",
        projection.matched, projection.total_found, options.page_index
    );
    if projection.results.is_empty() {
        console.warning("No fields matched on the specified page.");
    }

    let metadata = ReportMetadata {
        document: options
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| options.input.display().to_string()),
        page_index: options.page_index,
        timestamp: Utc::now(),
        local_offset: *Local::now().offset(),
    };
    let report = render(options.format, &metadata, &stats, &projection.results);

    write_report(&options.output, &report).map_err(|e| {
        Failure::from_error(e, format!("Failed to write output file '{}'", options.output.display()))
    })?;
    console.success(&format!("Results written to: {}", options.output.display()));

    Ok(Summary {
        fields_matched: projection.matched,
        total_fields_found: projection.total_found,
        elapsed: start.elapsed(),
        format: options.format,
    })
}

fn load_templates(options: &Options, console: &Console) -> Result<TemplateSet, Failure> {
    let spinner = console.progress("Loading templates...");
    let mut templates = Vec::with_capacity(options.templates.len());

    for path in &options.templates {
        let template = Template::load(path).map_err(|e| {
            spinner.finish_and_clear();
            Failure::from_error(e, format!("Failed to load template '{}'", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        console.verbose(&format!("Loaded template: {} ({} fields)", file_name, template.len()));
        templates.push(template);
    }

    spinner.finish_and_clear();
    let set = TemplateSet::merge(templates);
    console.success(&format!("Loaded {} template(s)", set.templates().len()));
    debug!("Merged namespace has {} distinct field(s)", set.len());
    Ok(set)
}

/// Run the engine on a blocking thread, handing the templates back for
/// projection.
async fn parse(
    request: ParseRequest,
    templates: TemplateSet,
    ocr_config: OcrConfig,
    timeout: Option<Duration>,
) -> Result<(ParseOutput, TemplateSet), Failure> {
    let task = tokio::task::spawn_blocking(move || {
        let output = TemplateEngine::new(ocr_config).parse(&request, &templates);
        (output, templates)
    });

    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
            Failure::new(
                ExitStatus::ParsingError,
                anyhow!("Parsing timed out after {}s", limit.as_secs()),
            )
        })?,
        None => task.await,
    };

    let (output, templates) = joined.map_err(|e| {
        Failure::new(ExitStatus::ParsingError, anyhow!("Parse task failed: {e}"))
    })?;
    let output = output.map_err(|e| Failure::from_error(e, "Parsing failed".to_string()))?;

    Ok((output, templates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docparse_core::{OcrError, TemplateError};

    #[test]
    fn test_exit_status_mapping() {
        let config = DocparseError::Config("bad".to_string());
        assert_eq!(ExitStatus::of(&config), ExitStatus::SetupError);

        let template = DocparseError::from(TemplateError::Empty("t".to_string()));
        assert_eq!(ExitStatus::of(&template), ExitStatus::ParsingError);

        let models = DocparseError::from(ParseError::from(OcrError::Unavailable));
        assert_eq!(ExitStatus::of(&models), ExitStatus::SetupError);

        let recognition =
            DocparseError::from(ParseError::from(OcrError::Recognition("x".to_string())));
        assert_eq!(ExitStatus::of(&recognition), ExitStatus::ParsingError);

        let io = DocparseError::from(std::io::Error::other("disk full"));
        assert_eq!(ExitStatus::of(&io), ExitStatus::IoError);
    }

    #[test]
    fn test_exit_status_values() {
        assert_eq!(ExitStatus::Success as u8, 0);
        assert_eq!(ExitStatus::SetupError as u8, 1);
        assert_eq!(ExitStatus::ParsingError as u8, 3);
        assert_eq!(ExitStatus::IoError as u8, 4);
    }

    #[test]
    fn test_failure_keeps_context() {
        let failure = Failure::from_error(
            TemplateError::Empty("t".to_string()),
            "Failed to load template 't.xml'".to_string(),
        );
        assert_eq!(failure.status, ExitStatus::ParsingError);
        assert_eq!(
            format!("{:#}", failure.error),
            "Failed to load template 't.xml': template error: template `t` declares no fields"
        );
    }
}
