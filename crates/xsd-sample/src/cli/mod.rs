//! Command-line surface for the `xsd-sample` binary.
//!
//! The binary only parses arguments and installs logging; loading, generation
//! and output all happen in [`run`] so they can be exercised in tests without
//! spawning a process.

mod error;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use clap::Parser;
use tracing::info;

pub use error::CliError;

use crate::atomic_io::write_atomic;
use crate::generator::generate_document;
use crate::options::GenerationOptions;
use crate::schema::SchemaDocument;

/// Output path used when `--output` is omitted.
pub const DEFAULT_OUTPUT: &str = "output.xml";

/// `xsd-sample` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "xsd-sample",
    about = "Generate a sample XML instance document from an XSD schema",
    version
)]
pub struct CliArgs {
    /// Path to the XSD schema.
    #[arg(value_name = "SCHEMA")]
    schema: Utf8PathBuf,
    /// Where to write the generated XML document.
    #[arg(short = 'o', long = "output", value_name = "path", default_value = DEFAULT_OUTPUT)]
    output: Utf8PathBuf,
    /// Global element to use as the document root. Defaults to the first one.
    #[arg(short = 'r', long = "root", value_name = "name", env = "XSD_SAMPLE_ROOT")]
    root: Option<String>,
    /// Seed for reproducible output. Defaults to a random seed.
    #[arg(long = "seed", value_name = "n", env = "XSD_SAMPLE_SEED")]
    seed: Option<u64>,
    /// Where to write a JSON report of the run.
    #[arg(long = "report", value_name = "path")]
    report: Option<Utf8PathBuf>,
}

impl CliArgs {
    /// Returns the schema path.
    #[must_use]
    pub fn schema(&self) -> &Utf8Path {
        &self.schema
    }

    /// Returns the output document path.
    #[must_use]
    pub fn output(&self) -> &Utf8Path {
        &self.output
    }

    /// Returns the requested root element name.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Returns the requested seed.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the report path, if a report was requested.
    #[must_use]
    pub fn report(&self) -> Option<&Utf8Path> {
        self.report.as_deref()
    }

    /// Builds generation options from the arguments.
    #[must_use]
    pub fn generation_options(&self) -> GenerationOptions {
        let options = GenerationOptions::new();
        let with_root = match &self.root {
            Some(root) => options.with_root(root.as_str()),
            None => options,
        };
        match self.seed {
            Some(seed) => with_root.with_seed(seed),
            None => with_root,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Path the XML document was written to.
    pub output: Utf8PathBuf,
    /// Name of the document element.
    pub root: String,
    /// Seed that reproduces the document.
    pub seed: u64,
    /// Number of generated elements.
    pub element_count: usize,
    /// Number of non-fatal warnings.
    pub warning_count: usize,
}

/// Loads the schema, generates a document and writes the outputs.
///
/// # Errors
///
/// Returns [`CliError`] when the schema cannot be loaded, generation fails,
/// or an output file cannot be written.
///
/// # Example
///
/// ```no_run
/// use clap::Parser;
/// use xsd_sample::cli::{CliArgs, run, success_message};
///
/// let args = CliArgs::parse_from(["xsd-sample", "camt.053.001.08.xsd", "--seed", "7"]);
/// let summary = run(&args).expect("sample written");
/// println!("{}", success_message(&summary));
/// ```
pub fn run(args: &CliArgs) -> Result<RunSummary, CliError> {
    let schema = SchemaDocument::open(args.schema())?;
    let document = generate_document(&schema, &args.generation_options())?;
    let xml = document.to_xml()?;
    write_output(args.output(), &xml)?;

    if let Some(report_path) = args.report() {
        let json = document
            .report()
            .to_json()
            .map_err(|err| CliError::ReportEncoding {
                message: err.to_string(),
            })?;
        write_output(report_path, json.as_bytes())?;
    }

    let summary = RunSummary {
        output: args.output().to_path_buf(),
        root: document.root().name().to_owned(),
        seed: document.seed(),
        element_count: document.root().element_count(),
        warning_count: document.warnings().len(),
    };
    info!(
        output = %summary.output,
        seed = summary.seed,
        elements = summary.element_count,
        warnings = summary.warning_count,
        "sample document written"
    );
    Ok(summary)
}

/// Formats the success message printed by the binary.
///
/// # Example
///
/// ```
/// use xsd_sample::cli::{RunSummary, success_message};
///
/// let summary = RunSummary {
///     output: "output.xml".into(),
///     root: "Document".to_owned(),
///     seed: 42,
///     element_count: 17,
///     warning_count: 0,
/// };
///
/// assert!(success_message(&summary).contains("output.xml"));
/// ```
#[must_use]
pub fn success_message(summary: &RunSummary) -> String {
    format!(
        "Wrote <{}> sample to {} (seed={}, elements={}, warnings={})",
        summary.root, summary.output, summary.seed, summary.element_count, summary.warning_count
    )
}

fn write_output(path: &Utf8Path, contents: &[u8]) -> Result<(), CliError> {
    let write_error = |message: String| CliError::WriteError {
        path: path.to_path_buf(),
        message,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| write_error("output path must name a file".to_owned()))?;
    let dir =
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| write_error(e.to_string()))?;

    write_atomic(&dir, Utf8Path::new(file_name), contents).map_err(|err| match err {
        CliError::WriteError { message, .. } => write_error(message),
        other => other,
    })
}

#[cfg(test)]
mod tests;
