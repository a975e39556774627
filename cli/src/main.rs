//! exampage CLI - printed pagination audit for exam PDFs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use exampage::layout::extract_document;
use exampage::{
    detect_format_from_bytes, render, run_batch, validate_upload, Analyzer, BatchOptions,
    DecodeOptions, DocumentSource, JsonDump, JsonFormat, LayoutConfig, PdfDocument, RawDocument,
    Upload, ValidationError,
};

#[derive(Parser)]
#[command(name = "exampage")]
#[command(version)]
#[command(
    about = "Infer printed page numbers and question markers of exam PDFs",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a batch of PDFs (or page structure JSON dumps)
    Analyze {
        /// Input files, analyzed and reported in this order
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Report failed documents instead of failing the batch
        #[arg(long, env = "EXAMPAGE_PARTIAL")]
        partial: bool,

        /// Analyze documents one after another
        #[arg(long, env = "EXAMPAGE_SEQUENTIAL")]
        sequential: bool,

        /// Treat unreadable pages as blank pages
        #[arg(long, env = "EXAMPAGE_LENIENT")]
        lenient: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show a pagination report for one document
    Info {
        /// Input PDF or JSON dump
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Treat unreadable pages as blank pages
        #[arg(long, env = "EXAMPAGE_LENIENT")]
        lenient: bool,

        /// Also list the positioned text of this page (1-indexed)
        #[arg(short, long, value_name = "N")]
        page: Option<usize>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show version information
    Version,
}

/// Page geometry overrides.
#[derive(Args)]
struct LayoutArgs {
    /// Nominal page height in points
    #[arg(long, env = "EXAMPAGE_PAGE_HEIGHT", value_name = "PT")]
    page_height: Option<f64>,

    /// Fallback window margin (bottom conventions need y above it)
    #[arg(long, env = "EXAMPAGE_MARGIN", value_name = "PT")]
    margin: Option<f64>,

    /// Fallback window header band, added to the margin for top conventions
    #[arg(long, env = "EXAMPAGE_TOP_BAND", value_name = "PT")]
    top_band: Option<f64>,

    /// Horizontal tolerance of the fallback window
    #[arg(long, env = "EXAMPAGE_TOLERANCE", value_name = "PT")]
    tolerance: Option<f64>,

    /// Printed page numbers must stay below this value
    #[arg(long, env = "EXAMPAGE_MAX_PAGE_NUMBER", value_name = "N")]
    max_page_number: Option<u32>,
}

impl LayoutArgs {
    fn to_config(&self) -> LayoutConfig {
        let mut config = LayoutConfig::default();
        if let Some(v) = self.page_height {
            config = config.with_page_height(v);
        }
        if let Some(v) = self.margin {
            config = config.with_margin(v);
        }
        if let Some(v) = self.top_band {
            config = config.with_top_band(v);
        }
        if let Some(v) = self.tolerance {
            config = config.with_tolerance(v);
        }
        if let Some(v) = self.max_page_number {
            config = config.with_max_page_number(v);
        }
        config
    }
}

/// A file given on the command line.
enum Input {
    Pdf(Upload),
    Dump(JsonDump),
}

impl Input {
    fn load(path: &Path) -> exampage::Result<Self> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            JsonDump::from_path(path).map(Input::Dump)
        } else {
            Upload::from_path(path).map(Input::Pdf)
        }
    }
}

impl DocumentSource for Input {
    fn file_name(&self) -> &str {
        match self {
            Input::Pdf(upload) => upload.file_name(),
            Input::Dump(dump) => dump.file_name(),
        }
    }

    fn decode(&self, options: &DecodeOptions) -> exampage::Result<RawDocument> {
        match self {
            Input::Pdf(upload) => upload.decode(options),
            Input::Dump(dump) => dump.decode(options),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            inputs,
            output,
            compact,
            partial,
            sequential,
            lenient,
            layout,
        } => {
            let mut options = BatchOptions::new().with_layout(layout.to_config());
            if partial {
                options = options.partial();
            }
            if sequential {
                options = options.sequential();
            }
            if lenient {
                options = options.lenient();
            }
            cmd_analyze(&inputs, output.as_deref(), compact, &options)
        }
        Commands::Info {
            input,
            lenient,
            page,
            layout,
        } => {
            let decode = if lenient {
                DecodeOptions::new().lenient()
            } else {
                DecodeOptions::new()
            };
            cmd_info(&input, page, layout.to_config(), &decode)
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_analyze(
    inputs: &[PathBuf],
    output: Option<&Path>,
    compact: bool,
    options: &BatchOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if inputs.len() > options.limits.max_files {
        return Err(ValidationError::TooManyFiles {
            count: inputs.len(),
            max: options.limits.max_files,
        }
        .into());
    }

    let sources = inputs
        .iter()
        .map(|path| Input::load(path))
        .collect::<exampage::Result<Vec<_>>>()?;
    for source in &sources {
        if let Input::Pdf(upload) = source {
            validate_upload(upload, &options.limits)?;
        }
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Analyzing {} documents...", sources.len()));
    let report = run_batch(&sources, options);
    pb.finish_and_clear();
    let report = report?;

    if report.failures() > 0 {
        eprintln!(
            "{} {} of {} documents could not be analyzed",
            "Warning:".yellow().bold(),
            report.failures(),
            report.len()
        );
    }

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    if let Some(path) = output {
        let file = fs::File::create(path)?;
        render::to_json_writer(file, &report, format)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", render::to_json(&report, format)?);
    }

    Ok(())
}

fn cmd_info(
    input: &Path,
    page: Option<usize>,
    layout: LayoutConfig,
    decode: &DecodeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = Input::load(input)?;
    let raw = source.decode(decode)?;
    let doc = extract_document(source.file_name(), &raw);
    let analyzer = Analyzer::new(layout);
    let convention = analyzer.convention(&doc);
    let analysis = analyzer.analyze(&doc);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    match &source {
        Input::Pdf(upload) => {
            let format = detect_format_from_bytes(&upload.data)?;
            println!("{}: {}", "Format".bold(), format);
        }
        Input::Dump(_) => println!("{}: page structure dump", "Format".bold()),
    }
    println!("{}: {}", "Pages".bold(), doc.page_count());
    match convention {
        Some(convention) => println!("{}: {}", "Page numbers".bold(), convention),
        None => println!("{}: {}", "Page numbers".bold(), "not detected".yellow()),
    }

    println!();
    println!("{}", "Pagination".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print!("{}", render::to_summary(&analysis));

    println!();
    if analysis.missing_pages().is_empty() && analysis.question_gaps().is_empty() {
        println!("{}", "No pagination gaps found".green());
    } else {
        println!("{}", "Pagination gaps found".yellow().bold());
    }

    if let Some(page_num) = page {
        println!();
        println!("{}", format!("Page {} text", page_num).cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        print!("{}", page_listing(&doc, page_num)?);
    }

    Ok(())
}

/// Positioned tokens of one page, one `x y text` line each.
fn page_listing(
    doc: &PdfDocument,
    page_num: usize,
) -> Result<String, Box<dyn std::error::Error>> {
    let page = doc.get_page(page_num).ok_or_else(|| {
        format!(
            "Page {} out of range (document has {} pages)",
            page_num,
            doc.page_count()
        )
    })?;

    let mut listing = String::new();
    for token in page.tokens() {
        listing.push_str(&format!("{:>8.1} {:>8.1}  {}\n", token.x, token.y, token.text));
    }
    Ok(listing)
}

fn cmd_version() {
    println!("{} {}", "exampage".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF printed pagination and question marker inference");
}
