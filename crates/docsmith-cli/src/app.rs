//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tempfile::TempDir;

use docsmith_pdf::Verdict;
use docsmith_tools::{
    add_heading, add_paragraph, check_conversion, convert_to_pdf_with, create_document,
    describe_formatting, document_info, get_document_info, paragraph_formatting,
    run_formatting_demo, HeadingOptions, ParagraphOptions, Settings,
};
use docsmith_tools::util::ensure_docx_extension;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "docsmith")]
#[command(author, version, about = "Word documents from the command line", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./docsmith.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Direct run formatting shared by paragraph and heading
#[derive(Args, Debug, Default)]
struct FontArgs {
    /// Font family, e.g. "Times New Roman"
    #[arg(long)]
    font: Option<String>,

    /// Font size in points
    #[arg(long)]
    size: Option<f32>,

    /// Bold text
    #[arg(long)]
    bold: bool,

    /// Italic text
    #[arg(long)]
    italic: bool,

    /// Text colour as six hex digits, e.g. 0000FF
    #[arg(long)]
    color: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new document, replacing any existing one
    Create {
        /// Document file (.docx is appended when missing)
        file: String,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Document author
        #[arg(long)]
        author: Option<String>,
    },

    /// Append a paragraph
    Paragraph {
        file: String,
        text: String,

        /// Paragraph style; unknown styles fall back to Normal
        #[arg(long)]
        style: Option<String>,

        #[command(flatten)]
        font: FontArgs,
    },

    /// Append a heading
    Heading {
        file: String,
        text: String,

        /// Heading level (1-9)
        #[arg(short, long, default_value_t = 1)]
        level: u8,

        /// Draw a line under the heading
        #[arg(long)]
        border_bottom: bool,

        #[command(flatten)]
        font: FontArgs,
    },

    /// Convert a document to PDF
    Convert {
        file: String,

        /// Output PDF (defaults to the document name with .pdf)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the formatting of every paragraph
    Inspect {
        file: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show title, author and content counts
    Info {
        file: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Run the six-step formatting demo and print the read-back formatting
    DemoFormatting {
        /// Document to write (defaults to the configured demo output)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Convert a sample document with spaces in its name and verify the PDF
    VerifyPdf {
        /// Working directory (defaults to a temporary directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

/// Install the stderr log subscriber
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let settings = Settings::discover(cli.config.as_deref(), &cwd)
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Create {
            file,
            title,
            author,
        } => {
            create_command(&file, title.as_deref(), author.as_deref()).await;
        }
        Commands::Paragraph {
            file,
            text,
            style,
            font,
        } => {
            paragraph_command(&file, &text, style, font).await;
        }
        Commands::Heading {
            file,
            text,
            level,
            border_bottom,
            font,
        } => {
            heading_command(&file, &text, level, border_bottom, font).await;
        }
        Commands::Convert { file, output } => {
            convert_command(&settings, &file, output.as_deref()).await;
        }
        Commands::Inspect { file, format } => {
            inspect_command(&file, format).await?;
        }
        Commands::Info { file, format } => {
            info_command(&file, format).await?;
        }
        Commands::DemoFormatting { output } => {
            let output = output.unwrap_or_else(|| settings.demo.output.clone());
            demo_formatting_command(&output).await;
        }
        Commands::VerifyPdf { dir } => {
            let verdict = verify_pdf_command(&settings, dir.as_deref()).await?;
            if verdict.is_failure() {
                anyhow::bail!("PDF verification failed");
            }
        }
    }

    Ok(())
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

/// Execute the create command
pub async fn create_command(file: &str, title: Option<&str>, author: Option<&str>) {
    println!("{}", create_document(file, title, author).await);
}

async fn paragraph_command(file: &str, text: &str, style: Option<String>, font: FontArgs) {
    let options = ParagraphOptions {
        style,
        font_name: font.font,
        font_size: font.size,
        bold: flag(font.bold),
        italic: flag(font.italic),
        color: font.color,
    };
    println!("{}", add_paragraph(file, text, &options).await);
}

async fn heading_command(file: &str, text: &str, level: u8, border_bottom: bool, font: FontArgs) {
    let options = HeadingOptions {
        level,
        font_name: font.font,
        font_size: font.size,
        bold: flag(font.bold),
        italic: flag(font.italic),
        color: font.color,
        border_bottom,
    };
    println!("{}", add_heading(file, text, &options).await);
}

/// Execute the convert command
pub async fn convert_command(settings: &Settings, file: &str, output: Option<&str>) {
    let converter = settings.conversion.converter();
    println!("{}", convert_to_pdf_with(&converter, file, output).await);
}

/// Execute the inspect command
pub async fn inspect_command(file: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", describe_formatting(file).await),
        OutputFormat::Json => {
            let reports = paragraph_formatting(Path::new(&ensure_docx_extension(file)))
                .with_context(|| format!("Failed to read {}", file))?;
            let json = serde_json::to_string_pretty(&reports)
                .context("Failed to serialize formatting report to JSON")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Execute the info command
pub async fn info_command(file: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", get_document_info(file).await),
        OutputFormat::Json => {
            let info = document_info(Path::new(&ensure_docx_extension(file)))
                .with_context(|| format!("Failed to read {}", file))?;
            let json = serde_json::to_string_pretty(&info)
                .context("Failed to serialize document info to JSON")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Execute the formatting demo
pub async fn demo_formatting_command(output: &str) {
    println!("Testing formatting features...\n");

    let demo = run_formatting_demo(output).await;
    println!("{}", demo.created);
    for (index, (label, message)) in demo.results.iter().enumerate() {
        println!("Test {}: {}...", index + 1, label);
        println!("  Result: {}", message);
    }

    println!("\nVerifying formatting...\n");
    print!("{}", demo.report);
    println!("\nOpen {} in Word to verify the formatting visually.", output);
}

/// Execute the PDF verification flow
pub async fn verify_pdf_command(settings: &Settings, dir: Option<&Path>) -> Result<Verdict> {
    let scratch;
    let work_dir = match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            dir
        }
        None => {
            scratch = TempDir::new().context("Failed to create a temporary directory")?;
            scratch.path()
        }
    };

    let converter = settings.conversion.converter();
    println!("Backends: {}", converter.backend_names().join(", "));
    let check = check_conversion(&converter, work_dir).await;

    println!("Source: {}", check.source.display());
    println!("Requested: {}", check.requested.display());
    println!("Tool: {}", check.message);
    println!("{}", check.verdict);

    Ok(check.verdict)
}
