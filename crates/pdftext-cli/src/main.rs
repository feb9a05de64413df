use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pdftext_core::{BackendKind, Config, ParseRequest, PdfBackend, config_file, extract_from_bytes};
use pdftext_mupdf::MupdfBackend;
use pdftext_pdf_extract::PdfExtractBackend;

/// pdftext - Extract plain text from PDF documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the text of a local PDF, exactly as the server would
    Extract {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Extraction backend: mupdf or pdf-extract
        #[arg(long)]
        backend: Option<BackendKind>,

        /// Write the text to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the %PDF signature check
        #[arg(long)]
        no_signature_check: bool,
    },

    /// Print the JSON request body for POST /parse-pdf
    Encode {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Write the JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            file_path,
            backend,
            output,
            no_signature_check,
        } => {
            // Resolve configuration: CLI flags > env vars > config files > defaults
            let mut config = config_file::resolve_config();
            if let Some(kind) = backend {
                config.backend = kind;
            }
            if no_signature_check {
                config.require_signature = false;
            }

            let text = extract(&file_path, &config)?;
            write_output(output.as_deref(), &text)
        }
        Command::Encode { file_path, output } => {
            let body = encode_request(&file_path)?;
            write_output(output.as_deref(), &format!("{body}\n"))
        }
    }
}

fn backend_for(config: &Config) -> Box<dyn PdfBackend> {
    match config.backend {
        BackendKind::Mupdf => Box::new(
            MupdfBackend::new()
                .with_header_exclusion(config.header_exclusion)
                .with_footer_exclusion(config.footer_exclusion),
        ),
        BackendKind::PdfExtract => Box::new(PdfExtractBackend::new()),
    }
}

fn extract(path: &Path, config: &Config) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let backend = backend_for(config);
    tracing::info!(backend = backend.name(), file = %path.display(), "extracting");

    extract_from_bytes(&bytes, backend.as_ref(), config.extract_options())
        .with_context(|| format!("{}", path.display()))
}

fn encode_request(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if !bytes.starts_with(pdftext_core::PDF_SIGNATURE) {
        tracing::warn!(file = %path.display(), "file does not start with %PDF");
    }

    let request = ParseRequest {
        file_base64: STANDARD.encode(&bytes),
    };
    Ok(serde_json::to_string(&request)?)
}

fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
