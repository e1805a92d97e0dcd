use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

mod output;

use abstractor_core::{Pipeline, SdgClassifier, process_pdf};
use output::ColorMode;
use tracing_subscriber::EnvFilter;

/// Abstract extractor - pull the abstract out of an academic PDF and
/// classify it against the Sustainable Development Goals
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the abstract from a PDF (text layer first, OCR fallback)
    Extract {
        /// Path to the PDF file
        file_path: PathBuf,

        /// Skip the remote SDG classification step
        #[arg(long)]
        no_classify: bool,

        /// Force the OCR path even when the text layer is usable
        #[arg(long)]
        ocr: bool,

        /// Emit the result as JSON instead of formatted text
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// OCR language passed to tesseract (default: eng)
        #[arg(long)]
        ocr_lang: Option<String>,

        /// Path to write the result to instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract {
            file_path,
            no_classify,
            ocr,
            json,
            no_color,
            ocr_lang,
            output,
        } => {
            let config = abstractor_core::load_config();
            let mut pipeline_config = config.pipeline_config();
            if ocr {
                // An unreachable threshold makes the text layer always look
                // sparse, so acquisition takes the OCR path.
                pipeline_config.ocr_fallback_threshold = Some(usize::MAX);
            }
            let extraction = config.extraction.clone().unwrap_or_default();

            let mut ocr = abstractor_ocr::OcrBackend::new();
            if let Some(dpi) = extraction.ocr_dpi {
                ocr = ocr.with_dpi(dpi);
            }
            if let Some(lang) = ocr_lang.or(extraction.ocr_lang.clone()) {
                ocr = ocr.with_lang(lang);
            }
            if let Some(secs) = extraction.ocr_page_timeout_secs {
                ocr = ocr.with_page_timeout(Duration::from_secs(secs));
            }

            let pipeline = Arc::new(Pipeline::new(
                Box::new(abstractor_pdf_mupdf::MupdfBackend::new()),
                Box::new(ocr),
                &pipeline_config,
            )?);

            let outcome = if no_classify {
                let path = file_path.clone();
                let abstract_text =
                    tokio::task::spawn_blocking(move || pipeline.extract_abstract(&path))
                        .await??;
                abstractor_core::ExtractionOutcome {
                    abstract_text,
                    sdg: Vec::new(),
                }
            } else {
                let classifier = SdgClassifier::new(pipeline_config.classifier.clone());
                process_pdf(pipeline, &classifier, file_path).await?
            };

            let mut writer: Box<dyn Write> = match output {
                Some(path) => Box::new(std::fs::File::create(path)?),
                None => Box::new(std::io::stdout()),
            };

            if json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&outcome)?)?;
            } else {
                output::print_outcome(&mut writer, &outcome, ColorMode(!no_color))?;
            }
        }
    }

    Ok(())
}
