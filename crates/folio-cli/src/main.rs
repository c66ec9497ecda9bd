// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entry point. Initialises logging, builds the engine from an optional JSON
// config, runs one transformation and prints the resulting artifact as JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use folio_core::human_errors::humanize_error;
use folio_core::{
    CompressionQuality, CropMargins, EngineConfig, FolioError, NumberPosition, PageNumberOptions,
    PageRange, PermissionSet, ProtectOptions, Rotation, WatermarkPosition, WatermarkSpec,
};
use folio_engine::PdfEngine;

#[derive(Parser)]
#[command(name = "folio", author, version, about = "Stateless file-to-file PDF transformations")]
struct Cli {
    /// JSON engine configuration (temp dir, input size limit, office converter)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Concatenate PDFs in the order given
    Merge {
        /// Input PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write one PDF per page range into a directory
    Split {
        input: PathBuf,

        /// Ranges such as "1-3,4-4,5-10"
        ranges: String,

        /// Output directory (created if missing)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Copy the listed pages, in the listed order, into a new PDF
    Extract {
        input: PathBuf,

        /// 1-based page numbers, e.g. "3,1,3"
        #[arg(short, long, value_delimiter = ',', required = true)]
        pages: Vec<u32>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Drop the listed pages
    Remove {
        input: PathBuf,

        #[arg(short, long, value_delimiter = ',', required = true)]
        pages: Vec<u32>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rotate pages clockwise by 90, 180 or 270 degrees
    Rotate {
        input: PathBuf,

        #[arg(short, long, value_parser = parse_rotation)]
        degrees: Rotation,

        /// Pages to rotate (default: all)
        #[arg(short, long, value_delimiter = ',')]
        pages: Vec<u32>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stamp a page-number caption on every page
    Number {
        input: PathBuf,

        #[arg(long, default_value = "bottom-center")]
        position: NumberPosition,

        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        start: i64,

        /// Caption template with {page_num} and {total_pages}
        #[arg(long, default_value = "Page {page_num}")]
        format: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stamp a text or image watermark on every page
    Watermark {
        input: PathBuf,

        #[arg(long, conflicts_with = "image", required_unless_present = "image")]
        text: Option<String>,

        #[arg(long)]
        image: Option<PathBuf>,

        #[arg(long, default_value_t = 0.3)]
        opacity: f32,

        #[arg(long, default_value = "center")]
        position: WatermarkPosition,

        /// Counter-clockwise rotation in degrees
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        rotation: f32,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Shrink page boxes by the given margins, in points
    Crop {
        input: PathBuf,

        #[arg(long, default_value_t = 0.0)]
        left: f32,
        #[arg(long, default_value_t = 0.0)]
        bottom: f32,
        #[arg(long, default_value_t = 0.0)]
        right: f32,
        #[arg(long, default_value_t = 0.0)]
        top: f32,

        #[arg(short, long, value_delimiter = ',')]
        pages: Vec<u32>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Encrypt a PDF with user and owner passwords
    Protect {
        input: PathBuf,

        #[arg(long)]
        user_password: Option<String>,

        #[arg(long)]
        owner_password: Option<String>,

        /// Permissions to withhold from readers
        #[arg(long, value_delimiter = ',')]
        deny: Vec<Permission>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove encryption with the given password
    Unlock {
        input: PathBuf,

        #[arg(long)]
        password: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recompress streams; "low" also strips metadata
    Compress {
        input: PathBuf,

        #[arg(short, long, default_value = "medium")]
        quality: CompressionQuality,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-serialize a damaged PDF with a fresh cross-reference table
    Repair {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an image, text or office document to PDF
    Convert {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print page count, encryption state, metadata and page geometry
    Info { input: PathBuf },
}

/// A reader permission that `protect --deny` can withhold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Permission {
    Print,
    Modify,
    Copy,
    Annotate,
    Form,
    Extract,
    Assemble,
    PrintHighQuality,
}

fn parse_rotation(raw: &str) -> Result<Rotation, FolioError> {
    let degrees: i64 = raw
        .trim()
        .parse()
        .map_err(|_| FolioError::InvalidParameters(format!("not a number of degrees: {raw}")))?;
    Rotation::try_from(degrees)
}

fn permissions_without(denied: &[Permission]) -> PermissionSet {
    let mut set = PermissionSet::all();
    for permission in denied {
        match permission {
            Permission::Print => set.print = false,
            Permission::Modify => set.modify = false,
            Permission::Copy => set.copy = false,
            Permission::Annotate => set.annotate = false,
            Permission::Form => set.form = false,
            Permission::Extract => set.extract = false,
            Permission::Assemble => set.assemble = false,
            Permission::PrintHighQuality => set.print_high_quality = false,
        }
    }
    set
}

/// `None` for an empty list so the operation applies to every page.
fn selection(pages: &[u32]) -> Option<&[u32]> {
    (!pages.is_empty()).then_some(pages)
}

/// The explicit output path, or a fresh one in the engine's temp directory.
fn output_file(engine: &PdfEngine, output: Option<PathBuf>) -> folio_core::Result<PathBuf> {
    match output {
        Some(path) => Ok(path),
        None => engine.artifacts().allocate("pdf"),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_engine(config: Option<&Path>) -> anyhow::Result<PdfEngine> {
    let config = match config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    debug!(temp_dir = %config.temp_dir.display(), "Engine configured");
    Ok(PdfEngine::new(config))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let engine = load_engine(cli.config.as_deref())?;

    match cli.command {
        Commands::Merge { inputs, output } => {
            let output = output_file(&engine, output)?;
            print_json(&engine.merge(inputs.as_slice(), output)?)
        }
        Commands::Split {
            input,
            ranges,
            output,
        } => {
            let ranges = PageRange::parse_list(&ranges)?;
            let dir = match output {
                Some(dir) => dir,
                None => engine.artifacts().allocate_dir()?,
            };
            print_json(&engine.split(input, &ranges, dir)?)
        }
        Commands::Extract {
            input,
            pages,
            output,
        } => {
            let output = output_file(&engine, output)?;
            print_json(&engine.extract_pages(input, &pages, output)?)
        }
        Commands::Remove {
            input,
            pages,
            output,
        } => {
            let output = output_file(&engine, output)?;
            print_json(&engine.remove_pages(input, &pages, output)?)
        }
        Commands::Rotate {
            input,
            degrees,
            pages,
            output,
        } => {
            let output = output_file(&engine, output)?;
            print_json(&engine.rotate(input, degrees, selection(&pages), output)?)
        }
        Commands::Number {
            input,
            position,
            start,
            format,
            output,
        } => {
            let options = PageNumberOptions {
                position,
                start_number: start,
                format,
            };
            let output = output_file(&engine, output)?;
            print_json(&engine.add_page_numbers(input, &options, output)?)
        }
        Commands::Watermark {
            input,
            text,
            image,
            opacity,
            position,
            rotation,
            output,
        } => {
            let spec = WatermarkSpec {
                text,
                image,
                opacity,
                position,
                rotation,
            };
            let output = output_file(&engine, output)?;
            print_json(&engine.add_watermark(input, &spec, output)?)
        }
        Commands::Crop {
            input,
            left,
            bottom,
            right,
            top,
            pages,
            output,
        } => {
            let margins = CropMargins {
                left,
                bottom,
                right,
                top,
            };
            let output = output_file(&engine, output)?;
            print_json(&engine.crop(input, &margins, selection(&pages), output)?)
        }
        Commands::Protect {
            input,
            user_password,
            owner_password,
            deny,
            output,
        } => {
            let options = ProtectOptions {
                user_password,
                owner_password,
                permissions: permissions_without(&deny),
            };
            let output = output_file(&engine, output)?;
            print_json(&engine.protect(input, &options, output)?)
        }
        Commands::Unlock {
            input,
            password,
            output,
        } => {
            let output = output_file(&engine, output)?;
            print_json(&engine.unlock(input, &password, output)?)
        }
        Commands::Compress {
            input,
            quality,
            output,
        } => {
            let output = output_file(&engine, output)?;
            print_json(&engine.compress(input, quality, output)?)
        }
        Commands::Repair { input, output } => {
            let output = output_file(&engine, output)?;
            print_json(&engine.repair(input, output)?)
        }
        Commands::Convert { input, output } => {
            let output = output_file(&engine, output)?;
            print_json(&engine.convert_to_pdf(input, output)?)
        }
        Commands::Info { input } => print_json(&engine.inspect(input)?),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<FolioError>() {
            Some(folio_err) => {
                let human = humanize_error(folio_err);
                error!(error = %folio_err, "operation failed");
                eprintln!("{}", human.message);
                eprintln!("{}", human.suggestion);
                ExitCode::from(human.blame.exit_code() as u8)
            }
            None => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}
