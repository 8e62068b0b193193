use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::Parser;
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use chroma_key_removal::classify::{MAX_TOLERANCE, MIN_TOLERANCE};
use chroma_key_removal::composite::parse_hex_color;
use chroma_key_removal::smoothing::MAX_SMOOTHING;
use chroma_key_removal::{
    default_output_path, process_directory, process_file_with_progress, Background, Method,
    ProcessResult, RemovalOptions,
};

#[derive(Parser)]
#[command(
    name = "chroma-key",
    about = "Remove image backgrounds by chroma-key classification with edge smoothing",
    version,
    after_help = "Simple usage: chroma-key <image>  (auto-sample the background color and remove it)\n\n\
                  Output keeps its transparency and defaults to {name}_nobg.png. Use --background\n\
                  or --background-image to flatten the cutout onto a new background instead."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}_nobg.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Removal method: auto, green, blue, white, black
    #[arg(short, long, default_value = "auto", value_parser = parse_method)]
    method: Method,

    /// Color-distance tolerance for auto mode (10-80)
    #[arg(short, long, default_value_t = 30)]
    tolerance: u8,

    /// Edge smoothing strength (0-5)
    #[arg(short, long, default_value_t = 3)]
    smoothing: u8,

    /// Explicit target color for auto mode, e.g. '#00ff00'
    #[arg(long)]
    target: Option<String>,

    /// Flatten the cutout onto a solid background color, e.g. '#ffffff'
    #[arg(short, long)]
    background: Option<String>,

    /// Flatten the cutout onto a background image (stretched to fit)
    #[arg(long, conflicts_with = "background")]
    background_image: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn parse_method(s: &str) -> Result<Method, String> {
    Method::from_str(s).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let tolerance = cli.tolerance.clamp(MIN_TOLERANCE, MAX_TOLERANCE);
    let smoothing = cli.smoothing.min(MAX_SMOOTHING);
    if !cli.quiet && (tolerance != cli.tolerance || smoothing != cli.smoothing) {
        eprintln!(
            "Note: parameters clamped to tolerance {tolerance} ({MIN_TOLERANCE}-{MAX_TOLERANCE}), \
             smoothing {smoothing} (0-{MAX_SMOOTHING})"
        );
    }

    let target = cli.target.as_deref().map(|s| match parse_hex_color(s) {
        Ok(color) => color,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    });

    let background = if let Some(color) = cli.background.as_deref() {
        match parse_hex_color(color) {
            Ok(color) => Some(Background::Color(color)),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    } else {
        cli.background_image.clone().map(Background::ImagePath)
    };

    let opts = RemovalOptions {
        method: cli.method,
        tolerance,
        smoothing,
        target,
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if !cli.quiet {
        match opts.method {
            Method::AutoSample => eprintln!(
                "Auto-sampling the background color (tolerance: {tolerance}, smoothing: {smoothing})"
            ),
            method => eprintln!("Removing {method} background (smoothing: {smoothing})"),
        }
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: chroma-key <input_dir> -o <output_dir>");
            process::exit(1);
        };
        process_directory(input_path, &output_dir, &opts, background.as_ref())
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };

        let bar = if cli.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(100)
        };
        let result = process_file_with_progress(
            input_path,
            &output_path,
            &opts,
            background.as_ref(),
            &mut |percent| bar.set_position(u64::from(percent)),
        );
        bar.finish_and_clear();
        vec![result]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, cli.quiet, cli.verbose);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !cli.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, quiet: bool, verbose: bool) {
    if quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        if !quiet {
            eprintln!("[OK] {filename}");
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
