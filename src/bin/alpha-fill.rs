use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use alpha_fill::{
    default_output_path, parse_hex, process_directory, process_file, DetectionMode, FillOptions,
    FillOutcome, TransparencyStats,
};

#[derive(Parser)]
#[command(
    name = "alpha-fill",
    about = "Detect transparent pixels in raster images and fill them with a solid color",
    version,
    after_help = "Simple usage: alpha-fill <image>  (fill with white, write {name}_filled.png)\n\n\
                  Supported inputs: PNG, GIF, WebP. Output is PNG by default."
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}_filled.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Fill color as #rrggbb hex
    #[arg(short, long, default_value = "#ffffff")]
    color: String,

    /// Detection mode: "all" or "contour"
    #[arg(short, long, default_value = "all")]
    mode: String,

    /// Write the checkerboard transparency visualization instead of filling
    #[arg(long)]
    visualize: bool,

    /// Print per-image transparency statistics
    #[arg(long)]
    stats: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let color = match parse_hex(&cli.color) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let mode = match cli.mode.to_lowercase().as_str() {
        "all" => DetectionMode::All,
        "contour" => DetectionMode::Contour,
        other => {
            eprintln!("Error: Unknown detection mode: {other} (expected \"all\" or \"contour\")");
            process::exit(1);
        }
    };

    let opts = FillOptions {
        mode,
        color,
        visualize: cli.visualize,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if !opts.quiet {
        if opts.visualize {
            eprintln!("Rendering transparency visualizations");
        } else {
            let mode_name = match mode {
                DetectionMode::All => "all",
                DetectionMode::Contour => "contour",
            };
            eprintln!(
                "Filling transparent pixels with {} ({mode_name} mode)",
                opts.color.to_hex()
            );
        }
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: alpha-fill <input_dir> -o <output_dir>");
            process::exit(1);
        };
        process_directory(input_path, &output_dir, &opts)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![process_file(input_path, &output_path, &opts)]
    };

    let mut success_count = 0u32;
    let mut skip_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts, cli.stats);
        if r.skipped {
            skip_count += 1;
        } else if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if skip_count > 0 {
            eprint!(", Skipped: {skip_count}");
        }
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &FillOutcome, opts: &FillOptions, show_stats: bool) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.skipped {
        if !opts.quiet {
            eprintln!("[SKIP] {filename}: {}", result.message);
        }
    } else if result.success {
        if !opts.quiet {
            if result.transparent_pixels > 0 {
                eprintln!(
                    "[OK] {filename} ({} transparent pixels)",
                    result.transparent_pixels
                );
            } else {
                eprintln!("[OK] {filename}");
            }
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }

    if show_stats && !opts.quiet && result.stats.total_pixels > 0 {
        print_stats(&result.stats);
    }
}

fn print_stats(stats: &TransparencyStats) {
    eprintln!(
        "  total={} transparent={} ({:.1}%) semi={} fully={}",
        stats.total_pixels,
        stats.transparent_pixels,
        stats.transparent_percentage,
        stats.semi_transparent_pixels,
        stats.fully_transparent_pixels,
    );
}
