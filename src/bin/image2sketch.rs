use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::LevelFilter;

use image_sketch::{
    default_output_path, EffectKind, Intensity, ProcessOptions, ProcessResult, SketchEngine,
};

#[derive(Parser)]
#[command(
    name = "image2sketch",
    about = "Turn photographs into pencil-sketch renderings",
    version,
    after_help = "Simple usage: image2sketch <image>  (writes {name}_{effect}.{ext})\n\n\
                  Effects are selected by id (0-9) or name; see --list-effects.\n\
                  Images are rendered at most 800px on their longest side."
)]
struct Cli {
    /// Input image file or directory
    #[arg(required_unless_present = "list_effects")]
    input: Option<String>,

    /// Output file or directory (default: {name}_{effect}.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// Effect id (0-9) or name, e.g. "gray-to-soft-sketch"
    #[arg(short, long, default_value = "original-to-sketch")]
    effect: EffectKind,

    /// Line thickness / blur intensity (0-100)
    #[arg(short = 't', long, default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(0..=100))]
    intensity: u32,

    /// Print the available effects and exit
    #[arg(long)]
    list_effects: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if cli.list_effects {
        for effect in EffectKind::ALL {
            println!("{:>2}  {:<32} {}", effect.id(), effect.slug(), effect.label());
        }
        return;
    }

    let Some(input) = cli.input.as_deref() else {
        eprintln!("Error: An input path is required");
        process::exit(1);
    };

    let opts = ProcessOptions {
        effect: cli.effect,
        intensity: Intensity::new(cli.intensity),
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let engine = SketchEngine::new();

    let input_path = Path::new(input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {input}");
        process::exit(1);
    }

    if !opts.quiet {
        eprintln!(
            "Effect: {} (intensity {})",
            opts.effect,
            opts.intensity.value()
        );
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: image2sketch <input_dir> -o <output_dir>");
            process::exit(1);
        };
        engine.process_directory(input_path, &output_dir, &opts)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path, opts.effect),
        };
        vec![engine.process_file(input_path, &output_path, &opts)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Rendered: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        if !opts.quiet {
            match (&result.output, result.dimensions) {
                (Some(out), Some((w, h))) => {
                    eprintln!("[OK] {filename} -> {} ({w}x{h})", out.display());
                }
                _ => eprintln!("[OK] {filename}"),
            }
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
