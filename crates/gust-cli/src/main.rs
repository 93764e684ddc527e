//! # Gust CLI
//!
//! Resolve extended glob patterns against the filesystem and print every
//! match on its own line.
//!
//! ## Example Usage
//!
//! ```bash
//! # Every Rust source below src/
//! gust 'src/**/*.rs'
//!
//! # Several patterns at once; descend through directory symlinks
//! gust --follow '**/*.jpg' '**/*.png'
//! ```
//!
//! Patterns that fail to compile or match nothing produce no output; the
//! remaining arguments are still processed.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Gust - extended glob matching
#[derive(Parser)]
#[command(name = "gust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Glob patterns to resolve (*, **/, {a,b}, [a-z], !(x))
    patterns: Vec<String>,

    /// Traverse through symlinks that point at directories
    #[arg(short, long)]
    follow: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    for pattern in &cli.patterns {
        let result = if cli.follow {
            gust_core::glob_follow_symlinks(pattern)
        } else {
            gust_core::glob(pattern)
        };

        match result {
            Ok(paths) => {
                for path in paths {
                    println!("{path}");
                }
            }
            // A failing argument produces nothing; keep going.
            Err(err) => {
                tracing::debug!(%pattern, %err, "skipping pattern");
            }
        }
    }

    Ok(())
}
