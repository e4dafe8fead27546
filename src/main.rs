//! clustergen CLI
//!
//! Entry point for the `clustergen` command-line tool.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clustergen::{check, run, EnvContext, Renderer, RunOptions};

#[derive(Parser)]
#[command(name = "clustergen")]
#[command(about = "GitOps cluster configuration resolver", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve all clusters and emit their manifests
    Generate {
        /// Root of the configuration tree (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Comma-separated cluster allow-list (default: all clusters)
        #[arg(long, env = "CLUSTERS", value_delimiter = ',')]
        clusters: Vec<String>,

        /// Write manifests to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Collect per-cluster errors instead of aborting on the first
        #[arg(long)]
        keep_going: bool,
    },

    /// Parse and validate every cluster configuration without emitting
    Check {
        /// Root of the configuration tree (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Comma-separated cluster allow-list (default: all clusters)
        #[arg(long, env = "CLUSTERS", value_delimiter = ',')]
        clusters: Vec<String>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            root,
            clusters,
            output,
            keep_going,
        } => {
            let opts = RunOptions {
                clusters: clean_allow_list(clusters),
                keep_going,
            };
            run_generate(root, opts, output);
        }
        Commands::Check { root, clusters } => {
            let opts = RunOptions {
                clusters: clean_allow_list(clusters),
                keep_going: false,
            };
            run_check(root, opts);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// An empty CLUSTERS variable must mean "all clusters", not one empty name.
fn clean_allow_list(clusters: Vec<String>) -> Vec<String> {
    clusters.into_iter().filter(|c| !c.is_empty()).collect()
}

fn run_generate(root: Option<PathBuf>, opts: RunOptions, output: Option<PathBuf>) {
    let ctx = match EnvContext::discover(root.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error resolving environment: {e}");
            process::exit(1);
        }
    };

    let renderer = match Renderer::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading templates: {e}");
            process::exit(1);
        }
    };

    let result = match output {
        Some(path) => {
            let file = match File::create(&path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Error creating {}: {e}", path.display());
                    process::exit(1);
                }
            };
            let mut writer = BufWriter::new(file);
            run(&ctx, &renderer, &opts, &mut writer).and_then(|()| writer.flush().map_err(Into::into))
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            run(&ctx, &renderer, &opts, &mut writer)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_check(root: Option<PathBuf>, opts: RunOptions) {
    let ctx = match EnvContext::discover(root.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error resolving environment: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = check(&ctx, &opts) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
