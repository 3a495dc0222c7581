//! CLI binary entry point for xml-records

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;
#[cfg(feature = "cli")]
use xml_records::cli::commands::check::handle_check;
#[cfg(feature = "cli")]
use xml_records::cli::commands::extract::{ExtractArgs, handle_extract};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "xml-records")]
#[command(about = "Extract flat, typed records from XML documents")]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Extract records from XML files as JSON lines
    Extract {
        /// Configuration file (.yaml, .yml, .toml, or .json)
        #[arg(short, long)]
        config: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
        /// XML input files, processed in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Validate a configuration file and print the resolved schema
    Check {
        /// Configuration file (.yaml, .yml, .toml, or .json)
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            config,
            output,
            force,
            inputs,
        } => {
            let args = ExtractArgs {
                config,
                inputs,
                output,
                force,
            };
            handle_extract(&args).map(|_| ())
        }
        Commands::Check { config } => handle_check(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
