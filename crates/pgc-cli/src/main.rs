/// PGC command-line tool: inspect, unpack and pack OpenPGP packet
/// streams built around compressed-data containers.
///
/// # Command overview
///
/// ```text
/// pgc <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print an outline of every packet, descending into containers
///   unpack     Extract the data of the first literal packet
///   pack       Wrap a file in a literal packet inside a compressed container
///   help       Print help information
///
/// Global options:
///   -v, --verbose        Enable debug logging
///   --max-size BYTES     Decompressed size limit per read
///   --max-depth N        Container nesting limit
///   -h, --help           Print help
///   -V, --version        Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                      |
/// |------|----------------------------------------------|
/// | 0    | Success                                      |
/// | 1    | Error (I/O failure, malformed packets, etc.) |
///
/// Logs and error details go to stderr so stdout can be piped cleanly.
/// `RUST_LOG` overrides the log level chosen by `--verbose`.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use pgc_types::DecodeLimits;
use pgc_types::limits::{DEFAULT_MAX_DECOMPRESSED_SIZE, DEFAULT_MAX_NESTING_DEPTH};
use tracing_subscriber::EnvFilter;

mod cmd_inspect;
mod cmd_pack;
mod cmd_unpack;

// ── CLI root ──────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "pgc", version, about = "OpenPGP compressed-data packet tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum decompressed bytes of one read, summed over all containers.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DECOMPRESSED_SIZE)]
    max_size: usize,

    /// Maximum number of nested compressed containers.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    max_depth: usize,
}

impl Cli {
    fn limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_decompressed_size: self.max_size,
            max_nesting_depth: self.max_depth,
        }
    }
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print an outline of every packet in a file.
    Inspect(InspectArgs),
    /// Write the data of the first literal packet to a file.
    Unpack(UnpackArgs),
    /// Wrap a file in a literal packet inside an uncompressed container.
    Pack(PackArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `pgc inspect`.
///
/// ```text
/// ┌────────┬─────────────────────────────────────────────┐
/// │ Flag   │ Effect                                      │
/// ├────────┼─────────────────────────────────────────────┤
/// │ --json │ Print a JSON tree instead of the outline    │
/// └────────┴─────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the packet stream to inspect.
    pub file: PathBuf,

    /// Emit JSON instead of the indented outline.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `pgc unpack`.
///
/// The first literal packet is found depth-first, so a literal inside a
/// compressed container is found before one that follows it.
#[derive(clap::Args)]
pub struct UnpackArgs {
    /// Path to the packet stream.
    pub file: PathBuf,

    /// Where to write the literal data.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for `pgc pack`.
///
/// ```text
/// ┌─────────────────┬──────────────────────────────────────────────┐
/// │ Flag            │ Values / default                             │
/// ├─────────────────┼──────────────────────────────────────────────┤
/// │ -o / --output   │ output packet file (required)                │
/// │ --filename NAME │ literal filename (default: input file name)  │
/// │ --text          │ mark the literal as text ('t') not binary    │
/// └─────────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct PackArgs {
    /// File whose contents become the literal data.
    pub input: PathBuf,

    /// Output packet file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Filename to record in the literal packet.
    #[arg(long)]
    pub filename: Option<String>,

    /// Record the data as text rather than binary.
    #[arg(long)]
    pub text: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let limits = cli.limits();
    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args, &limits),
        Commands::Unpack(args) => cmd_unpack::run(&args, &limits),
        Commands::Pack(args) => cmd_pack::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
