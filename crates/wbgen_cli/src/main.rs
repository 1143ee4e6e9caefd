//! wbgen: generate a Wishbone bus interconnect from an IP catalog and a bus
//! description.
//!
//! Provides `wbgen generate` to emit the Verilog interconnect and C header,
//! `wbgen list` to show the slave types in a catalog, and `wbgen info` to
//! describe one of them.

#![warn(missing_docs)]

mod generate;
mod info;
mod list;
mod report;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use wbgen_config::DEFAULT_IP_LIBRARY_URL;
use wbgen_resolve::PinClaimPolicy;

/// wbgen: Wishbone bus generator.
#[derive(Parser, Debug)]
#[command(name = "wbgen", version, about = "Wishbone bus interconnect generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the Verilog interconnect and C header for a bus description.
    Generate(GenerateArgs),
    /// List all slave types in the IP library.
    List {
        /// Path or URL of the IP library JSON.
        #[arg(env = "WBGEN_IP_LIBRARY", default_value = DEFAULT_IP_LIBRARY_URL)]
        ip_library: String,
    },
    /// Show information about one slave type.
    Info(InfoArgs),
}

/// Arguments for the `wbgen generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Bus description listing the attached slaves (YAML, TOML, or JSON).
    pub bus: PathBuf,

    /// Path or URL of the IP library JSON.
    #[arg(env = "WBGEN_IP_LIBRARY", default_value = DEFAULT_IP_LIBRARY_URL)]
    pub ip_library: String,

    /// Directory for the generated files (default: next to the bus description).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// How to treat a pin claimed by more than one interface.
    #[arg(long, value_enum, default_value_t = PinPolicyArg::Exclusive)]
    pub pin_policy: PinPolicyArg,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `wbgen info` subcommand.
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// The slave type (IP name) to describe.
    pub slave_type: String,

    /// Path or URL of the IP library JSON.
    #[arg(env = "WBGEN_IP_LIBRARY", default_value = DEFAULT_IP_LIBRARY_URL)]
    pub ip_library: String,

    /// Also show the full description.
    #[arg(long)]
    pub full: bool,
}

/// Pin-claim policy selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PinPolicyArg {
    /// A pin claimed twice is an error.
    Exclusive,
    /// First data claim wins; output-enable control claims override.
    Legacy,
}

impl From<PinPolicyArg> for PinClaimPolicy {
    fn from(arg: PinPolicyArg) -> Self {
        match arg {
            PinPolicyArg::Exclusive => PinClaimPolicy::Exclusive,
            PinPolicyArg::Legacy => PinClaimPolicy::Legacy,
        }
    }
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.quiet, cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
    };

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::List { ref ip_library } => list::run(ip_library, &global),
        Command::Info(ref args) => info::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Returns the log filter used when `RUST_LOG` is not set.
fn default_log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(quiet, verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
