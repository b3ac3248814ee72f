/// `sbr` command-line tool — run declared read programs over binary
/// files and print the extracted record.
///
/// # Command overview
///
/// ```text
/// sbr <COMMAND> [OPTIONS]
///
/// Commands:
///   extract    Run a sequence of --op reads over a file, print JSON
///   info       Print a file's size and the host byte order
///   help       Print help information
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                  |
/// |------|------------------------------------------|
/// | 0    | Success                                  |
/// | 1    | Error (I/O failure, bad program, bounds) |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use sbr_codec::ByteOrder;

mod cmd_extract;
mod cmd_info;
mod program;

// ── CLI root ──────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "sbr", version, about = "Sequential byte-record extraction CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a read program over a file and print the record as JSON.
    Extract(ExtractArgs),
    /// Print a file's total size and the host byte order.
    Info(InfoArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `sbr extract`.
///
/// Operations run in the order they appear on the command line; the
/// record is printed once the whole program has committed. See
/// [`program`] for the `--op` spec grammar.
#[derive(clap::Args)]
pub struct ExtractArgs {
    /// File to read.
    pub file: PathBuf,

    /// One operation spec, repeatable (e.g. `--op u16:version,be`).
    #[arg(long = "op", value_name = "SPEC", required = true)]
    pub ops: Vec<String>,

    /// Stream-level default byte order for typed reads without their
    /// own `be`/`le` suffix. Defaults to the host order.
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,
}

/// Arguments for `sbr info`.
#[derive(clap::Args)]
pub struct InfoArgs {
    /// File to inspect.
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OrderArg {
    /// Little-endian.
    Le,
    /// Big-endian.
    Be,
}

impl From<OrderArg> for ByteOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Le => ByteOrder::Little,
            OrderArg::Be => ByteOrder::Big,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Extract(args) => cmd_extract::run(args).await,
        Commands::Info(args) => cmd_info::run(args).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
