//! vm-sim - demand-paging simulator
//!
//! Usage: vm-sim [OPTIONS] [FLAG] <POLICY> <TRACE>
//!
//! Arguments:
//!   FLAG    - optional leading token, reserved and ignored, even if it looks
//!             like an option
//!   POLICY  - FIFO or LRU (anything else selects the unimplemented optimal policy)
//!   TRACE   - trace file: geometry header followed by r/w/print/debug/nodebug lines
//!
//! Options:
//!   --debug        Start with per-access tracing enabled (needs an explicit
//!                  FLAG, e.g. `vm-sim --debug -p FIFO trace.txt`)
//!   -q, --quiet    Only log warnings and errors
//!   -h, --help     Print help information

use std::env;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use log::{LevelFilter, error};

use vm_sim::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use vm_sim::config::protect_flag_slot;
use vm_sim::{RunConfig, SimError, logger, simulation};

/// Command-line interface
#[derive(Parser, Debug)]
#[command(name = "vm-sim")]
#[command(about = "Demand-paging simulator with FIFO and LRU page replacement")]
#[command(version)]
struct Cli {
    /// Start with per-access tracing enabled
    #[arg(long)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// [FLAG] <POLICY> <TRACE>
    #[arg(
        value_name = "ARGS",
        num_args = 1..,
        allow_hyphen_values = true,
        trailing_var_arg = true
    )]
    args: Vec<String>,
}

fn main() {
    let argv = protect_flag_slot(env::args_os().collect());
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too
            let code = if e.use_stderr() {
                EXIT_FAILURE
            } else {
                EXIT_SUCCESS
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    let level = if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Debug
    };
    if let Err(e) = logger::init(level) {
        eprintln!("Failed to install logger: {}", e);
    }

    if let Err(e) = run(&cli) {
        match e {
            SimError::UnsupportedPolicy(_) => println!("{}", e),
            _ => error!("{}", e),
        }
        process::exit(e.exit_code());
    }
}

/// Main logic separated from main() for cleaner error handling
fn run(cli: &Cli) -> Result<(), SimError> {
    let config = RunConfig::from_args(&cli.args, cli.debug)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = simulation::run(&config, &mut out);
    out.flush()?;
    result.map(|_| ())
}
