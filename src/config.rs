use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{FIFO_NAME, LRU_NAME};
use crate::error::{Result, SimError};

/// Page/frame geometry read from the trace header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub page_size: usize,
    pub num_frames: usize,
    pub num_pages: usize,
    /// Reported only; the simulator keeps no backing store.
    pub num_backing_blocks: usize,
}

impl Geometry {
    /// Build a geometry, rejecting zero page size, frame count or page count.
    pub fn new(
        page_size: usize,
        num_frames: usize,
        num_pages: usize,
        num_backing_blocks: usize,
    ) -> Result<Self> {
        for (name, value) in [
            ("page size", page_size),
            ("frame count", num_frames),
            ("page count", num_pages),
        ] {
            if value == 0 {
                return Err(SimError::Header(format!("{} must be positive", name)));
            }
        }
        Ok(Geometry {
            page_size,
            num_frames,
            num_pages,
            num_backing_blocks,
        })
    }
}

/// Page replacement algorithm requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Fifo,
    Lru,
    /// Anything that is not FIFO or LRU. Never simulated.
    Optimal,
}

impl FromStr for PolicyKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            FIFO_NAME => PolicyKind::Fifo,
            LRU_NAME => PolicyKind::Lru,
            _ => PolicyKind::Optimal,
        })
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Fifo => FIFO_NAME,
            PolicyKind::Lru => LRU_NAME,
            PolicyKind::Optimal => "optimal",
        };
        f.write_str(name)
    }
}

/// Everything a run needs besides the trace contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub policy: PolicyKind,
    /// Policy name as typed, echoed in the banner.
    pub policy_name: String,
    pub trace_path: PathBuf,
    /// Start with per-access tracing on.
    pub debug: bool,
}

impl RunConfig {
    /// Build from positional arguments: `[FLAG] <POLICY> <TRACE>`.
    ///
    /// The optional leading token is reserved and ignored.
    pub fn from_args(args: &[String], debug: bool) -> Result<Self> {
        let (policy_name, trace) = match args {
            [_, policy, trace] | [policy, trace] => (policy, trace),
            _ => {
                return Err(SimError::Usage(format!(
                    "Expected [FLAG] <POLICY> <TRACE>, got {} arguments",
                    args.len()
                )));
            }
        };
        let Ok(policy) = policy_name.parse::<PolicyKind>();
        Ok(RunConfig {
            policy,
            policy_name: policy_name.clone(),
            trace_path: PathBuf::from(trace),
            debug,
        })
    }
}

/// Keep the reserved leading token away from option parsing.
///
/// `argv` starts with the program name. When exactly `[FLAG] <POLICY> <TRACE>`
/// follows it, a `--` goes in front so the flag slot is taken literally, even
/// when it spells one of the binary's own options such as `-h` or `--debug`.
/// Any other shape is returned as is.
pub fn protect_flag_slot(mut argv: Vec<OsString>) -> Vec<OsString> {
    if argv.len() == 4 {
        argv.insert(1, OsString::from("--"));
    }
    argv
}
