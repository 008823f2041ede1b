//! Drives a whole trace through the engine.

use std::io::{BufRead, Write};

use log::debug;

use crate::config::RunConfig;
use crate::error::Result;
use crate::io::{Record, TraceReader, write_banner, write_report};
use crate::stats::Tracker;
use crate::vm_manager::VmManager;

/// Open the configured trace and run it, writing banner and reports to `out`.
///
/// The trace file is closed on every return path.
pub fn run<W: Write>(config: &RunConfig, out: &mut W) -> Result<Tracker> {
    let trace = TraceReader::open(&config.trace_path)?;
    replay(config, trace, out)
}

/// Run an already opened trace.
///
/// Prints the banner, a report for every `print` record and a final report at
/// the end of the trace. Stops at the first error.
pub fn replay<R: BufRead, W: Write>(
    config: &RunConfig,
    trace: TraceReader<R>,
    out: &mut W,
) -> Result<Tracker> {
    let geometry = trace.geometry();
    write_banner(out, &geometry, &config.policy_name)?;

    let mut vm = VmManager::new(geometry, config.policy);
    vm.set_debug(config.debug);

    for line in trace {
        let line = line?;
        if vm.debug() {
            debug!("Current instruction: {}", line.text);
        }
        match line.record {
            Record::Access { op, address } => {
                vm.access(op, address).map_err(|e| e.at_line(line.number))?;
            }
            Record::Print => write_report(out, &vm.snapshot())?,
            Record::Debug => vm.set_debug(true),
            Record::NoDebug => vm.set_debug(false),
        }
    }

    let tracker = vm.tracker();
    if vm.debug() {
        debug!(
            "Trace done: {} hits, {} misses",
            tracker.hits(),
            tracker.page_misses
        );
    }
    write_report(out, &vm.snapshot())?;
    out.flush()?;
    Ok(tracker)
}
