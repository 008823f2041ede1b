//! Error types for the simulator.
//!
//! Every failure is fatal to the run. The variants fall into three groups:
//! configuration problems (bad arguments, unreadable or malformed trace
//! header), the unsupported Optimal policy, and malformed trace records.

use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{EXIT_FAILURE, EXIT_SUCCESS};

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    /// Trace file could not be opened.
    #[error("Opening input file {path} failed: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the trace or writing a report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Geometry header missing, unparseable or zero.
    #[error("Invalid trace header: {0}")]
    Header(String),

    /// Wrong command-line shape.
    #[error("{0}")]
    Usage(String),

    /// Any policy other than FIFO or LRU.
    #[error("I don't implement {0}, only FIFO and LRU are supported")]
    UnsupportedPolicy(String),

    /// A trace line that is not a valid record.
    #[error("Line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// An access whose page lies beyond the configured page count.
    #[error("Address {address} is on page {page}, but only {num_pages} pages exist")]
    AddressOutOfRange {
        address: u64,
        page: u64,
        num_pages: usize,
    },

    #[error("Page {page} out of range ({num_pages} pages)")]
    PageOutOfRange { page: usize, num_pages: usize },

    #[error("Frame {frame} out of range ({num_frames} frames)")]
    FrameOutOfRange { frame: usize, num_frames: usize },

    /// Page and frame tables disagree about who holds a frame.
    #[error("Frame {frame} is in use but not held by a resident page ({owner:?})")]
    BrokenBinding { frame: usize, owner: Option<usize> },
}

impl SimError {
    /// Process exit status for this error.
    ///
    /// The unsupported-policy path is a clean early exit, everything else is
    /// a failed run.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedPolicy(_) => EXIT_SUCCESS,
            _ => EXIT_FAILURE,
        }
    }

    /// Attach the trace line number to errors caused by a single record.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::AddressOutOfRange { .. } | Self::PageOutOfRange { .. } => {
                Self::MalformedRecord {
                    line,
                    reason: self.to_string(),
                }
            }
            other => other,
        }
    }
}
