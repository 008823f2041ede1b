use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;

use crate::config::Geometry;
use crate::constants::*;
use crate::error::{Result, SimError};
use crate::memory::PageState;
use crate::vm_manager::{Operation, Snapshot};

/// One parsed trace line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Access { op: Operation, address: u64 },
    /// Report the current state
    Print,
    /// Turn per-access tracing on
    Debug,
    /// Turn per-access tracing off
    NoDebug,
}

/// A record together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    pub number: usize,
    pub text: String,
    pub record: Record,
}

/// Streaming reader over a trace: the geometry header is read up front, the
/// records are yielded one line at a time.
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
    geometry: Geometry,
}

impl TraceReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SimError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Read the header: comment lines, then four integers
    /// `pageSize numFrames numPages numBackingBlocks`, possibly across lines.
    pub fn new(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let mut line_no = 0;
        let mut fields: Vec<usize> = Vec::with_capacity(HEADER_FIELDS);

        while fields.len() < HEADER_FIELDS {
            let Some(line) = lines.next() else {
                return Err(SimError::Header(format!(
                    "expected {} fields, found {}",
                    HEADER_FIELDS,
                    fields.len()
                )));
            };
            let line = line?;
            line_no += 1;
            if is_skipped(&line) {
                continue;
            }
            for token in line.split_whitespace() {
                if fields.len() == HEADER_FIELDS {
                    return Err(SimError::Header(format!(
                        "line {}: unexpected token '{}'",
                        line_no, token
                    )));
                }
                let value = token.parse().map_err(|_| {
                    SimError::Header(format!("line {}: invalid number '{}'", line_no, token))
                })?;
                fields.push(value);
            }
        }

        let geometry = Geometry::new(fields[0], fields[1], fields[2], fields[3])?;
        Ok(TraceReader {
            lines,
            line_no,
            geometry,
        })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            match parse_record(&text, self.line_no) {
                Ok(Some(record)) => {
                    return Some(Ok(TraceLine {
                        number: self.line_no,
                        text,
                        record,
                    }));
                }
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn is_skipped(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with(COMMENT_PREFIX)
}

fn malformed(line: usize, reason: String) -> SimError {
    SimError::MalformedRecord { line, reason }
}

/// Parse one body line. Blank and comment lines yield `None`.
pub fn parse_record(line: &str, line_no: usize) -> Result<Option<Record>> {
    if is_skipped(line) {
        return Ok(None);
    }
    let mut tokens = line.split_whitespace();
    let Some(instruction) = tokens.next() else {
        return Ok(None);
    };

    let record = match instruction {
        READ_TOKEN | WRITE_TOKEN => {
            let op = if instruction == WRITE_TOKEN {
                Operation::Write
            } else {
                Operation::Read
            };
            let token = tokens.next().ok_or_else(|| {
                malformed(line_no, format!("missing address after '{}'", instruction))
            })?;
            let address = token
                .parse()
                .map_err(|_| malformed(line_no, format!("invalid address '{}'", token)))?;
            Record::Access { op, address }
        }
        PRINT_TOKEN => Record::Print,
        DEBUG_TOKEN => Record::Debug,
        NODEBUG_TOKEN => Record::NoDebug,
        other => {
            return Err(malformed(
                line_no,
                format!("unknown instruction '{}'", other),
            ));
        }
    };

    if let Some(extra) = tokens.next() {
        return Err(malformed(line_no, format!("unexpected token '{}'", extra)));
    }
    Ok(Some(record))
}

/// Geometry and policy summary printed before the run
pub fn write_banner<W: Write>(
    out: &mut W,
    geometry: &Geometry,
    policy_name: &str,
) -> std::io::Result<()> {
    writeln!(out, "Page size: {}", geometry.page_size)?;
    writeln!(out, "Num frames: {}", geometry.num_frames)?;
    writeln!(out, "Num pages: {}", geometry.num_pages)?;
    writeln!(out, "Num backing blocks: {}", geometry.num_backing_blocks)?;
    writeln!(out, "Reclaim algorithm: {}", policy_name)
}

/// Page table, frame table and counters
pub fn write_report<W: Write>(out: &mut W, snapshot: &Snapshot<'_>) -> std::io::Result<()> {
    writeln!(out, "Page Table")?;
    for (index, page) in snapshot.pages.iter().enumerate() {
        if page.state == PageState::Unmapped {
            writeln!(out, "{:>5} type:{}", index, page.state)?;
        } else {
            let frame = page
                .frame
                .and_then(|f| i64::try_from(f).ok())
                .unwrap_or(NO_FRAME);
            writeln!(
                out,
                "{:>5} type:{} framenum:{} ondisk:{}",
                index,
                page.state,
                frame,
                u8::from(page.on_disk)
            )?;
        }
    }

    writeln!(out, "Frame Table")?;
    for (index, frame) in snapshot.frames.iter().enumerate() {
        if frame.in_use {
            writeln!(
                out,
                "    {} inuse:1 dirty:{} first_use:{} last_use:{}",
                index,
                u8::from(frame.dirty),
                frame.first_use,
                frame.last_use
            )?;
        } else {
            writeln!(out, "    {} inuse:0", index)?;
        }
    }

    for (label, value) in snapshot.tracker.counters() {
        writeln!(out, "{}: {}", label, value)?;
    }
    Ok(())
}
