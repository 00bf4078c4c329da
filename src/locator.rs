//! # Log Locator
//!
//! Finds where to start reading a device's logs for a given start time without
//! scanning multi-gigabyte files line by line.
//!
//! Two steps:
//!
//! 1. **File selection**: the last file whose embedded close time is still
//!    before the target, or the first file when none is.
//! 2. **In-file search**: one sequential pass builds a sparse [`LineIndex`]
//!    (line count plus evenly spaced line-start offsets). Small files start at
//!    offset 0. Larger files get a fixed number of halving probes over the
//!    checkpoints, each reading the first parseable timestamp at a checkpoint.
//!
//! The result is approximate on purpose. The returned offset is a line start
//! whose timestamp is before the target (or the start of the file), and the
//! first line at/after the target lies within one final halving step, about
//! `lines / 2^steps` lines, after it. The extractor re-checks every timestamp
//! against the window, so reading a few extra lines is harmless.

use std::io::{self, BufRead, Seek, SeekFrom};

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};

use crate::logfile::{LogFile, LogFileError, LogLine};

/// Files with fewer lines than this are read from the beginning
pub const DEFAULT_MIN_LINES_FOR_SEARCH: u64 = 10_000;

/// Number of halving probes for larger files
pub const DEFAULT_HALVING_STEPS: u32 = 6;

/// Upper bound on retained checkpoints (between this and twice this are kept)
const MAX_CHECKPOINTS: usize = 128;

/// Tuning for the in-file search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorConfig {
    /// Files with fewer lines start at offset 0
    pub min_lines: u64,
    /// Number of halving probes
    pub halving_steps: u32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            min_lines: DEFAULT_MIN_LINES_FOR_SEARCH,
            halving_steps: DEFAULT_HALVING_STEPS,
        }
    }
}

/// Where extraction should begin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartPosition {
    /// Index into the ordered file list
    pub file_index: usize,
    /// Byte offset of a line start inside that file
    pub byte_offset: u64,
}

/// Sparse index of line starts built in one sequential pass.
///
/// `offsets[i]` is the byte offset of line `i * stride`. When the index grows
/// past twice [`MAX_CHECKPOINTS`] every other checkpoint is dropped and the
/// stride doubles, so memory stays bounded for any file size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_count: u64,
    stride: u64,
    offsets: Vec<u64>,
}

impl LineIndex {
    /// Scan `reader` to the end, counting lines and sampling line starts
    pub fn build<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut offsets = vec![0u64];
        let mut stride = 1u64;
        let mut line_count = 0u64;
        let mut position = 0u64;
        let mut ends_with_newline = true;

        loop {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            for (i, &byte) in buf.iter().enumerate() {
                if byte != b'\n' {
                    continue;
                }
                line_count += 1;
                if line_count % stride == 0 {
                    offsets.push(position + i as u64 + 1);
                    if offsets.len() > 2 * MAX_CHECKPOINTS {
                        offsets = offsets.into_iter().step_by(2).collect();
                        stride *= 2;
                    }
                }
            }
            let len = buf.len();
            ends_with_newline = buf[len - 1] == b'\n';
            position += len as u64;
            reader.consume(len);
        }

        if !ends_with_newline {
            line_count += 1;
        }
        // A checkpoint at EOF starts no line.
        if offsets.len() > 1 && offsets.last() == Some(&position) {
            offsets.pop();
        }

        Ok(Self {
            line_count,
            stride,
            offsets,
        })
    }

    /// Number of lines, counting a trailing line without newline
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    /// Lines between consecutive checkpoints
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Checkpoint byte offsets, ascending
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }
}

/// Pick the file to start reading from.
///
/// `files` must be ordered by close time. Returns `None` only for an empty list.
pub fn select_start_file(files: &[LogFile], target: NaiveDateTime) -> Option<usize> {
    if files.is_empty() {
        return None;
    }
    let closed_before = files.partition_point(|file| file.closed_at() < target);
    Some(closed_before.saturating_sub(1))
}

/// Log Locator: file selection plus bounded in-file search
#[derive(Debug, Clone, Copy, Default)]
pub struct Locator {
    config: LocatorConfig,
}

impl Locator {
    /// Create a locator with custom tuning
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    /// Tuning in use
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Find the starting file and approximate byte offset for `target`.
    ///
    /// Returns `None` when there are no files.
    pub fn locate_start(
        &self,
        files: &[LogFile],
        target: NaiveDateTime,
    ) -> Result<Option<StartPosition>, LogFileError> {
        let Some(file_index) = select_start_file(files, target) else {
            return Ok(None);
        };
        let file = &files[file_index];
        info!("Starting with log: {}", file.path().display());

        let byte_offset = self.locate_in_file(file, target)?;
        Ok(Some(StartPosition {
            file_index,
            byte_offset,
        }))
    }

    /// Approximate offset of the last line before `target` inside one file
    pub fn locate_in_file(&self, file: &LogFile, target: NaiveDateTime) -> Result<u64, LogFileError> {
        let index = LineIndex::build(file.open()?)?;
        if index.line_count() < self.config.min_lines {
            return Ok(0);
        }

        let mut reader = file.open()?;
        let offsets = index.offsets();
        let mut lo = 0usize;
        let mut step = offsets.len();

        for _ in 0..self.config.halving_steps {
            step /= 2;
            if step == 0 {
                break;
            }
            let probe = lo + step;
            if probe >= offsets.len() {
                continue;
            }
            let probe_time = first_timestamp_at(&mut reader, offsets[probe], file.date())?;
            debug!(
                "Probe line ~{} at byte {}: {:?}",
                probe as u64 * index.stride(),
                offsets[probe],
                probe_time
            );
            if matches!(probe_time, Some(t) if t < target) {
                lo = probe;
            }
        }

        Ok(offsets[lo])
    }
}

/// First parseable timestamp at or after `offset`, skipping malformed lines
fn first_timestamp_at<R: BufRead + Seek>(
    reader: &mut R,
    offset: u64,
    date: NaiveDate,
) -> io::Result<Option<NaiveDateTime>> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let parsed = std::str::from_utf8(&buf)
            .ok()
            .and_then(|line| LogLine::parse(line, date));
        if let Some(line) = parsed {
            return Ok(Some(line.time));
        }
    }
}
