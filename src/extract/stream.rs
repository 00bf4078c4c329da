use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};

use chrono::NaiveDate;
use log::{debug, trace};

use super::ExtractError;
use crate::catalog::TimeWindow;
use crate::locator::StartPosition;
use crate::logfile::{LogFile, LogLine};

/// Line counters of one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files opened
    pub files_read: usize,
    /// Lines read
    pub lines_read: u64,
    /// Lines that failed field-count or numeric checks
    pub malformed: u64,
    /// Lines whose current is the sentinel or not finite
    pub out_of_range: u64,
    /// Parsed lines at or before the window start
    pub before_window: u64,
}

struct OpenLog {
    reader: BufReader<File>,
    date: NaiveDate,
}

/// Lazy stream of in-window log lines across a device's files.
///
/// Starts at a [`StartPosition`], continues through the following files in
/// order, and ends for good at the first parsed line at or past the window
/// end. Only one file is open at a time; it is closed before the next one is
/// opened and as soon as the stream ends.
pub struct WindowedLines<'a> {
    files: &'a [LogFile],
    window: TimeWindow,
    next_file: usize,
    start_offset: u64,
    current: Option<OpenLog>,
    buf: Vec<u8>,
    finished: bool,
    stats: ScanStats,
}

impl<'a> WindowedLines<'a> {
    /// Stream `files` from `start` over `window`
    pub fn new(files: &'a [LogFile], window: TimeWindow, start: StartPosition) -> Self {
        Self {
            files,
            window,
            next_file: start.file_index,
            start_offset: start.byte_offset,
            current: None,
            buf: Vec::with_capacity(128),
            finished: false,
            stats: ScanStats::default(),
        }
    }

    /// Counters so far
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Whether the stream has ended
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(&mut self) {
        self.current = None;
        self.finished = true;
    }

    fn open_next(&mut self) -> Result<bool, ExtractError> {
        let Some(file) = self.files.get(self.next_file) else {
            return Ok(false);
        };
        let offset = std::mem::take(&mut self.start_offset);

        let mut reader = file.open()?;
        if offset > 0 {
            reader.seek(SeekFrom::Start(offset))?;
        }
        debug!("Reading {} from byte {}", file.path().display(), offset);

        self.current = Some(OpenLog {
            reader,
            date: file.date(),
        });
        self.next_file += 1;
        self.stats.files_read += 1;
        Ok(true)
    }
}

impl Iterator for WindowedLines<'_> {
    type Item = Result<LogLine, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if self.current.is_none() {
                match self.open_next() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.finish();
                        return None;
                    }
                    Err(err) => {
                        self.finish();
                        return Some(Err(err));
                    }
                }
            }
            let Some(open) = self.current.as_mut() else {
                continue;
            };

            self.buf.clear();
            match open.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.current = None;
                    continue;
                }
                Ok(_) => {}
                Err(err) => {
                    self.finish();
                    return Some(Err(err.into()));
                }
            }
            self.stats.lines_read += 1;

            let date = open.date;
            let parsed = std::str::from_utf8(&self.buf)
                .ok()
                .and_then(|line| LogLine::parse(line, date));
            let Some(line) = parsed else {
                self.stats.malformed += 1;
                trace!("Skipping malformed line: {:?}", String::from_utf8_lossy(&self.buf));
                continue;
            };

            if self.window.is_past(line.time) {
                debug!("Reached window end at {}", line.time);
                self.finish();
                return None;
            }
            if !line.has_valid_current() {
                self.stats.out_of_range += 1;
                trace!("Skipping out-of-range current at {}", line.time);
                continue;
            }
            if !self.window.contains(line.time) {
                self.stats.before_window += 1;
                continue;
            }
            return Some(Ok(line));
        }
    }
}
