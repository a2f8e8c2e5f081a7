//! Tolerant JSONL record decoding
//!
//! A line either decodes into a complete record or is dropped whole. Lines
//! are read with a hard byte ceiling so one pathological line cannot grow
//! the buffer without bound.

use serde::de::DeserializeOwned;
use std::io::{BufRead, ErrorKind, Read};
use std::marker::PhantomData;
use std::path::Path;

use crate::consts::MAX_LINE_BYTES;
use crate::utils::parse_debug_enabled;

/// Decode one line into `T`, `None` on any failure (including non-UTF-8).
pub(crate) fn decode_line<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    let text = std::str::from_utf8(bytes).ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

enum Line {
    Complete,
    Oversized,
    Eof,
}

/// Iterator over the decodable records of a JSONL stream.
///
/// Undecodable, blank and oversized lines are skipped and counted. A read
/// error ends the stream.
pub(crate) struct JsonlRecords<'a, R, T> {
    reader: R,
    buf: Vec<u8>,
    max_line_bytes: usize,
    line_no: usize,
    skipped: usize,
    label: &'a Path,
    _record: PhantomData<T>,
}

impl<'a, R: BufRead, T: DeserializeOwned> JsonlRecords<'a, R, T> {
    /// `label` names the source in debug diagnostics
    pub(crate) fn new(reader: R, label: &'a Path) -> Self {
        Self::with_limit(reader, label, MAX_LINE_BYTES)
    }

    pub(crate) fn with_limit(reader: R, label: &'a Path, max_line_bytes: usize) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            max_line_bytes,
            line_no: 0,
            skipped: 0,
            label,
            _record: PhantomData,
        }
    }

    /// Lines dropped so far (malformed, non-UTF-8 or oversized; blank lines excluded)
    pub(crate) fn skipped(&self) -> usize {
        self.skipped
    }

    fn read_line(&mut self) -> std::io::Result<Line> {
        self.buf.clear();
        let limit = self.max_line_bytes as u64 + 1;
        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(Line::Eof);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        if self.buf.len() > self.max_line_bytes {
            // Drop the remainder of the line without buffering it
            self.reader.skip_until(b'\n')?;
            self.buf.clear();
            return Ok(Line::Oversized);
        }
        Ok(Line::Complete)
    }
}

impl<R: BufRead, T: DeserializeOwned> Iterator for JsonlRecords<'_, R, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let line = match self.read_line() {
                Ok(line) => line,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    if parse_debug_enabled() {
                        eprintln!(
                            "Failed to read line {} in {}: {}",
                            self.line_no + 1,
                            self.label.display(),
                            err
                        );
                    }
                    return None;
                }
            };
            self.line_no += 1;

            match line {
                Line::Eof => return None,
                Line::Oversized => {
                    self.skipped += 1;
                    if parse_debug_enabled() {
                        eprintln!(
                            "Skipping oversized line at {}:{} (limit {} bytes)",
                            self.label.display(),
                            self.line_no,
                            self.max_line_bytes
                        );
                    }
                }
                Line::Complete => {
                    if self.buf.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    match decode_line(&self.buf) {
                        Some(record) => return Some(record),
                        None => {
                            self.skipped += 1;
                            if parse_debug_enabled() {
                                eprintln!(
                                    "Invalid record at {}:{}",
                                    self.label.display(),
                                    self.line_no
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
