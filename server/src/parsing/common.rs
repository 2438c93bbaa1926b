//! Shared plumbing for the four area-file parsers (§4.A): a line cursor
//! that tracks its offset for error reporting, and the tilde-terminated
//! string convention common to all of them.
//!
//! Grounded on the teacher's `populate.rs` load-and-log-and-continue
//! shape, generalized from "parse a binary tile map" to "parse a
//! line-oriented text format", with `thiserror`'s `ParseError` (see
//! `core::error`) standing in for the teacher's bare `log::error!` calls.

use std::path::{Path, PathBuf};

use core::error::ParseError;

/// Walks a file's lines, remembering both its name (for error messages)
/// and its current offset.
pub struct LineCursor<'a> {
    file: PathBuf,
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(file: &Path, text: &'a str) -> Self {
        LineCursor {
            file: file.to_path_buf(),
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    pub fn line_number(&self) -> usize {
        self.pos + 1
    }

    pub fn err(&self, reason: impl Into<String>) -> ParseError {
        ParseError::new(self.file.clone(), self.line_number(), reason.into())
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// The next raw line, or a parse error if the file ran out.
    pub fn next_line(&mut self) -> Result<&'a str, ParseError> {
        let line = self
            .lines
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.err("unexpected end of file"))?;
        self.pos += 1;
        Ok(line)
    }

    /// Peeks the next line without consuming it.
    pub fn peek_line(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Reads a field that ends with a literal `~`, possibly spanning
    /// several lines (§4.A). The trailing `~` is stripped; line breaks
    /// inside a multi-line field are preserved with `\n`.
    pub fn tilde_string(&mut self) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            let line = self.next_line()?;
            match line.find('~') {
                Some(idx) => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(&line[..idx]);
                    return Ok(out);
                }
                None => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(line);
                }
            }
        }
    }

    /// Reads the next non-blank line and splits it into exactly `n`
    /// whitespace-separated integers.
    pub fn ints(&mut self, n: usize) -> Result<Vec<i32>, ParseError> {
        let line = self.next_non_blank()?;
        let values: Result<Vec<i32>, _> = line.split_whitespace().map(|t| t.parse::<i32>()).collect();
        let values = values.map_err(|_| self.err(format!("expected {n} integers, got {line:?}")))?;
        if values.len() < n {
            return Err(self.err(format!("expected {n} integers, got {}", values.len())));
        }
        Ok(values)
    }

    /// Like `ints`, but missing trailing fields default to 0 (used by the
    /// zone reset-command lines, §4.D).
    pub fn ints_padded(&mut self, n: usize) -> Result<Vec<i32>, ParseError> {
        let line = self.next_non_blank()?;
        let mut values: Vec<i32> = Vec::with_capacity(n);
        for tok in line.split_whitespace() {
            values.push(
                tok.parse::<i32>()
                    .map_err(|_| self.err(format!("not an integer: {tok:?}")))?,
            );
        }
        while values.len() < n {
            values.push(0);
        }
        values.truncate(n);
        Ok(values)
    }

    fn next_non_blank(&mut self) -> Result<&'a str, ParseError> {
        loop {
            let line = self.next_line()?;
            if !line.trim().is_empty() {
                return Ok(line);
            }
        }
    }

    /// Reads a `#<vnum>` header line. Returns `None` at a top-level
    /// sentinel (`$` or `#99999`).
    pub fn next_vnum_header(&mut self) -> Result<Option<i32>, ParseError> {
        loop {
            if self.at_eof() {
                return Ok(None);
            }
            let line = self.next_line()?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('$') {
                return Ok(None);
            }
            if let Some(rest) = trimmed.strip_prefix('#') {
                let vnum: i32 = rest
                    .trim()
                    .parse()
                    .map_err(|_| self.err(format!("bad vnum header: {trimmed:?}")))?;
                if vnum == 99999 {
                    return Ok(None);
                }
                return Ok(Some(vnum));
            }
            return Err(self.err(format!("expected '#<vnum>' header, got {trimmed:?}")));
        }
    }
}

/// Runs `parse_one` repeatedly, logging and skipping any record that
/// fails to parse, until the file is exhausted. Mirrors the bulk
/// loader's "continue past bad records" contract (§4.A, §7).
pub fn load_records<T>(
    file: &Path,
    text: &str,
    mut parse_one: impl FnMut(&mut LineCursor) -> Result<Option<T>, ParseError>,
) -> Vec<T> {
    let mut cursor = LineCursor::new(file, text);
    let mut out = Vec::new();
    loop {
        match parse_one(&mut cursor) {
            Ok(Some(record)) => out.push(record),
            Ok(None) => break,
            Err(e) => {
                log::warn!("skipping malformed record in {}: {e}", file.display());
                if !skip_to_next_header(&mut cursor) {
                    break;
                }
            }
        }
    }
    out
}

/// After a parse error, scans forward to the next `#` or `$` line so the
/// loader can resume at the following record instead of aborting.
fn skip_to_next_header(cursor: &mut LineCursor) -> bool {
    while let Some(line) = cursor.peek_line() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') || trimmed.starts_with('$') {
            return true;
        }
        if cursor.next_line().is_err() {
            return false;
        }
    }
    false
}
