//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the lineview project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use clap::Parser;
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};
use plib::PROJECT_NAME;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// lines - print a numbered range of lines from a file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
struct Args {
    /// Minimum number of digits in the zero-padded line number.
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=20))]
    width: u8,

    /// Number of the first line to print, counting from 1.
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    start: u64,

    /// Number of the last line to print (inclusive).
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    end: u64,

    /// File to read as input; '-' reads standard input.
    file: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum LinesError {
    /// Input file is missing or not accessible
    #[error("{}: {}", .path.display(), .source)]
    PathNotFound { path: PathBuf, source: io::Error },
    /// Line bytes are not valid UTF-8
    #[error("{}: line {}: invalid UTF-8 sequence", .path.display(), .line)]
    Decode { path: PathBuf, line: u64 },
    #[error("{}: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },
    #[error("write error: {0}")]
    Write(#[source] io::Error),
}

/// Inclusive range of 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineRange {
    start: u64,
    end: u64,
}

impl LineRange {
    fn new(start: u64, end: u64) -> Result<Self, String> {
        // also rejected by the argument parser
        if start < 1 {
            return Err(gettext("line numbers start at 1"));
        }
        if end < start {
            return Err(format!(
                "{}: {} > {}",
                gettext("invalid line range"),
                start,
                end
            ));
        }

        Ok(LineRange { start, end })
    }

    fn contains(&self, n: u64) -> bool {
        self.start <= n && n <= self.end
    }

    /// No line at or after `n` can be in range.
    fn is_past(&self, n: u64) -> bool {
        n > self.end
    }
}

struct NumberedLine<'a> {
    index: u64,
    text: &'a str,
}

fn write_numbered<W: Write>(out: &mut W, line: &NumberedLine, width: usize) -> io::Result<()> {
    writeln!(out, "{:0width$}: {}", line.index, line.text, width = width)
}

/// Reads one line into `buf`, terminator included.  A line ends at
/// `\n`, `\r\n` or a lone `\r`.  Returns the number of bytes consumed,
/// 0 at end of input.
fn read_line_any<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize> {
    let mut total = 0;

    loop {
        let (terminator, used) = {
            let available = match reader.fill_buf() {
                Ok(b) => b,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(total);
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    buf.extend_from_slice(&available[..=i]);
                    (Some(available[i]), i + 1)
                }
                None => {
                    buf.extend_from_slice(available);
                    (None, available.len())
                }
            }
        };
        reader.consume(used);
        total += used;

        match terminator {
            Some(b'\r') => {
                // CR LF may straddle two buffer fills
                if reader.fill_buf()?.first() == Some(&b'\n') {
                    buf.push(b'\n');
                    reader.consume(1);
                    total += 1;
                }
                return Ok(total);
            }
            Some(_) => return Ok(total),
            None => {}
        }
    }
}

/// Unicode whitespace plus the ASCII information separators
/// (FS, GS, RS, US).
fn is_trailing_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

fn digits(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Width of the line number column: never narrower than `min_width`,
/// and wide enough for the last line number in `range`.
fn number_width(min_width: usize, range: LineRange) -> usize {
    min_width.max(digits(range.end))
}

/// Copies the lines of `reader` that fall within `range` to `out`, each
/// prefixed with its zero-padded line number and stripped of trailing
/// whitespace.  Every line read is checked for valid UTF-8, including
/// those before the start of the range.  Reading stops once the range
/// is exhausted.  Nothing reaches `out` unless the whole scan succeeds.
///
/// Returns the number of lines written.
fn print_range<R: BufRead, W: Write>(
    reader: &mut R,
    out: &mut W,
    range: LineRange,
    width: usize,
    pathname: &Path,
) -> Result<u64, LinesError> {
    let mut raw_line = Vec::new();
    let mut records = Vec::new();
    let mut index: u64 = 0;
    let mut written: u64 = 0;

    loop {
        raw_line.clear();
        let n_read = read_line_any(reader, &mut raw_line).map_err(|e| LinesError::Read {
            path: pathname.to_path_buf(),
            source: e,
        })?;
        if n_read == 0 {
            break;
        }

        index += 1;
        if range.is_past(index) {
            break;
        }

        let text = std::str::from_utf8(&raw_line).map_err(|_| LinesError::Decode {
            path: pathname.to_path_buf(),
            line: index,
        })?;

        if !range.contains(index) {
            continue;
        }

        let line = NumberedLine {
            index,
            text: text.trim_end_matches(is_trailing_space),
        };
        write_numbered(&mut records, &line, width).map_err(LinesError::Write)?;
        written += 1;
    }

    out.write_all(&records).map_err(LinesError::Write)?;

    Ok(written)
}

fn open_error(pathname: &Path, e: io::Error) -> LinesError {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => LinesError::PathNotFound {
            path: pathname.to_path_buf(),
            source: e,
        },
        _ => LinesError::Read {
            path: pathname.to_path_buf(),
            source: e,
        },
    }
}

fn lines_file(args: &Args, range: LineRange) -> Result<u64, LinesError> {
    // open file, or stdin
    let mut reader =
        plib::io::input_reader(&args.file, true).map_err(|e| open_error(&args.file, e))?;

    let width = number_width(args.width as usize, range);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let written = print_range(&mut reader, &mut out, range, width, &args.file)?;
    out.flush().map_err(LinesError::Write)?;

    Ok(written)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // parse command line arguments
    let args = Args::parse();

    setlocale(LocaleCategory::LcAll, "");
    textdomain(PROJECT_NAME)?;
    bind_textdomain_codeset(PROJECT_NAME, "UTF-8")?;

    let range = match LineRange::new(args.start, args.end) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("lines: {}", e);
            std::process::exit(1);
        }
    };

    let mut exit_code = 0;

    if let Err(e) = lines_file(&args, range) {
        exit_code = 1;
        eprintln!("{}", e);
    }

    std::process::exit(exit_code)
}
