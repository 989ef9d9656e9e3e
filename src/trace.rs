use std::{
    collections::VecDeque,
    fs,
    io::{self, BufRead, BufReader},
    path::Path,
};

use log::debug;
use thiserror::Error;
use xz2::read::XzDecoder;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace read failed")]
    Io(#[from] io::Error),
    #[error("line {line}: trace is not valid UTF-8")]
    Encoding { line: usize },
    #[error("line {line}: `{token}` is not a hexadecimal address")]
    BadToken { line: usize, token: String },
}

/// Lazy stream of addresses read from whitespace-separated hex tokens.
pub struct Trace {
    lines: io::Lines<Box<dyn BufRead>>,
    pending: VecDeque<String>,
    line: usize,
}

impl Trace {
    /// Opens a trace file, decompressing it on the fly if it ends in `.xz`.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Trace> {
        let path = path.as_ref();
        let stream = fs::File::open(path)?;
        let reader: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "xz") {
            debug!("reading xz trace {}", path.display());
            Box::new(BufReader::new(XzDecoder::new(stream)))
        } else {
            debug!("reading trace {}", path.display());
            Box::new(BufReader::new(stream))
        };
        Ok(Trace::from_boxed(reader))
    }

    pub fn from_reader(reader: impl BufRead + 'static) -> Trace {
        Trace::from_boxed(Box::new(reader))
    }

    fn from_boxed(reader: Box<dyn BufRead>) -> Trace {
        Trace {
            lines: reader.lines(),
            pending: VecDeque::new(),
            line: 0,
        }
    }
}

impl Iterator for Trace {
    type Item = Result<u32, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(match parse_address(&token) {
                    Some(address) => Ok(address),
                    None => Err(TraceError::BadToken {
                        line: self.line,
                        token,
                    }),
                });
            }
            match self.lines.next()? {
                Ok(line) => {
                    self.line += 1;
                    self.pending
                        .extend(line.split_whitespace().map(String::from));
                }
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    self.line += 1;
                    return Some(Err(TraceError::Encoding { line: self.line }));
                }
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}

/// Parses one hex token, with or without a `0x` prefix.
pub fn parse_address(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16).ok()
}
