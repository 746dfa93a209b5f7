use crate::domain::request::CalculationRequest;
use crate::error::Result;
use std::io::{BufRead, BufReader, Read};

/// Reads calculation requests from a JSON Lines source.
///
/// Each non-blank line holds one request object. A malformed line yields an
/// error for that line only; reading continues with the next one.
pub struct RequestReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Returns an iterator that lazily reads and validates requests.
    pub fn requests(self) -> impl Iterator<Item = Result<CalculationRequest>> {
        self.reader
            .lines()
            .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
            .map(|line| CalculationRequest::from_json(&line?))
    }
}
