// src/controller/accumulator.rs

use crate::controller::events::StdStream;
use crate::decode::{decode_chunks, Output};
use crate::types::Encoding;

/// Raw output chunks of one invocation, in arrival order per stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    stdout: Vec<Vec<u8>>,
    stderr: Vec<Vec<u8>>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stream: StdStream, chunk: Vec<u8>) {
        match stream {
            StdStream::Stdout => self.stdout.push(chunk),
            StdStream::Stderr => self.stderr.push(chunk),
        }
    }

    /// Consume the accumulator, returning decoded `(stdout, stderr)`.
    pub fn decode(self, encoding: Option<&Encoding>) -> (Output, Output) {
        (
            decode_chunks(&self.stdout, encoding),
            decode_chunks(&self.stderr, encoding),
        )
    }
}
