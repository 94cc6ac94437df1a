//! # I/O Abstraction Layer
//!
//! Abstracts where prompt input comes from so the application controller
//! can be driven by scripted lines in tests.
//!
//! ```text
//! Production:  AppController ──▶ StdinLineSource ──▶ tokio::io::stdin()
//! Testing:     AppController ──▶ MockLineSource  ──▶ VecDeque<String>
//! ```

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Source of command lines
#[async_trait]
pub trait LineSource: Send {
    /// Read the next line. `None` means the input is exhausted.
    /// Implementations must be cancel safe.
    async fn next_line(&mut self) -> Result<Option<String>>;
}

/// Reads lines from standard input
pub struct StdinLineSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinLineSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinLineSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineSource for StdinLineSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }
}

/// Pre-programmed input lines for testing
pub struct MockLineSource {
    lines: VecDeque<String>,
}

impl MockLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a line to the end of the input
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }
}

#[async_trait]
impl LineSource for MockLineSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
