//! Child output handling.
//!
//! PHOENIX (like most C++ tooling) may emit non-UTF8 bytes, so lines are read
//! byte-wise and decoded lossily instead of through `BufReader::lines()`.
//!
//! In quiet mode only progress lines are shown. They are collected until the
//! line carrying [`FLUSH_MARKER`] arrives, then handed over as one block.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::debug;

/// Substrings identifying a progress line.
pub const PROGRESS_MARKERS: [&str; 5] = [
    "T =",
    "Progress:",
    "Current System:",
    "Runtime:",
    "Time per ps:",
];

/// Marker of the last line in each progress report.
pub const FLUSH_MARKER: &str = "Time per ps:";

/// Whether `line` belongs to a progress report.
pub fn is_progress_line(line: &str) -> bool {
    PROGRESS_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Accumulates progress lines until a report is complete.
#[derive(Debug, Default)]
pub struct ProgressFilter {
    pending: Vec<String>,
}

impl ProgressFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line. Returns the completed block when `line` ends a report.
    ///
    /// Non-progress lines are dropped.
    pub fn push(&mut self, line: &str) -> Option<Vec<String>> {
        if !is_progress_line(line) {
            return None;
        }
        self.pending.push(line.to_string());
        if line.contains(FLUSH_MARKER) {
            Some(std::mem::take(&mut self.pending))
        } else {
            None
        }
    }

    /// Lines collected since the last completed block.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

/// Read `stream` line by line, decoding lossily and stripping `\n` / `\r\n`.
///
/// Stops at EOF or on the first read error.
pub async fn read_lines_lossy<R, F>(stream: R, mut on_line: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(String),
{
    let mut reader = BufReader::new(stream);
    let mut buf: Vec<u8> = Vec::with_capacity(1024);

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                on_line(String::from_utf8_lossy(&buf).into_owned());
            }
            Err(e) => {
                debug!(error = %e, "output reader exiting due to read error");
                break;
            }
        }
    }
}

/// Collect everything from `stream` into a string (lossy).
pub async fn drain_to_string<R>(mut stream: R) -> String
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Err(e) = stream.read_to_end(&mut buf).await {
        debug!(error = %e, "stderr drain stopped early");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
