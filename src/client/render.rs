//! Terminal rendering of resolved entries and failures

use chrono::{DateTime, Local, TimeZone};
use serde_json::json;
use std::io::Write;
use std::time::Duration;

use super::orchestrator::LinkOutcome;
use crate::{Error, error::format_error, types::FileEntry};

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Human size with two decimals: bytes, KB or MB
pub fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size >= MIB {
        format!("{:.2} MB", size / MIB)
    } else if size >= KIB {
        format!("{:.2} KB", size / KIB)
    } else {
        format!("{:.2} bytes", size)
    }
}

/// Upload time in the local timezone
pub fn format_timestamp(epoch_secs: i64) -> String {
    format_timestamp_in(epoch_secs, &Local)
}

/// Upload time in the given timezone, e.g. `November 14, 2023, 10:13:20 PM`
pub fn format_timestamp_in<Tz: TimeZone>(epoch_secs: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(epoch_secs, 0) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%B %-d, %Y, %I:%M:%S %p")
            .to_string(),
        None => format!("invalid timestamp {}", epoch_secs),
    }
}

/// Text block for one resolved entry
pub fn render_entry(entry: &FileEntry) -> String {
    let mut out = String::new();
    out.push_str(&format!("File:      {}\n", entry.server_filename));
    out.push_str(&format!("Size:      {}\n", format_size(entry.size)));
    out.push_str(&format!("Uploaded:  {}\n", format_timestamp(entry.server_ctime)));
    if let Some(thumbnail) = entry.thumbnail() {
        out.push_str(&format!("Thumbnail: {}\n", thumbnail));
    }
    out.push_str(&format!("Download:  {}\n", entry.dlink));
    out
}

/// Short message shown to the user for a failed link
pub fn failure_message(error: &Error) -> String {
    match error {
        Error::ResolverRejected { message, .. } => message.clone(),
        Error::InvalidParameter { name, .. } if name == "link" => "Invalid link".to_string(),
        other => format_error(other),
    }
}

/// Machine-readable form of all outcomes, in submission order
pub fn render_json(outcomes: &[LinkOutcome]) -> serde_json::Value {
    let items = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(entry) => json!({ "link": outcome.link, "entry": entry }),
            Err(e) => json!({
                "link": outcome.link,
                "error": failure_message(e),
                "category": e.category(),
            }),
        })
        .collect();
    serde_json::Value::Array(items)
}

/// Error banner that clears itself on an interactive terminal
#[derive(Debug, Clone)]
pub struct Banner {
    lines: Vec<String>,
    display_for: Duration,
}

impl Banner {
    pub fn new(display_for: Duration) -> Self {
        Self {
            lines: Vec::new(),
            display_for,
        }
    }

    /// Add one failed link to the banner
    pub fn push_failure(&mut self, position: usize, link: &str, error: &Error) {
        self.lines.push(format!(
            "[{}] {}: {}",
            position + 1,
            link,
            failure_message(error)
        ));
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Error\n");
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Write the banner; when `interactive`, wait and erase it again
    pub async fn show<W: Write>(&self, out: &mut W, interactive: bool) -> std::io::Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let text = self.render();
        out.write_all(text.as_bytes())?;
        out.flush()?;

        if interactive && !self.display_for.is_zero() {
            tokio::time::sleep(self.display_for).await;
            // Move to the banner's first line, then clear to the end of screen
            write!(out, "\x1b[{}F\x1b[J", text.lines().count())?;
            out.flush()?;
        }

        Ok(())
    }
}
