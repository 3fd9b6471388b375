//! Optional debug records: one JSON file per call, written only when enabled.
//!
//! The dumper is a plain value decided once at startup and passed to whoever
//! needs it. Failures never reach the caller; they end up in the log as a
//! warning and as [`DumpOutcome::Failed`].

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Local time, one-second resolution.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone)]
pub struct DebugDumper {
    enabled: bool,
    dir: PathBuf,
}

/// What a [`DebugDumper::dump`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpOutcome {
    Disabled,
    Written(PathBuf),
    /// Detail was logged.
    Failed,
}

impl DebugDumper {
    pub fn new(enabled: bool, dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            dir: dir.into(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, PathBuf::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `payload` to `{tag}_{YYYYMMDD_HHMMSS}.json` in the debug directory.
    /// No I/O happens when disabled.
    pub fn dump<T: Serialize + ?Sized>(&self, tag: &str, payload: &T) -> DumpOutcome {
        if !self.enabled {
            return DumpOutcome::Disabled;
        }
        match self.write_record(tag, payload) {
            Ok(path) => {
                tracing::info!("saved debug record {}", path.display());
                DumpOutcome::Written(path)
            }
            Err(e) => {
                tracing::warn!("failed to save debug record {}: {:#}", tag, e);
                DumpOutcome::Failed
            }
        }
    }

    fn write_record<T: Serialize + ?Sized>(&self, tag: &str, payload: &T) -> Result<PathBuf> {
        // Serialize before touching the filesystem so failures leave nothing behind.
        let bytes = to_ascii_json(payload).context("serialize debug record")?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create debug dir {}", self.dir.display()))?;
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let path = self.dir.join(format!("{tag}_{timestamp}.json"));
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

impl Default for DebugDumper {
    fn default() -> Self {
        Self::disabled()
    }
}

/// JSON with every non-ASCII character escaped as `\uXXXX`.
fn to_ascii_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
