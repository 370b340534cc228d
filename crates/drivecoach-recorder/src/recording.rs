//! Recording containers and their on-disk formats.
//!
//! Two formats are supported:
//!
//! - `.json`: one [`TelemetryRecording`] document with metadata and frames
//! - `.jsonl`: one [`RecordedFrame`] per line, blank lines ignored

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::frame::RecordedFrame;

/// Recording container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecording {
    /// Where the recording came from and its shape.
    pub metadata: RecordingMetadata,
    /// Frames in recording order.
    pub frames: Vec<RecordedFrame>,
}

/// Recording metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    /// Where the frames came from, e.g. `synthetic` or a file stem.
    pub source: String,
    /// Unix time the recording was assembled, in seconds.
    pub timestamp: u64,
    /// Time between the first and last frame (s).
    pub duration_seconds: f64,
    /// Number of frames.
    pub frame_count: usize,
    /// Mean sample rate over the duration (Hz), 0 for fewer than two frames.
    pub average_rate_hz: f64,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TelemetryRecording {
    /// Wrap frames, deriving duration and rate from their timestamps.
    #[must_use]
    pub fn new(source: impl Into<String>, frames: Vec<RecordedFrame>) -> Self {
        let duration_seconds = match (frames.first(), frames.last()) {
            (Some(first), Some(last)) => (last.sample.t - first.sample.t).max(0.0),
            _ => 0.0,
        };
        let intervals = count_as_f64(frames.len().saturating_sub(1));
        let average_rate_hz = if duration_seconds > 0.0 {
            intervals / duration_seconds
        } else {
            0.0
        };
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        Self {
            metadata: RecordingMetadata {
                source: source.into(),
                timestamp,
                duration_seconds,
                frame_count: frames.len(),
                average_rate_hz,
                description: None,
            },
            frames,
        }
    }

    /// Attach a free-form description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    /// Write as a pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        create_parent_dir(path)?;
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        tracing::debug!(path = %path.display(), frames = self.frames.len(), "Saved recording");
        Ok(())
    }

    /// Read a JSON recording document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load_json(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let recording = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(recording)
    }

    /// Write the frames as JSON Lines. Metadata is not stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        create_parent_dir(path)?;
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_jsonl(&mut writer, &self.frames)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a JSON Lines frame stream; metadata is derived from the frames
    /// and the file stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a line fails to parse.
    pub fn load_jsonl(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let frames = read_jsonl(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        let source = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording".to_string());
        Ok(Self::new(source, frames))
    }

    /// Load by extension: `.json` or `.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns an error for any other extension or if loading fails.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match extension(path).as_str() {
            "json" => Self::load_json(path),
            "jsonl" | "ndjson" => Self::load_jsonl(path),
            other => bail!(
                "unsupported recording format '{other}' for {} (expected .json or .jsonl)",
                path.display()
            ),
        }
    }

    /// Save by extension: `.json` or `.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns an error for any other extension or if writing fails.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        match extension(path).as_str() {
            "json" => self.save_json(path),
            "jsonl" | "ndjson" => self.save_jsonl(path),
            other => bail!(
                "unsupported recording format '{other}' for {} (expected .json or .jsonl)",
                path.display()
            ),
        }
    }
}

/// Parse one frame per non-blank line.
///
/// # Errors
///
/// Returns the first read or parse failure, naming its 1-based line number.
pub fn read_jsonl(reader: impl BufRead) -> anyhow::Result<Vec<RecordedFrame>> {
    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index.saturating_add(1);
        let line = line.with_context(|| format!("reading line {line_number}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let frame = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid frame on line {line_number}"))?;
        frames.push(frame);
    }
    Ok(frames)
}

/// Write one compact JSON frame per line.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_jsonl(mut writer: impl Write, frames: &[RecordedFrame]) -> anyhow::Result<()> {
    for frame in frames {
        serde_json::to_writer(&mut writer, frame)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}
