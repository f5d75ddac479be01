//! Session report and export functionality

use crate::keyboard::{keymap, KeyEvent, ModifierState, PumpStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Complete report of one decoded byte stream
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: SessionSummary,
    /// Every decoded event, in order
    pub events: Vec<EventEntry>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Session duration in seconds
    pub duration_secs: f64,
}

/// Session summary statistics
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Raw bytes consumed by the pump
    pub bytes_read: u64,
    /// Events published on the bus
    pub events_published: u64,
    pub presses: u64,
    pub releases: u64,
    /// Events whose byte fell outside the scancode tables
    pub unknown_scancodes: u64,
    /// Modifier latches when the stream ended
    pub final_modifiers: ModifierState,
}

/// Single event entry
#[derive(Debug, Clone, Serialize)]
pub struct EventEntry {
    pub key: String,
    #[serde(flatten)]
    pub event: KeyEvent,
}

impl From<&KeyEvent> for EventEntry {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: keymap::describe(event.keycode),
            event: *event,
        }
    }
}

impl SessionReport {
    /// Create a new session report
    pub fn new(start_time: Instant, stats: &PumpStats, events: &[KeyEvent]) -> Self {
        let duration_secs = start_time.elapsed().as_secs_f64();
        let now: DateTime<Utc> = Utc::now();

        let presses = events.iter().filter(|e| e.is_press()).count() as u64;
        let unknown_scancodes = events
            .iter()
            .filter(|e| e.keycode == keymap::KeyCode::UNKNOWN)
            .count() as u64;

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                duration_secs,
            },
            summary: SessionSummary {
                bytes_read: stats.bytes_read,
                events_published: stats.events_published,
                presses,
                releases: events.len() as u64 - presses,
                unknown_scancodes,
                final_modifiers: stats.final_modifiers,
            },
            events: events.iter().map(EventEntry::from).collect(),
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
