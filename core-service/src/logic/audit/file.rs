//! File-backed audit logs
//!
//! - `CsvAuditLog`: traffic log with a header row, append only
//! - `JsonlAuditLog`: JSON Lines, rotated to `<file>.old` after N writes

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::record::{AuditRecord, AUDIT_HEADER};
use super::sink::AuditSink;
use crate::error::AuditError;

fn ensure_parent(path: &Path) -> Result<(), AuditError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

// ============================================================================
// CSV
// ============================================================================

pub struct CsvAuditLog {
    path: PathBuf,
    writer: Mutex<csv::Writer<File>>,
}

impl CsvAuditLog {
    /// Open for appending; the header is written only to a new or empty file
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let path = path.into();
        ensure_parent(&path)?;

        let needs_header = std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        if needs_header {
            writer.write_record(AUDIT_HEADER)?;
            writer.flush()?;
        }

        log::info!("CSV audit log: {}", path.display());
        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for CsvAuditLog {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut writer = self.writer.lock();
        writer.write_record(record.to_row())?;
        writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// JSON LINES
// ============================================================================

pub struct JsonlAuditLog {
    path: PathBuf,
    max_entries: usize,
    /// Writes since the last rotation
    writes: Mutex<usize>,
}

impl JsonlAuditLog {
    pub fn open(path: impl Into<PathBuf>, max_entries: usize) -> Result<Self, AuditError> {
        let path = path.into();
        ensure_parent(&path)?;

        let existing = match File::open(&path) {
            Ok(file) => BufReader::new(file).lines().count(),
            Err(_) => 0,
        };

        log::info!("JSONL audit log: {} ({} existing entries)", path.display(), existing);
        Ok(Self {
            path,
            max_entries: max_entries.max(1),
            writes: Mutex::new(existing),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path the current file is moved to on rotation
    pub fn rotated_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".old");
        PathBuf::from(name)
    }

    fn rotate(&self) -> Result<(), AuditError> {
        if !self.path.exists() {
            return Ok(());
        }

        let old_path = self.rotated_path();
        if old_path.exists() {
            std::fs::remove_file(&old_path)?;
        }
        std::fs::rename(&self.path, &old_path)?;

        log::info!("Rotated audit log to {}", old_path.display());
        Ok(())
    }
}

impl AuditSink for JsonlAuditLog {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut writes = self.writes.lock();

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(record)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        *writes += 1;
        if *writes >= self.max_entries {
            self.rotate()?;
            *writes = 0;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
