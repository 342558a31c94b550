// packages/extensions/src/recording/trace_file.rs
//! Trace files
//!
//! A trace file holds the drained events plus a header listing every
//! extension that was linked in: name, version and code range. The viewer
//! uses that table to map event codes to extensions and to pick each
//! extension's schema file.

use crate::extension::descriptor::{EventCode, ExtensionDescriptor, ExtensionVersion};
use crate::extension::schema::{schema_file_name, SchemaLocator};
use crate::recording::compressor::Compressor;
use crate::sink::event::TraceEvent;
use crate::utils::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use ulid::Ulid;

/// Format revision written to the header
pub const TRACE_FORMAT_VERSION: u32 = 1;

/// Extension entry of a trace header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    pub name: String,
    pub version: ExtensionVersion,
    pub base_code: EventCode,
    pub count: u16,
}

impl ExtensionRecord {
    pub fn contains(&self, code: EventCode) -> bool {
        code.0 >= self.base_code.0 && (code.0 as u32) < self.base_code.0 as u32 + self.count as u32
    }

    pub fn schema_file_name(&self) -> String {
        schema_file_name(&self.name, self.version)
    }
}

impl From<&ExtensionDescriptor> for ExtensionRecord {
    fn from(ext: &ExtensionDescriptor) -> Self {
        Self {
            name: ext.name.to_string(),
            version: ext.version,
            base_code: ext.base_code,
            count: ext.count,
        }
    }
}

/// A complete recorded trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDocument {
    pub format_version: u32,
    pub session_id: String,
    pub recorded_at: DateTime<Utc>,
    pub extensions: Vec<ExtensionRecord>,
    pub events: Vec<TraceEvent>,
}

impl TraceDocument {
    /// New trace for a fresh session
    pub fn new(extensions: &[ExtensionDescriptor], events: Vec<TraceEvent>) -> Self {
        Self {
            format_version: TRACE_FORMAT_VERSION,
            session_id: Ulid::new().to_string(),
            recorded_at: Utc::now(),
            extensions: extensions.iter().map(ExtensionRecord::from).collect(),
            events,
        }
    }

    /// Extension that emitted `code`, per the header
    pub fn extension_for(&self, code: EventCode) -> Option<&ExtensionRecord> {
        self.extensions.iter().find(|ext| ext.contains(code))
    }

    /// Events whose code belongs to no listed extension
    pub fn unattributed_events(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events
            .iter()
            .filter(|event| self.extension_for(event.code).is_none())
    }

    /// Resolve the schema file of every listed extension
    pub fn resolve_schemas(
        &self,
        trace_path: &Path,
        locator: &SchemaLocator,
    ) -> Vec<(ExtensionRecord, Option<PathBuf>)> {
        self.extensions
            .iter()
            .map(|ext| {
                let path = locator.locate(trace_path, &ext.name, ext.version);
                (ext.clone(), path)
            })
            .collect()
    }

    /// Write as JSON, zstd-compressed when a compressor is given
    pub fn write_to(&self, path: &Path, compressor: Option<&Compressor>) -> Result<()> {
        let json = serde_json::to_vec(self)?;
        let bytes = match compressor {
            Some(c) => c.compress(&json)?,
            None => json,
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, &bytes)?;

        info!(
            "Wrote trace {} with {} events ({} bytes) to {:?}",
            self.session_id,
            self.events.len(),
            bytes.len(),
            path
        );
        Ok(())
    }

    /// Read a trace written by [`write_to`](Self::write_to)
    pub fn read_from(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let json = if Compressor::is_compressed(&bytes) {
            debug!("Trace {:?} is zstd-compressed", path);
            Compressor::decompress(&bytes)?
        } else {
            bytes
        };
        Ok(serde_json::from_slice(&json)?)
    }
}
