// packages/extensions/src/extension/schema.rs
//! Schema file naming and lookup
//!
//! The viewer interprets an extension's events with an XML schema named
//! `<name>-v<major>.<minor>.<patch>.xml`. It looks beside the trace file
//! first, then in its own configuration folder. Traces recorded with an older
//! version keep resolving to the older file, so schema files are never
//! overwritten when an extension is bumped.

use crate::extension::descriptor::ExtensionVersion;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Schema file name for an extension, exact and case-sensitive
pub fn schema_file_name(name: &str, version: ExtensionVersion) -> String {
    format!(
        "{}-v{}.{}.{}.xml",
        name, version.major, version.minor, version.patch
    )
}

/// Resolves schema files for recorded traces
#[derive(Debug, Clone, Default)]
pub struct SchemaLocator {
    fallback_dir: Option<PathBuf>,
}

impl SchemaLocator {
    pub fn new(fallback_dir: Option<PathBuf>) -> Self {
        Self { fallback_dir }
    }

    pub fn fallback_dir(&self) -> Option<&Path> {
        self.fallback_dir.as_deref()
    }

    /// Paths searched for one extension, in priority order
    pub fn candidates(&self, trace_path: &Path, name: &str, version: ExtensionVersion) -> Vec<PathBuf> {
        let file_name = schema_file_name(name, version);
        let mut candidates = Vec::with_capacity(2);

        let trace_dir = match trace_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        candidates.push(trace_dir.join(&file_name));

        if let Some(fallback) = &self.fallback_dir {
            candidates.push(fallback.join(&file_name));
        }

        candidates
    }

    /// First existing schema file for the extension, if any
    pub fn locate(&self, trace_path: &Path, name: &str, version: ExtensionVersion) -> Option<PathBuf> {
        let found = self
            .candidates(trace_path, name, version)
            .into_iter()
            .find(|path| path.is_file());

        match &found {
            Some(path) => debug!("Schema for {} {} found at {:?}", name, version, path),
            None => debug!("No schema for {} {} near {:?}", name, version, trace_path),
        }

        found
    }
}
