// packages/extensions/src/extension/descriptor.rs
//! Extension identity: name, version and reserved event-code range
//!
//! Descriptors are built with `const fn`s so a broken declaration (zero
//! codes, empty name, range past the end of the code space) fails the build
//! when it is evaluated in a `const` item.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First event code available to extensions; lower codes belong to the recorder core
pub const EXTENSION_CODE_BASE: u16 = 0x100;

/// Highest event code the viewer accepts
pub const MAX_EVENT_CODE: u16 = 4095;

/// Exclusive end of the code space
pub const CODE_SPACE_END: u32 = MAX_EVENT_CODE as u32 + 1;

/// Identifies the kind of a recorded event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCode(pub u16);

impl EventCode {
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

/// Extension version (MAJOR.MINOR.PATCH)
///
/// Major and minor are stored as 8-bit values, patch as 16 bits, matching
/// the layout the viewer reads from the trace header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExtensionVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u16,
}

impl ExtensionVersion {
    pub const fn new(major: u8, minor: u8, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ExtensionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Static identity of one extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExtensionDescriptor {
    /// Looked up by the viewer as `<name>-v<version>.xml`
    pub name: &'static str,

    pub version: ExtensionVersion,

    /// First code of the reserved range
    pub base_code: EventCode,

    /// Number of consecutive codes starting at `base_code`
    pub count: u16,
}

impl ExtensionDescriptor {
    /// Declare a descriptor over `[base, base + count)`
    ///
    /// Panics (a build error in const context) when the name is not a valid
    /// file-name component, `count` is zero, or the range leaves the
    /// extension area.
    ///
    /// ```compile_fail
    /// use recorder_extensions::extension::{ExtensionDescriptor, ExtensionVersion};
    ///
    /// const EMPTY: ExtensionDescriptor =
    ///     ExtensionDescriptor::new("empty", ExtensionVersion::new(1, 0, 0), 0x100, 0);
    ///
    /// fn main() {
    ///     let _ = EMPTY;
    /// }
    /// ```
    pub const fn new(name: &'static str, version: ExtensionVersion, base: u16, count: u16) -> Self {
        if !is_valid_name(name) {
            panic!("extension name must be non-empty and use only [A-Za-z0-9_.-]");
        }
        if count == 0 {
            panic!("extension must reserve at least one event code");
        }
        if base < EXTENSION_CODE_BASE {
            panic!("extension range starts below EXTENSION_CODE_BASE");
        }
        if base as u32 + count as u32 > CODE_SPACE_END {
            panic!("extension range exceeds the event code space (max code 4095)");
        }

        Self {
            name,
            version,
            base_code: EventCode(base),
            count,
        }
    }

    /// Exclusive end of the range, i.e. the next free code
    ///
    /// Saturates at `u16::MAX` for a hand-built descriptor whose range runs
    /// past the 16-bit code type.
    pub const fn end_code(&self) -> u16 {
        self.base_code.0.saturating_add(self.count)
    }

    /// Exclusive end of the range, computed without overflow
    const fn end_u32(&self) -> u32 {
        self.base_code.0 as u32 + self.count as u32
    }

    /// Absolute code for a relative offset; fails the build when out of range
    ///
    /// ```compile_fail
    /// use recorder_extensions::extensions::AWS_WIFI;
    /// use recorder_extensions::EventCode;
    ///
    /// // aws_wifi reserves offsets 0..3
    /// const PAST_END: EventCode = AWS_WIFI.code_at(3);
    ///
    /// fn main() {
    ///     let _ = PAST_END;
    /// }
    /// ```
    pub const fn code_at(&self, offset: u16) -> EventCode {
        if offset >= self.count {
            panic!("event code offset outside the extension's range");
        }
        match self.base_code.0.checked_add(offset) {
            Some(code) => EventCode(code),
            None => panic!("event code offset outside the 16-bit code type"),
        }
    }

    /// Absolute code for a relative offset
    pub fn code(&self, offset: u16) -> Option<EventCode> {
        if offset >= self.count {
            return None;
        }
        self.base_code.0.checked_add(offset).map(EventCode)
    }

    /// Relative offset of `code`, if it belongs to this extension
    pub fn offset_of(&self, code: EventCode) -> Option<u16> {
        self.contains(code).then(|| code.0 - self.base_code.0)
    }

    pub const fn contains(&self, code: EventCode) -> bool {
        code.0 >= self.base_code.0 && (code.0 as u32) < self.end_u32()
    }

    pub const fn overlaps(&self, other: &ExtensionDescriptor) -> bool {
        (self.base_code.0 as u32) < other.end_u32() && (other.base_code.0 as u32) < self.end_u32()
    }

    /// All codes of the range in ascending order
    pub fn codes(&self) -> impl Iterator<Item = EventCode> {
        (self.base_code.0 as u32..self.end_u32())
            .map_while(|code| u16::try_from(code).ok().map(EventCode))
    }

    /// Schema file the viewer loads for traces recorded with this extension
    pub fn schema_file_name(&self) -> String {
        super::schema::schema_file_name(self.name, self.version)
    }
}

/// Names end up in file names, so they are restricted to a portable set
pub const fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let ok = b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.';
        if !ok {
            return false;
        }
        i += 1;
    }
    true
}

/// Byte-wise string equality usable in const context
pub(crate) const fn names_equal(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}
