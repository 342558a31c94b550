// packages/extensions/src/extension/registry.rs
//! Runtime event-code registry
//!
//! The const [`extension_table!`](crate::extension_table) covers extensions
//! known at build time. The registry covers the rest: extensions assembled at
//! startup (plugins, generated wrappers) that still have to share the same
//! code space. Registration happens once, before tracing starts; lookups are
//! read-only afterwards.

use crate::extension::descriptor::{
    is_valid_name, EventCode, ExtensionDescriptor, ExtensionVersion, CODE_SPACE_END,
    EXTENSION_CODE_BASE,
};
use crate::utils::errors::{ExtensionError, Result};
use parking_lot::RwLock;
use tracing::{debug, info};

#[derive(Debug)]
struct RegistryState {
    /// Sorted by base code
    extensions: Vec<ExtensionDescriptor>,
    /// Next free code for monotonic allocation
    next_code: u32,
}

/// Process-wide allocator of event-code ranges
#[derive(Debug)]
pub struct ExtensionRegistry {
    state: RwLock<RegistryState>,
}

impl ExtensionRegistry {
    /// Empty registry allocating from [`EXTENSION_CODE_BASE`]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState {
                extensions: Vec::new(),
                next_code: EXTENSION_CODE_BASE as u32,
            }),
        }
    }

    /// Registry seeded with a build-time table, re-checked at startup
    pub fn from_table(table: &[ExtensionDescriptor]) -> Result<Self> {
        let registry = Self::new();
        for ext in table {
            registry.insert(*ext)?;
        }
        info!("Extension registry loaded {} extensions", table.len());
        Ok(registry)
    }

    /// Allocate the next `count` codes for a new extension
    ///
    /// Registering an identical extension again returns the existing
    /// descriptor, so including an extension twice is harmless. A different
    /// extension under a taken name is a [`ExtensionError::NameCollision`].
    pub fn register(
        &self,
        name: &'static str,
        version: ExtensionVersion,
        count: u16,
    ) -> Result<ExtensionDescriptor> {
        check_name(name)?;
        if count == 0 {
            return Err(ExtensionError::ZeroLengthRange(name.to_string()));
        }

        let mut state = self.state.write();

        if let Some(existing) = state.extensions.iter().find(|e| e.name == name) {
            return if existing.version == version && existing.count == count {
                debug!("Extension {} already registered at {}", name, existing.base_code);
                Ok(*existing)
            } else {
                Err(ExtensionError::NameCollision(name.to_string()))
            };
        }

        let available = CODE_SPACE_END.saturating_sub(state.next_code);
        if count as u32 > available {
            return Err(ExtensionError::CodeSpaceExhausted {
                name: name.to_string(),
                requested: count,
                available: available as u16,
            });
        }

        let descriptor = ExtensionDescriptor {
            name,
            version,
            base_code: EventCode(state.next_code as u16),
            count,
        };
        state.next_code += count as u32;
        insert_sorted(&mut state.extensions, descriptor);

        info!(
            "Registered extension {} {} with codes {}..{}",
            name,
            version,
            descriptor.base_code,
            EventCode(descriptor.end_code())
        );
        Ok(descriptor)
    }

    /// Add a descriptor whose range was chosen elsewhere
    ///
    /// Rejects overlaps with every registered range. The allocation counter
    /// moves past the inserted range so later `register` calls stay disjoint.
    pub fn insert(&self, descriptor: ExtensionDescriptor) -> Result<()> {
        check_name(descriptor.name)?;
        if descriptor.count == 0 {
            return Err(ExtensionError::ZeroLengthRange(descriptor.name.to_string()));
        }
        if descriptor.base_code.0 < EXTENSION_CODE_BASE {
            return Err(ExtensionError::BelowExtensionBase {
                name: descriptor.name.to_string(),
                base: descriptor.base_code.0,
            });
        }
        let end = descriptor.base_code.0 as u32 + descriptor.count as u32;
        if end > CODE_SPACE_END {
            return Err(ExtensionError::CodeSpaceExhausted {
                name: descriptor.name.to_string(),
                requested: descriptor.count,
                available: CODE_SPACE_END.saturating_sub(descriptor.base_code.0 as u32) as u16,
            });
        }

        let mut state = self.state.write();

        if let Some(existing) = state.extensions.iter().find(|e| e.name == descriptor.name) {
            return if *existing == descriptor {
                Ok(())
            } else {
                Err(ExtensionError::NameCollision(descriptor.name.to_string()))
            };
        }
        if let Some(clash) = state.extensions.iter().find(|e| e.overlaps(&descriptor)) {
            return Err(ExtensionError::RangeOverlap {
                first: clash.name.to_string(),
                second: descriptor.name.to_string(),
            });
        }

        state.next_code = state.next_code.max(end);
        insert_sorted(&mut state.extensions, descriptor);
        debug!("Inserted extension {} at {}", descriptor.name, descriptor.base_code);
        Ok(())
    }

    /// Descriptor registered under `name`
    pub fn get(&self, name: &str) -> Option<ExtensionDescriptor> {
        self.state.read().extensions.iter().find(|e| e.name == name).copied()
    }

    /// Extension owning `code` and the code's offset within it
    pub fn resolve(&self, code: EventCode) -> Option<(ExtensionDescriptor, u16)> {
        let state = self.state.read();
        let idx = state
            .extensions
            .partition_point(|e| e.base_code <= code)
            .checked_sub(1)?;
        let ext = state.extensions[idx];
        ext.offset_of(code).map(|offset| (ext, offset))
    }

    /// All registered extensions, ordered by base code
    pub fn extensions(&self) -> Vec<ExtensionDescriptor> {
        self.state.read().extensions.clone()
    }

    /// Codes still available for allocation
    pub fn remaining(&self) -> u16 {
        CODE_SPACE_END.saturating_sub(self.state.read().next_code) as u16
    }

    pub fn len(&self) -> usize {
        self.state.read().extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().extensions.is_empty()
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn check_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ExtensionError::InvalidName(name.to_string()))
    }
}

fn insert_sorted(extensions: &mut Vec<ExtensionDescriptor>, descriptor: ExtensionDescriptor) {
    let pos = extensions.partition_point(|e| e.base_code < descriptor.base_code);
    extensions.insert(pos, descriptor);
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1: ExtensionVersion = ExtensionVersion::new(1, 0, 0);

    #[test]
    fn test_monotonic_allocation() {
        let registry = ExtensionRegistry::new();

        let wifi = registry.register("aws_wifi", V1, 3).unwrap();
        let sockets = registry.register("aws_secure_sockets", V1, 6).unwrap();

        assert_eq!(wifi.base_code, EventCode(EXTENSION_CODE_BASE));
        assert_eq!(sockets.base_code.0, wifi.end_code());
        assert!(!wifi.overlaps(&sockets));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reregistration_is_idempotent() {
        let registry = ExtensionRegistry::new();

        let first = registry.register("aws_wifi", V1, 3).unwrap();
        let again = registry.register("aws_wifi", V1, 3).unwrap();

        assert_eq!(first, again);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remaining(), (CODE_SPACE_END - EXTENSION_CODE_BASE as u32 - 3) as u16);
    }

    #[test]
    fn test_name_collision() {
        let registry = ExtensionRegistry::new();
        registry.register("aws_wifi", V1, 3).unwrap();

        let err = registry
            .register("aws_wifi", ExtensionVersion::new(1, 1, 0), 3)
            .unwrap_err();
        assert!(matches!(err, ExtensionError::NameCollision(_)));
    }

    #[test]
    fn test_zero_count_rejected() {
        let registry = ExtensionRegistry::new();
        assert!(matches!(
            registry.register("empty", V1, 0),
            Err(ExtensionError::ZeroLengthRange(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_name_rejected() {
        let registry = ExtensionRegistry::new();
        assert!(matches!(
            registry.register("", V1, 1),
            Err(ExtensionError::InvalidName(_))
        ));
        assert!(matches!(
            registry.register("../escape", V1, 1),
            Err(ExtensionError::InvalidName(_))
        ));
    }

    #[test]
    fn test_exhaustion() {
        let registry = ExtensionRegistry::new();
        let space = (CODE_SPACE_END - EXTENSION_CODE_BASE as u32) as u16;

        registry.register("big", V1, space - 1).unwrap();
        registry.register("last", V1, 1).unwrap();
        assert_eq!(registry.remaining(), 0);

        let err = registry.register("overflow", V1, 1).unwrap_err();
        assert!(matches!(
            err,
            ExtensionError::CodeSpaceExhausted { requested: 1, available: 0, .. }
        ));
    }

    #[test]
    fn test_insert_overlap_rejected() {
        let registry = ExtensionRegistry::new();
        registry
            .insert(ExtensionDescriptor::new("a", V1, 0x100, 8))
            .unwrap();

        let err = registry
            .insert(ExtensionDescriptor::new("b", V1, 0x104, 8))
            .unwrap_err();
        assert!(matches!(err, ExtensionError::RangeOverlap { .. }));

        // Allocation continues after the inserted range
        let next = registry.register("c", V1, 1).unwrap();
        assert_eq!(next.base_code, EventCode(0x108));
    }

    #[test]
    fn test_resolve() {
        let registry = ExtensionRegistry::new();
        let wifi = registry.register("aws_wifi", V1, 3).unwrap();
        let sockets = registry.register("aws_secure_sockets", V1, 6).unwrap();

        assert_eq!(registry.resolve(wifi.code_at(2)), Some((wifi, 2)));
        assert_eq!(registry.resolve(sockets.base_code), Some((sockets, 0)));
        assert_eq!(registry.resolve(EventCode(0x10)), None);
        assert_eq!(registry.resolve(EventCode(sockets.end_code())), None);
    }

    #[test]
    fn test_from_table_rejects_overlap() {
        let table = [
            ExtensionDescriptor::new("a", V1, 0x100, 4),
            ExtensionDescriptor::new("b", V1, 0x102, 4),
        ];
        assert!(ExtensionRegistry::from_table(&table).is_err());
    }
}
