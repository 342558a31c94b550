// packages/extensions/src/extension/table.rs
//! Extension tables
//!
//! Extensions are declared in tables whose ranges are chained: each entry
//! starts where the previous one ends. The kit's own
//! [`EXTENSIONS`](crate::extensions::EXTENSIONS) table is the allocation
//! root and starts at [`EXTENSION_CODE_BASE`]. Any further table in the
//! same build must chain `after` an existing one, which places it behind
//! that table's last code and checks the two against each other. Every table
//! is checked in a `const` item, so a duplicate name, an overlap or an
//! exhausted code space is a compile error.
//!
//! ```
//! use recorder_extensions::extensions::{AWS_WIFI, EXTENSIONS};
//!
//! recorder_extensions::extension_table! {
//!     pub const VENDOR_EXTENSIONS = after EXTENSIONS [
//!         AWS_SOCKETS = ("aws_secure_sockets", 1, 2, 3, 6),
//!         AWS_MQTT = ("aws_mqtt", 0, 9, 0, 4),
//!     ];
//! }
//!
//! assert_eq!(AWS_SOCKETS.base_code.0, AWS_WIFI.end_code());
//! assert_eq!(AWS_MQTT.base_code.0, AWS_SOCKETS.end_code());
//! assert_eq!(VENDOR_EXTENSIONS.len(), 2);
//! ```
//!
//! Reusing a name from the table being chained onto fails the build:
//!
//! ```compile_fail
//! use recorder_extensions::extensions::EXTENSIONS;
//!
//! recorder_extensions::extension_table! {
//!     pub const VENDOR_EXTENSIONS = after EXTENSIONS [
//!         WIFI_AGAIN = ("aws_wifi", 2, 0, 0, 3),
//!     ];
//! }
//!
//! fn main() {}
//! ```

use crate::extension::descriptor::{
    names_equal, ExtensionDescriptor, CODE_SPACE_END, EXTENSION_CODE_BASE,
};
use crate::utils::errors::{ExtensionError, Result};

/// Declare extensions with chained, checked code ranges
///
/// Each entry is `IDENT = (name, major, minor, patch, count)`. Expands to one
/// `const` descriptor per entry, a `const` array of all of them, and a
/// compile-time [`validate_table`] check.
///
/// `pub const T = [ ... ];` starts at [`EXTENSION_CODE_BASE`] and is meant
/// for the root table only. `pub const T = after PREV [ ... ];` starts at
/// `PREV`'s next free code and is also checked against `PREV` with
/// [`validate_chained`].
///
/// Each of the following fails to compile.
///
/// A duplicate name:
///
/// ```compile_fail
/// recorder_extensions::extension_table! {
///     pub const TABLE = [
///         FIRST = ("dup", 1, 0, 0, 2),
///         SECOND = ("dup", 1, 0, 0, 2),
///     ];
/// }
///
/// fn main() {}
/// ```
///
/// An extension with no event codes:
///
/// ```compile_fail
/// recorder_extensions::extension_table! {
///     pub const TABLE = [
///         EMPTY = ("empty", 1, 0, 0, 0),
///     ];
/// }
///
/// fn main() {}
/// ```
///
/// A table running past code 4095:
///
/// ```compile_fail
/// recorder_extensions::extension_table! {
///     pub const TABLE = [
///         SMALL = ("small", 1, 0, 0, 100),
///         HUGE = ("huge", 1, 0, 0, 3800),
///     ];
/// }
///
/// fn main() {}
/// ```
#[macro_export]
macro_rules! extension_table {
    (@chain ($vis:vis) $base:expr;) => {};
    (@chain ($vis:vis) $base:expr;
        $id:ident = ($name:expr, $major:expr, $minor:expr, $patch:expr, $count:expr);
        $($rest:tt)*
    ) => {
        $vis const $id: $crate::extension::ExtensionDescriptor =
            $crate::extension::ExtensionDescriptor::new(
                $name,
                $crate::extension::ExtensionVersion::new($major, $minor, $patch),
                $base,
                $count,
            );
        $crate::extension_table!(@chain ($vis) $id.end_code(); $($rest)*);
    };
    (@count) => { 0usize };
    (@count $head:ident $($tail:ident)*) => {
        1usize + $crate::extension_table!(@count $($tail)*)
    };
    (
        $vis:vis const $table:ident = [
            $( $id:ident = ($name:expr, $major:expr, $minor:expr, $patch:expr, $count:expr) ),+ $(,)?
        ];
    ) => {
        $crate::extension_table!(@chain ($vis) $crate::extension::EXTENSION_CODE_BASE;
            $( $id = ($name, $major, $minor, $patch, $count); )+
        );

        $vis const $table: [$crate::extension::ExtensionDescriptor; $crate::extension_table!(@count $($id)+)] =
            [ $($id),+ ];

        const _: () = $crate::extension::validate_table(&$table);
    };
    (
        $vis:vis const $table:ident = after $prev:path [
            $( $id:ident = ($name:expr, $major:expr, $minor:expr, $patch:expr, $count:expr) ),+ $(,)?
        ];
    ) => {
        $crate::extension_table!(@chain ($vis) $crate::extension::next_free_code(&$prev);
            $( $id = ($name, $major, $minor, $patch, $count); )+
        );

        $vis const $table: [$crate::extension::ExtensionDescriptor; $crate::extension_table!(@count $($id)+)] =
            [ $($id),+ ];

        const _: () = $crate::extension::validate_chained(&$prev, &$table);
    };
}

/// First code after every range in `table`
///
/// [`EXTENSION_CODE_BASE`] for an empty table. Saturates at `u16::MAX`, so a
/// table chained onto a full code space fails [`validate_table`].
pub const fn next_free_code(table: &[ExtensionDescriptor]) -> u16 {
    let mut next = EXTENSION_CODE_BASE;
    let mut i = 0;
    while i < table.len() {
        let end = table[i].end_code();
        if end > next {
            next = end;
        }
        i += 1;
    }
    next
}

/// Compile-time check of a hand-written or generated table
///
/// Panics on a zero-length range, a range outside the extension area, a
/// duplicate name or overlapping ranges. Use it in a `const _: () = ...;`
/// item to turn any of these into a build failure:
///
/// ```compile_fail
/// use recorder_extensions::extension::{validate_table, ExtensionDescriptor, ExtensionVersion};
///
/// const A: ExtensionDescriptor =
///     ExtensionDescriptor::new("a", ExtensionVersion::new(1, 0, 0), 0x100, 3);
/// const B: ExtensionDescriptor =
///     ExtensionDescriptor::new("b", ExtensionVersion::new(1, 0, 0), 0x102, 3);
/// const _: () = validate_table(&[A, B]);
///
/// fn main() {}
/// ```
pub const fn validate_table(table: &[ExtensionDescriptor]) {
    let mut i = 0;
    while i < table.len() {
        let ext = &table[i];
        if ext.count == 0 {
            panic!("extension table entry reserves zero event codes");
        }
        if ext.base_code.0 < EXTENSION_CODE_BASE {
            panic!("extension table entry starts below EXTENSION_CODE_BASE");
        }
        if ext.base_code.0 as u32 + ext.count as u32 > CODE_SPACE_END {
            panic!("extension table exceeds the event code space (max code 4095)");
        }

        let mut j = i + 1;
        while j < table.len() {
            if names_equal(ext.name, table[j].name) {
                panic!("duplicate extension name in extension table");
            }
            if ext.overlaps(&table[j]) {
                panic!("overlapping event code ranges in extension table");
            }
            j += 1;
        }
        i += 1;
    }
}

/// Compile-time check of `table` chained onto `prev`
///
/// Runs [`validate_table`] on `table`, then rejects any entry that reuses a
/// name or overlaps a range of `prev`.
pub const fn validate_chained(prev: &[ExtensionDescriptor], table: &[ExtensionDescriptor]) {
    validate_table(table);

    let mut i = 0;
    while i < table.len() {
        let mut j = 0;
        while j < prev.len() {
            if names_equal(table[i].name, prev[j].name) {
                panic!("extension name already used by the previous table");
            }
            if table[i].overlaps(&prev[j]) {
                panic!("event code range overlaps the previous table");
            }
            j += 1;
        }
        i += 1;
    }
}

/// Runtime twin of [`validate_table`], reporting the first violation
pub fn check_table(table: &[ExtensionDescriptor]) -> Result<()> {
    for (i, ext) in table.iter().enumerate() {
        if ext.count == 0 {
            return Err(ExtensionError::ZeroLengthRange(ext.name.to_string()));
        }
        if ext.base_code.0 < EXTENSION_CODE_BASE {
            return Err(ExtensionError::BelowExtensionBase {
                name: ext.name.to_string(),
                base: ext.base_code.0,
            });
        }
        if ext.base_code.0 as u32 + ext.count as u32 > CODE_SPACE_END {
            return Err(ExtensionError::CodeSpaceExhausted {
                name: ext.name.to_string(),
                requested: ext.count,
                available: (CODE_SPACE_END.saturating_sub(ext.base_code.0 as u32)) as u16,
            });
        }

        for other in &table[i + 1..] {
            if ext.name == other.name {
                return Err(ExtensionError::NameCollision(ext.name.to_string()));
            }
            if ext.overlaps(other) {
                return Err(ExtensionError::RangeOverlap {
                    first: ext.name.to_string(),
                    second: other.name.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Runtime twin of [`validate_chained`]
pub fn check_chained(prev: &[ExtensionDescriptor], table: &[ExtensionDescriptor]) -> Result<()> {
    check_table(table)?;
    for ext in table {
        for earlier in prev {
            if ext.name == earlier.name {
                return Err(ExtensionError::NameCollision(ext.name.to_string()));
            }
            if ext.overlaps(earlier) {
                return Err(ExtensionError::RangeOverlap {
                    first: earlier.name.to_string(),
                    second: ext.name.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::descriptor::{EventCode, ExtensionVersion};

    crate::extension_table! {
        const CHAINED = [
            FIRST = ("first", 1, 0, 0, 3),
            SECOND = ("second", 2, 1, 7, 10),
            THIRD = ("third", 0, 0, 1, 1),
        ];
    }

    crate::extension_table! {
        const FOLLOW_UP = after CHAINED [
            FOURTH = ("fourth", 1, 0, 0, 2),
        ];
    }

    fn raw(name: &'static str, base: u16, count: u16) -> ExtensionDescriptor {
        ExtensionDescriptor {
            name,
            version: ExtensionVersion::new(1, 0, 0),
            base_code: EventCode(base),
            count,
        }
    }

    #[test]
    fn test_macro_chains_ranges() {
        assert_eq!(FIRST.base_code, EventCode(EXTENSION_CODE_BASE));
        assert_eq!(SECOND.base_code.0, FIRST.end_code());
        assert_eq!(THIRD.base_code.0, SECOND.end_code());
        assert_eq!(THIRD.end_code(), EXTENSION_CODE_BASE + 14);
        assert_eq!(CHAINED, [FIRST, SECOND, THIRD]);
        assert_eq!(SECOND.version, ExtensionVersion::new(2, 1, 7));
    }

    #[test]
    fn test_macro_table_is_disjoint() {
        assert!(check_table(&CHAINED).is_ok());
    }

    #[test]
    fn test_chained_table_starts_after_previous() {
        assert_eq!(FOURTH.base_code.0, THIRD.end_code());
        assert_eq!(next_free_code(&CHAINED), THIRD.end_code());
        assert_eq!(FOLLOW_UP, [FOURTH]);
        assert!(check_chained(&CHAINED, &FOLLOW_UP).is_ok());
    }

    #[test]
    fn test_next_free_code() {
        assert_eq!(next_free_code(&[]), EXTENSION_CODE_BASE);
        // Order in the table does not matter
        assert_eq!(next_free_code(&[raw("b", 0x200, 4), raw("a", 0x100, 4)]), 0x204);
    }

    #[test]
    #[should_panic(expected = "overlaps the previous table")]
    fn test_chained_overlap_rejected() {
        validate_chained(&[raw("a", 0x100, 4)], &[raw("b", 0x100, 2)]);
    }

    #[test]
    #[should_panic(expected = "already used by the previous table")]
    fn test_chained_duplicate_name_rejected() {
        validate_chained(&[raw("a", 0x100, 4)], &[raw("a", 0x104, 2)]);
    }

    #[test]
    fn test_check_chained_errors() {
        assert!(matches!(
            check_chained(&[raw("a", 0x100, 4)], &[raw("b", 0x102, 2)]),
            Err(ExtensionError::RangeOverlap { first, second }) if first == "a" && second == "b"
        ));
        assert!(matches!(
            check_chained(&[raw("a", 0x100, 4)], &[raw("a", 0x104, 2)]),
            Err(ExtensionError::NameCollision(name)) if name == "a"
        ));
    }

    #[test]
    #[should_panic(expected = "overlapping event code ranges")]
    fn test_overlap_rejected() {
        validate_table(&[raw("a", 0x100, 4), raw("b", 0x103, 2)]);
    }

    #[test]
    #[should_panic(expected = "duplicate extension name")]
    fn test_duplicate_name_rejected() {
        validate_table(&[raw("a", 0x100, 4), raw("a", 0x200, 2)]);
    }

    #[test]
    #[should_panic(expected = "zero event codes")]
    fn test_zero_entry_rejected() {
        validate_table(&[raw("a", 0x100, 0)]);
    }

    #[test]
    fn test_check_table_errors() {
        assert!(matches!(
            check_table(&[raw("a", 0x100, 4), raw("b", 0x103, 2)]),
            Err(ExtensionError::RangeOverlap { .. })
        ));
        assert!(matches!(
            check_table(&[raw("a", 0x100, 4), raw("a", 0x200, 2)]),
            Err(ExtensionError::NameCollision(name)) if name == "a"
        ));
        assert!(matches!(
            check_table(&[raw("a", 0x10, 4)]),
            Err(ExtensionError::BelowExtensionBase { base: 0x10, .. })
        ));
        assert!(matches!(
            check_table(&[raw("a", 0xFFE, 4)]),
            Err(ExtensionError::CodeSpaceExhausted { available: 2, .. })
        ));
    }
}
