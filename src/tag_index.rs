// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed access to the tag table: the array of `(class, identifier, payload
//! offset, name offset)` entries that the traversal engine patches in place.

use binrw::binread;

use crate::address::{read_struct, write_u32_le, OutOfRange};
use crate::classes;
use crate::common::read_null_terminated_string;

/// A 32-bit handle split into a 16-bit table index (low) and a 16-bit salt (high).
///
/// Null per [`TagId::is_null`] either by convention (both halves zero) or
/// because the table index has fallen out of range of the current tag count.
#[binread]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[br(little)]
pub struct TagId {
    pub table_index: u16,
    pub salt: u16,
}

impl TagId {
    /// A tag identifier is null when both halves are zero, or its table
    /// index is past `tag_count`. Null identifiers are the sentinel for
    /// "no referent" and every recursive rule skips them immediately.
    pub fn is_null(&self, tag_count: u32) -> bool {
        (self.table_index == 0 && self.salt == 0) || self.table_index as u32 >= tag_count
    }
}

/// One entry of the tag table. `class_primary` is the only field this
/// system ever mutates; the rest are read-only context.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct TagTableEntry {
    pub class_primary: u32,
    pub class_secondary: u32,
    pub class_tertiary: u32,
    pub identifier: TagId,
    pub name_pointer: u32,
    pub payload_offset: u32,
    /// CE-variant external-tag marker. Compiled out entirely with
    /// `strict_ce` disabled, along with the 4 bytes it occupies on disk.
    #[cfg(feature = "strict_ce")]
    #[br(map = crate::common::read_bool_from::<u32>)]
    pub not_in_map: bool,
}

/// A bounds-checked, mutating view over the tag table embedded in a map buffer.
pub(crate) struct TagIndex<'a> {
    buffer: &'a mut [u8],
    table_offset: usize,
    tag_count: u32,
}

// class_primary, class_secondary, class_tertiary, identifier, name_pointer, payload_offset[, not_in_map]
#[cfg(feature = "strict_ce")]
const ENTRY_SIZE: usize = 4 + 4 + 4 + 4 + 4 + 4 + 4;
#[cfg(not(feature = "strict_ce"))]
const ENTRY_SIZE: usize = 4 + 4 + 4 + 4 + 4 + 4;

/// Reads one tag-table entry from a read-only buffer, independent of any
/// `TagIndex` borrow. Used by the CE pre-marking pass, which runs before the
/// mutable pass context exists.
pub(crate) fn read_entry(buffer: &[u8], table_offset: usize, tag_count: u32, table_index: u16) -> Option<TagTableEntry> {
    if table_index as u32 >= tag_count {
        return None;
    }
    read_struct(buffer, table_offset + table_index as usize * ENTRY_SIZE)
}

impl<'a> TagIndex<'a> {
    pub(crate) fn new(buffer: &'a mut [u8], table_offset: usize, tag_count: u32) -> Self {
        Self {
            buffer,
            table_offset,
            tag_count,
        }
    }

    pub(crate) fn tag_count(&self) -> u32 {
        self.tag_count
    }

    fn entry_offset(&self, table_index: u16) -> usize {
        self.table_offset + table_index as usize * ENTRY_SIZE
    }

    pub(crate) fn entry(&self, table_index: u16) -> Option<TagTableEntry> {
        read_entry(self.buffer, self.table_offset, self.tag_count, table_index)
    }

    /// Reads the name string pointed to by `entry.name_pointer`, translated
    /// through the main address space.
    pub(crate) fn read_name(&self, entry: &TagTableEntry, main_magic: u32) -> Option<String> {
        let offset = crate::address::translate_main(entry.name_pointer, main_magic, self.buffer.len()).ok()?;
        read_null_terminated_string(self.buffer, offset)
    }

    /// Writes `class_code` to `entry(id.table_index).class_primary`. A no-op
    /// when `id` is null; callers are responsible for the visited-set check
    /// (see `deprotect::Pass::set_class`), since only the pass knows whether
    /// this is the tag's first visitation.
    pub(crate) fn set_class(&mut self, id: TagId, class_code: u32) -> Result<(), OutOfRange> {
        if id.is_null(self.tag_count) {
            return Ok(());
        }
        let offset = self.entry_offset(id.table_index);
        write_u32_le(self.buffer, offset, class_code)
    }

    /// Linear scan for the entry whose class is `matg` and whose name equals
    /// `globals\globals`.
    pub(crate) fn find_globals(&self, main_magic: u32) -> Option<TagId> {
        for i in 0..self.tag_count as u16 {
            let Some(entry) = self.entry(i) else {
                continue;
            };
            if entry.class_primary != classes::MATG {
                continue;
            }
            if self.read_name(&entry, main_magic).as_deref() == Some("globals\\globals") {
                return Some(entry.identifier);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_id_null_by_zero() {
        let id = TagId {
            table_index: 0,
            salt: 0,
        };
        assert!(id.is_null(10));
    }

    #[test]
    fn tag_id_null_by_out_of_range() {
        let id = TagId {
            table_index: 99,
            salt: 1,
        };
        assert!(id.is_null(10));
    }

    #[test]
    fn tag_id_non_null() {
        let id = TagId {
            table_index: 2,
            salt: 7,
        };
        assert!(!id.is_null(10));
    }
}
