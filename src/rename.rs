// SPDX-License-Identifier: GPL-3.0-or-later

//! Name synthesis: after the class walk, gives every eligible tag a
//! synthesized placeholder path and appends the names region.
//!
//! The fuzzy cross-map matching the source hints at (a caller-supplied
//! reference map it never actually consults) is kept as an open hook —
//! see [`ClassNamer`] and [`crate::header::MATCHING_THRESHOLD`] — but is a
//! deliberate no-op, matching the source's own dead branch.

use tracing::debug;

use crate::address::{read_struct, translate_main, write_u32_le};
use crate::classes;
use crate::header::{MapHeader, MAX_TAG_NAME_SIZE};
use crate::tag_index::read_entry;

/// Supplies the human-readable name for a tag class. An external
/// collaborator: the crate has no built-in class-to-name table.
pub trait ClassNamer {
    /// Returns the display name for `class` (e.g. `b"bipd"` -> `"biped"`),
    /// or `None` if the class is unrecognized.
    fn name_for_class(&self, class: u32) -> Option<&str>;
}

/// A prior map's tag names, supplied for the (currently unsatisfied) fuzzy
/// cross-map match. Kept as a parameter so the signature matches what a
/// future matcher would need without committing to an implementation now.
pub struct ReferenceMap<'a> {
    pub names: &'a [&'a str],
}

fn entry_offset(table_offset: usize, table_index: u16, entry_size: usize) -> usize {
    table_offset + table_index as usize * entry_size
}

/// Rewrites the tag-name pointer of every eligible tag to a synthesized
/// placeholder, appending the names region after the original data.
///
/// Eligibility: the tag's class is deprotectable, its `name_pointer`
/// translates to somewhere between the index offset and twice the index
/// offset (a cheap heuristic for "protection zeroed this"), it is not an
/// external CE tag, and its current name (if any can still be read) does
/// not begin with `ui\` or `sound\`.
pub fn rename(buffer: &[u8], class_namer: &dyn ClassNamer, _reference_maps: &[ReferenceMap]) -> Vec<u8> {
    let Some(header) = read_struct::<MapHeader>(buffer, 0) else {
        debug!("rename: unreadable header, returning buffer unchanged");
        return buffer.to_vec();
    };
    if !header.is_integrity_valid() {
        debug!("rename: invalid integrity markers, returning buffer unchanged");
        return buffer.to_vec();
    }

    let index_offset = header.index_offset as usize;
    let Some(index_header) = read_struct::<crate::header::IndexHeader>(buffer, index_offset) else {
        debug!("rename: unreadable index header, returning buffer unchanged");
        return buffer.to_vec();
    };
    let main_magic = header.main_magic();
    let tag_count = index_header.tag_count;
    let Some(table_offset) = translate_main(index_header.tag_index_pointer, main_magic, buffer.len()).ok() else {
        debug!("rename: tag table pointer out of range, returning buffer unchanged");
        return buffer.to_vec();
    };

    #[cfg(feature = "strict_ce")]
    let entry_size: usize = 28;
    #[cfg(not(feature = "strict_ce"))]
    let entry_size: usize = 24;

    let mut out = buffer.to_vec();
    out.resize(buffer.len() + MAX_TAG_NAME_SIZE * tag_count as usize, 0);

    let mut names_cursor = buffer.len();
    let mut synthesized = 0usize;

    for table_index in 0..tag_count as u16 {
        let Some(entry) = read_entry(buffer, table_offset, tag_count, table_index) else {
            continue;
        };
        if !classes::can_be_deprotected(entry.class_primary) {
            continue;
        }
        #[cfg(feature = "strict_ce")]
        if entry.not_in_map {
            continue;
        }
        let name_offset = translate_main(entry.name_pointer, main_magic, buffer.len()).ok();
        let in_index_region = matches!(name_offset, Some(offset) if offset >= index_offset && offset <= 2 * index_offset);
        if !in_index_region {
            continue;
        }
        let current_name = name_offset.and_then(|offset| crate::common::read_null_terminated_string(buffer, offset));
        if let Some(name) = &current_name {
            if name.starts_with("ui\\") || name.starts_with("sound\\") {
                continue;
            }
        }

        let class_name = class_namer.name_for_class(entry.class_primary).unwrap_or("unknown");
        let placeholder = format!("deathstar\\{class_name}\\tag_{table_index}");
        let mut bytes = placeholder.into_bytes();
        bytes.truncate(MAX_TAG_NAME_SIZE - 1);
        bytes.push(0);

        if names_cursor + bytes.len() > out.len() {
            debug!("rename: names region exhausted, stopping early");
            break;
        }
        out[names_cursor..names_cursor + bytes.len()].copy_from_slice(&bytes);

        let new_pointer = main_magic.wrapping_add(names_cursor as u32);
        let name_pointer_offset = entry_offset(table_offset, table_index, entry_size) + 16;
        let _ = write_u32_le(&mut out, name_pointer_offset, new_pointer);

        names_cursor += bytes.len();
        synthesized += 1;
    }

    let new_length = names_cursor as u32;
    let new_meta_size = new_length - header.index_offset;
    let _ = write_u32_le(&mut out, 8, new_length);
    let _ = write_u32_le(&mut out, 16, new_meta_size);

    out.truncate(names_cursor);
    debug!(synthesized, "rename: finished");
    out
}

/// A tag identifier-keyed placeholder, useful for tests and for callers who
/// want to predict what [`rename`] will produce without parsing its output.
pub fn placeholder_name(class_name: &str, table_index: u16) -> String {
    format!("deathstar\\{class_name}\\tag_{table_index}")
}

#[allow(dead_code)]
fn unused_match_score(_a: &str, _b: &str) -> f32 {
    // The source computes `currentMatch = 0.0` here and never updates it;
    // the fuzzy-match branch is dead code in the original tool too.
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedNamer;
    impl ClassNamer for FixedNamer {
        fn name_for_class(&self, class: u32) -> Option<&str> {
            if class == classes::BITM {
                Some("bitmap")
            } else {
                None
            }
        }
    }

    #[test]
    fn placeholder_name_format() {
        assert_eq!(placeholder_name("bitmap", 3), "deathstar\\bitmap\\tag_3");
    }

    #[test]
    fn rename_tolerates_garbage_without_panicking() {
        let namer = FixedNamer;
        crate::common::pass_random_garbage(100, |buffer| {
            let _ = rename(buffer, &namer, &[]);
        });
    }

    #[test]
    fn rename_of_empty_buffer_returns_unchanged() {
        let namer = FixedNamer;
        assert_eq!(rename(&[], &namer, &[]), Vec::<u8>::new());
    }
}
