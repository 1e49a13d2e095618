// SPDX-License-Identifier: GPL-3.0-or-later

//! The fixed header at offset 0 and the index header it points at.

use binrw::binread;

use crate::tag_index::TagId;

/// Pointer-to-offset additive constant for the main tag-data address space.
pub const META_MEMORY_OFFSET: u32 = 0x40440000;

/// The header version that marks a map as the "CE" variant, which carries
/// a per-entry `not_in_map` flag.
pub const CE_VARIANT_VERSION: u32 = 609;

/// Matching threshold for the (stubbed, never-satisfied) fuzzy cross-map
/// name search performed by [`crate::rename::rename`].
pub const MATCHING_THRESHOLD: f32 = 0.7;

/// Upper bound on a synthesized placeholder name, including its NUL terminator.
pub const MAX_TAG_NAME_SIZE: usize = 0x20;

pub(crate) const INTEGRITY_HEAD: u32 = u32::from_le_bytes(*b"deah");
pub(crate) const INTEGRITY_FOOT: u32 = u32::from_le_bytes(*b"toof");

/// On-disk size of [`MapHeader`], matching a real shipped format's header block.
pub const HEADER_SIZE: usize = 0x800;

/// The fixed-size header at the start of every map image.
///
/// Trailing reserved bytes mirror the real shipped format's unused header
/// space; this reader never interprets them.
#[binread]
#[derive(Debug, Clone)]
#[br(little)]
pub struct MapHeader {
    /// Must equal `"deah"` read little-endian, or the map is rejected.
    pub integrity_head: u32,
    pub version: u32,
    /// Total length of the map image in bytes.
    pub length: u32,
    /// Offset of the [`IndexHeader`] from the start of the buffer.
    pub index_offset: u32,
    /// Size of the tag-data region (`length - index_offset`), kept in sync
    /// by [`crate::rename::rename`] when it appends a names region.
    pub meta_size: u32,
    #[br(count = 0x7e8)]
    reserved: Vec<u8>,
    /// Must equal `"toof"` read little-endian, or the map is rejected.
    pub integrity_foot: u32,
}

impl MapHeader {
    pub(crate) fn is_integrity_valid(&self) -> bool {
        self.integrity_head == INTEGRITY_HEAD && self.integrity_foot == INTEGRITY_FOOT
    }

    pub(crate) fn is_ce_variant(&self) -> bool {
        self.version == CE_VARIANT_VERSION
    }

    /// The additive constant translating a main-space pointer to a buffer offset.
    pub(crate) fn main_magic(&self) -> u32 {
        META_MEMORY_OFFSET.wrapping_sub(self.index_offset)
    }
}

/// The index header, found at `MapHeader::index_offset`.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct IndexHeader {
    /// Main-space pointer to the first [`crate::tag_index::TagTableEntry`].
    pub tag_index_pointer: u32,
    /// Identifier of the scenario tag, the traversal's root seed.
    pub scenario_tag_id: TagId,
    pub tag_count: u32,
}
