// SPDX-License-Identifier: GPL-3.0-or-later

//! The `deca` payload: one bitmap and a self-referential "next decal" edge.

use binrw::binread;

use crate::tag_index::TagId;

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct DecalDependencies {
    pub bitmap: TagId,
    pub next_decal_in_chain: TagId,
}
