// SPDX-License-Identifier: GPL-3.0-or-later

//! The `grhi` payload: three bitmaps and two multitexture overlays.

use binrw::binread;

use crate::tag_index::TagId;

use super::Reflexive;

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct GrenadeHudDependencies {
    pub background_interface_bitmap: TagId,
    pub interface_bitmap: TagId,
    pub overlay_bitmap: TagId,
    pub background_overlay: Reflexive,
    pub foreground_overlay: Reflexive,
}
