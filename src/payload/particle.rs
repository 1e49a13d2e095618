// SPDX-License-Identifier: GPL-3.0-or-later

//! The `part` payload: two bitmaps, a physics reference, two carried-class
//! effects, and a foot-impact reference.

use binrw::binread;

use crate::tag_index::TagId;

use super::Dependency;

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ParticleDependencies {
    pub bitmap: TagId,
    pub secondary_bitmap: TagId,
    pub physics: TagId,
    pub collision_effect: Dependency,
    pub death_effect: Dependency,
    pub foot_impact: TagId,
}
