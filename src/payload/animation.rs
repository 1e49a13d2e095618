// SPDX-License-Identifier: GPL-3.0-or-later

//! The `antr` payload: a sound list, every element known-class `snd `.

use binrw::binread;

use crate::tag_index::TagId;

use super::Reflexive;

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct AnimationDependencies {
    pub sounds: Reflexive,
}

/// One sound-list entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct AnimationSound {
    pub sound: TagId,
}
