// SPDX-License-Identifier: GPL-3.0-or-later

//! The `unhi` payload: six multitexture overlays, seven bitmaps, auxiliary
//! meters, and carried-class warning sounds.

use binrw::binread;

use crate::tag_index::TagId;

use super::{Dependency, Reflexive};

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct UnitHudDependencies {
    pub overlay_bitmaps: [Reflexive; 6],
    pub static_bitmaps: [TagId; 7],
    pub auxiliary_meters: Reflexive,
    pub warning_sounds: Reflexive,
}

/// One auxiliary meter: an interface bitmap alongside the meter bitmap itself.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct UnitHudAuxiliaryMeter {
    pub interface_bitmap: TagId,
    pub meter_bitmap: TagId,
}

/// One warning-sound entry: carried class.
pub type UnitHudWarningSound = Dependency;
