// SPDX-License-Identifier: GPL-3.0-or-later

//! The `scnr` payload: the traversal's root. All fields here are reference
//! fields only — the scenario carries plenty of non-reference gameplay data
//! this system has no reason to model.
//!
//! Most of the scenario's reflexives hold a single known-class identifier
//! per element (object palettes, skies, decals, netgame item collections,
//! the six-wide starting-equipment slots) and are read directly as
//! `TagId`/`[TagId; 6]` arrays by the inference rule rather than through a
//! dedicated wrapper type. BSP references carry extra addressing fields and
//! get one here.

use binrw::binread;

use crate::tag_index::TagId;

use super::Reflexive;

/// One BSP reference: its own tag identifier plus the `(file_offset, bsp_magic)`
/// pair needed to translate pointers inside that BSP's own payload.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ScenarioBspReference {
    pub bsp: TagId,
    pub bsp_magic: u32,
    pub file_offset: u32,
}

/// The `scnr` payload's reference fields.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ScenarioDependencies {
    pub scenery_palette: Reflexive,
    pub biped_palette: Reflexive,
    pub equip_palette: Reflexive,
    pub vehicle_palette: Reflexive,
    pub weapon_palette: Reflexive,
    pub machine_palette: Reflexive,
    pub control_palette: Reflexive,
    pub light_fixture_palette: Reflexive,
    pub sound_scenery_palette: Reflexive,
    /// Each element is `[TagId; 6]`, one per item-collection slot.
    pub starting_equipment: Reflexive,
    pub skies: Reflexive,
    pub bsps: Reflexive,
    pub decal_palette: Reflexive,
    pub netgame_item_collections: Reflexive,
}
