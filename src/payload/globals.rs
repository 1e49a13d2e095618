// SPDX-License-Identifier: GPL-3.0-or-later

//! The `matg` payload: traversed only when the globals tag is located by
//! name (see [`crate::tag_index::TagIndex::find_globals`]), never reached
//! by ordinary reference walking.

use binrw::binread;

use crate::tag_index::TagId;

use super::{Dependency, Reflexive};

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct GlobalsDependencies {
    pub weapons: Reflexive,
    pub powerups: Reflexive,
    pub grenades: Reflexive,
    pub camera_tracks: Reflexive,
    pub player_information: Reflexive,
    pub multiplayer_information: Reflexive,
    pub interface_bitmaps: Reflexive,
}

/// One globals weapon-list entry: carried class into the object family.
pub type GlobalsWeapon = Dependency;

/// One globals powerup-list entry: carried class, typically resolves to `eqip`.
pub type GlobalsPowerup = Dependency;

/// One grenade-type entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct GlobalsGrenade {
    pub equipment: TagId,
    pub projectile: TagId,
    pub hud: TagId,
}

/// One camera-track entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct GlobalsCameraTrack {
    pub track: TagId,
}

/// One player-information entry: unit and first-person hands.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct GlobalsPlayerInformation {
    pub unit: TagId,
    pub first_person_hands: TagId,
}

/// One multiplayer-information entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct GlobalsMultiplayerInformation {
    pub flag: TagId,
    pub unit: TagId,
    pub vehicle: TagId,
}

/// One interface-bitmaps entry: eleven typed references, each fixed-class.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct GlobalsInterfaceBitmaps {
    pub font_system: TagId,
    pub font_terminal: TagId,
    pub font_small: TagId,
    pub font_large: TagId,
    pub font_ticker: TagId,
    pub screen_color_table: TagId,
    pub icon_color_table: TagId,
    pub hud_digits: TagId,
    pub hud_globals: TagId,
    pub string_list: TagId,
    pub localization: TagId,
}

impl GlobalsInterfaceBitmaps {
    /// The eleven fixed references in declaration order.
    pub fn references(&self) -> [TagId; 11] {
        [
            self.font_system,
            self.font_terminal,
            self.font_small,
            self.font_large,
            self.font_ticker,
            self.screen_color_table,
            self.icon_color_table,
            self.hud_digits,
            self.hud_globals,
            self.string_list,
            self.localization,
        ]
    }
}
