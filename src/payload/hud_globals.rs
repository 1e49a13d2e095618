// SPDX-License-Identifier: GPL-3.0-or-later

//! The `hudg` payload: nine fixed edges — bitmaps, sounds, message text,
//! HUD-message source, a default weapon HUD, and fonts.

use binrw::binread;

use crate::tag_index::TagId;

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct HudGlobalsDependencies {
    pub messaging_bitmap: TagId,
    pub messaging_font: TagId,
    pub button_icon_font: TagId,
    pub text_font: TagId,
    pub loading_begin_sound: TagId,
    pub loading_end_sound: TagId,
    pub message_text: TagId,
    pub hud_messages: TagId,
    pub default_weapon_hud: TagId,
}
