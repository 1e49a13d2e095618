// SPDX-License-Identifier: GPL-3.0-or-later

//! The `wphi` payload: meter/static/overlay/crosshair/screen-effect bitmaps,
//! nested multitexture overlays, and a self-referential child-HUD edge.
//!
//! The `child_hud` edge is the reason the traversal engine must guard this
//! rule with the visited set the same as any other: without it, a weapon
//! whose HUD references itself as its own child would recurse forever.

use binrw::binread;

use crate::tag_index::TagId;

use super::Reflexive;

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponHudDependencies {
    pub meter_elements: Reflexive,
    pub static_elements: Reflexive,
    pub child_hud: TagId,
    pub overlays: Reflexive,
    pub crosshairs: Reflexive,
    pub screen_effect: Reflexive,
}

/// One meter, overlay, or crosshair entry's bitmap.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponHudOverlay {
    pub overlay_bitmap: TagId,
}

/// One crosshair's bitmap.
pub type WeaponHudCrosshair = WeaponHudOverlay;

/// One static-element entry: its own bitmap plus a nested multitexture overlay.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponHudStaticElement {
    pub bitmap: TagId,
    pub multitexture_overlay: Reflexive,
}

/// One screen-effect entry: full-screen and split-screen mask bitmaps.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponHudScreenEffect {
    pub mask_fullscreen: TagId,
    pub mask_splitscreen: TagId,
}
