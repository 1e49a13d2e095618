// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed views over payload bytes, one module per tag kind. Each reader
//! exposes only its *reference fields* — the class, identifier, and
//! embedded sub-arrays of dependencies a class-inference rule needs to
//! enumerate outgoing edges. No reader owns or copies payload bytes.

use binrw::binread;

use crate::tag_index::TagId;

/// A reference field embedded in a payload. `main_class` is authoritative
/// when present and nonzero; otherwise the referent's class must be
/// inferred from its own payload.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct Dependency {
    pub main_class: u32,
    pub secondary_class: u32,
    pub tertiary_class: u32,
    pub name_pointer: u32,
    pub identifier: TagId,
}

impl Dependency {
    /// The carried class, or `None` when the field carries no usable hint
    /// (class zero means "not set").
    pub fn carried_class(&self) -> Option<u32> {
        if self.main_class == 0 {
            None
        } else {
            Some(self.main_class)
        }
    }
}

/// An embedded variable-length array: `offset` is a main-space pointer to
/// `count` contiguous sub-records.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct Reflexive {
    pub count: u32,
    pub offset: u32,
    #[br(temp)]
    _zero: u32,
}

/// A nested multitexture overlay entry, shared by the `wphi`/`unhi`/`grhi`
/// HUD payloads: three stacked bitmap layers per element.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct MultitextureOverlay {
    pub map_primary: TagId,
    pub map_secondary: TagId,
    pub map_tertiary: TagId,
}

pub mod animation;
pub mod bsp;
pub mod collision;
pub mod decal;
pub mod effect;
pub mod font;
pub mod foot_impact;
pub mod globals;
pub mod grenade_hud;
pub mod hud_digits;
pub mod hud_globals;
pub mod item_collection;
pub mod model;
pub mod object;
pub mod particle;
pub mod scenario;
pub mod shader;
pub mod sky;
pub mod unit_hud;
pub mod weapon_hud;
