// SPDX-License-Identifier: GPL-3.0-or-later

//! The `sbsp` payload. All pointers inside a BSP are translated under that
//! BSP's own `(file_offset, bsp_magic)` pair rather than the main address
//! space — see [`crate::address::translate_bsp`].
//!
//! The rule iterates collision-materials shaders and per-lightmap material
//! shaders; both are carried-class edges that resolve into the shader
//! family.

use binrw::binread;

use super::{Dependency, Reflexive};

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct BspDependencies {
    pub collision_materials: Reflexive,
    pub lightmaps: Reflexive,
}

/// One collision-material entry.
pub type BspCollisionMaterial = Dependency;

/// One lightmap: its own list of per-material shader references.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct BspLightmap {
    pub materials: Reflexive,
}

/// One lightmap-material entry.
pub type BspLightmapMaterial = Dependency;
