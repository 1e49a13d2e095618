// SPDX-License-Identifier: GPL-3.0-or-later

//! The `mod2` payload: a list of shader references, each recursively
//! inferred through the shader rule rather than a fixed known class.

use binrw::binread;

use crate::tag_index::TagId;

use super::Reflexive;

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ModelDependencies {
    pub shaders: Reflexive,
}

/// One shader-list entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ModelShaderEntry {
    pub shader: TagId,
    #[br(pad_after = 2)]
    pub permutation: u16,
}
