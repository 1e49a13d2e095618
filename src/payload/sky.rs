// SPDX-License-Identifier: GPL-3.0-or-later

//! The `sky ` payload: model, animation, fog, and a carried-class lens-flare
//! list.

use binrw::binread;

use crate::tag_index::TagId;

use super::{Dependency, Reflexive};

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct SkyDependencies {
    pub model: TagId,
    pub animation: TagId,
    pub fog: TagId,
    pub lens_flares: Reflexive,
}

/// One lens-flare list entry: carried class (resolves to `lens`).
pub type SkyLensFlare = Dependency;
