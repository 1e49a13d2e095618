// SPDX-License-Identifier: GPL-3.0-or-later

//! The `foot` payload: per material, a carried-class effect and a sound.

use binrw::binread;

use crate::tag_index::TagId;

use super::{Dependency, Reflexive};

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct FootImpactDependencies {
    pub materials: Reflexive,
}

/// One per-material entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct FootImpactMaterial {
    pub effect: Dependency,
    pub sound: TagId,
}
