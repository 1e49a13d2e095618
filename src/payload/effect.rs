// SPDX-License-Identifier: GPL-3.0-or-later

//! The `effe` payload: a list of events, each with a list of parts (carried
//! class) and a list of particles (always `part`).

use binrw::binread;

use super::{Dependency, Reflexive};

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct EffectDependencies {
    pub events: Reflexive,
}

/// One event entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct EffectEvent {
    pub parts: Reflexive,
    pub particles: Reflexive,
}

/// One event part: a carried-class dependency.
pub type EffectPart = Dependency;

/// One event particle entry: always class `part`.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct EffectParticle {
    pub particle: crate::tag_index::TagId,
}
