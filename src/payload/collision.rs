// SPDX-License-Identifier: GPL-3.0-or-later

//! The `coll` payload: eight carried-class effect edges plus a per-region
//! destroyed-effect list.

use binrw::binread;

use super::{Dependency, Reflexive};

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct CollisionDependencies {
    pub effect_0: Dependency,
    pub effect_1: Dependency,
    pub effect_2: Dependency,
    pub effect_3: Dependency,
    pub effect_4: Dependency,
    pub effect_5: Dependency,
    pub effect_6: Dependency,
    pub effect_7: Dependency,
    pub regions: Reflexive,
}

impl CollisionDependencies {
    /// The eight fixed effect-edge slots, in declaration order.
    pub fn effects(&self) -> [Dependency; 8] {
        [
            self.effect_0,
            self.effect_1,
            self.effect_2,
            self.effect_3,
            self.effect_4,
            self.effect_5,
            self.effect_6,
            self.effect_7,
        ]
    }
}

/// One collision region: its destroyed effect.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct CollisionRegion {
    pub destroyed_effect: Dependency,
}
