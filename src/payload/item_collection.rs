// SPDX-License-Identifier: GPL-3.0-or-later

//! The `itmc` payload: a permutation list, each entry a carried-class
//! dependency that resolves into the object family.

use binrw::binread;

use super::{Dependency, Reflexive};

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ItemCollectionDependencies {
    pub permutations: Reflexive,
}

/// One permutation entry.
pub type ItemCollectionPermutation = Dependency;
