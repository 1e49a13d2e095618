// SPDX-License-Identifier: GPL-3.0-or-later

//! The `font` payload: four self-referential edges, each itself a font.
//!
//! Because every edge here targets the same class as the tag being read,
//! the recursive rule must set the referent's class before recursing into
//! it — otherwise a font that names itself as its own bold variant (a
//! pattern the source tolerates) would recurse forever.

use binrw::binread;

use crate::tag_index::TagId;

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct FontDependencies {
    pub bold: TagId,
    pub italic: TagId,
    pub condense: TagId,
    pub underline: TagId,
}

impl FontDependencies {
    pub fn variants(&self) -> [TagId; 4] {
        [self.bold, self.italic, self.condense, self.underline]
    }
}
