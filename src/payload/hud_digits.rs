// SPDX-License-Identifier: GPL-3.0-or-later

//! The `hud#` payload: one bitmap.

use binrw::binread;

use crate::tag_index::TagId;

#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct HudDigitsDependencies {
    pub digits_bitmap: TagId,
}
