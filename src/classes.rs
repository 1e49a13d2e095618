// SPDX-License-Identifier: GPL-3.0-or-later

//! Tag-class codes and the two small allowlists that govern which classes
//! the engine will (and won't) ever write.
//!
//! Every code is a four-byte ASCII literal compared as an opaque `u32`;
//! none of these are ever parsed as text.

macro_rules! class_code {
    ($name:ident, $lit:expr) => {
        pub const $name: u32 = u32::from_le_bytes(*$lit);
    };
}

class_code!(SCNR, b"scnr");
class_code!(MATG, b"matg");
class_code!(BITM, b"bitm");
class_code!(SND, b"snd ");
class_code!(WEAP, b"weap");
class_code!(BIPD, b"bipd");
class_code!(VEHI, b"vehi");
class_code!(EQIP, b"eqip");
class_code!(GARB, b"garb");
class_code!(PROJ, b"proj");
class_code!(SCEN, b"scen");
class_code!(MACH, b"mach");
class_code!(CTRL, b"ctrl");
class_code!(LIFI, b"lifi");
class_code!(PLAC, b"plac");
class_code!(SSCE, b"ssce");
class_code!(OBJE, b"obje");
class_code!(PHYS, b"phys");
class_code!(SHDR, b"shdr");
class_code!(SENV, b"senv");
class_code!(SOSO, b"soso");
class_code!(SOTR, b"sotr");
class_code!(SCHI, b"schi");
class_code!(SCEX, b"scex");
class_code!(SWAT, b"swat");
class_code!(SGLA, b"sgla");
class_code!(SMET, b"smet");
class_code!(SPLA, b"spla");
class_code!(LENS, b"lens");
class_code!(MOD2, b"mod2");
class_code!(EFFE, b"effe");
class_code!(PART, b"part");
class_code!(PPHY, b"pphy");
class_code!(FOOT, b"foot");
class_code!(COLL, b"coll");
class_code!(WPHI, b"wphi");
class_code!(UNHI, b"unhi");
class_code!(GRHI, b"grhi");
class_code!(FONT, b"font");
class_code!(DECA, b"deca");
class_code!(ANTR, b"antr");
class_code!(HUD_DIGITS, b"hud#");
class_code!(HUDG, b"hudg");
class_code!(SKY, b"sky ");
class_code!(ITMC, b"itmc");
class_code!(SBSP, b"sbsp");
class_code!(JPT, b"jpt!");
class_code!(ACTV, b"actv");
class_code!(TRAK, b"trak");
class_code!(DEVC, b"devc");
class_code!(DELA, b"dela");
class_code!(SOUL, b"soul");
class_code!(TAGC, b"tagc");
class_code!(USTR, b"ustr");
class_code!(COLO, b"colo");
class_code!(STR_LIST, b"str#");
class_code!(HMT, b"hmt ");
class_code!(FOG, b"fog ");

/// Classes the engine must never write, at any point past their initial
/// visitation. Reserved by earlier passes of the tool chain.
pub const NON_DEPROTECTABLE: &[u32] = &[DEVC, MATG, DELA, SOUL, TAGC, USTR];

/// Classes the name-synthesis pass treats as "don't bother with fuzzy search".
/// The traversal engine itself treats these identically to any other class.
pub const AUTO_GENERIC: &[u32] = &[BITM, HUDG, SND, SBSP, SCNR, ITMC, FONT];

/// The object `type` byte, in ascending order, selects one of these twelve
/// concrete classes (`type` must be `0..=11`; anything else is pruned).
pub const OBJECT_TYPE_CLASSES: [u32; 12] = [
    BIPD, VEHI, WEAP, EQIP, GARB, PROJ, SCEN, MACH, CTRL, LIFI, PLAC, SSCE,
];

/// All classes that route a carried-class dependency edge to the object
/// inference rule (which then re-discriminates on the payload's `type` byte).
pub const OBJECT_FAMILY_CLASSES: [u32; 13] = [
    BIPD, VEHI, WEAP, EQIP, GARB, PROJ, SCEN, MACH, CTRL, LIFI, PLAC, SSCE, OBJE,
];

/// The shader `type` byte, in ascending order, selects one of these twelve
/// classes. Types `0..=2` reclassify to the generic `shdr` and are not
/// walked further; types `3..=11` select a concrete shader subclass.
pub const SHADER_TYPE_CLASSES: [u32; 12] = [
    SHDR, SHDR, SHDR, SENV, SOSO, SOTR, SCHI, SCEX, SWAT, SGLA, SMET, SPLA,
];

/// `true` once a class has had its initial visitation; the engine refuses
/// to overwrite it from any reference site encountered afterward.
pub fn can_be_deprotected(class: u32) -> bool {
    !NON_DEPROTECTABLE.contains(&class)
}

/// Whether the name-synthesis pass should skip fuzzy cross-map matching for `class`.
pub fn is_auto_generic(class: u32) -> bool {
    AUTO_GENERIC.contains(&class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_codes_are_four_ascii_bytes() {
        for code in [SCNR, MATG, BITM, SND, WEAP, JPT, SKY, HUD_DIGITS, STR_LIST, HMT, FOG] {
            let bytes = code.to_le_bytes();
            assert!(bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ' || *b == b'#' || *b == b'!'));
        }
    }

    #[test]
    fn non_deprotectable_cannot_be_deprotected() {
        assert!(!can_be_deprotected(MATG));
        assert!(!can_be_deprotected(USTR));
        assert!(can_be_deprotected(BITM));
    }

    #[test]
    fn auto_generic_membership() {
        assert!(is_auto_generic(SCNR));
        assert!(!is_auto_generic(WEAP));
    }
}
