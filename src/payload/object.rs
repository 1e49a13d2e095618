// SPDX-License-Identifier: GPL-3.0-or-later

//! The `obje` payload family: bipeds, vehicles, weapons, equipment, scenery,
//! machines, controls, light fixtures, placeholders, and sound scenery.
//!
//! All object types share a common header of reference fields
//! ([`ObjectDependencies`]); a few subtypes carry additional fields layered
//! on top of that same payload, modeled here as separate reader structs
//! over the same bytes (an object payload is read once per layer the
//! inference rule needs, exactly as the object rule in `deprotect` does).

use binrw::binread;

use crate::classes::OBJECT_TYPE_CLASSES;
use crate::tag_index::TagId;

use super::{Dependency, Reflexive};

/// One widget or attachment entry: a carried-class dependency.
pub type ObjectCarriedReference = Dependency;

/// One resource entry: `kind` selects whether `name` refers to a `bitm` or `snd `.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ObjectResource {
    #[br(pad_after = 2)]
    pub kind: u16,
    pub name: TagId,
}

pub const OBJECT_RESOURCE_BITMAP: u16 = 0;
pub const OBJECT_RESOURCE_SOUND: u16 = 1;

/// Fields common to every object type.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ObjectDependencies {
    /// Discriminant selecting the concrete class via [`OBJECT_TYPE_CLASSES`].
    #[br(pad_after = 2)]
    pub object_type: u16,
    pub model: TagId,
    pub animation: TagId,
    pub collision: TagId,
    pub physics: TagId,
    pub shader: TagId,
    pub widgets: Reflexive,
    pub attachments: Reflexive,
    pub resources: Reflexive,
}

impl ObjectDependencies {
    /// The concrete class selected by `object_type`, or `None` if the
    /// discriminant is out of range (the subtree is then left unwalked).
    pub fn concrete_class(&self) -> Option<u32> {
        OBJECT_TYPE_CLASSES.get(self.object_type as usize).copied()
    }
}

/// Extra fields carried by weapons and equipment (items).
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ItemDependencies {
    pub material_effects: TagId,
    pub collision_sound: TagId,
    pub detonating_effect: Dependency,
    pub detonation_effect: Dependency,
}

/// One weapon trigger's firing effects.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponTriggerFiringEffect {
    pub empty_effect: Dependency,
    pub firing_effect: Dependency,
    pub misfire_effect: Dependency,
    pub misfire_damage: TagId,
    pub empty_damage: TagId,
    pub firing_damage: TagId,
}

/// One weapon trigger.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponTrigger {
    pub projectile: TagId,
    pub charging_effect: Dependency,
    pub firing_effect: Reflexive,
}

/// One weapon magazine's equipment slot.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponMagazineEquipment {
    pub equipment: TagId,
}

/// One weapon magazine.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponMagazine {
    pub chambering_effect: Dependency,
    pub reloading_effect: Dependency,
    pub magazine_equipment: Reflexive,
}

/// Extra fields carried by weapons, layered on top of [`ItemDependencies`].
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponDependencies {
    pub fp_model: TagId,
    pub fp_animation: TagId,
    pub triggers: Reflexive,
    pub magazines: Reflexive,
    pub hud: TagId,
    pub detonation_effect: Dependency,
    pub light_off_effect: Dependency,
    pub light_on_effect: Dependency,
    pub overheated_effect: Dependency,
    pub ready_effect: Dependency,
    pub melee_damage: TagId,
    pub melee_response: TagId,
    pub pickup_sound: TagId,
    pub zoom_in_sound: TagId,
    pub zoom_out_sound: TagId,
}

/// One unit weapon-list entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct UnitWeapon {
    pub weapon: TagId,
}

/// One unit camera-track entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct UnitCameraTrack {
    pub camera_track: TagId,
}

/// One unit seat.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct UnitSeat {
    pub camera_tracks: Reflexive,
    pub hud_interfaces: Reflexive,
}

/// One seat's HUD-interface entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct UnitSeatHudInterface {
    pub hud: TagId,
}

/// One unit HUD-list entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct UnitHudEntry {
    pub hud: TagId,
}

/// Extra fields carried by units (bipeds and vehicles).
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct UnitDependencies {
    pub weapons: Reflexive,
    pub integrated_light: Dependency,
    pub melee_damage: TagId,
    pub spawned_actor: TagId,
    pub camera_track: Reflexive,
    pub seats: Reflexive,
    pub unit_hud: Reflexive,
}

/// Extra fields carried by vehicles, layered on top of [`UnitDependencies`].
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct VehicleDependencies {
    pub effect: Dependency,
    pub material_effects: TagId,
    pub crash_sound: TagId,
    pub suspension_sound: TagId,
}

/// Extra fields carried by bipeds, layered on top of [`UnitDependencies`].
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct BipedDependencies {
    pub material_effects: TagId,
}

/// One projectile material-response entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ProjectileMaterialResponse {
    pub default_result: Dependency,
    pub detonation_effect: Dependency,
    pub potential_result: Dependency,
}

/// Extra fields carried by projectiles.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ProjectileDependencies {
    /// Walked twice by the inference rule — a preserved upstream quirk, see
    /// the call site in `deprotect::rules::object`.
    pub super_detonation: Dependency,
    pub attached_damage: TagId,
    pub impact_damage: TagId,
    pub material_response: Reflexive,
}

/// A biped's full payload: common object fields, unit fields, biped fields,
/// all read in one pass since they are laid out contiguously on disk.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct BipedObjectDependencies {
    pub common: ObjectDependencies,
    pub unit: UnitDependencies,
    pub biped: BipedDependencies,
}

/// A vehicle's full payload.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct VehicleObjectDependencies {
    pub common: ObjectDependencies,
    pub unit: UnitDependencies,
    pub vehicle: VehicleDependencies,
}

/// A weapon's full payload.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WeaponObjectDependencies {
    pub common: ObjectDependencies,
    pub item: ItemDependencies,
    pub weapon: WeaponDependencies,
}

/// An equipment item's full payload (items minus the weapon-specific fields).
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct EquipmentObjectDependencies {
    pub common: ObjectDependencies,
    pub item: ItemDependencies,
}

/// A projectile's full payload.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ProjectileObjectDependencies {
    pub common: ObjectDependencies,
    pub projectile: ProjectileDependencies,
}
