// SPDX-License-Identifier: GPL-3.0-or-later

//! The graph-walking class-inference engine. One [`Pass`] per call to
//! [`deprotect`]; it owns the buffer, the visited set, and the tag-index
//! view for the duration of the walk and is dropped at the end, freeing
//! everything RAII-style.

use tracing::{debug, trace};

use crate::address::{read_array, read_struct, translate_bsp, translate_main};
use crate::classes;
use crate::header::{IndexHeader, MapHeader};
use crate::payload::bsp::{BspCollisionMaterial, BspDependencies, BspLightmap, BspLightmapMaterial};
use crate::payload::decal::DecalDependencies;
use crate::payload::effect::{EffectDependencies, EffectEvent, EffectParticle, EffectPart};
use crate::payload::font::FontDependencies;
use crate::payload::foot_impact::{FootImpactDependencies, FootImpactMaterial};
use crate::payload::globals::{
    GlobalsCameraTrack, GlobalsDependencies, GlobalsGrenade, GlobalsInterfaceBitmaps, GlobalsMultiplayerInformation,
    GlobalsPlayerInformation, GlobalsPowerup, GlobalsWeapon,
};
use crate::payload::grenade_hud::GrenadeHudDependencies;
use crate::payload::hud_digits::HudDigitsDependencies;
use crate::payload::hud_globals::HudGlobalsDependencies;
use crate::payload::item_collection::{ItemCollectionDependencies, ItemCollectionPermutation};
use crate::payload::model::{ModelDependencies, ModelShaderEntry};
use crate::payload::object::{
    BipedObjectDependencies, EquipmentObjectDependencies, ObjectDependencies, ObjectResource,
    ProjectileObjectDependencies, VehicleObjectDependencies, WeaponObjectDependencies, OBJECT_RESOURCE_BITMAP,
};
use crate::payload::scenario::{ScenarioBspReference, ScenarioDependencies};
use crate::payload::shader::{
    FullChicagoExtendedShader, FullChicagoShader, FullEnvironmentShader, FullGlassShader, FullMeterShader,
    FullModelShader, FullPlasmaShader, FullTransparentGenericShader, FullWaterShader, ShaderHeader,
};
use crate::payload::sky::SkyDependencies;
use crate::payload::unit_hud::{UnitHudAuxiliaryMeter, UnitHudDependencies};
use crate::payload::weapon_hud::{
    WeaponHudCrosshair, WeaponHudDependencies, WeaponHudOverlay, WeaponHudScreenEffect, WeaponHudStaticElement,
};
use crate::payload::{Dependency, MultitextureOverlay, Reflexive};
use crate::tag_index::{TagId, TagIndex, TagTableEntry};

/// One deprotection pass over a single buffer. Created fresh by [`deprotect`]
/// and dropped at the end of the call; nothing here outlives one `deprotect`.
struct Pass {
    buffer: Vec<u8>,
    table_offset: usize,
    tag_count: u32,
    main_magic: u32,
    visited: Vec<bool>,
}

impl Pass {
    fn index(&mut self) -> TagIndex<'_> {
        TagIndex::new(&mut self.buffer, self.table_offset, self.tag_count)
    }

    fn translate_main(&self, pointer: u32) -> Option<usize> {
        translate_main(pointer, self.main_magic, self.buffer.len()).ok()
    }

    fn read_main_array<T>(&self, reflexive: Reflexive) -> Option<Vec<T>>
    where
        T: for<'a> binrw::BinRead<Args<'a> = ()>,
    {
        read_array(&self.buffer, self.translate_main(reflexive.offset)?, reflexive.count)
    }

    fn read_bsp_array<T>(&self, reflexive: Reflexive, bsp_magic: u32, file_offset: u32) -> Option<Vec<T>>
    where
        T: for<'a> binrw::BinRead<Args<'a> = ()>,
    {
        if reflexive.count == 0 {
            return Some(Vec::new());
        }
        let offset = translate_bsp(reflexive.offset, bsp_magic, file_offset, self.buffer.len()).ok()?;
        read_array(&self.buffer, offset, reflexive.count)
    }

    /// First two guards: null/out-of-range, then already-visited. Returns the
    /// tag's table entry for further use (its payload offset) when neither
    /// guard trips.
    fn guard(&mut self, id: TagId) -> Option<(usize, TagTableEntry)> {
        if id.is_null(self.tag_count) {
            return None;
        }
        let idx = id.table_index as usize;
        if self.visited[idx] {
            trace!(index = idx, "edge already visited");
            return None;
        }
        let entry = self.index().entry(id.table_index)?;
        Some((idx, entry))
    }

    /// Third guard's consequence: write the class and mark visited, in that
    /// order, before the caller recurses into the referent's payload. This
    /// ordering is what makes self-referential edges terminate.
    fn commit(&mut self, idx: usize, id: TagId, class: u32) {
        if self.index().set_class(id, class).is_err() {
            trace!(index = idx, "class write out of range");
        }
        self.visited[idx] = true;
    }

    /// A reference whose class is fixed by the field itself. Writes the
    /// class but never reads the referent's payload — used for classes this
    /// engine has no reader for (`phys`) and for edges the source never
    /// recurses into further.
    fn write_known(&mut self, id: TagId, class: u32) {
        if let Some((idx, _)) = self.guard(id) {
            self.commit(idx, id, class);
        }
    }

    fn write_known_all(&mut self, ids: impl IntoIterator<Item = TagId>, class: u32) {
        for id in ids {
            self.write_known(id, class);
        }
    }

    /// Each multitexture overlay entry is three stacked bitmaps.
    fn write_multitexture_overlay(&mut self, entries: impl IntoIterator<Item = MultitextureOverlay>) {
        for entry in entries {
            self.write_known_all([entry.map_primary, entry.map_secondary, entry.map_tertiary], classes::BITM);
        }
    }

    /// Dispatches a carried-class dependency field per §4.5: object-family
    /// classes re-enter the object rule, `effe` re-enters the effect rule,
    /// everything else is a terminal write.
    fn walk_dependency(&mut self, dep: Dependency) {
        let Some(class) = dep.carried_class() else {
            return;
        };
        if classes::OBJECT_FAMILY_CLASSES.contains(&class) {
            self.walk_object(dep.identifier, class);
        } else if class == classes::EFFE {
            self.walk_effect(dep.identifier);
        } else {
            self.write_known(dep.identifier, class);
        }
    }

    // ---- scenario (root) ----

    fn walk_scenario(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::SCNR);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<ScenarioDependencies>(&self.buffer, offset) else {
            return;
        };

        if let Some(scenery) = self.read_main_array::<TagId>(deps.scenery_palette) {
            for id in scenery {
                self.walk_object(id, classes::SCEN);
            }
        }
        if let Some(bipeds) = self.read_main_array::<TagId>(deps.biped_palette) {
            for id in bipeds {
                self.walk_object(id, classes::BIPD);
            }
        }
        if let Some(equip) = self.read_main_array::<TagId>(deps.equip_palette) {
            for id in equip {
                self.walk_object(id, classes::EQIP);
            }
        }
        if let Some(vehicles) = self.read_main_array::<TagId>(deps.vehicle_palette) {
            for id in vehicles {
                self.walk_object(id, classes::VEHI);
            }
        }
        if let Some(weapons) = self.read_main_array::<TagId>(deps.weapon_palette) {
            for id in weapons {
                self.walk_object(id, classes::WEAP);
            }
        }
        if let Some(machines) = self.read_main_array::<TagId>(deps.machine_palette) {
            for id in machines {
                self.walk_object(id, classes::MACH);
            }
        }
        if let Some(controls) = self.read_main_array::<TagId>(deps.control_palette) {
            for id in controls {
                self.walk_object(id, classes::CTRL);
            }
        }
        if let Some(lights) = self.read_main_array::<TagId>(deps.light_fixture_palette) {
            for id in lights {
                self.walk_object(id, classes::LIFI);
            }
        }
        if let Some(sound_scenery) = self.read_main_array::<TagId>(deps.sound_scenery_palette) {
            for id in sound_scenery {
                self.walk_object(id, classes::SSCE);
            }
        }
        if let Some(slots) = self.read_main_array::<[TagId; 6]>(deps.starting_equipment) {
            for slot in slots {
                self.write_known_all(slot, classes::EQIP);
            }
        }
        if let Some(skies) = self.read_main_array::<TagId>(deps.skies) {
            for id in skies {
                self.walk_sky(id);
            }
        }
        if let Some(bsps) = self.read_main_array::<ScenarioBspReference>(deps.bsps) {
            for bsp_ref in bsps {
                self.walk_bsp(&bsp_ref);
            }
        }
        if let Some(decals) = self.read_main_array::<TagId>(deps.decal_palette) {
            for id in decals {
                self.walk_decal(id);
            }
        }
        if let Some(item_collections) = self.read_main_array::<TagId>(deps.netgame_item_collections) {
            for id in item_collections {
                self.walk_item_collection(id);
            }
        }
    }

    // ---- objects ----

    fn walk_object(&mut self, id: TagId, hint_class: u32) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(common) = read_struct::<ObjectDependencies>(&self.buffer, offset) else {
            return;
        };
        let concrete = if hint_class == classes::OBJE {
            match common.concrete_class() {
                Some(c) => c,
                None => {
                    debug!(object_type = common.object_type, "object discriminant out of range");
                    return;
                }
            }
        } else {
            hint_class
        };
        self.commit(idx, id, concrete);
        self.walk_object_common(&common);

        match concrete {
            classes::BIPD => {
                if let Some(full) = read_struct::<BipedObjectDependencies>(&self.buffer, offset) {
                    self.walk_unit(&full.unit);
                    self.walk_foot_impact(full.biped.material_effects);
                }
            }
            classes::VEHI => {
                if let Some(full) = read_struct::<VehicleObjectDependencies>(&self.buffer, offset) {
                    self.walk_unit(&full.unit);
                    self.walk_dependency(full.vehicle.effect);
                    self.walk_foot_impact(full.vehicle.material_effects);
                    self.write_known(full.vehicle.crash_sound, classes::SND);
                    self.write_known(full.vehicle.suspension_sound, classes::SND);
                }
            }
            classes::WEAP => {
                if let Some(full) = read_struct::<WeaponObjectDependencies>(&self.buffer, offset) {
                    self.walk_item(&full.item);
                    self.walk_weapon_extra(&full.weapon);
                }
            }
            classes::EQIP => {
                if let Some(full) = read_struct::<EquipmentObjectDependencies>(&self.buffer, offset) {
                    self.walk_item(&full.item);
                }
            }
            classes::PROJ => {
                if let Some(full) = read_struct::<ProjectileObjectDependencies>(&self.buffer, offset) {
                    // The source walks `super_detonation` twice; preserved here
                    // as a harmless no-op re-visit via the visited set.
                    self.walk_dependency(full.projectile.super_detonation);
                    self.walk_dependency(full.projectile.super_detonation);
                    self.write_known(full.projectile.attached_damage, classes::JPT);
                    self.write_known(full.projectile.impact_damage, classes::JPT);
                    if let Some(responses) = self.read_main_array::<crate::payload::object::ProjectileMaterialResponse>(
                        full.projectile.material_response,
                    ) {
                        for response in responses {
                            self.walk_dependency(response.default_result);
                            self.walk_dependency(response.detonation_effect);
                            self.walk_dependency(response.potential_result);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn walk_object_common(&mut self, common: &ObjectDependencies) {
        self.walk_model(common.model);
        self.walk_animation(common.animation);
        self.walk_collision(common.collision);
        self.write_known(common.physics, classes::PHYS);
        self.walk_shader(common.shader);

        if let Some(widgets) = self.read_main_array::<Dependency>(common.widgets) {
            for dep in widgets {
                self.walk_dependency(dep);
            }
        }
        if let Some(attachments) = self.read_main_array::<Dependency>(common.attachments) {
            for dep in attachments {
                self.walk_dependency(dep);
            }
        }
        if let Some(resources) = self.read_main_array::<ObjectResource>(common.resources) {
            for resource in resources {
                let class = if resource.kind == OBJECT_RESOURCE_BITMAP {
                    classes::BITM
                } else {
                    classes::SND
                };
                self.write_known(resource.name, class);
            }
        }
    }

    fn walk_item(&mut self, item: &crate::payload::object::ItemDependencies) {
        self.walk_foot_impact(item.material_effects);
        self.write_known(item.collision_sound, classes::SND);
        self.walk_dependency(item.detonating_effect);
        self.walk_dependency(item.detonation_effect);
    }

    fn walk_unit(&mut self, unit: &crate::payload::object::UnitDependencies) {
        if let Some(weapons) = self.read_main_array::<crate::payload::object::UnitWeapon>(unit.weapons) {
            for weapon in weapons {
                self.walk_object(weapon.weapon, classes::WEAP);
            }
        }
        self.walk_dependency(unit.integrated_light);
        self.write_known(unit.melee_damage, classes::JPT);
        self.write_known(unit.spawned_actor, classes::ACTV);
        if let Some(tracks) = self.read_main_array::<crate::payload::object::UnitCameraTrack>(unit.camera_track) {
            for track in tracks {
                self.write_known(track.camera_track, classes::TRAK);
            }
        }
        if let Some(seats) = self.read_main_array::<crate::payload::object::UnitSeat>(unit.seats) {
            for seat in seats {
                if let Some(tracks) = self.read_main_array::<crate::payload::object::UnitCameraTrack>(seat.camera_tracks) {
                    for track in tracks {
                        self.write_known(track.camera_track, classes::TRAK);
                    }
                }
                if let Some(huds) =
                    self.read_main_array::<crate::payload::object::UnitSeatHudInterface>(seat.hud_interfaces)
                {
                    for hud in huds {
                        self.walk_unit_hud(hud.hud);
                    }
                }
            }
        }
        if let Some(huds) = self.read_main_array::<crate::payload::object::UnitHudEntry>(unit.unit_hud) {
            for hud in huds {
                self.walk_unit_hud(hud.hud);
            }
        }
    }

    fn walk_weapon_extra(&mut self, weapon: &crate::payload::object::WeaponDependencies) {
        self.walk_model(weapon.fp_model);
        self.walk_animation(weapon.fp_animation);
        if let Some(triggers) = self.read_main_array::<crate::payload::object::WeaponTrigger>(weapon.triggers) {
            for trigger in triggers {
                self.walk_object(trigger.projectile, classes::PROJ);
                self.walk_dependency(trigger.charging_effect);
                if let Some(firing) = self
                    .read_main_array::<crate::payload::object::WeaponTriggerFiringEffect>(trigger.firing_effect)
                {
                    for effect in firing {
                        self.walk_dependency(effect.empty_effect);
                        self.walk_dependency(effect.firing_effect);
                        self.walk_dependency(effect.misfire_effect);
                        self.write_known(effect.misfire_damage, classes::JPT);
                        self.write_known(effect.empty_damage, classes::JPT);
                        self.write_known(effect.firing_damage, classes::JPT);
                    }
                }
            }
        }
        if let Some(magazines) = self.read_main_array::<crate::payload::object::WeaponMagazine>(weapon.magazines) {
            for magazine in magazines {
                self.walk_dependency(magazine.chambering_effect);
                self.walk_dependency(magazine.reloading_effect);
                if let Some(equipment) = self
                    .read_main_array::<crate::payload::object::WeaponMagazineEquipment>(magazine.magazine_equipment)
                {
                    for slot in equipment {
                        self.walk_object(slot.equipment, classes::EQIP);
                    }
                }
            }
        }
        self.walk_weapon_hud(weapon.hud);
        self.walk_dependency(weapon.detonation_effect);
        self.walk_dependency(weapon.light_off_effect);
        self.walk_dependency(weapon.light_on_effect);
        self.walk_dependency(weapon.overheated_effect);
        self.walk_dependency(weapon.ready_effect);
        self.write_known(weapon.melee_damage, classes::JPT);
        self.write_known(weapon.melee_response, classes::JPT);
        self.write_known(weapon.pickup_sound, classes::SND);
        self.write_known(weapon.zoom_in_sound, classes::SND);
        self.write_known(weapon.zoom_out_sound, classes::SND);
    }

    // ---- shader family ----

    fn walk_shader(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(header) = read_struct::<ShaderHeader>(&self.buffer, offset) else {
            return;
        };
        let Some(concrete) = header.concrete_class() else {
            debug!(shader_type = header.shader_type, "shader discriminant out of range");
            return;
        };
        self.commit(idx, id, concrete);
        if concrete == classes::SHDR {
            return;
        }

        match concrete {
            classes::SENV => {
                if let Some(full) = read_struct::<FullEnvironmentShader>(&self.buffer, offset) {
                    let d = full.deps;
                    self.write_known_all(
                        [
                            d.base_map,
                            d.primary_detail_map,
                            d.secondary_detail_map,
                            d.micro_detail_map,
                            d.bump_map,
                            d.reflection_cube_map,
                        ],
                        classes::BITM,
                    );
                    self.write_known(d.lens_flare, classes::LENS);
                }
            }
            classes::SOSO => {
                if let Some(full) = read_struct::<FullModelShader>(&self.buffer, offset) {
                    let d = full.deps;
                    self.write_known_all(
                        [d.base_map, d.multipurpose_map, d.detail_map, d.reflection_cube_map],
                        classes::BITM,
                    );
                }
            }
            classes::SOTR => {
                if let Some(full) = read_struct::<FullTransparentGenericShader>(&self.buffer, offset) {
                    self.walk_shader_layers(full.deps.layers);
                    if let Some(maps) =
                        self.read_main_array::<crate::payload::shader::TransparentGenericMap>(full.deps.maps)
                    {
                        self.write_known_all(maps.into_iter().map(|m| m.map), classes::BITM);
                    }
                    self.write_known(full.deps.lens_flare, classes::LENS);
                }
            }
            classes::SCHI => {
                if let Some(full) = read_struct::<FullChicagoShader>(&self.buffer, offset) {
                    self.walk_shader_layers(full.deps.layers);
                    if let Some(maps) =
                        self.read_main_array::<crate::payload::shader::TransparentGenericMap>(full.deps.maps)
                    {
                        self.write_known_all(maps.into_iter().map(|m| m.map), classes::BITM);
                    }
                    self.write_known(full.deps.lens_flare, classes::LENS);
                }
            }
            classes::SCEX => {
                if let Some(full) = read_struct::<FullChicagoExtendedShader>(&self.buffer, offset) {
                    self.walk_shader_layers(full.deps.layers);
                    for reflexive in [full.deps.maps_4_stage, full.deps.maps_2_stage] {
                        if let Some(maps) = self.read_main_array::<crate::payload::shader::TransparentGenericMap>(reflexive) {
                            self.write_known_all(maps.into_iter().map(|m| m.map), classes::BITM);
                        }
                    }
                    self.write_known(full.deps.lens_flare, classes::LENS);
                }
            }
            classes::SWAT => {
                if let Some(full) = read_struct::<FullWaterShader>(&self.buffer, offset) {
                    self.write_known_all([full.deps.base_map, full.deps.reflection_map], classes::BITM);
                    if let Some(ripples) = self.read_main_array::<TagId>(full.deps.ripple_maps) {
                        self.write_known_all(ripples, classes::BITM);
                    }
                }
            }
            classes::SGLA => {
                if let Some(full) = read_struct::<FullGlassShader>(&self.buffer, offset) {
                    let d = full.deps;
                    self.write_known_all([d.base_map, d.bump_map, d.diffuse_map, d.reflection_map], classes::BITM);
                }
            }
            classes::SMET => {
                if let Some(full) = read_struct::<FullMeterShader>(&self.buffer, offset) {
                    self.write_known(full.deps.map, classes::BITM);
                }
            }
            classes::SPLA => {
                if let Some(full) = read_struct::<FullPlasmaShader>(&self.buffer, offset) {
                    self.write_known_all(
                        [full.deps.primary_noise_map, full.deps.secondary_noise_map],
                        classes::BITM,
                    );
                }
            }
            _ => {}
        }
    }

    /// Each layer is itself a shader; recursed back into the shader rule
    /// under the normal guard, which also closes the cycle a shader can
    /// form by listing itself as one of its own layers.
    fn walk_shader_layers(&mut self, layers: Reflexive) {
        if let Some(layers) = self.read_main_array::<crate::payload::shader::ShaderLayer>(layers) {
            for layer in layers {
                self.walk_shader(layer.shader);
            }
        }
    }

    fn walk_model(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::MOD2);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<ModelDependencies>(&self.buffer, offset) else {
            return;
        };
        if let Some(shaders) = self.read_main_array::<ModelShaderEntry>(deps.shaders) {
            for shader in shaders {
                self.walk_shader(shader.shader);
            }
        }
    }

    fn walk_animation(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::ANTR);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<crate::payload::animation::AnimationDependencies>(&self.buffer, offset) else {
            return;
        };
        if let Some(sounds) = self.read_main_array::<crate::payload::animation::AnimationSound>(deps.sounds) {
            for sound in sounds {
                self.write_known(sound.sound, classes::SND);
            }
        }
    }

    fn walk_collision(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::COLL);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<crate::payload::collision::CollisionDependencies>(&self.buffer, offset) else {
            return;
        };
        for effect in deps.effects() {
            self.walk_dependency(effect);
        }
        if let Some(regions) = self.read_main_array::<crate::payload::collision::CollisionRegion>(deps.regions) {
            for region in regions {
                self.walk_dependency(region.destroyed_effect);
            }
        }
    }

    fn walk_effect(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::EFFE);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<EffectDependencies>(&self.buffer, offset) else {
            return;
        };
        let Some(events) = self.read_main_array::<EffectEvent>(deps.events) else {
            return;
        };
        for event in events {
            if let Some(parts) = self.read_main_array::<EffectPart>(event.parts) {
                for part in parts {
                    self.walk_dependency(part);
                }
            }
            if let Some(particles) = self.read_main_array::<EffectParticle>(event.particles) {
                for particle in particles {
                    self.walk_particle(particle.particle);
                }
            }
        }
    }

    fn walk_particle(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::PART);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<crate::payload::particle::ParticleDependencies>(&self.buffer, offset) else {
            return;
        };
        self.write_known(deps.bitmap, classes::BITM);
        self.write_known(deps.secondary_bitmap, classes::BITM);
        self.write_known(deps.physics, classes::PPHY);
        self.walk_dependency(deps.collision_effect);
        self.walk_dependency(deps.death_effect);
        self.walk_foot_impact(deps.foot_impact);
    }

    fn walk_foot_impact(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::FOOT);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<FootImpactDependencies>(&self.buffer, offset) else {
            return;
        };
        if let Some(materials) = self.read_main_array::<FootImpactMaterial>(deps.materials) {
            for material in materials {
                self.walk_dependency(material.effect);
                self.write_known(material.sound, classes::SND);
            }
        }
    }

    // ---- HUDs, fonts, decals ----

    fn walk_weapon_hud(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::WPHI);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<WeaponHudDependencies>(&self.buffer, offset) else {
            return;
        };
        if let Some(elements) = self.read_main_array::<WeaponHudOverlay>(deps.meter_elements) {
            self.write_known_all(elements.into_iter().map(|e| e.overlay_bitmap), classes::BITM);
        }
        if let Some(elements) = self.read_main_array::<WeaponHudStaticElement>(deps.static_elements) {
            for element in elements {
                self.write_known(element.bitmap, classes::BITM);
                if let Some(overlay) = self.read_main_array::<MultitextureOverlay>(element.multitexture_overlay) {
                    self.write_multitexture_overlay(overlay);
                }
            }
        }
        self.walk_weapon_hud(deps.child_hud);
        if let Some(overlays) = self.read_main_array::<WeaponHudOverlay>(deps.overlays) {
            self.write_known_all(overlays.into_iter().map(|o| o.overlay_bitmap), classes::BITM);
        }
        if let Some(crosshairs) = self.read_main_array::<WeaponHudCrosshair>(deps.crosshairs) {
            self.write_known_all(crosshairs.into_iter().map(|c| c.overlay_bitmap), classes::BITM);
        }
        if let Some(effects) = self.read_main_array::<WeaponHudScreenEffect>(deps.screen_effect) {
            for effect in effects {
                self.write_known(effect.mask_fullscreen, classes::BITM);
                self.write_known(effect.mask_splitscreen, classes::BITM);
            }
        }
    }

    fn walk_unit_hud(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::UNHI);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<UnitHudDependencies>(&self.buffer, offset) else {
            return;
        };
        for overlay in deps.overlay_bitmaps {
            if let Some(entries) = self.read_main_array::<MultitextureOverlay>(overlay) {
                self.write_multitexture_overlay(entries);
            }
        }
        self.write_known_all(deps.static_bitmaps, classes::BITM);
        if let Some(meters) = self.read_main_array::<UnitHudAuxiliaryMeter>(deps.auxiliary_meters) {
            for meter in meters {
                self.write_known(meter.interface_bitmap, classes::BITM);
                self.write_known(meter.meter_bitmap, classes::BITM);
            }
        }
        if let Some(sounds) = self.read_main_array::<crate::payload::unit_hud::UnitHudWarningSound>(deps.warning_sounds)
        {
            for sound in sounds {
                self.walk_dependency(sound);
            }
        }
    }

    fn walk_grenade_hud(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::GRHI);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<GrenadeHudDependencies>(&self.buffer, offset) else {
            return;
        };
        self.write_known_all(
            [deps.background_interface_bitmap, deps.interface_bitmap, deps.overlay_bitmap],
            classes::BITM,
        );
        for reflexive in [deps.background_overlay, deps.foreground_overlay] {
            if let Some(entries) = self.read_main_array::<MultitextureOverlay>(reflexive) {
                self.write_multitexture_overlay(entries);
            }
        }
    }

    fn walk_font(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::FONT);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<FontDependencies>(&self.buffer, offset) else {
            return;
        };
        for variant in deps.variants() {
            self.walk_font(variant);
        }
    }

    fn walk_decal(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::DECA);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<DecalDependencies>(&self.buffer, offset) else {
            return;
        };
        self.write_known(deps.bitmap, classes::BITM);
        self.walk_decal(deps.next_decal_in_chain);
    }

    fn walk_hud_digits(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::HUD_DIGITS);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        if let Some(deps) = read_struct::<HudDigitsDependencies>(&self.buffer, offset) {
            self.write_known(deps.digits_bitmap, classes::BITM);
        }
    }

    fn walk_hud_globals(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::HUDG);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<HudGlobalsDependencies>(&self.buffer, offset) else {
            return;
        };
        self.write_known(deps.messaging_bitmap, classes::BITM);
        self.walk_font(deps.messaging_font);
        self.walk_font(deps.button_icon_font);
        self.walk_font(deps.text_font);
        self.write_known(deps.loading_begin_sound, classes::SND);
        self.write_known(deps.loading_end_sound, classes::SND);
        self.write_known(deps.message_text, classes::USTR);
        self.write_known(deps.hud_messages, classes::HMT);
        self.walk_weapon_hud(deps.default_weapon_hud);
    }

    // ---- sky, item collection, BSP ----

    fn walk_sky(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::SKY);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<SkyDependencies>(&self.buffer, offset) else {
            return;
        };
        self.walk_model(deps.model);
        self.walk_animation(deps.animation);
        self.write_known(deps.fog, classes::FOG);
        if let Some(flares) = self.read_main_array::<crate::payload::sky::SkyLensFlare>(deps.lens_flares) {
            for flare in flares {
                self.walk_dependency(flare);
            }
        }
    }

    fn walk_item_collection(&mut self, id: TagId) {
        let Some((idx, entry)) = self.guard(id) else {
            return;
        };
        self.commit(idx, id, classes::ITMC);
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<ItemCollectionDependencies>(&self.buffer, offset) else {
            return;
        };
        if let Some(permutations) = self.read_main_array::<ItemCollectionPermutation>(deps.permutations) {
            for permutation in permutations {
                self.walk_dependency(permutation);
            }
        }
    }

    fn walk_bsp(&mut self, bsp_ref: &ScenarioBspReference) {
        let Some((idx, _)) = self.guard(bsp_ref.bsp) else {
            return;
        };
        self.commit(idx, bsp_ref.bsp, classes::SBSP);

        let base = bsp_ref.file_offset as usize;
        if base >= self.buffer.len() {
            trace!(base, "bsp file offset out of range");
            return;
        }
        let Some(deps) = read_struct::<BspDependencies>(&self.buffer, base) else {
            return;
        };
        if let Some(materials) =
            self.read_bsp_array::<BspCollisionMaterial>(deps.collision_materials, bsp_ref.bsp_magic, bsp_ref.file_offset)
        {
            for material in materials {
                self.walk_dependency(material);
            }
        }
        if let Some(lightmaps) =
            self.read_bsp_array::<BspLightmap>(deps.lightmaps, bsp_ref.bsp_magic, bsp_ref.file_offset)
        {
            for lightmap in lightmaps {
                if let Some(materials) = self.read_bsp_array::<BspLightmapMaterial>(
                    lightmap.materials,
                    bsp_ref.bsp_magic,
                    bsp_ref.file_offset,
                ) {
                    for material in materials {
                        self.walk_dependency(material);
                    }
                }
            }
        }
    }

    // ---- globals (reached only by name, see `deprotect`) ----

    fn walk_globals(&mut self, id: TagId) {
        let Some(entry) = self.index().entry(id.table_index) else {
            return;
        };
        let Some(offset) = self.translate_main(entry.payload_offset) else {
            return;
        };
        let Some(deps) = read_struct::<GlobalsDependencies>(&self.buffer, offset) else {
            return;
        };

        if let Some(weapons) = self.read_main_array::<GlobalsWeapon>(deps.weapons) {
            for weapon in weapons {
                self.walk_dependency(weapon);
            }
        }
        if let Some(powerups) = self.read_main_array::<GlobalsPowerup>(deps.powerups) {
            for powerup in powerups {
                self.walk_dependency(powerup);
            }
        }
        if let Some(grenades) = self.read_main_array::<GlobalsGrenade>(deps.grenades) {
            for grenade in grenades {
                self.walk_object(grenade.equipment, classes::EQIP);
                self.walk_object(grenade.projectile, classes::PROJ);
                self.walk_grenade_hud(grenade.hud);
            }
        }
        if let Some(tracks) = self.read_main_array::<GlobalsCameraTrack>(deps.camera_tracks) {
            self.write_known_all(tracks.into_iter().map(|t| t.track), classes::TRAK);
        }
        if let Some(players) = self.read_main_array::<GlobalsPlayerInformation>(deps.player_information) {
            for player in players {
                self.walk_object(player.unit, classes::BIPD);
                self.walk_model(player.first_person_hands);
            }
        }
        if let Some(multiplayer) = self.read_main_array::<GlobalsMultiplayerInformation>(deps.multiplayer_information) {
            for info in multiplayer {
                self.walk_model(info.flag);
                self.walk_object(info.unit, classes::BIPD);
                self.walk_object(info.vehicle, classes::VEHI);
            }
        }
        if let Some(interfaces) = self.read_main_array::<GlobalsInterfaceBitmaps>(deps.interface_bitmaps) {
            for interface in interfaces {
                let refs = interface.references();
                self.walk_font(refs[0]);
                self.walk_font(refs[1]);
                self.walk_font(refs[2]);
                self.walk_font(refs[3]);
                self.walk_font(refs[4]);
                self.write_known(refs[5], classes::COLO);
                self.write_known(refs[6], classes::COLO);
                self.walk_hud_digits(refs[7]);
                self.walk_hud_globals(refs[8]);
                self.write_known(refs[9], classes::STR_LIST);
                self.write_known(refs[10], classes::USTR);
            }
        }
    }
}

/// Reconstructs `class_primary` for every reachable tag in `buffer`.
///
/// Copies the input (the original is left untouched), locates the header and
/// tag index, seeds the walk at the scenario and — if present — at the
/// `globals\globals` tag, and returns the patched copy. Never panics on
/// malformed input: every unresolvable edge is pruned and logged, never
/// surfaced as an error.
pub fn deprotect(buffer: &[u8]) -> Vec<u8> {
    let mut working = buffer.to_vec();

    let Some(header) = read_struct::<MapHeader>(&working, 0) else {
        debug!("deprotect: unreadable header, returning buffer unchanged");
        return working;
    };
    if !header.is_integrity_valid() {
        debug!("deprotect: invalid integrity markers, returning buffer unchanged");
        return working;
    }
    let index_offset = header.index_offset as usize;
    let Some(index_header) = read_struct::<IndexHeader>(&working, index_offset) else {
        debug!("deprotect: unreadable index header, returning buffer unchanged");
        return working;
    };

    let main_magic = header.main_magic();
    let tag_count = index_header.tag_count;
    let Some(table_offset) = translate_main(index_header.tag_index_pointer, main_magic, working.len()).ok() else {
        debug!("deprotect: tag table pointer out of range, returning buffer unchanged");
        return working;
    };

    let mut visited = vec![false; tag_count as usize];
    if header.is_ce_variant() {
        mark_external_tags(&working, table_offset, tag_count, &mut visited);
    }

    let mut pass = Pass {
        buffer: working,
        table_offset,
        tag_count,
        main_magic,
        visited,
    };

    let globals_id = pass.index().find_globals(main_magic);
    if let Some(id) = globals_id {
        if !id.is_null(tag_count) {
            pass.visited[id.table_index as usize] = true;
        }
    }

    debug!(tag_count, "deprotect: starting scenario walk");
    pass.walk_scenario(index_header.scenario_tag_id);

    if let Some(id) = globals_id {
        debug!("deprotect: walking globals");
        pass.walk_globals(id);
    }

    debug!("deprotect: finished");
    pass.buffer
}

#[cfg(feature = "strict_ce")]
fn mark_external_tags(buffer: &[u8], table_offset: usize, tag_count: u32, visited: &mut [bool]) {
    for i in 0..tag_count as u16 {
        if let Some(entry) = crate::tag_index::read_entry(buffer, table_offset, tag_count, i) {
            if entry.not_in_map {
                visited[i as usize] = true;
            }
        }
    }
}

#[cfg(not(feature = "strict_ce"))]
fn mark_external_tags(_buffer: &[u8], _table_offset: usize, _tag_count: u32, _visited: &mut [bool]) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deprotect_tolerates_garbage_without_panicking() {
        crate::common::pass_random_garbage(200, |buffer| {
            let _ = deprotect(buffer);
        });
    }

    #[test]
    fn deprotect_of_empty_buffer_returns_empty() {
        assert_eq!(deprotect(&[]), Vec::<u8>::new());
    }
}
