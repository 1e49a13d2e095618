// SPDX-License-Identifier: GPL-3.0-or-later

//! The `shdr` payload family. The first byte of the payload selects the
//! concrete subclass via [`crate::classes::SHADER_TYPE_CLASSES`]; subtypes
//! `0..=2` reclassify to the generic `shdr` and carry no further edges worth
//! walking here.

use binrw::binread;

use crate::classes::SHADER_TYPE_CLASSES;
use crate::tag_index::TagId;

use super::Reflexive;

/// Shared header: every shader payload starts with the subtype selector.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ShaderHeader {
    #[br(pad_after = 2)]
    pub shader_type: u16,
}

impl ShaderHeader {
    pub fn concrete_class(&self) -> Option<u32> {
        SHADER_TYPE_CLASSES.get(self.shader_type as usize).copied()
    }
}

/// `senv`: environment shader.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct EnvironmentShaderDependencies {
    pub base_map: TagId,
    pub primary_detail_map: TagId,
    pub secondary_detail_map: TagId,
    pub micro_detail_map: TagId,
    pub bump_map: TagId,
    pub reflection_cube_map: TagId,
    pub lens_flare: TagId,
}

/// `soso`: model shader.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ModelShaderDependencies {
    pub base_map: TagId,
    pub multipurpose_map: TagId,
    pub detail_map: TagId,
    pub reflection_cube_map: TagId,
}

/// A shader layer entry shared by `sotr`/`schi`/`scex`: each layer is
/// itself a shader, recursed back into the shader rule under cycle guard.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ShaderLayer {
    pub shader: TagId,
}

/// `sotr`: transparent-generic shader.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct TransparentGenericShaderDependencies {
    pub layers: Reflexive,
    pub maps: Reflexive,
    pub lens_flare: TagId,
}

/// One `sotr` layer/map entry.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct TransparentGenericMap {
    pub map: TagId,
}

/// `schi`: transparent chicago shader.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ChicagoShaderDependencies {
    pub layers: Reflexive,
    pub maps: Reflexive,
    pub lens_flare: TagId,
}

/// `scex`: transparent chicago-extended shader.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct ChicagoExtendedShaderDependencies {
    pub layers: Reflexive,
    pub lens_flare: TagId,
    pub maps_4_stage: Reflexive,
    pub maps_2_stage: Reflexive,
}

/// `swat`: transparent water shader.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct WaterShaderDependencies {
    pub base_map: TagId,
    pub reflection_map: TagId,
    pub ripple_maps: Reflexive,
}

/// `sgla`: transparent glass shader.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct GlassShaderDependencies {
    pub base_map: TagId,
    pub bump_map: TagId,
    pub diffuse_map: TagId,
    pub reflection_map: TagId,
}

/// `smet`: transparent meter shader.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct MeterShaderDependencies {
    pub map: TagId,
}

/// `spla`: transparent plasma shader.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little)]
pub struct PlasmaShaderDependencies {
    pub primary_noise_map: TagId,
    pub secondary_noise_map: TagId,
}

macro_rules! full_shader {
    ($name:ident, $deps:ty) => {
        /// The header plus subclass-specific fields, read in one pass.
        #[binread]
        #[derive(Debug, Clone, Copy)]
        #[br(little)]
        pub struct $name {
            pub header: ShaderHeader,
            pub deps: $deps,
        }
    };
}

full_shader!(FullEnvironmentShader, EnvironmentShaderDependencies);
full_shader!(FullModelShader, ModelShaderDependencies);
full_shader!(FullTransparentGenericShader, TransparentGenericShaderDependencies);
full_shader!(FullChicagoShader, ChicagoShaderDependencies);
full_shader!(FullChicagoExtendedShader, ChicagoExtendedShaderDependencies);
full_shader!(FullWaterShader, WaterShaderDependencies);
full_shader!(FullGlassShader, GlassShaderDependencies);
full_shader!(FullMeterShader, MeterShaderDependencies);
full_shader!(FullPlasmaShader, PlasmaShaderDependencies);
