//! Small hand built SpirV modules.
//!
//! Used by the tests and benchmarks of this workspace, and handy for checking that a host's pipeline works at all
//! before feeding it real shaders.

use rspirv::{
    binary::Assemble,
    dr::{Builder, Error},
    spirv::{
        AddressingModel, Capability, Dim, ExecutionMode, ExecutionModel, FunctionControl,
        ImageFormat, MemoryModel, StorageClass,
    },
};

fn shader_builder() -> Builder {
    let mut builder = Builder::new();
    builder.set_version(1, 0);
    builder.capability(Capability::Shader);
    builder.memory_model(AddressingModel::Logical, MemoryModel::GLSL450);
    builder
}

///A module with one entry point of `model` named `entry`, whose body only returns.
///
/// Fragment and geometry entry points get the execution modes they need.
pub fn empty_entry_point(model: ExecutionModel, entry: &str) -> Result<Vec<u32>, Error> {
    let mut builder = shader_builder();
    if model == ExecutionModel::Geometry {
        builder.capability(Capability::Geometry);
    }

    let void = builder.type_void();
    let function_type = builder.type_function(void, Vec::<u32>::new());
    let function_id =
        builder.begin_function(void, None, FunctionControl::empty(), function_type)?;
    builder.begin_block(None)?;
    builder.ret()?;
    builder.end_function()?;

    builder.entry_point(model, function_id, entry, Vec::<u32>::new());
    match model {
        ExecutionModel::Fragment => {
            builder.execution_mode(function_id, ExecutionMode::OriginUpperLeft, Vec::<u32>::new())
        }
        ExecutionModel::Geometry => {
            builder.execution_mode(function_id, ExecutionMode::InputPoints, Vec::<u32>::new());
            builder.execution_mode(function_id, ExecutionMode::OutputPoints, Vec::<u32>::new());
            builder.execution_mode(function_id, ExecutionMode::OutputVertices, [1u32]);
            builder.execution_mode(function_id, ExecutionMode::Invocations, [1u32]);
        }
        _ => {}
    }

    Ok(builder.module().assemble())
}

//#[spirv(fragment)]
//fn <entry>() {}
pub fn empty_fragment_shader(entry: &str) -> Result<Vec<u32>, Error> {
    empty_entry_point(ExecutionModel::Fragment, entry)
}

///Fragment shader sampling a texture with a separate sampler, Vulkan GLSL style:
///
/// ```glsl
/// uniform texture2D tex;
/// uniform sampler smp;
/// in vec2 uv;
/// out vec4 color;
/// void MainPs() { color = texture(sampler2D(tex, smp), uv); }
/// ```
pub fn separate_image_sampler_shader() -> Result<Vec<u32>, Error> {
    let mut builder = shader_builder();

    let void = builder.type_void();
    let f32_type = builder.type_float(32);
    let vec2_type = builder.type_vector(f32_type, 2);
    let vec4_type = builder.type_vector(f32_type, 4);
    let image_type =
        builder.type_image(f32_type, Dim::Dim2D, 0, 0, 0, 1, ImageFormat::Unknown, None);
    let sampler_type = builder.type_sampler();
    let sampled_image_type = builder.type_sampled_image(image_type);

    let image_ptr = builder.type_pointer(None, StorageClass::UniformConstant, image_type);
    let sampler_ptr = builder.type_pointer(None, StorageClass::UniformConstant, sampler_type);
    let uv_ptr = builder.type_pointer(None, StorageClass::Input, vec2_type);
    let color_ptr = builder.type_pointer(None, StorageClass::Output, vec4_type);

    let tex = builder.variable(image_ptr, None, StorageClass::UniformConstant, None);
    let smp = builder.variable(sampler_ptr, None, StorageClass::UniformConstant, None);
    let uv = builder.variable(uv_ptr, None, StorageClass::Input, None);
    let color = builder.variable(color_ptr, None, StorageClass::Output, None);
    builder.name(tex, "tex");
    builder.name(smp, "smp");
    builder.name(uv, "uv");
    builder.name(color, "color");

    let function_type = builder.type_function(void, Vec::<u32>::new());
    let function_id =
        builder.begin_function(void, None, FunctionControl::empty(), function_type)?;
    builder.begin_block(None)?;
    let image = builder.load(image_type, None, tex, None, std::iter::empty())?;
    let sampler = builder.load(sampler_type, None, smp, None, std::iter::empty())?;
    let coord = builder.load(vec2_type, None, uv, None, std::iter::empty())?;
    let combined = builder.sampled_image(sampled_image_type, None, image, sampler)?;
    let texel = builder.image_sample_implicit_lod(
        vec4_type,
        None,
        combined,
        coord,
        None,
        std::iter::empty(),
    )?;
    builder.store(color, texel, None, std::iter::empty())?;
    builder.ret()?;
    builder.end_function()?;

    builder.entry_point(ExecutionModel::Fragment, function_id, "MainPs", [uv, color]);
    builder.execution_mode(function_id, ExecutionMode::OriginUpperLeft, Vec::<u32>::new());

    Ok(builder.module().assemble())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::ModuleSummary;

    #[test]
    fn fixtures_load_in_rspirv() {
        let geometry = empty_entry_point(ExecutionModel::Geometry, "MainGs").unwrap();
        let summary = ModuleSummary::from_words(&geometry).unwrap();
        assert_eq!(summary.entry_points[0].model, ExecutionModel::Geometry);
        assert!(summary.capabilities.contains(&Capability::Geometry));

        let sampling = separate_image_sampler_shader().unwrap();
        let summary = ModuleSummary::from_words(&sampling).unwrap();
        assert_eq!(summary.entry_points[0].name, "MainPs");
    }
}
