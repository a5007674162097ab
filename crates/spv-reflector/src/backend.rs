//! # Cross compiler backend
//!
//! The [CrossCompiler] trait is the seam between the session and the library doing the actual work. The session only
//! ever sees a string or a [CompileFailure].
//!
//! The default implementation drives SPIRV-Cross' HLSL backend through [spirv-cross2](https://crates.io/crates/spirv-cross2).

use spirv_cross2::{
    compile::hlsl::{CompilerOptions, HlslShaderModel},
    targets::Hlsl,
    Compiler, Module,
};
use thiserror::Error;

use crate::HlslOptions;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileFailure {
    ///Code generation failed after the module was parsed. `partial_source` holds whatever the compiler emitted
    /// before failing, which might be nothing.
    #[error("{diagnostic}")]
    Structured {
        partial_source: String,
        diagnostic: String,
    },
    ///Anything else: parsing, option setup, or a panic inside the compiler.
    #[error("{diagnostic}")]
    Unstructured { diagnostic: String },
}

impl CompileFailure {
    pub fn unstructured(diagnostic: impl ToString) -> Self {
        CompileFailure::Unstructured {
            diagnostic: diagnostic.to_string(),
        }
    }

    pub fn diagnostic(&self) -> &str {
        match self {
            CompileFailure::Structured { diagnostic, .. } => diagnostic,
            CompileFailure::Unstructured { diagnostic } => diagnostic,
        }
    }
}

///Something that turns SpirV words into HLSL source.
///
/// The words are moved into the call. Implementations are free to consume them.
pub trait CrossCompiler {
    fn cross_compile(&self, words: Vec<u32>, options: &HlslOptions)
        -> Result<String, CompileFailure>;
}

impl<C: CrossCompiler + ?Sized> CrossCompiler for Box<C> {
    fn cross_compile(
        &self,
        words: Vec<u32>,
        options: &HlslOptions,
    ) -> Result<String, CompileFailure> {
        (**self).cross_compile(words, options)
    }
}

///SPIRV-Cross based HLSL backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpirvCrossHlsl;

impl SpirvCrossHlsl {
    fn shader_model(model: u32) -> Result<HlslShaderModel, CompileFailure> {
        let sm = match model {
            30 => HlslShaderModel::ShaderModel3_0,
            40 => HlslShaderModel::ShaderModel4_0,
            50 => HlslShaderModel::ShaderModel5_0,
            51 => HlslShaderModel::ShaderModel5_1,
            60 => HlslShaderModel::ShaderModel6_0,
            other => {
                return Err(CompileFailure::unstructured(format!(
                    "Unsupported HLSL shader model: {}",
                    other
                )))
            }
        };

        Ok(sm)
    }
}

impl CrossCompiler for SpirvCrossHlsl {
    fn cross_compile(
        &self,
        words: Vec<u32>,
        options: &HlslOptions,
    ) -> Result<String, CompileFailure> {
        let shader_model = Self::shader_model(options.shader_model)?;

        let module = Module::from_words(&words);
        let mut compiler = Compiler::<Hlsl>::new(module).map_err(CompileFailure::unstructured)?;

        let mut hlsl_options = CompilerOptions::default();
        hlsl_options.shader_model = shader_model;
        hlsl_options.use_entry_point_name = options.use_entry_point_name;
        hlsl_options.preserve_structured_buffers = options.preserve_structured_buffers;

        //Consumers bind textures and samplers as one resource, so image / sampler pairs are merged first.
        if options.combined_image_samplers {
            let dummy = compiler
                .create_dummy_sampler_for_combined_images()
                .map_err(CompileFailure::unstructured)?;
            if dummy.sampler_id.is_some() {
                log::trace!("Created dummy sampler for combined images");
            }
            compiler
                .build_combined_image_samplers(dummy)
                .map_err(CompileFailure::unstructured)?;
        }

        //SPIRV-Cross' C API does not expose the partial source of a failed compile, so there is nothing to
        // carry over here.
        let artifact =
            compiler
                .compile(&hlsl_options)
                .map_err(|e| CompileFailure::Structured {
                    partial_source: String::new(),
                    diagnostic: e.to_string(),
                })?;

        Ok(artifact.to_string())
    }
}
