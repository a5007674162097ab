//! Configuration of a [ReflectionSession](crate::ReflectionSession).
//!
//! The C interface always uses [ReflectorConfig::default]. Rust callers may change the HLSL options or ask for strict
//! error handling.

///Options handed to the HLSL cross compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HlslOptions {
    ///Target shader model, encoded as `major * 10 + minor`. `50` is shader model 5.0.
    pub shader_model: u32,
    ///Keep the entry point's SpirV name instead of renaming it to `main`.
    pub use_entry_point_name: bool,
    ///Emit `StructuredBuffer<T>` instead of flattening into `ByteAddressBuffer`.
    pub preserve_structured_buffers: bool,
    ///Build a dummy sampler for images sampled without one, then merge all image / sampler pairs into
    /// combined bindings.
    pub combined_image_samplers: bool,
}

impl Default for HlslOptions {
    fn default() -> Self {
        HlslOptions {
            shader_model: 50,
            use_entry_point_name: true,
            preserve_structured_buffers: true,
            combined_image_samplers: true,
        }
    }
}

///How [generate](crate::ReflectionSession::generate) treats cross compiler failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    ///Failures are folded into the result text. The status tells them apart.
    #[default]
    Guarded,
    ///Failures are returned as [SessionError::Compile](crate::SessionError::Compile). No result is stored.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectorConfig {
    pub hlsl: HlslOptions,
    pub strictness: Strictness,
}
