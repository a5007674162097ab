//! # SpirV-Reflector.
//!
//! Hands a SpirV module to [SPIRV-Cross](https://github.com/KhronosGroup/SPIRV-Cross) and keeps the generated HLSL
//! around, so that it can be read back byte by byte. That's the whole trick, the heavy lifting (parsing, reflection and code generation)
//! happens in the cross compiler.
//!
//! It is structured in four parts.
//!
//! - Words: decoding a shader blob into SpirV words, including byte order detection.
//! - Inspect: a cheap [rspirv](https://github.com/gfx-rs/rspirv) based summary of a module, mostly for logging.
//! - Backend: the [CrossCompiler] seam and the SPIRV-Cross implementation.
//! - Session: the [ReflectionSession] that buffers words, runs the backend and stores the result.
//!
//! Failures of the cross compiler are not returned as errors by default. Instead they are folded into the result text and tagged
//! with a [ReflectStatus], since the C interface built on top of this crate has no other channel for them.

pub use rspirv;

mod backend;
mod config;
pub mod fixtures;
mod guard;
pub mod inspect;
mod session;
pub mod words;

pub use backend::{CompileFailure, CrossCompiler, SpirvCrossHlsl};
pub use config::{HlslOptions, ReflectorConfig, Strictness};
pub use session::{ReflectStatus, ReflectionSession, SessionError};
