//! Cheap inspection of a SpirV module, without cross compiling it.
//!
//! Uses [rspirv](https://github.com/gfx-rs/rspirv) to load the module and collects the few things that are interesting when
//! something goes wrong later on: version, generator, capabilities and entry points.
//!
//! rspirv's decoder panics on some malformed modules. Those panics are caught and reported as
//! [InspectError::DecoderPanic].

use std::fmt::Display;

use rspirv::{
    dr::Operand,
    spirv::{Capability, ExecutionModel},
};
use thiserror::Error;

use crate::guard::catch_panic;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("Could not parse spirv binary code: {0}")]
    SpirVParseError(#[from] rspirv::binary::ParseState),
    #[error("SpirV module has no header")]
    NoHeader,
    #[error("rspirv panicked while decoding: {0}")]
    DecoderPanic(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointInfo {
    pub name: String,
    pub model: ExecutionModel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    ///(major, minor) SpirV version
    pub version: (u8, u8),
    ///Generator magic number. The upper 16 bits identify the tool.
    pub generator: u32,
    pub bound: u32,
    pub capabilities: Vec<Capability>,
    pub entry_points: Vec<EntryPointInfo>,
}

impl ModuleSummary {
    pub fn from_words(words: &[u32]) -> Result<Self, InspectError> {
        let module =
            catch_panic(|| rspirv::dr::load_words(words)).map_err(InspectError::DecoderPanic)??;
        let header = module.header.as_ref().ok_or(InspectError::NoHeader)?;

        let capabilities = module
            .capabilities
            .iter()
            .filter_map(|inst| match inst.operands.first() {
                Some(Operand::Capability(cap)) => Some(*cap),
                _ => None,
            })
            .collect();

        //OpEntryPoint <model> <function> <name> <interface...>
        let entry_points = module
            .entry_points
            .iter()
            .filter_map(|inst| match (inst.operands.first(), inst.operands.get(2)) {
                (Some(Operand::ExecutionModel(model)), Some(Operand::LiteralString(name))) => {
                    Some(EntryPointInfo {
                        name: name.clone(),
                        model: *model,
                    })
                }
                _ => None,
            })
            .collect();

        Ok(ModuleSummary {
            version: header.version(),
            generator: header.generator,
            bound: header.bound,
            capabilities,
            entry_points,
        })
    }
}

impl Display for ModuleSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "SpirV {}.{}, generator 0x{:08x}, bound {}",
            self.version.0, self.version.1, self.generator, self.bound
        )?;
        writeln!(f, "capabilities: {:?}", self.capabilities)?;
        for ep in &self.entry_points {
            writeln!(f, "entry point \"{}\" ({:?})", ep.name, ep.model)?;
        }
        Ok(())
    }
}
