use std::path::PathBuf;

use crate::ReflectError;

pub const USAGE: &str = "usage: spv-reflect [--summary] [--strict] [--shader-model N] <file.spv>";

#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub input: PathBuf,
    ///Print an rspirv summary of the module before the HLSL.
    pub summary: bool,
    ///Fail instead of printing the diagnostic as result.
    pub strict: bool,
    pub shader_model: u32,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ReflectError> {
        let mut input = None;
        let mut summary = false;
        let mut strict = false;
        let mut shader_model = 50;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--summary" => summary = true,
                "--strict" => strict = true,
                "--shader-model" => {
                    let value = args.next().ok_or_else(|| {
                        ReflectError::Usage(String::from("--shader-model needs a value"))
                    })?;
                    shader_model = value.parse().map_err(|_| {
                        ReflectError::Usage(format!("Invalid shader model \"{}\"", value))
                    })?;
                }
                flag if flag.starts_with("--") => {
                    return Err(ReflectError::Usage(format!("Unknown flag \"{}\"", flag)))
                }
                _ => {
                    if input.replace(PathBuf::from(&arg)).is_some() {
                        return Err(ReflectError::Usage(String::from(
                            "Only one input file is supported",
                        )));
                    }
                }
            }
        }

        let input =
            input.ok_or_else(|| ReflectError::Usage(String::from("No input file given")))?;

        Ok(Args {
            input,
            summary,
            strict,
            shader_model,
        })
    }
}
