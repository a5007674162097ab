//! # spv-reflect
//!
//! Reads a SpirV file, cross compiles it to HLSL and writes the result (or the compiler's diagnostic) to stdout.
//!
//! ```text
//! spv-reflect [--summary] [--strict] [--shader-model N] <file.spv>
//! ```
//!
//! Exits with `0` if the source was generated, `1` if the compiler failed and `2` on usage or IO errors.

use std::{io::Write, path::PathBuf, process::ExitCode};

use spv_reflector::{
    inspect::ModuleSummary,
    words::{words_from_bytes, WordError},
    HlslOptions, ReflectionSession, ReflectorConfig, SessionError, Strictness,
};
use thiserror::Error;

mod args;

use args::Args;

#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("{0}")]
    Usage(String),
    #[error("Could not read {path:?}: {err}")]
    Io { path: PathBuf, err: std::io::Error },
    #[error("Could not write output: {0}")]
    Output(#[from] std::io::Error),
    #[error(transparent)]
    Words(#[from] WordError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

fn run(args: Args) -> Result<bool, ReflectError> {
    let bytes = std::fs::read(&args.input).map_err(|err| ReflectError::Io {
        path: args.input.clone(),
        err,
    })?;

    let config = ReflectorConfig {
        hlsl: HlslOptions {
            shader_model: args.shader_model,
            ..Default::default()
        },
        strictness: if args.strict {
            Strictness::Strict
        } else {
            Strictness::Guarded
        },
    };

    let words = words_from_bytes(&bytes)?;
    log::info!("Loaded {} words from {:?}", words.len(), args.input);

    let mut session = ReflectionSession::with_config(config);
    session.append_words(&words);

    let mut stdout = std::io::stdout().lock();

    if args.summary {
        match ModuleSummary::from_words(&words) {
            Ok(summary) => writeln!(stdout, "{}", summary)?,
            Err(e) => log::error!("Could not summarise module: {}", e),
        }
    }

    let status = session.generate()?;
    let text = session.text().unwrap_or_default();
    writeln!(stdout, "{}", text)?;

    if !status.is_ok() {
        log::error!("Cross compilation failed with status {:?}", status);
    }
    Ok(status.is_ok())
}

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()
        .unwrap();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n\n{}", e, args::USAGE);
            return ExitCode::from(2);
        }
    };

    let result = run(args);
    if let Err(e) = &result {
        eprintln!("{}", e);
    }
    ExitCode::from(exit_code(&result))
}

///Maps the outcome of [run] to the process exit code.
fn exit_code(result: &Result<bool, ReflectError>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        //strict mode failures are compiler failures, not usage errors
        Err(ReflectError::Session(SessionError::Compile(_))) => 1,
        Err(_) => 2,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use spv_reflector::fixtures;

    use super::*;

    fn args_for(input: PathBuf, strict: bool) -> Args {
        Args {
            input,
            summary: true,
            strict,
            shader_model: 50,
        }
    }

    fn file_with(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn valid_module_exits_with_0() {
        let words = fixtures::empty_fragment_shader("MainPs").unwrap();
        let bytes = words
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect::<Vec<u8>>();
        let file = file_with(&bytes);

        assert_eq!(exit_code(&run(args_for(file.path().to_path_buf(), false))), 0);
        assert_eq!(exit_code(&run(args_for(file.path().to_path_buf(), true))), 0);
    }

    #[test]
    fn garbage_exits_with_1() {
        let file = file_with(b"this is not a SpirV module..");

        let guarded = run(args_for(file.path().to_path_buf(), false));
        assert!(matches!(guarded, Ok(false)));
        assert_eq!(exit_code(&guarded), 1);

        let strict = run(args_for(file.path().to_path_buf(), true));
        assert!(matches!(
            strict,
            Err(ReflectError::Session(SessionError::Compile(_)))
        ));
        assert_eq!(exit_code(&strict), 1);
    }

    #[test]
    fn summary_of_malformed_module() {
        let words: [u32; 9] = [
            0x07230203, 0x0001_0000, 0, 100, 0, 393226, 60, 104, 327980,
        ];
        let bytes = words
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect::<Vec<u8>>();
        let file = file_with(&bytes);

        assert!(run(args_for(file.path().to_path_buf(), false)).is_ok());
    }

    #[test]
    fn unreadable_input_exits_with_2() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.spv");

        let result = run(args_for(missing, false));
        assert!(matches!(result, Err(ReflectError::Io { .. })));
        assert_eq!(exit_code(&result), 2);
    }

    #[test]
    fn unaligned_input_exits_with_2() {
        let file = file_with(&[0x03, 0x02, 0x23]);

        let result = run(args_for(file.path().to_path_buf(), false));
        assert!(matches!(result, Err(ReflectError::Words(_))));
        assert_eq!(exit_code(&result), 2);
    }
}
