//! # Reflection session
//!
//! A session lives in two phases. While *accumulating* it collects SpirV words. [generate](ReflectionSession::generate) then
//! moves those words into the cross compiler and stores the result text. From there on the session is read-only.
//!
//! A session is generated at most once. The words are gone after the first call, regardless of its outcome.

use thiserror::Error;

use crate::{
    guard::catch_panic,
    inspect::ModuleSummary,
    words::{words_from_bytes, WordError},
    CompileFailure, CrossCompiler, ReflectorConfig, SpirvCrossHlsl, Strictness,
};

///Outcome of a [generate](ReflectionSession::generate) call. The discriminants are the status codes of the C interface.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectStatus {
    ///The result is the generated source.
    Ok = 0,
    ///The result is the partial source, a newline and the compiler's diagnostic.
    StructuredFailure = 1,
    ///The result is a diagnostic only.
    UnstructuredFailure = 2,
}

impl ReflectStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        self == ReflectStatus::Ok
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No result available, generate() has not produced one")]
    NotGenerated,
    #[error("generate() was already called on this session")]
    AlreadyGenerated,
    #[error("Index {index} is out of range for a result of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Cross compilation failed: {0}")]
    Compile(#[from] CompileFailure),
}

struct Reflection {
    text: String,
    status: ReflectStatus,
}

impl Reflection {
    fn from_failure(failure: CompileFailure) -> Self {
        match failure {
            CompileFailure::Structured {
                partial_source,
                diagnostic,
            } => Reflection {
                text: format!("{}\n{}", partial_source, diagnostic),
                status: ReflectStatus::StructuredFailure,
            },
            CompileFailure::Unstructured { diagnostic } => Reflection {
                text: diagnostic,
                status: ReflectStatus::UnstructuredFailure,
            },
        }
    }
}

enum Phase {
    Accumulating,
    Generated(Reflection),
    ///Generated in strict mode, and the compiler failed. There is no result.
    Consumed,
}

pub struct ReflectionSession<C = SpirvCrossHlsl> {
    words: Vec<u32>,
    phase: Phase,
    config: ReflectorConfig,
    compiler: C,
}

impl ReflectionSession<SpirvCrossHlsl> {
    ///Creates an empty session using SPIRV-Cross and the default configuration.
    pub fn new() -> Self {
        Self::with_config(ReflectorConfig::default())
    }

    pub fn with_config(config: ReflectorConfig) -> Self {
        Self::with_compiler(SpirvCrossHlsl, config)
    }
}

impl Default for ReflectionSession<SpirvCrossHlsl> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CrossCompiler> ReflectionSession<C> {
    pub fn with_compiler(compiler: C, config: ReflectorConfig) -> Self {
        ReflectionSession {
            words: Vec::new(),
            phase: Phase::Accumulating,
            config,
            compiler,
        }
    }

    pub fn config(&self) -> &ReflectorConfig {
        &self.config
    }

    ///Number of words collected so far. Always 0 after [generate](Self::generate).
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_generated(&self) -> bool {
        !matches!(self.phase, Phase::Accumulating)
    }

    pub fn append_word(&mut self, word: u32) {
        if self.is_generated() {
            log::warn!("Ignoring word 0x{:08x}, session was already generated", word);
            return;
        }
        self.words.push(word);
    }

    pub fn append_words(&mut self, words: &[u32]) {
        if self.is_generated() {
            log::warn!(
                "Ignoring {} words, session was already generated",
                words.len()
            );
            return;
        }
        log::trace!("Appending {} words", words.len());
        self.words.extend_from_slice(words);
    }

    ///Decodes `bytes` (see [words_from_bytes]) and appends the words. Returns the number of words appended.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<usize, WordError> {
        let words = words_from_bytes(bytes)?;
        if self.is_generated() {
            log::warn!(
                "Ignoring {} words, session was already generated",
                words.len()
            );
            return Ok(0);
        }
        self.words.extend_from_slice(&words);
        Ok(words.len())
    }

    ///Cross compiles the collected words and stores the result.
    ///
    /// In [Strictness::Guarded] mode (the default) compiler failures become the result text and are reported through the
    /// returned status only. In [Strictness::Strict] mode they are returned as [SessionError::Compile] and no result is
    /// stored.
    ///
    /// Fails with [SessionError::AlreadyGenerated] on every call after the first. The stored result is kept.
    pub fn generate(&mut self) -> Result<ReflectStatus, SessionError> {
        if self.is_generated() {
            return Err(SessionError::AlreadyGenerated);
        }

        let words = std::mem::take(&mut self.words);
        self.phase = Phase::Consumed;

        if log::log_enabled!(log::Level::Debug) {
            match ModuleSummary::from_words(&words) {
                Ok(summary) => log::debug!("Cross compiling module:\n{}", summary),
                Err(e) => log::debug!(
                    "Cross compiling {} words, module summary unavailable: {}",
                    words.len(),
                    e
                ),
            }
            log::debug!("HLSL options: {:?}", self.config.hlsl);
        }

        let reflection = match (self.run_compiler(words), self.config.strictness) {
            (Ok(text), _) => Reflection {
                text,
                status: ReflectStatus::Ok,
            },
            (Err(failure), Strictness::Guarded) => {
                log::warn!("Cross compilation failed: {}", failure);
                Reflection::from_failure(failure)
            }
            (Err(failure), Strictness::Strict) => return Err(SessionError::Compile(failure)),
        };

        let status = reflection.status;
        log::debug!(
            "Generated {} bytes with status {:?}",
            reflection.text.len(),
            status
        );
        self.phase = Phase::Generated(reflection);
        Ok(status)
    }

    fn run_compiler(&self, words: Vec<u32>) -> Result<String, CompileFailure> {
        let compiler = &self.compiler;
        let options = &self.config.hlsl;
        match catch_panic(|| compiler.cross_compile(words, options)) {
            Ok(result) => result,
            Err(msg) => {
                log::error!("Cross compiler panicked: {}", msg);
                Err(CompileFailure::Unstructured { diagnostic: msg })
            }
        }
    }

    fn reflection(&self) -> Result<&Reflection, SessionError> {
        match &self.phase {
            Phase::Generated(r) => Ok(r),
            _ => Err(SessionError::NotGenerated),
        }
    }

    pub fn status(&self) -> Option<ReflectStatus> {
        self.reflection().ok().map(|r| r.status)
    }

    pub fn text(&self) -> Option<&str> {
        self.reflection().ok().map(|r| r.text.as_str())
    }

    ///Byte length of the result text.
    pub fn result_len(&self) -> Result<usize, SessionError> {
        self.reflection().map(|r| r.text.len())
    }

    ///Byte at `index` of the result text.
    pub fn char_at(&self, index: usize) -> Result<u8, SessionError> {
        let reflection = self.reflection()?;
        reflection
            .text
            .as_bytes()
            .get(index)
            .copied()
            .ok_or(SessionError::IndexOutOfRange {
                index,
                len: reflection.text.len(),
            })
    }
}
