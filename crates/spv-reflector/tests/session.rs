use std::cell::RefCell;

use spv_reflector::{
    CompileFailure, CrossCompiler, HlslOptions, ReflectStatus, ReflectionSession,
    ReflectorConfig, SessionError, Strictness,
};

///Backend that returns a fixed outcome and remembers the words it was handed.
struct Scripted {
    outcome: Result<String, CompileFailure>,
    received: RefCell<Option<Vec<u32>>>,
}

impl Scripted {
    fn new(outcome: Result<String, CompileFailure>) -> Self {
        Scripted {
            outcome,
            received: RefCell::new(None),
        }
    }
}

impl CrossCompiler for &Scripted {
    fn cross_compile(
        &self,
        words: Vec<u32>,
        _options: &HlslOptions,
    ) -> Result<String, CompileFailure> {
        *self.received.borrow_mut() = Some(words);
        self.outcome.clone()
    }
}

struct Panicking;

impl CrossCompiler for Panicking {
    fn cross_compile(
        &self,
        _words: Vec<u32>,
        _options: &HlslOptions,
    ) -> Result<String, CompileFailure> {
        panic!("parser exploded");
    }
}

fn read_back<C: CrossCompiler>(session: &ReflectionSession<C>) -> Vec<u8> {
    let len = session.result_len().unwrap();
    (0..len).map(|i| session.char_at(i).unwrap()).collect()
}

#[test]
fn words_reach_compiler_in_order() {
    let backend = Scripted::new(Ok(String::from("float4 main() : SV_Target;")));
    let mut session = ReflectionSession::with_compiler(&backend, ReflectorConfig::default());

    session.append_word(0x07230203);
    session.append_words(&[1, 2, 3]);
    session.append_word(4);
    assert_eq!(session.word_count(), 5);

    assert_eq!(session.generate(), Ok(ReflectStatus::Ok));
    assert_eq!(
        backend.received.borrow().as_deref(),
        Some(&[0x07230203, 1, 2, 3, 4][..])
    );
    assert_eq!(session.word_count(), 0, "words should be consumed");
    assert_eq!(read_back(&session), b"float4 main() : SV_Target;");
    assert_eq!(session.text(), Some("float4 main() : SV_Target;"));
}

#[test]
fn structured_failure_keeps_partial_source() {
    let backend = Scripted::new(Err(CompileFailure::Structured {
        partial_source: String::from("struct VSOut {"),
        diagnostic: String::from("Unsupported builtin"),
    }));
    let mut session = ReflectionSession::with_compiler(&backend, ReflectorConfig::default());
    session.append_word(0x07230203);

    assert_eq!(session.generate(), Ok(ReflectStatus::StructuredFailure));
    assert_eq!(session.text(), Some("struct VSOut {\nUnsupported builtin"));
    assert_eq!(session.status(), Some(ReflectStatus::StructuredFailure));
}

#[test]
fn unstructured_failure_is_diagnostic_only() {
    let backend = Scripted::new(Err(CompileFailure::unstructured("Invalid SPIRV format")));
    let mut session = ReflectionSession::with_compiler(&backend, ReflectorConfig::default());
    session.append_word(0xdeadbeef);

    assert_eq!(session.generate(), Ok(ReflectStatus::UnstructuredFailure));
    assert_eq!(read_back(&session), b"Invalid SPIRV format");
}

#[test]
fn panic_in_compiler_becomes_unstructured() {
    let backend: Box<dyn CrossCompiler> = Box::new(Panicking);
    let mut session = ReflectionSession::with_compiler(backend, ReflectorConfig::default());
    assert_eq!(session.generate(), Ok(ReflectStatus::UnstructuredFailure));
    assert_eq!(session.text(), Some("parser exploded"));
}

#[test]
fn strict_mode_returns_failure() {
    let failure = CompileFailure::Structured {
        partial_source: String::new(),
        diagnostic: String::from("boom"),
    };
    let backend = Scripted::new(Err(failure.clone()));
    let mut session = ReflectionSession::with_compiler(
        &backend,
        ReflectorConfig {
            strictness: Strictness::Strict,
            ..Default::default()
        },
    );

    assert_eq!(session.generate(), Err(SessionError::Compile(failure)));
    assert_eq!(session.result_len(), Err(SessionError::NotGenerated));
    assert_eq!(session.generate(), Err(SessionError::AlreadyGenerated));
}

#[test]
fn strict_mode_success_matches_guarded() {
    let backend = Scripted::new(Ok(String::from("void main() {}")));
    let mut session = ReflectionSession::with_compiler(
        &backend,
        ReflectorConfig {
            strictness: Strictness::Strict,
            ..Default::default()
        },
    );
    assert_eq!(session.generate(), Ok(ReflectStatus::Ok));
    assert_eq!(session.text(), Some("void main() {}"));
}

#[test]
fn queries_before_generate_fail() {
    let backend = Scripted::new(Ok(String::from("x")));
    let session = ReflectionSession::with_compiler(&backend, ReflectorConfig::default());

    assert_eq!(session.result_len(), Err(SessionError::NotGenerated));
    assert_eq!(session.char_at(0), Err(SessionError::NotGenerated));
    assert_eq!(session.status(), None);
    assert_eq!(session.text(), None);
}

#[test]
fn out_of_range_index() {
    let backend = Scripted::new(Ok(String::from("abc")));
    let mut session = ReflectionSession::with_compiler(&backend, ReflectorConfig::default());
    session.generate().unwrap();

    assert_eq!(session.char_at(2), Ok(b'c'));
    assert_eq!(
        session.char_at(3),
        Err(SessionError::IndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(
        session.char_at(usize::MAX),
        Err(SessionError::IndexOutOfRange {
            index: usize::MAX,
            len: 3
        })
    );
}

#[test]
fn second_generate_keeps_first_result() {
    let backend = Scripted::new(Ok(String::from("first")));
    let mut session = ReflectionSession::with_compiler(&backend, ReflectorConfig::default());
    session.append_word(1);

    assert_eq!(session.generate(), Ok(ReflectStatus::Ok));
    *backend.received.borrow_mut() = None;

    assert_eq!(session.generate(), Err(SessionError::AlreadyGenerated));
    assert!(
        backend.received.borrow().is_none(),
        "compiler must not run twice"
    );
    assert_eq!(session.text(), Some("first"));
}

#[test]
fn appends_after_generate_are_ignored() {
    let backend = Scripted::new(Ok(String::from("done")));
    let mut session = ReflectionSession::with_compiler(&backend, ReflectorConfig::default());
    session.generate().unwrap();

    session.append_word(7);
    session.append_words(&[8, 9]);
    assert_eq!(session.append_bytes(&[3, 2, 0x23, 7]), Ok(0));
    assert_eq!(session.word_count(), 0);
}

#[test]
fn append_bytes_decodes_words() {
    let backend = Scripted::new(Ok(String::new()));
    let mut session = ReflectionSession::with_compiler(&backend, ReflectorConfig::default());

    let words: [u32; 3] = [0x07230203, 0x0001_0000, 42];
    let appended = session
        .append_bytes(bytemuck::cast_slice(&words[..]))
        .unwrap();
    assert_eq!(appended, 3);

    session.generate().unwrap();
    assert_eq!(backend.received.borrow().as_deref(), Some(&words[..]));
    //an empty result is still a result
    assert_eq!(session.result_len(), Ok(0));
}
