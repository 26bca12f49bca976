use kiln::error;
use kiln::object::Value;

/// Runs a program against a fresh interpreter and returns its result value.
/// Every integration test in this crate goes through this single entry
/// point rather than the CLI, since the behavior under test is the
/// library's evaluation semantics, not process plumbing.
#[allow(dead_code)]
pub fn run(source: &str) -> Value {
    kiln::run_source(source)
}

#[allow(dead_code)]
pub fn assert_int(source: &str, expected: i64) {
    match run(source) {
        Value::Integer(n) => assert_eq!(n, expected, "for program: {source}"),
        other => panic!("expected Integer({expected}), got {other:?} for program: {source}"),
    }
}

#[allow(dead_code)]
pub fn assert_float(source: &str, expected: f64) {
    match run(source) {
        Value::Float(n) => assert!((n - expected).abs() < 1e-9, "for program: {source}"),
        other => panic!("expected Float({expected}), got {other:?} for program: {source}"),
    }
}

#[allow(dead_code)]
pub fn assert_bool(source: &str, expected: bool) {
    match run(source) {
        Value::Boolean(b) => assert_eq!(b, expected, "for program: {source}"),
        other => panic!("expected Boolean({expected}), got {other:?} for program: {source}"),
    }
}

#[allow(dead_code)]
pub fn assert_str(source: &str, expected: &str) {
    match run(source) {
        Value::Str(s) => assert_eq!(&*s, expected, "for program: {source}"),
        other => panic!("expected Str({expected:?}), got {other:?} for program: {source}"),
    }
}

#[allow(dead_code)]
pub fn assert_null(source: &str) {
    assert!(matches!(run(source), Value::Null), "for program: {source}");
}

#[allow(dead_code)]
pub fn assert_error(source: &str) {
    assert!(matches!(run(source), Value::Error(_)), "expected an Error for program: {source}");
}

/// Like [`assert_error`] but also checks the message contains `needle`,
/// for tests that pin down the exact wording the evaluator raises.
#[allow(dead_code)]
pub fn assert_error_contains(source: &str, needle: &str) {
    match run(source) {
        Value::Error(e) => assert!(
            e.message.contains(needle),
            "expected error message to contain {needle:?}, got {:?} for program: {source}", e.message
        ),
        other => panic!("expected an Error, got {other:?} for program: {source}"),
    }
}

/// `parse_source`'s sticky error flags (see [`error`]) are process-global,
/// so every caller of this helper serializes on one lock rather than racing
/// each other across parallel test threads. Ordinary evaluation (`run`,
/// `assert_int`, ...) never touches the flag and is unaffected.
static ERROR_FLAG_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Asserts `source` fails to parse (a `ParserError`, reported before
/// evaluation ever starts) rather than asserting on the evaluated `Value`.
#[allow(dead_code)]
pub fn assert_parse_error(source: &str) {
    let _guard = ERROR_FLAG_LOCK.lock().unwrap();
    error::reset_error();
    let parsed = kiln::parse_source(source);
    assert!(parsed.is_none() && error::did_error(), "expected a parse error for program: {source}");
    error::reset_error();
}
