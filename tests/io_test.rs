mod common;
use common::*;
use postc::lang::ErrorCode;
use postc::mach::{compile, Runtime};

fn run_with_stdin(source: &str, stdin: &'static str) -> String {
    let program = compile(source).unwrap();
    let mut runtime = Runtime::with_io(program, stdin.as_bytes(), Vec::new());
    runtime.execute().unwrap();
    String::from_utf8(runtime.into_output()).unwrap()
}

#[test]
fn test_read_file() {
    let path = std::env::temp_dir().join("postc_io_test.txt");
    std::fs::write(&path, "from disk").unwrap();
    let source = format!("\"{}\" read_file print", path.display());
    assert_eq!(run(&source), "from disk\n");
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_read_file_feeds_string_words() {
    let path = std::env::temp_dir().join("postc_io_len_test.txt");
    std::fs::write(&path, "12345").unwrap();
    let source = format!("\"{}\" read_file string_length print", path.display());
    assert_eq!(run(&source), "5\n");
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_read_stdin() {
    assert_eq!(run_with_stdin("read_stdin print", "piped in"), "piped in\n");
}

#[test]
fn test_read_stdin_feeds_string_words() {
    assert_eq!(
        run_with_stdin("read_stdin string_length print", "12345"),
        "5\n"
    );
}

#[test]
fn test_read_missing_file() {
    assert!(run_err("\"/no/such/postc/file\" read_file") == ErrorCode::IoError);
}

#[test]
fn test_read_file_requires_string_path() {
    assert!(run_err("42 read_file") == ErrorCode::TypeMismatch);
}
