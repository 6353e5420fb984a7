#![allow(dead_code)]

use postc::lang::Error;
use postc::mach::{compile, Runtime};

pub fn try_run(source: &str) -> Result<String, Error> {
    let program = compile(source)?;
    let mut runtime = Runtime::with_output(program, Vec::new());
    runtime.execute()?;
    Ok(String::from_utf8(runtime.into_output()).unwrap())
}

pub fn run(source: &str) -> String {
    match try_run(source) {
        Ok(output) => output,
        Err(error) => panic!("{}", error),
    }
}

pub fn run_err(source: &str) -> Error {
    match try_run(source) {
        Ok(output) => panic!("expected an error, got output {:?}", output),
        Err(error) => error,
    }
}
