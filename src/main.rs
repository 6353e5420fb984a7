use postc::lang::{Error, ErrorCode};
use postc::mach::{compile, Program, Runtime};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

type Result<T> = std::result::Result<T, Error>;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = match args.as_slice() {
        [] | ["help"] | ["--help"] | ["-h"] => {
            usage();
            Ok(())
        }
        ["compile", source] => compile_to(source, None),
        ["compile", source, out] => compile_to(source, Some(out)),
        ["run", artifact] => run_artifact(artifact),
        [source] => run_source(source),
        _ => {
            usage();
            exit(2);
        }
    };
    if let Err(error) = result {
        eprintln!("{}", ansi_term::Colour::Red.paint(format!("?{}", error)));
        exit(1);
    }
}

fn usage() {
    println!("PostC {}", env!("CARGO_PKG_VERSION"));
    println!("usage: postc <source>              compile and run");
    println!("       postc compile <src> [out]   write a .pcc artifact");
    println!("       postc run <artifact>        run a .pcc artifact");
}

fn read(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|_| Error::new(ErrorCode::IoError).message("CANNOT READ FILE"))
}

fn run_source(path: &str) -> Result<()> {
    let program = compile(&read(path)?)?;
    Runtime::new(program).execute()
}

fn run_artifact(path: &str) -> Result<()> {
    let program = Program::from_text(&read(path)?)?;
    Runtime::new(program).execute()
}

fn compile_to(path: &str, out: Option<&str>) -> Result<()> {
    let program = compile(&read(path)?)?;
    let text = program.to_text()?;
    let out = match out {
        Some(out) => PathBuf::from(out),
        None => Path::new(path).with_extension("pcc"),
    };
    fs::write(&out, text).map_err(|_| Error::new(ErrorCode::IoError).message("CANNOT WRITE FILE"))
}
