//! CLI entry point for the `lc4-trace` driver binary.

use std::env;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use lc4_core::MachineState;
use lc4_loader::{load_object_file, write_memory_dump};
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: lc4-trace <dump_file> <first.obj> [second.obj ...]

Loads every object file into one freshly reset machine, then writes each
non-zero memory cell to <dump_file>.

Options:
  -h, --help  Show this help message
";

#[derive(Debug, PartialEq, Eq)]
struct DriverArgs {
    dump_path: PathBuf,
    object_paths: Vec<PathBuf>,
}

#[derive(Debug)]
enum ParseResult {
    Run(DriverArgs),
    Help,
}

fn parse_args(args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }
        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }
        paths.push(PathBuf::from(arg));
    }

    if paths.len() < 2 {
        return Err("expected a dump file and at least one object file".to_string());
    }

    let dump_path = paths.remove(0);
    Ok(ParseResult::Run(DriverArgs {
        dump_path,
        object_paths: paths,
    }))
}

fn run(args: &DriverArgs) -> Result<(), i32> {
    // Every input is checked before any of them is loaded.
    for path in &args.object_paths {
        if !path.is_file() {
            eprintln!("error: file {} not found", path.display());
            return Err(1);
        }
    }

    let mut machine = MachineState::new();
    for path in &args.object_paths {
        if let Err(e) = load_object_file(path, &mut machine) {
            eprintln!("error: failed to load {}: {e}", path.display());
            return Err(1);
        }
    }

    let file = match File::create(&args.dump_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("error: failed to open {}: {e}", args.dump_path.display());
            return Err(1);
        }
    };
    let mut out = BufWriter::new(file);
    if let Err(e) = write_memory_dump(&machine, &mut out).and_then(|()| out.flush()) {
        eprintln!("error: failed to write {}: {e}", args.dump_path.display());
        return Err(1);
    }

    Ok(())
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::{parse_args, DriverArgs, ParseResult};
    use std::ffi::OsString;
    use std::path::PathBuf;

    #[test]
    fn parses_dump_path_and_object_list() {
        let result = parse_args(
            [
                OsString::from("dump.txt"),
                OsString::from("a.obj"),
                OsString::from("b.obj"),
            ]
            .into_iter(),
        )
        .expect("valid args should parse");

        let ParseResult::Run(args) = result else {
            panic!("expected a run command");
        };
        assert_eq!(
            args,
            DriverArgs {
                dump_path: PathBuf::from("dump.txt"),
                object_paths: vec![PathBuf::from("a.obj"), PathBuf::from("b.obj")],
            }
        );
    }

    #[test]
    fn parses_help_flag() {
        let result =
            parse_args([OsString::from("--help")].into_iter()).expect("help should parse");
        assert!(matches!(result, ParseResult::Help));
    }

    #[test]
    fn rejects_missing_object_files() {
        let error = parse_args([OsString::from("dump.txt")].into_iter())
            .expect_err("one path is not enough");
        assert!(error.contains("object file"));
    }

    #[test]
    fn rejects_unknown_options() {
        let error = parse_args([OsString::from("--verbose")].into_iter())
            .expect_err("unknown option should fail");
        assert!(error.contains("unknown option"));
    }
}
