//! Entry point: parse options, decide single-file vs. make mode, exit
//! zero iff every module finished with zero errors.

use crate::driver::compile_file;
use crate::frontend::Frontend;
use crate::input::resolve_inputs;
use crate::make::run_make;
use crate::options::{Cli, Options, SOURCE_EXTENSION};
use rayon::prelude::*;
use std::io::Write;
use std::sync::Arc;

/// Installs a `tracing` subscriber gated by `-v`/`VERBOSE`, the way
/// `foundry-compilers`' own test harness wires up `tracing-subscriber`.
pub fn install_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .without_time()
        .try_init();
}

/// Runs the driver end to end and returns the process exit code.
pub fn run(cli: Cli, frontend: Arc<dyn Frontend>, stderr: &mut dyn Write) -> i32 {
    if cli.inputs.is_empty() {
        let _ = writeln!(stderr, "usage: flowc [OPTIONS] <INPUTS>...");
        return 1;
    }

    install_tracing(cli.verbose);

    let options = match Options::from_cli(&cli) {
        Ok(options) => options,
        Err(err) => {
            let _ = writeln!(stderr, "error: {err}");
            return 1;
        }
    };

    let (items, errors) = resolve_inputs(&cli.inputs, &options.source_path, SOURCE_EXTENSION);
    if !errors.is_empty() {
        for error in &errors {
            let _ = writeln!(stderr, "error: {error}");
        }
        return 1;
    }
    if items.is_empty() {
        // e.g. every directory argument contained no matching files.
        return 0;
    }

    if options.make {
        let report = run_make(items, &options, frontend, stderr);
        return if report.num_errors == 0 { 0 } else { 1 };
    }

    // Single-file path: each file gets an independent driver instance; the
    // entry point fans these out in parallel, the way
    // `foundry_compilers::compile::project` uses `rayon` to compile
    // independent version groups concurrently.
    let paths: Vec<String> = items
        .into_iter()
        .map(|item| match item {
            crate::input::WorkItem::FilePath(p) => p.to_string_lossy().into_owned(),
            crate::input::WorkItem::ModuleName(_, p) => p.to_string_lossy().into_owned(),
        })
        .collect();

    let outcomes: Vec<(bool, Vec<u8>)> = paths
        .par_iter()
        .map(|path| {
            let mut buf = Vec::new();
            let state = compile_file(path, &options, frontend.clone(), &mut buf);
            (!state.has_errors(), buf)
        })
        .collect();

    let mut all_ok = true;
    for (ok, buf) in outcomes {
        let _ = stderr.write_all(&buf);
        all_ok &= ok;
    }

    if all_ok {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ToyFrontend;
    use clap::Parser;

    #[test]
    fn empty_inputs_prints_usage_and_fails() {
        let cli = Cli::parse_from(["flowc"]);
        let mut sink = Vec::new();
        let code = run(cli, Arc::new(ToyFrontend), &mut sink);
        assert_eq!(code, 1);
        assert!(String::from_utf8(sink).unwrap().contains("usage"));
    }

    #[test]
    fn single_file_success_exits_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("Hello.flow");
        std::fs::write(&file, "module H\nlet main = 1").unwrap();

        let cli = Cli::parse_from([
            "flowc",
            "-d",
            tmp.path().join("out").to_str().unwrap(),
            file.to_str().unwrap(),
        ]);
        let mut sink = Vec::new();
        let code = run(cli, Arc::new(ToyFrontend), &mut sink);
        assert_eq!(code, 0);
    }

    #[test]
    fn directory_with_no_matches_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from(["flowc", tmp.path().to_str().unwrap()]);
        let mut sink = Vec::new();
        let code = run(cli, Arc::new(ToyFrontend), &mut sink);
        assert_eq!(code, 0);
    }
}
