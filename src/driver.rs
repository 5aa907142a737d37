//! Single-file driver: runs the complete pipeline on one input file
//! with a fresh compiler state.

use crate::frontend::Frontend;
use crate::options::Options;
use crate::passes::{runner::run_passes, PASS_REGISTRY};
use crate::state::CompilerState;
use std::io::Write;
use std::sync::Arc;

/// Allocates a fresh [`CompilerState`], copies `options` into it with
/// `options.source` set to `path`, and runs every pass in the full
/// registry. Each file gets its own independent state: no cross-module
/// leak is possible via this entry point.
pub fn compile_file(
    path: &str,
    options: &Options,
    frontend: Arc<dyn Frontend>,
    stderr: &mut dyn Write,
) -> CompilerState {
    let file_options = options.for_source(path);
    let mut state = CompilerState::new(file_options, frontend);
    let passes: Vec<_> = PASS_REGISTRY.iter().collect();
    run_passes(&mut state, &passes, stderr);
    state
}

/// `true` iff the compiler state accumulated zero errors.
pub fn succeeded(state: &CompilerState) -> bool {
    !state.has_errors()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ToyFrontend;

    fn base_options(out: &std::path::Path) -> Options {
        Options {
            source_path: vec![],
            output_dir: out.to_path_buf(),
            class_path: vec![],
            make: false,
            verbose: false,
            ide_mode: false,
            run_host_compiler: false,
            jobs: 1,
            source: String::new(),
        }
    }

    #[test]
    fn single_file_no_flags_emits_host_source() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("Hello.flow");
        std::fs::write(&file, "module H\nlet main = 1").unwrap();

        let options = base_options(&tmp.path().join("out"));
        let mut sink = Vec::new();
        let state = compile_file(file.to_str().unwrap(), &options, Arc::new(ToyFrontend), &mut sink);

        assert!(succeeded(&state));
        let emitted = tmp.path().join("out").join("H.java");
        assert!(emitted.exists());
        let content = std::fs::read_to_string(emitted).unwrap();
        assert!(content.contains("class H"));
    }

    #[test]
    fn parse_error_reports_line_and_creates_no_output() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("Bad.flow");
        std::fs::write(&file, "module Bad\nlet x =\n#error third line").unwrap();

        let options = base_options(&tmp.path().join("out"));
        let mut sink = Vec::new();
        let state = compile_file(file.to_str().unwrap(), &options, Arc::new(ToyFrontend), &mut sink);

        assert!(!succeeded(&state));
        let printed = String::from_utf8(sink).unwrap();
        assert!(printed.contains("3:1"));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn verbose_mode_emits_one_line_per_pass() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("Hello.flow");
        std::fs::write(&file, "module H\nlet main = 1").unwrap();

        let mut options = base_options(&tmp.path().join("out"));
        options.verbose = true;
        let mut sink = Vec::new();
        let state = compile_file(file.to_str().unwrap(), &options, Arc::new(ToyFrontend), &mut sink);
        assert!(succeeded(&state));

        let printed = String::from_utf8(sink).unwrap();
        let timing_lines = printed.lines().filter(|l| l.contains("took")).count();
        // open-printer and close-printer have empty descriptions and emit no
        // timing line; everything else in the 23-pass registry does.
        assert_eq!(timing_lines, 21);
    }
}
