//! Pass runner: execute one stage, measure time, drain diagnostics,
//! decide whether subsequent stages may run.

use super::Pass;
use crate::printer::close_printer;
use crate::state::CompilerState;
use std::io::Write;
use std::time::Instant;

/// Runs a single pass over `state`.
///
/// - Skips the pass entirely (no timing recorded) if the error count is
///   already nonzero.
/// - Drains and prints messages after the body unless IDE mode is set, in
///   which case they accumulate for later programmatic retrieval.
/// - Force-closes the printer if the pass just raised the error count past
///   zero. The printer is valid for the duration of emission passes and
///   closed exactly once per module; an error mid-emission still closes
///   it, possibly leaving a truncated file.
/// - In verbose mode, with a non-empty description, emits one timing line
///   to `stderr`.
pub fn run_pass(state: &mut CompilerState, pass: &Pass, stderr: &mut dyn Write) {
    if state.has_errors() {
        return;
    }

    let had_errors_before = state.has_errors();
    trace!(pass = pass.name, source = %state.options.source, "running pass");
    let start = Instant::now();
    let (kind, count) = (pass.op)(state);
    let elapsed = start.elapsed();
    debug!(pass = pass.name, ?elapsed, count, kind, "pass finished");

    if !state.options.ide_mode {
        state.sub.messages.flush_to(stderr);
    }

    if !had_errors_before && state.has_errors() {
        warn!(pass = pass.name, source = %state.options.source, "pass raised an error, force-closing printer");
        // A pass just raised the error count; force-close the printer so a
        // partial emission is flushed rather than left dangling.
        let _ = close_printer(&mut state.gen.printer).map(|replacement| {
            state.gen.printer = replacement;
        });
    }

    if state.options.verbose && !pass.description.is_empty() {
        let elapsed_ms = elapsed.as_millis().max(0) as u64;
        let rate = (count as u64 * 1000) / (elapsed_ms + 1);
        let _ = writeln!(
            stderr,
            "{:<40}  took  {:>6.3}s, {} {} ({} {}/s)",
            pass.description,
            elapsed.as_secs_f64(),
            count,
            kind,
            rate,
            kind,
        );
    }
}

/// Runs every pass in `passes`, in order, over `state`.
pub fn run_passes(state: &mut CompilerState, passes: &[&Pass], stderr: &mut dyn Write) {
    for pass in passes {
        run_pass(state, pass, stderr);
    }
}
