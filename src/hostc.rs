//! Host-compiler invoker.
//!
//! Assembles the argument vector for the external host compiler and runs it
//! synchronously, the way `foundry_compilers::compile::project` shells out
//! to `solc` via `std::process::Command` and inspects the exit status.

use crate::error::{DriverError, Result};
use crate::options::{Options, DEFAULT_HOST_COMPILER, HOST_COMPILER_ENV};
use std::path::{Path, PathBuf};
use std::process::Command;

fn host_compiler_command() -> Vec<String> {
    match std::env::var(HOST_COMPILER_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            value.split_whitespace().map(str::to_string).collect()
        }
        _ => vec![DEFAULT_HOST_COMPILER.to_string()],
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    std::env::join_paths(paths)
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Builds the argument vector:
/// `<host-compiler> -cp <classpath> -d <outdir> -sourcepath <sourcepath>
/// -encoding UTF-8 <targets...>`.
pub fn build_command(options: &Options, targets: &[PathBuf]) -> Command {
    let mut command_vec = host_compiler_command();
    let binary = command_vec.remove(0);
    let mut cmd = Command::new(binary);
    cmd.args(command_vec);
    cmd.arg("-cp").arg(join_paths(&options.class_path));
    cmd.arg("-d").arg(&options.output_dir);
    cmd.arg("-sourcepath").arg(join_paths(&options.source_path));
    cmd.arg("-encoding").arg("UTF-8");
    for target in targets {
        cmd.arg(target);
    }
    cmd
}

/// Runs the host compiler only if `options.run_host_compiler` (the
/// `RUNJAVAC` flag) is set. A non-zero exit becomes a [`DriverError`]; the
/// overall driver's exit code is still governed by the accumulated error
/// count rather than this result alone.
pub fn run_host_compiler(options: &Options, targets: &[PathBuf]) -> Result<()> {
    if !options.run_host_compiler {
        return Ok(());
    }
    let mut cmd = build_command(options, targets);
    debug!(targets = targets.len(), program = ?cmd.get_program(), "invoking host compiler");
    let output = cmd.output().map_err(DriverError::Io)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(status = ?output.status, "host compiler exited with a non-zero status");
        return Err(DriverError::HostCompilerFailed(stderr.trim().to_string()));
    }
    info!(targets = targets.len(), "host compiler finished successfully");
    Ok(())
}
