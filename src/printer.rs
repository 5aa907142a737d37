//! Printer manager.
//!
//! Standard output is used as the sentinel "no file sink" printer; modeled
//! here as an explicit `PrinterSink` variant rather than a shared global,
//! the way `foundry_compilers::compile::project` threads an explicit
//! output writer instead of relying on ambient state.

use crate::error::{DriverError, Result};
use crate::module_id::ModuleId;
use crate::options::Options;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

pub const VERSION_BANNER: &str = "// generated by flowc";

#[derive(Debug)]
pub enum PrinterSink {
    Stdout(io::Stdout),
    File { path: PathBuf, handle: File },
}

impl PrinterSink {
    pub fn stdout() -> Self {
        PrinterSink::Stdout(io::stdout())
    }

    pub fn target_path(&self) -> Option<&PathBuf> {
        match self {
            PrinterSink::Stdout(_) => None,
            PrinterSink::File { path, .. } => Some(path),
        }
    }
}

impl Write for PrinterSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            PrinterSink::Stdout(s) => s.write(buf),
            PrinterSink::File { handle, .. } => handle.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            PrinterSink::Stdout(s) => s.flush(),
            PrinterSink::File { handle, .. } => handle.flush(),
        }
    }
}

/// Computes the target path for a module's emitted host source:
/// `<output-dir>/<module-name-with-dots-as-slashes><suffix>`.
///
/// A total function of `(output_dir, module)`: equal inputs always
/// produce equal paths.
pub fn target_path(output_dir: &std::path::Path, module: &ModuleId, host_extension: &str) -> PathBuf {
    output_dir.join(module.to_relative_path(host_extension))
}

/// `open-printer`: directs emission to stdout if `options.source == "-"`,
/// otherwise opens (creating parent directories) the file computed by
/// [`target_path`]. Writes the version banner either way.
pub fn open_printer(options: &Options, module: &ModuleId) -> Result<PrinterSink> {
    if options.source == "-" {
        let mut sink = PrinterSink::stdout();
        writeln!(sink, "{VERSION_BANNER}")?;
        return Ok(sink);
    }

    let path = target_path(&options.output_dir, module, crate::options::HOST_EXTENSION);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DriverError::io(e, parent))?;
    }
    let handle = File::create(&path).map_err(|e| DriverError::io(e, &path))?;
    let mut sink = PrinterSink::File { path, handle };
    writeln!(sink, "{VERSION_BANNER}")?;
    Ok(sink)
}

/// `close-printer`: flushes and closes the current sink, returning stdout as
/// the replacement. Reached on success *and* on the error path (the caller,
/// the pass runner, force-closes on the first error), so a partially
/// emitted file may remain on disk; no atomic rename is promised.
pub fn close_printer(sink: &mut PrinterSink) -> Result<PrinterSink> {
    sink.flush()?;
    Ok(PrinterSink::stdout())
}
