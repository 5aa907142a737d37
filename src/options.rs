//! Driver configuration (`options` field of the compiler state).
//!
//! `clap::Parser` is used for the binary's argument handling, the way
//! several other CLI-facing crates handle their own argument parsing
//! (`faxt`, `aurorac`, `llts`); `foundry-compilers` itself ships no CLI
//! surface, so this surface is noted separately in DESIGN.md.

use serde::Deserialize;
use std::path::PathBuf;

/// Extension used for source files, e.g. `flow`.
pub const SOURCE_EXTENSION: &str = "flow";

/// Extension used for emitted host-language source files, e.g. `java`.
pub const HOST_EXTENSION: &str = "java";

/// Env var overriding the host compiler command.
pub const HOST_COMPILER_ENV: &str = "FLOWC_JAVAC";

/// Default host compiler binary name.
pub const DEFAULT_HOST_COMPILER: &str = "javac";

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "flowc", about = "Driver for the Flow compiler")]
pub struct Cli {
    /// Input files, directories, or module names.
    pub inputs: Vec<String>,

    /// Directories to search for modules named (not given as paths).
    #[arg(short = 'i', long = "sourcepath")]
    pub source_path: Vec<PathBuf>,

    /// Output directory for generated host sources and class files.
    #[arg(short = 'd', long = "outdir", default_value = "out")]
    pub output_dir: PathBuf,

    /// Classpath entries passed through to the host compiler.
    #[arg(long = "cp")]
    pub class_path: Vec<PathBuf>,

    /// Enable make mode: resolve dependencies and rebuild what changed.
    #[arg(long)]
    pub make: bool,

    /// Emit per-pass timing lines.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Retain diagnostics on the compiler state instead of printing them
    /// after each pass (for programmatic / IDE consumption).
    #[arg(long = "ide")]
    pub ide_mode: bool,

    /// Actually invoke the host compiler after code generation.
    #[arg(long = "runjavac")]
    pub run_host_compiler: bool,

    /// Number of parallel make-mode workers; defaults to the number of
    /// available hardware threads.
    #[arg(short = 'j', long = "jobs")]
    pub jobs: Option<usize>,

    /// Optional project file (`flowc.toml`) supplying defaults for
    /// `source_path`/`output_dir` that this CLI's flags override.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// The subset of `flowc.toml` the driver understands.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub source_path: Vec<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn load(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::error::DriverError::io(e, path))?;
        Ok(toml::from_str(&content)?)
    }
}

/// Fully resolved options threaded through the compiler state (`G.options`).
#[derive(Debug, Clone)]
pub struct Options {
    pub source_path: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub class_path: Vec<PathBuf>,
    pub make: bool,
    pub verbose: bool,
    pub ide_mode: bool,
    pub run_host_compiler: bool,
    pub jobs: usize,
    /// The file currently being compiled; `"-"` routes emission to stdout.
    pub source: String,
}

impl Options {
    pub fn from_cli(cli: &Cli) -> crate::error::Result<Self> {
        let mut source_path = cli.source_path.clone();
        let mut output_dir = cli.output_dir.clone();

        if let Some(config_path) = &cli.config {
            let config = ProjectConfig::load(config_path)?;
            if source_path.is_empty() {
                source_path = config.source_path;
            }
            if cli.output_dir == PathBuf::from("out") {
                if let Some(dir) = config.output_dir {
                    output_dir = dir;
                }
            }
        }

        Ok(Options {
            source_path,
            output_dir,
            class_path: cli.class_path.clone(),
            make: cli.make,
            verbose: cli.verbose,
            ide_mode: cli.ide_mode,
            run_host_compiler: cli.run_host_compiler,
            jobs: cli.jobs.unwrap_or_else(num_cpus::get),
            source: String::new(),
        })
    }

    pub fn for_source(&self, source: impl Into<String>) -> Options {
        let mut options = self.clone();
        options.source = source.into();
        options
    }
}
