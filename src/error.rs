//! Crate-wide error type.
//!
//! Follows the shape of `foundry_compilers::compilers::solc::error::SolcError`:
//! a flat enum of `#[error(transparent)]` wrappers around the underlying I/O
//! and deserialization errors, plus driver-specific variants with a
//! formatted message.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("could not read `{0}`")]
    CouldNotRead(String),

    #[error("could not find `{0}` in source path")]
    NotInSourcePath(String),

    #[error("no input files")]
    NoInputFiles,

    #[error("circular dependency involving module `{0}`")]
    CircularDependency(String),

    #[error("host compiler exited with a non-zero status:\n{0}\njava compiler errors typically indicate incorrect native declarations")]
    HostCompilerFailed(String),

    #[error("{0}")]
    Message(String),
}

impl DriverError {
    pub(crate) fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        DriverError::Message(format!("{}: {}", path.display(), err))
    }

    pub(crate) fn msg(msg: impl std::fmt::Display) -> Self {
        DriverError::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;
