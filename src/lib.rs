#![warn(rust_2018_idioms)]
#![deny(unused_must_use)]

//! Driver and build orchestrator for the Flow compiler.
//!
//! Flow is a functional language that targets a JVM-style managed runtime
//! by emitting source files of a host object-oriented language and
//! invoking a host-language compiler on them. This crate is the conductor:
//! it discovers input modules, threads each through a fixed pipeline of
//! compilation passes, manages per-module compiler state, tracks
//! inter-module dependencies, reports diagnostics with timing, and finally
//! invokes the host-language compiler.
//!
//! The lexer, parser, individual semantic passes, metadata emission, and
//! host-code generation are external collaborators, referenced only
//! through the [`frontend::Frontend`] trait contract.

#[macro_use]
extern crate tracing;

pub mod cli;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod frontend;
pub mod hostc;
pub mod input;
pub mod make;
pub mod module_id;
pub mod options;
pub mod passes;
pub mod printer;
pub mod resolver;
pub mod state;

pub use error::{DriverError, Result};
pub use module_id::ModuleId;
pub use options::{Cli, Options};
pub use state::CompilerState;
