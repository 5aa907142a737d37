//! The compiler state (`G`): a mutable record threaded through every pass.
//!
//! Modeled as an owned, mutable struct passed by exclusive borrow into each
//! pass, not a state-transformer monad. Each driver instance owns exactly
//! one `CompilerState`; parallel drivers hold disjoint instances, so no
//! cross-module leak is possible.

use crate::diagnostics::{Message, MessageSink};
use crate::frontend::{Frontend, ParsedSource, Token};
use crate::module_id::ModuleId;
use crate::options::Options;
use crate::printer::PrinterSink;
use std::sync::Arc;

/// `sub.*` fields: everything specific to the module currently being
/// compiled.
#[derive(Debug, Default)]
pub struct Sub {
    pub tokens: Vec<Token>,
    pub sourcedefs_count: usize,
    pub this_pack: Option<ModuleId>,
    pub parsed: Option<ParsedSource>,
    pub messages: MessageSink,
}

/// `gen.*` fields: code-generation state.
#[derive(Debug)]
pub struct Gen {
    pub printer: PrinterSink,
}

impl Default for Gen {
    fn default() -> Self {
        Gen { printer: PrinterSink::stdout() }
    }
}

pub struct CompilerState {
    pub options: Options,
    pub sub: Sub,
    pub gen: Gen,
    pub frontend: Arc<dyn Frontend>,
}

impl std::fmt::Debug for CompilerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilerState")
            .field("options", &self.options)
            .field("sub", &self.sub)
            .field("gen", &self.gen)
            .finish_non_exhaustive()
    }
}

impl CompilerState {
    pub fn new(options: Options, frontend: Arc<dyn Frontend>) -> Self {
        CompilerState { options, sub: Sub::default(), gen: Gen::default(), frontend }
    }

    /// Equal to the count of error-severity messages accumulated so far.
    pub fn num_errors(&self) -> usize {
        self.sub.messages.num_errors()
    }

    /// No pass may execute while this is true, except diagnostic
    /// reporting itself.
    pub fn has_errors(&self) -> bool {
        self.sub.messages.has_errors()
    }

    pub fn push_message(&mut self, message: Message) {
        self.sub.messages.push(message);
    }

    pub fn this_pack(&self) -> Option<&ModuleId> {
        self.sub.this_pack.as_ref()
    }
}
