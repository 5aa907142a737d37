//! Pass registry: the fixed, ordered list of named pipeline stages.
//!
//! Modeled as a sequence of `(function pointer, description)` pairs, not as
//! code inlined at call sites, mirroring
//! `foundry_compilers::compile::project::CompilerSources`, whose `Parallel`
//! / `Sequential` variants are themselves data describing how to run a
//! batch rather than hand-inlined control flow. This is what makes
//! make-mode's "skip the first two and the last" filter expressible as a
//! data transformation instead of a second copy of the pipeline.

pub mod runner;

use crate::diagnostics::{Message, Position};
use crate::hostc;
use crate::module_id::ModuleId;
use crate::printer::{close_printer, open_printer};
use crate::state::CompilerState;
use once_cell::sync::Lazy;
use std::io::Write;

/// The unit a pass reports progress in, plus how many of them it processed.
/// Used purely for the timing report.
pub type ItemReport = (&'static str, usize);

pub struct Pass {
    pub name: &'static str,
    pub description: &'static str,
    pub op: fn(&mut CompilerState) -> ItemReport,
}

fn pass_lexer(state: &mut CompilerState) -> ItemReport {
    let path = state.options.source.clone();
    let content = if path == "-" {
        let mut buf = String::new();
        use std::io::Read;
        let _ = std::io::stdin().read_to_string(&mut buf);
        buf
    } else {
        match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(err) => {
                state.push_message(Message::error(
                    Position::NULL,
                    format!("could not read `{path}`: {err}"),
                ));
                return ("lines", 0);
            }
        }
    };

    match state.frontend.lex(&content) {
        crate::frontend::LexResult::Ok(tokens) => {
            let count = tokens.len();
            state.sub.tokens = tokens;
            ("lines", count)
        }
        crate::frontend::LexResult::Err(msg) => {
            let count = 0;
            state.push_message(msg);
            ("lines", count)
        }
    }
}

fn pass_parser(state: &mut CompilerState) -> ItemReport {
    let path = std::path::PathBuf::from(&state.options.source);
    match state.frontend.parse(&state.sub.tokens, &path) {
        crate::frontend::ParseResult::Ok(parsed) => {
            state.sub.this_pack = Some(parsed.this_pack.clone());
            state.sub.sourcedefs_count = parsed.defs.len();
            let count = parsed.defs.len();
            state.sub.parsed = Some(parsed);
            ("definitions", count)
        }
        crate::frontend::ParseResult::Err(msg) => {
            state.push_message(msg);
            ("definitions", 0)
        }
    }
}

/// Stands in for the individual semantic sub-passes, which are external
/// collaborators here; each simply reports the current definition count
/// without re-deriving it, since the real work is out of scope here.
fn pass_bookkeeping(state: &mut CompilerState) -> ItemReport {
    ("definitions", state.sub.sourcedefs_count)
}

fn pass_type_check(state: &mut CompilerState) -> ItemReport {
    let Some(parsed) = state.sub.parsed.clone() else {
        return ("definitions", 0);
    };
    let mut pending = Vec::new();
    let count = {
        let mut push = |m: Message| pending.push(m);
        state.frontend.analyze(&parsed, &mut push)
    };
    for message in pending {
        state.push_message(message);
    }
    ("definitions", count)
}

fn pass_open_printer(state: &mut CompilerState) -> ItemReport {
    let module = state
        .sub
        .this_pack
        .clone()
        .unwrap_or_else(|| ModuleId::canonicalize("Main"));
    match open_printer(&state.options, &module) {
        Ok(sink) => {
            state.gen.printer = sink;
            ("files", 1)
        }
        Err(err) => {
            state.push_message(Message::error(Position::NULL, err.to_string()));
            ("files", 0)
        }
    }
}

fn pass_gen_metadata(state: &mut CompilerState) -> ItemReport {
    ("definitions", state.sub.sourcedefs_count)
}

fn pass_gen_host_code(state: &mut CompilerState) -> ItemReport {
    let Some(parsed) = state.sub.parsed.clone() else {
        return ("bytes", 0);
    };
    let code = state.frontend.generate_host_code(&parsed);
    let bytes = code.len();
    if let Err(err) = write!(state.gen.printer, "{code}") {
        state.push_message(Message::error(Position::NULL, err.to_string()));
        return ("bytes", 0);
    }
    ("bytes", bytes)
}

fn pass_close_printer(state: &mut CompilerState) -> ItemReport {
    match close_printer(&mut state.gen.printer) {
        Ok(sink) => {
            state.gen.printer = sink;
            ("files", 1)
        }
        Err(err) => {
            state.push_message(Message::error(Position::NULL, err.to_string()));
            ("files", 0)
        }
    }
}

fn pass_run_host_compiler(state: &mut CompilerState) -> ItemReport {
    if !state.options.run_host_compiler {
        return ("files", 0);
    }
    let Some(module) = state.sub.this_pack.clone() else {
        return ("files", 0);
    };
    let target = crate::printer::target_path(
        &state.options.output_dir,
        &module,
        crate::options::HOST_EXTENSION,
    );
    match hostc::run_host_compiler(&state.options, &[target]) {
        Ok(()) => ("files", 1),
        Err(err) => {
            state.push_message(Message::error(Position::NULL, err.to_string()));
            ("files", 0)
        }
    }
}

fn pass_clean_symbol_table(state: &mut CompilerState) -> ItemReport {
    let count = state.sub.tokens.len();
    state.sub.tokens.clear();
    ("tokens", count)
}

/// The canonical full list of pipeline stages.
pub static PASS_REGISTRY: Lazy<Vec<Pass>> = Lazy::new(|| {
    vec![
        Pass { name: "lexer", description: "lexical analysis", op: pass_lexer },
        Pass { name: "parser", description: "parsing", op: pass_parser },
        Pass { name: "join-definitions", description: "joining definitions", op: pass_bookkeeping },
        Pass { name: "import-packages", description: "importing packages", op: pass_bookkeeping },
        Pass {
            name: "verify-imported-instances",
            description: "verifying imported instances",
            op: pass_bookkeeping,
        },
        Pass { name: "enter-definitions", description: "entering definitions", op: pass_bookkeeping },
        Pass { name: "field-definitions", description: "field definitions", op: pass_bookkeeping },
        Pass { name: "type-aliases", description: "type aliases", op: pass_bookkeeping },
        Pass { name: "derive-instances", description: "deriving instances", op: pass_bookkeeping },
        Pass { name: "resolve-names", description: "resolving names", op: pass_bookkeeping },
        Pass { name: "verify-class-defs", description: "verifying class definitions", op: pass_bookkeeping },
        Pass { name: "verify-own-instances", description: "verifying own instances", op: pass_bookkeeping },
        Pass { name: "simplify-lets", description: "simplifying lets", op: pass_bookkeeping },
        Pass { name: "type-check", description: "type checking", op: pass_type_check },
        Pass { name: "simplify-expressions", description: "simplifying expressions", op: pass_bookkeeping },
        Pass { name: "globalize-lambdas", description: "globalizing lambdas", op: pass_bookkeeping },
        Pass { name: "strictness-analysis", description: "strictness analysis", op: pass_bookkeeping },
        Pass { name: "open-printer", description: "", op: pass_open_printer },
        Pass { name: "gen-metadata", description: "generating metadata", op: pass_gen_metadata },
        Pass { name: "gen-host-code", description: "generating host code", op: pass_gen_host_code },
        Pass { name: "close-printer", description: "", op: pass_close_printer },
        Pass { name: "run-host-compiler", description: "running host compiler", op: pass_run_host_compiler },
        Pass { name: "clean-symbol-table", description: "cleaning symbol table", op: pass_clean_symbol_table },
    ]
});

/// The make-mode pass list: the full registry with `lexer`, `parser`, and
/// `run-host-compiler` removed. Parsing happens up-front in the make
/// orchestrator, and the host compiler is batched at the end of the whole
/// build rather than run per module.
pub fn make_mode_passes() -> Vec<&'static Pass> {
    PASS_REGISTRY
        .iter()
        .filter(|pass| !matches!(pass.name, "lexer" | "parser" | "run-host-compiler"))
        .collect()
}
