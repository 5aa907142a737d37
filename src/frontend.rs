//! External collaborator contracts.
//!
//! The lexer, parser, individual semantic passes, metadata emission, and
//! host-code generation are referenced only by the interface the driver
//! requires of them. This module defines that interface as a `Frontend`
//! trait object the driver holds (analogous to how
//! `foundry_compilers::compilers::Compiler` abstracts over `solc`/`vyper`
//! backends behind one trait the rest of the crate programs against) and
//! ships one minimal concrete implementation, [`ToyFrontend`], sufficient
//! to drive end-to-end scenarios without pretending to be a real
//! lexer/parser/typechecker.
//!
//! `ToyFrontend`'s source format: the first non-blank line must be
//! `module <Dotted.Name>`; subsequent `import <Dotted.Name>` lines declare
//! dependencies; everything else is a definition body line. A line
//! containing the literal text `#error` fails parsing at that line number.

use crate::diagnostics::{Message, Position};
use crate::module_id::ModuleId;
use std::path::Path;

pub type Token = String;

#[derive(Debug, Clone)]
pub struct SourceDef {
    pub name: String,
}

/// What the lexer + parser pair must expose: a module identity and a
/// dependency-extractable form, or a parse error.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub this_pack: ModuleId,
    pub imports: Vec<ModuleId>,
    pub defs: Vec<SourceDef>,
}

pub enum LexResult {
    Ok(Vec<Token>),
    Err(Message),
}

pub enum ParseResult {
    Ok(ParsedSource),
    Err(Message),
}

/// The contract the driver imposes on the external front end and back end.
/// Each method corresponds to a named group of pipeline stages.
pub trait Frontend: Send + Sync {
    /// The `lexer` stage.
    fn lex(&self, content: &str) -> LexResult;

    /// The `parser` stage. Must expose `sub.thisPack` and a
    /// dependency-extractable form, or report a parse error.
    fn parse(&self, tokens: &[Token], file: &Path) -> ParseResult;

    /// The `join-definitions` through `strictness-analysis` stages:
    /// collapsed into one semantic-analysis hook for this driver's purposes,
    /// since their internals are genuinely out of scope. Returns the number
    /// of definitions processed; pushes diagnostics via `push_diagnostic`.
    fn analyze(
        &self,
        parsed: &ParsedSource,
        push_diagnostic: &mut dyn FnMut(Message),
    ) -> usize;

    /// The `gen-metadata` and `gen-host-code` stages: renders the host
    /// source text for a successfully analyzed module.
    fn generate_host_code(&self, parsed: &ParsedSource) -> String;

    /// Dependency extractor contract: given a parsed state, return the set
    /// of modules the current module imports. The driver does not
    /// interpret identities beyond key equality.
    fn dependencies(&self, parsed: &ParsedSource) -> Vec<ModuleId> {
        parsed.imports.clone()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ToyFrontend;

impl Frontend for ToyFrontend {
    fn lex(&self, content: &str) -> LexResult {
        LexResult::Ok(content.lines().map(|l| l.to_string()).collect())
    }

    fn parse(&self, tokens: &[Token], _file: &Path) -> ParseResult {
        let mut this_pack = None;
        let mut imports = Vec::new();
        let mut defs = Vec::new();

        for (idx, line) in tokens.iter().enumerate() {
            let lineno = idx as u32 + 1;
            let trimmed = line.trim();
            if trimmed.contains("#error") {
                return ParseResult::Err(Message::error(
                    Position { line: lineno, column: 1 },
                    format!("syntax error: {trimmed}"),
                ));
            }
            if let Some(rest) = trimmed.strip_prefix("module ") {
                this_pack = Some(ModuleId::canonicalize(rest));
            } else if let Some(rest) = trimmed.strip_prefix("import ") {
                imports.push(ModuleId::canonicalize(rest));
            } else if !trimmed.is_empty() {
                defs.push(SourceDef { name: trimmed.to_string() });
            }
        }

        match this_pack {
            Some(this_pack) => ParseResult::Ok(ParsedSource { this_pack, imports, defs }),
            None => ParseResult::Err(Message::error(
                Position { line: 1, column: 1 },
                "missing `module` declaration",
            )),
        }
    }

    fn analyze(&self, parsed: &ParsedSource, _push_diagnostic: &mut dyn FnMut(Message)) -> usize {
        parsed.defs.len()
    }

    fn generate_host_code(&self, parsed: &ParsedSource) -> String {
        let class_name = parsed.this_pack.as_str().replace('.', "_");
        let mut out = format!("public final class {class_name} {{\n");
        for def in &parsed.defs {
            out.push_str(&format!("    // {}\n", def.name));
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_module_and_imports() {
        let frontend = ToyFrontend;
        let tokens = match frontend.lex("module A.B\nimport C.D\nlet x = 1") {
            LexResult::Ok(t) => t,
            LexResult::Err(_) => panic!("unexpected lex error"),
        };
        let parsed = match frontend.parse(&tokens, Path::new("A/B.flow")) {
            ParseResult::Ok(p) => p,
            ParseResult::Err(_) => panic!("unexpected parse error"),
        };
        assert_eq!(parsed.this_pack, ModuleId::canonicalize("A.B"));
        assert_eq!(parsed.imports, vec![ModuleId::canonicalize("C.D")]);
        assert_eq!(parsed.defs.len(), 1);
    }

    #[test]
    fn reports_syntax_error_with_line_number() {
        let frontend = ToyFrontend;
        let tokens = match frontend.lex("module Bad\nlet x =\n#error here") {
            LexResult::Ok(t) => t,
            LexResult::Err(_) => panic!("unexpected lex error"),
        };
        match frontend.parse(&tokens, Path::new("Bad.flow")) {
            ParseResult::Err(msg) => assert_eq!(msg.position.line, 3),
            ParseResult::Ok(_) => panic!("expected a parse error"),
        }
    }
}
