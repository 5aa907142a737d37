//! Dependency graph: modules are nodes, edges are import relationships,
//! with helpers to query a node's direct imports and to detect cycles.
//!
//! `foundry_compilers` declares its own `resolver` module and imports
//! `resolver::{Graph, GraphEdges}` from `cache.rs` and
//! `compile/project.rs` to reason about source-unit dependencies before
//! dispatching a build; this module plays the same role here.
//!
//! Cycle handling is resolved as "detect and report" rather than
//! deadlocking a make-mode worker; see DESIGN.md.

use crate::module_id::ModuleId;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct GraphEdges {
    imports: HashMap<ModuleId, Vec<ModuleId>>,
}

impl GraphEdges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, from: ModuleId, to: ModuleId) {
        self.imports.entry(from).or_default().push(to);
    }

    pub fn set_imports(&mut self, module: ModuleId, imports: Vec<ModuleId>) {
        self.imports.insert(module, imports);
    }

    pub fn imports(&self, module: &ModuleId) -> &[ModuleId] {
        self.imports.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleId> {
        self.imports.keys()
    }

    /// Returns the first cycle found by depth-first search, if any, as the
    /// sequence of modules forming it.
    pub fn find_cycle(&self) -> Option<Vec<ModuleId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        let mut marks: HashMap<&ModuleId, Mark> = HashMap::new();
        let mut stack: Vec<ModuleId> = Vec::new();

        fn visit<'a>(
            node: &'a ModuleId,
            edges: &'a GraphEdges,
            marks: &mut HashMap<&'a ModuleId, Mark>,
            stack: &mut Vec<ModuleId>,
        ) -> Option<Vec<ModuleId>> {
            match marks.get(node) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|m| m == node).unwrap_or(0);
                    let mut cycle = stack[start..].to_vec();
                    cycle.push(node.clone());
                    return Some(cycle);
                }
                None => {}
            }
            marks.insert(node, Mark::Visiting);
            stack.push(node.clone());
            for dep in edges.imports(node) {
                if let Some(cycle) = visit(dep, edges, marks, stack) {
                    return Some(cycle);
                }
            }
            stack.pop();
            marks.insert(node, Mark::Done);
            None
        }

        let nodes: Vec<ModuleId> = self.imports.keys().cloned().collect();
        for node in &nodes {
            if !marks.contains_key(node) {
                if let Some(cycle) = visit(node, self, &mut marks, &mut stack) {
                    return Some(cycle);
                }
            }
        }
        None
    }
}
