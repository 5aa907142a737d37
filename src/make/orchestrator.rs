//! Make-mode orchestrator.
//!
//! Parses all roots up front, builds the dependency work-set, and schedules
//! module builds under a worker pool, the way
//! `foundry_compilers::compile::project::ProjectCompiler` resolves the
//! project's dependency graph before dispatching `solc` batches, though here
//! against one host compiler and a `std::thread` + `Mutex`/`Condvar` worker
//! pool rather than `rayon`'s data-parallel `par_iter`, since readiness
//! depends on other workers' completion rather than being embarrassingly
//! parallel.

use crate::frontend::{Frontend, LexResult, ParseResult};
use crate::hostc;
use crate::input::WorkItem;
use crate::make::todo::{Reason, TodoEntry, TodoSet};
use crate::module_id::ModuleId;
use crate::options::Options;
use crate::passes::{make_mode_passes, runner::run_passes};
use crate::resolver::GraphEdges;
use crate::state::CompilerState;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex};

pub struct MakeReport {
    pub completed: Vec<CompilerState>,
    pub skipped: Vec<ModuleId>,
    pub num_errors: usize,
}

/// Runs the full make-mode algorithm over `roots`.
pub fn run_make(
    roots: Vec<WorkItem>,
    options: &Options,
    frontend: Arc<dyn Frontend>,
    stderr: &mut dyn Write,
) -> MakeReport {
    debug!(jobs = options.jobs, "starting make-mode build");
    let mut todo = TodoSet::new();
    let mut parent_errors = 0usize;

    for item in roots {
        match item {
            WorkItem::ModuleName(module, path) => {
                todo.insert(module, TodoEntry::CheckUpdate { path, reason: Reason::Root });
            }
            WorkItem::FilePath(path) => {
                parse_into_todo(&path, &mut todo, options, &frontend, Reason::Root, stderr, &mut parent_errors);
            }
        }
    }

    // "Parses all inputs up front": resolve every CheckUpdate (located by
    // name, possibly discovered transitively via imports) into a parsed
    // CompileAfterDeps entry before any scheduling happens.
    loop {
        let pending: Vec<ModuleId> = todo
            .order()
            .iter()
            .filter(|m| matches!(todo.get(m), Some(TodoEntry::CheckUpdate { .. })))
            .cloned()
            .collect();
        if pending.is_empty() {
            break;
        }
        for module in pending {
            if let Some(TodoEntry::CheckUpdate { path, reason }) = todo.remove(&module) {
                parse_into_todo(&path, &mut todo, options, &frontend, reason, stderr, &mut parent_errors);
            }
        }
    }

    let mut edges = GraphEdges::new();
    for module in todo.order() {
        if let Some(TodoEntry::CompileAfterDeps { state, .. }) = todo.get(module) {
            if let Some(parsed) = &state.sub.parsed {
                edges.set_imports(module.clone(), frontend.dependencies(parsed));
            }
        }
    }

    if let Some(cycle) = edges.find_cycle() {
        let cycle_desc = cycle
            .iter()
            .map(ModuleId::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        warn!(cycle = %cycle_desc, "circular dependency detected, aborting before scheduling");
        let _ = writeln!(stderr, "error: circular dependency: {cycle_desc}");
        return MakeReport { completed: vec![], skipped: vec![], num_errors: 1 };
    }

    let all_modules: HashSet<ModuleId> = todo.order().iter().cloned().collect();
    debug!(modules = all_modules.len(), "dependency graph resolved, scheduling builds");
    let report = schedule_builds(todo, edges, all_modules, options, stderr);

    if options.run_host_compiler {
        let targets: Vec<PathBuf> = report
            .completed
            .iter()
            .filter(|s| !s.has_errors())
            .filter_map(|s| s.this_pack())
            .map(|m| crate::printer::target_path(&options.output_dir, m, crate::options::HOST_EXTENSION))
            .collect();
        debug!(targets = targets.len(), "batching host compiler over completed modules");
        if let Err(err) = hostc::run_host_compiler(options, &targets) {
            error!(%err, "host compiler invocation failed");
            let _ = writeln!(stderr, "{err}");
        }
    }

    let num_errors =
        parent_errors + report.completed.iter().map(|s| s.num_errors()).sum::<usize>();
    MakeReport { completed: report.completed, skipped: report.skipped, num_errors }
}

fn parse_into_todo(
    path: &std::path::Path,
    todo: &mut TodoSet,
    options: &Options,
    frontend: &Arc<dyn Frontend>,
    reason: Reason,
    stderr: &mut dyn Write,
    parent_errors: &mut usize,
) {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            let _ = writeln!(stderr, "error: could not read `{}`: {err}", path.display());
            *parent_errors += 1;
            return;
        }
    };

    let tokens = match frontend.lex(&content) {
        LexResult::Ok(tokens) => tokens,
        LexResult::Err(msg) => {
            let _ = writeln!(stderr, "{msg}");
            *parent_errors += 1;
            return;
        }
    };

    let parsed = match frontend.parse(&tokens, path) {
        ParseResult::Ok(parsed) => parsed,
        ParseResult::Err(msg) => {
            let _ = writeln!(stderr, "{msg}");
            *parent_errors += 1;
            return;
        }
    };

    let module = parsed.this_pack.clone();
    let dependencies = frontend.dependencies(&parsed);

    let mut state = CompilerState::new(options.for_source(path.to_string_lossy()), frontend.clone());
    state.sub.tokens = tokens;
    state.sub.this_pack = Some(module.clone());
    state.sub.sourcedefs_count = parsed.defs.len();
    state.sub.parsed = Some(parsed);

    todo.insert(module.clone(), TodoEntry::CompileAfterDeps { state: Box::new(state), reason });

    for dep in dependencies {
        if !matches!(todo.get(&dep), Some(TodoEntry::CompileAfterDeps { .. })) {
            let dep_path = options
                .source_path
                .iter()
                .map(|dir| dir.join(dep.to_relative_path(crate::options::SOURCE_EXTENSION)))
                .find(|p| p.is_file());
            if let Some(dep_path) = dep_path {
                todo.insert(dep, TodoEntry::CheckUpdate { path: dep_path, reason: Reason::Dependent });
            } else {
                let _ = writeln!(
                    stderr,
                    "warning: could not locate dependency `{dep}` in source path"
                );
            }
        }
    }
}

struct Scheduler {
    todo: TodoSet,
    completed: HashSet<ModuleId>,
    in_progress: HashSet<ModuleId>,
    results: Vec<CompilerState>,
    skipped: Vec<ModuleId>,
}

fn is_ready(module: &ModuleId, edges: &GraphEdges, all_modules: &HashSet<ModuleId>, completed: &HashSet<ModuleId>) -> bool {
    edges
        .imports(module)
        .iter()
        .all(|dep| completed.contains(dep) || !all_modules.contains(dep))
}

fn schedule_builds(
    todo: TodoSet,
    edges: GraphEdges,
    all_modules: HashSet<ModuleId>,
    options: &Options,
    stderr: &mut dyn Write,
) -> MakeReport {
    let jobs = options.jobs.max(1);
    let scheduler = Mutex::new(Scheduler {
        todo,
        completed: HashSet::new(),
        in_progress: HashSet::new(),
        results: Vec::new(),
        skipped: Vec::new(),
    });
    let condvar = Condvar::new();
    let stderr_lock: Mutex<&mut dyn Write> = Mutex::new(stderr);

    std::thread::scope(|scope| {
        for _ in 0..jobs {
            scope.spawn(|| worker_loop(&scheduler, &condvar, &edges, &all_modules, options, &stderr_lock));
        }
    });

    let inner = scheduler.into_inner().unwrap();
    MakeReport { completed: inner.results, skipped: inner.skipped, num_errors: 0 }
}

fn worker_loop(
    scheduler: &Mutex<Scheduler>,
    condvar: &Condvar,
    edges: &GraphEdges,
    all_modules: &HashSet<ModuleId>,
    _options: &Options,
    stderr_lock: &Mutex<&mut dyn Write>,
) {
    loop {
        let Some((module, mut state)) = claim_ready_entry(scheduler, condvar, edges, all_modules) else {
            return;
        };
        trace!(%module, "worker claimed module");

        // Buffer this module's diagnostics locally so the pass pipeline
        // (including open-printer/gen-host-code/close-printer's file I/O)
        // runs without holding any shared lock; only the final write to the
        // real stderr is serialized against the other workers.
        let passes = make_mode_passes();
        let mut buf = Vec::new();
        run_passes(&mut state, &passes, &mut buf);
        {
            let mut out = stderr_lock.lock().unwrap();
            let _ = out.write_all(&buf);
        }

        let mut guard = scheduler.lock().unwrap();
        guard.in_progress.remove(&module);
        guard.completed.insert(module.clone());
        if state.has_errors() {
            debug!(%module, "module build finished with errors, skipping");
            guard.skipped.push(module);
        } else {
            debug!(%module, "module build finished");
        }
        guard.results.push(*state);
        condvar.notify_all();
    }
}

/// Blocks until a ready `CompileAfterDeps` entry can be claimed, or returns
/// `None` when the work-set is exhausted or a cycle slipped past the
/// upfront check (nothing ready and nobody else in progress).
fn claim_ready_entry(
    scheduler: &Mutex<Scheduler>,
    condvar: &Condvar,
    edges: &GraphEdges,
    all_modules: &HashSet<ModuleId>,
) -> Option<(ModuleId, Box<CompilerState>)> {
    let mut guard = scheduler.lock().unwrap();
    loop {
        if guard.todo.is_empty() && guard.in_progress.is_empty() {
            return None;
        }

        let ready_module = guard
            .todo
            .order()
            .iter()
            .find(|m| {
                guard.todo.contains(m)
                    && !guard.in_progress.contains(*m)
                    && is_ready(m, edges, all_modules, &guard.completed)
            })
            .cloned();

        match ready_module {
            Some(module) => {
                guard.in_progress.insert(module.clone());
                match guard.todo.remove(&module) {
                    Some(TodoEntry::CompileAfterDeps { state, .. }) => {
                        return Some((module, state));
                    }
                    // Upfront resolution guarantees only CompileAfterDeps
                    // entries remain by the time scheduling starts.
                    _ => unreachable!("scheduled entry must be CompileAfterDeps"),
                }
            }
            None if guard.in_progress.is_empty() => return None,
            None => {
                trace!("no module ready, waiting on in-progress workers");
                guard = condvar.wait(guard).unwrap();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ToyFrontend;

    fn write_module(dir: &std::path::Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn base_options(source_path: Vec<PathBuf>, out: PathBuf) -> Options {
        Options {
            source_path,
            output_dir: out,
            class_path: vec![],
            make: true,
            verbose: false,
            ide_mode: false,
            run_host_compiler: false,
            jobs: 4,
            source: String::new(),
        }
    }

    #[test]
    fn builds_dependency_chain_and_emits_all_modules() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "Bot.flow", "module Bot\nlet x = 1");
        write_module(tmp.path(), "Mid.flow", "module Mid\nimport Bot\nlet y = 2");
        let top = write_module(tmp.path(), "Top.flow", "module Top\nimport Mid\nlet z = 3");

        let options = base_options(vec![tmp.path().to_path_buf()], tmp.path().join("out"));
        let mut sink = Vec::new();
        let report = run_make(
            vec![WorkItem::FilePath(top)],
            &options,
            Arc::new(ToyFrontend),
            &mut sink,
        );

        assert_eq!(report.num_errors, 0);
        assert_eq!(report.completed.len(), 3);
        for name in ["Bot", "Mid", "Top"] {
            assert!(tmp.path().join("out").join(format!("{name}.java")).exists());
        }
    }

    #[test]
    fn circular_dependency_is_reported_without_deadlocking() {
        let tmp = tempfile::tempdir().unwrap();
        write_module(tmp.path(), "A.flow", "module A\nimport B\nlet x = 1");
        let a = tmp.path().join("A.flow");
        write_module(tmp.path(), "B.flow", "module B\nimport A\nlet y = 2");

        let options = base_options(vec![tmp.path().to_path_buf()], tmp.path().join("out"));
        let mut sink = Vec::new();
        let report =
            run_make(vec![WorkItem::FilePath(a)], &options, Arc::new(ToyFrontend), &mut sink);

        assert!(report.num_errors > 0);
        let printed = String::from_utf8(sink).unwrap();
        assert!(printed.contains("circular dependency"));
    }
}
