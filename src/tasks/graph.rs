// src/tasks/graph.rs
//! Explicit task DAG and its executor.
//!
//! A node is an id, the ids it depends on, an optional final artifact path
//! and a run function. The executor:
//! - runs only what the requested targets need, in dependency order;
//! - skips a node whose final artifact already exists, without looking at
//!   its dependencies;
//! - runs ready nodes in parallel on a bounded pool of scoped threads;
//! - never runs a node below a failure, and keeps running everything else.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use tracing::{error, info};

use super::TaskId;
use crate::error::{GraphError, TaskError};
use crate::progress::Progress;
use crate::table::Table;

/// What a finished node hands to its dependents.
#[derive(Debug)]
pub enum Artifact {
    /// A promoted file.
    Committed(PathBuf),
    /// An in-memory result that was never written.
    Staged(Table),
}

type RunFn = Box<dyn Fn(&Inputs<'_>) -> Result<Artifact, TaskError> + Send + Sync>;

pub struct TaskNode {
    id: TaskId,
    deps: Vec<TaskId>,
    output: Option<PathBuf>,
    run: RunFn,
}

impl TaskNode {
    /// `output` is the final artifact whose existence marks the node complete.
    /// Nodes without one always run.
    pub fn new<F>(id: TaskId, deps: Vec<TaskId>, output: Option<PathBuf>, run: F) -> Self
    where
        F: Fn(&Inputs<'_>) -> Result<Artifact, TaskError> + Send + Sync + 'static,
    {
        Self { id, deps, output, run: Box::new(run) }
    }

    pub fn id(&self) -> TaskId { self.id }
    pub fn deps(&self) -> &[TaskId] { &self.deps }
    pub fn output(&self) -> Option<&Path> { self.output.as_deref() }

    /// The final artifact, when it is already on disk.
    fn existing_output(&self) -> Option<&PathBuf> {
        self.output.as_ref().filter(|p| p.exists())
    }
}

/// Artifacts of a node's direct dependencies.
pub struct Inputs<'a> {
    deps: &'a [TaskId],
    artifacts: &'a HashMap<TaskId, Artifact>,
}

impl<'a> Inputs<'a> {
    pub fn get(&self, id: TaskId) -> Result<&'a Artifact, TaskError> {
        if !self.deps.contains(&id) {
            return Err(TaskError::MissingInput(id));
        }
        self.artifacts.get(&id).ok_or(TaskError::MissingInput(id))
    }
}

#[derive(Debug)]
pub enum TaskStatus {
    /// Ran and succeeded; `output` is the promoted artifact, if any.
    Completed { output: Option<PathBuf> },
    /// Final artifact already present; not run.
    Skipped { output: PathBuf },
    Failed(TaskError),
    /// Not run because `failed` (an ancestor) failed.
    Blocked { failed: TaskId },
}

impl TaskStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, TaskStatus::Completed { .. } | TaskStatus::Skipped { .. })
    }
}

/// Outcome of every node a run touched.
#[derive(Debug, Default)]
pub struct RunReport {
    order: Vec<TaskId>,
    statuses: HashMap<TaskId, TaskStatus>,
}

impl RunReport {
    fn record(&mut self, id: TaskId, status: TaskStatus) {
        self.order.push(id);
        self.statuses.insert(id, status);
    }

    pub fn status(&self, id: TaskId) -> Option<&TaskStatus> {
        self.statuses.get(&id)
    }

    /// Statuses in the order they were settled.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &TaskStatus)> + '_ {
        self.order.iter().map(|id| (*id, &self.statuses[id]))
    }

    pub fn is_success(&self) -> bool {
        self.statuses.values().all(TaskStatus::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = (TaskId, &TaskError)> + '_ {
        self.iter().filter_map(|(id, s)| match s {
            TaskStatus::Failed(e) => Some((id, e)),
            _ => None,
        })
    }

    /// The failed task behind `id`, whether `id` failed itself or was blocked.
    fn root_failure(&self, id: TaskId) -> Option<TaskId> {
        match self.statuses.get(&id)? {
            TaskStatus::Failed(_) => Some(id),
            TaskStatus::Blocked { failed } => Some(*failed),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct TaskGraph {
    nodes: BTreeMap<TaskId, TaskNode>,
}

impl TaskGraph {
    pub fn new() -> Self { Self::default() }

    /// Rejects a second node with the same id or the same final artifact.
    pub fn add(&mut self, node: TaskNode) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateTask(node.id));
        }
        if let Some(out) = &node.output {
            if let Some(other) = self.nodes.values().find(|n| n.output.as_ref() == Some(out)) {
                return Err(GraphError::DuplicateOutput {
                    first: other.id,
                    second: node.id,
                    path: out.clone(),
                });
            }
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }

    pub fn node(&self, id: TaskId) -> Option<&TaskNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TaskNode> {
        self.nodes.values()
    }

    /// `targets` plus everything they still need, dependencies first. A node
    /// whose final artifact exists is listed but its dependencies are not
    /// visited through it, so a node without an output only appears when
    /// some dependent has work to do.
    pub fn plan(&self, targets: &[TaskId]) -> Result<Vec<TaskId>, GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark { Visiting, Done }

        fn visit(
            graph: &TaskGraph,
            id: TaskId,
            marks: &mut HashMap<TaskId, Mark>,
            order: &mut Vec<TaskId>,
        ) -> Result<(), GraphError> {
            match marks.get(&id) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => return Err(GraphError::Cycle(id)),
                None => {}
            }
            marks.insert(id, Mark::Visiting);
            let node = &graph.nodes[&id];
            let deps: &[TaskId] = if node.existing_output().is_some() { &[] } else { &node.deps };
            for &dep in deps {
                if !graph.nodes.contains_key(&dep) {
                    return Err(GraphError::UnknownDependency { task: id, dependency: dep });
                }
                visit(graph, dep, marks, order)?;
            }
            marks.insert(id, Mark::Done);
            order.push(id);
            Ok(())
        }

        let mut marks = HashMap::new();
        let mut order = Vec::new();
        for &t in targets {
            if !self.nodes.contains_key(&t) {
                return Err(GraphError::UnknownTarget(t));
            }
            visit(self, t, &mut marks, &mut order)?;
        }
        Ok(order)
    }

    /// Execute `targets` and their dependencies with at most `workers`
    /// tasks in flight. Task failures end up in the report; only a malformed
    /// graph is an `Err`.
    pub fn run(
        &self,
        targets: &[TaskId],
        workers: usize,
        progress: &mut dyn Progress,
    ) -> Result<RunReport, GraphError> {
        let mut pending = self.plan(targets)?;
        let workers = workers.max(1);

        let mut report = RunReport::default();
        let mut artifacts: HashMap<TaskId, Artifact> = HashMap::new();
        progress.begin(pending.len());

        loop {
            let mut ready: Vec<TaskId> = Vec::new();
            let mut settled: HashSet<TaskId> = HashSet::new();

            // `pending` is in dependency order, so one pass settles whole
            // chains of skipped or blocked nodes.
            for &id in &pending {
                let node = &self.nodes[&id];

                if let Some(out) = node.existing_output() {
                    info!("{id}: {} exists, skipping", out.display());
                    let status = TaskStatus::Skipped { output: out.clone() };
                    progress.task_finished(id, &status);
                    report.record(id, status);
                    artifacts.insert(id, Artifact::Committed(out.clone()));
                    settled.insert(id);
                    continue;
                }
                if let Some(failed) = node.deps.iter().find_map(|d| report.root_failure(*d)) {
                    info!("{id}: not run, {failed} failed");
                    let status = TaskStatus::Blocked { failed };
                    progress.task_finished(id, &status);
                    report.record(id, status);
                    settled.insert(id);
                    continue;
                }
                if !node.deps.iter().all(|d| artifacts.contains_key(d)) {
                    continue;
                }
                ready.push(id);
                settled.insert(id);
            }
            pending.retain(|id| !settled.contains(id));

            if ready.is_empty() {
                break;
            }

            for (id, result) in self.run_batch(&ready, workers, &artifacts) {
                let status = match result {
                    Ok(artifact) => {
                        let output = match &artifact {
                            Artifact::Committed(p) => Some(p.clone()),
                            Artifact::Staged(_) => None,
                        };
                        artifacts.insert(id, artifact);
                        TaskStatus::Completed { output }
                    }
                    Err(e) => {
                        error!("{id} failed: {}", error_chain(&e));
                        TaskStatus::Failed(e)
                    }
                };
                progress.task_finished(id, &status);
                report.record(id, status);
            }
        }

        progress.finish();
        Ok(report)
    }

    /// Worker pool over one wave of ready nodes. Results come back in
    /// completion order.
    fn run_batch(
        &self,
        ready: &[TaskId],
        workers: usize,
        artifacts: &HashMap<TaskId, Artifact>,
    ) -> Vec<(TaskId, Result<Artifact, TaskError>)> {
        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            for _ in 0..workers.min(ready.len()) {
                let tx = tx.clone();
                let next = &next;
                scope.spawn(move || {
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        if i >= ready.len() {
                            break;
                        }
                        let node = &self.nodes[&ready[i]];
                        info!("{}: running", node.id);
                        let inputs = Inputs { deps: &node.deps, artifacts };
                        let _ = tx.send((node.id, (node.run)(&inputs)));
                    }
                });
            }
            drop(tx); // main thread is sole receiver now
            rx.iter().collect()
        })
    }
}

/// `outer: inner: innermost` for log lines.
pub fn error_chain(e: &dyn std::error::Error) -> String {
    let mut out = e.to_string();
    let mut cur = e.source();
    while let Some(src) = cur {
        out.push_str(": ");
        out.push_str(&src.to_string());
        cur = src.source();
    }
    out
}
