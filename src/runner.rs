// src/runner.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::config::consts::{COMBINED_CSV, NAMES_NUMBERS_TSV, NUMBERS_TXT};
use crate::config::{CommitMode, PipelineOptions};
use crate::core::HttpClient;
use crate::error::GraphError;
use crate::progress::Progress;
use crate::sources::{self, Fetcher, Source};
use crate::tasks::{CombineTask, FetchTask, ListKind, ListTask, RunReport, TaskGraph, TaskId};

/// The fixed pipeline: five fetches, the combine stage and three derived lists.
pub struct Pipeline {
    options: PipelineOptions,
    fetchers: BTreeMap<Source, Arc<dyn Fetcher>>,
}

impl Pipeline {
    /// Fetchers are keyed by [`Fetcher::site`]; a later fetcher for the same
    /// site replaces an earlier one.
    pub fn new<I>(options: PipelineOptions, fetchers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Fetcher>>,
    {
        let fetchers = fetchers.into_iter().map(|f| (f.site(), f)).collect();
        Self { options, fetchers }
    }

    /// Pipeline against the live sites.
    pub fn with_site_fetchers(options: PipelineOptions, client: Arc<dyn HttpClient>) -> Self {
        let fetchers = sources::site_fetchers(client, &options.rdr);
        Self::new(options, fetchers)
    }

    pub fn options(&self) -> &PipelineOptions { &self.options }

    /// Build the task graph. Sources without a fetcher get no scrape node.
    pub fn graph(&self) -> Result<TaskGraph, GraphError> {
        let opts = &self.options;
        let dir = opts.output_dir();
        let mut graph = TaskGraph::new();

        for (site, fetcher) in &self.fetchers {
            let task = FetchTask::new(Arc::clone(fetcher), opts.artifact_path(site.artifact()));
            graph.add(task.into_node())?;
        }

        let deps = opts.combine.dependencies;
        graph.add(
            CombineTask::new(&opts.combine, opts.combine.commit, dir, COMBINED_CSV)
                .into_node(TaskId::Combine, deps),
        )?;
        graph.add(
            CombineTask::new(&opts.combine, CommitMode::Stage, dir, COMBINED_CSV)
                .into_node(TaskId::CombineStaged, deps),
        )?;

        let lists = [
            (ListKind::Names { ascii_only: opts.name_list.ascii_only }, opts.name_list.output_name()),
            (ListKind::Numbers, NUMBERS_TXT),
            (ListKind::NamesNumbers, NAMES_NUMBERS_TSV),
        ];
        for (kind, name) in lists {
            graph.add(ListTask::new(kind, TaskId::CombineStaged, opts.artifact_path(name)).into_node())?;
        }

        Ok(graph)
    }

    /// Run `targets` and whatever they depend on.
    pub fn run(&self, targets: &[TaskId], progress: &mut dyn Progress) -> Result<RunReport, GraphError> {
        let graph = self.graph()?;
        info!(
            "running {} in {} with {} workers",
            targets.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            self.options.output_dir().display(),
            self.options.workers(),
        );
        graph.run(targets, self.options.workers(), progress)
    }
}
