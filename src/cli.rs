// src/cli.rs
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail};
use tracing::error;

use crate::config::consts::{DEFAULT_OUTPUT_DIR, OUTPUT_DIR_ENV, WORKERS};
use crate::config::{CombineDependencies, CombineOptions, CommitMode, NameListOptions, PipelineOptions, RdrOptions};
use crate::core::UreqClient;
use crate::progress::Progress;
use crate::runner::Pipeline;
use crate::tasks::graph::error_chain;
use crate::tasks::{TaskId, TaskStatus};

#[derive(Parser, Debug)]
#[command(name = "derby_names", version)]
#[command(about = "Collect roller derby names and numbers from public rosters", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also append log lines to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run tasks and everything they depend on
    Run(RunArgs),
    /// Print the task graph
    Tasks(PipelineArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// scrape-wftda, scrape-drc, scrape-rdr, scrape-rdn, scrape-twoevils,
    /// combine, name-list, number-list, name-number-list, or all
    #[arg(required = true, value_name = "TASK")]
    pub tasks: Vec<String>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args, Debug)]
pub struct PipelineArgs {
    #[arg(short, long, env = OUTPUT_DIR_ENV, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Initial letters to walk on Roller Derby Roster (default A-Z then 0-9)
    #[arg(long)]
    pub letters: Option<String>,

    /// Combine input artifact, in priority order (repeatable)
    #[arg(long = "input", value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Combine keeps its table in memory instead of writing derby_names.csv
    #[arg(long)]
    pub stage_only: bool,

    /// Combine runs the scrape for any missing input
    #[arg(long)]
    pub with_fetches: bool,

    /// Fold names to ASCII (writes derby_names_ascii.txt)
    #[arg(long)]
    pub ascii_only: bool,

    #[arg(long, default_value_t = WORKERS)]
    pub workers: usize,
}

impl PipelineArgs {
    pub fn to_options(&self) -> Result<PipelineOptions> {
        let mut opts = PipelineOptions::new(&self.output_dir)?.with_workers(self.workers)?;

        if let Some(letters) = &self.letters {
            opts.rdr = RdrOptions::new(letters)?;
        }

        let commit = if self.stage_only { CommitMode::Stage } else { CommitMode::Promote };
        let dependencies = if self.with_fetches {
            CombineDependencies::RunFetches
        } else {
            CombineDependencies::AssumeArtifactsExist
        };
        opts.combine = if self.inputs.is_empty() {
            let mut combine = CombineOptions::default();
            combine.commit = commit;
            combine.dependencies = dependencies;
            combine
        } else {
            CombineOptions::new(self.inputs.iter().map(String::as_str), commit, dependencies)?
        };

        opts.name_list = NameListOptions { ascii_only: self.ascii_only };
        Ok(opts)
    }
}

/// Task names to ids; `all` selects every task.
pub fn resolve_targets(names: &[String]) -> Result<Vec<TaskId>> {
    let mut out: Vec<TaskId> = Vec::new();
    for name in names {
        let ids = match name.as_str() {
            "all" => TaskId::SELECTABLE.to_vec(),
            other => match TaskId::from_cli_name(other) {
                Some(id) => vec![id],
                None => bail!("unknown task {other:?} (see `derby_names tasks`)"),
            },
        };
        for id in ids {
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }
    Ok(out)
}

/// Prints each settled task to stderr.
struct CliProgress {
    total: usize,
    done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn task_finished(&mut self, id: TaskId, status: &TaskStatus) {
        self.done += 1;
        let what = match status {
            TaskStatus::Completed { output: Some(p) } => format!("done -> {}", p.display()),
            TaskStatus::Completed { output: None } => s!("done (in memory)"),
            TaskStatus::Skipped { output } => format!("up to date ({})", output.display()),
            TaskStatus::Failed(e) => format!("FAILED: {}", error_chain(e)),
            TaskStatus::Blocked { failed } => format!("not run ({failed} failed)"),
        };
        self.log(&format!("[{}/{}] {id}: {what}", self.done, self.total));
    }
}

/// Parse args and run. `Ok(false)` means some task failed or was blocked.
pub fn run() -> Result<bool> {
    color_eyre::install()?;
    let cli = Cli::parse();
    crate::log::init(cli.verbose, cli.log_file.as_deref()).wrap_err("could not open log file")?;

    match cli.command {
        Command::Tasks(args) => {
            let pipeline = Pipeline::with_site_fetchers(args.to_options()?, Arc::new(UreqClient::default()));
            let graph = pipeline.graph()?;
            for node in graph.nodes() {
                let deps: Vec<String> = node.deps().iter().map(ToString::to_string).collect();
                let output = node.output().map(|p| p.display().to_string()).unwrap_or_else(|| s!("-"));
                println!("{:<22} {:<40} {}", node.id().to_string(), output, deps.join(", "));
            }
            Ok(true)
        }
        Command::Run(args) => {
            let targets = resolve_targets(&args.tasks)?;
            let pipeline = Pipeline::with_site_fetchers(args.pipeline.to_options()?, Arc::new(UreqClient::default()));
            let report = pipeline.run(&targets, &mut CliProgress { total: 0, done: 0 })?;

            for (id, e) in report.failures() {
                error!("stage {id} failed: {}", error_chain(e));
            }
            Ok(report.is_success())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_expands_without_repeats() {
        let t = resolve_targets(&[s!("combine"), s!("all")]).unwrap();
        assert_eq!(t.len(), TaskId::SELECTABLE.len());
        assert_eq!(t[0], TaskId::Combine);
        assert!(resolve_targets(&[s!("combine-staged")]).is_err());
    }

    #[test]
    fn flags_map_onto_options() {
        let cli = Cli::parse_from([
            "derby_names", "run", "combine", "-o", "out", "--letters", "ab",
            "--input", "x.csv", "--input", "y.csv", "--stage-only", "--ascii-only",
        ]);
        let Command::Run(args) = cli.command else { panic!("expected run") };
        let opts = args.pipeline.to_options().unwrap();
        assert_eq!(opts.output_dir(), std::path::Path::new("out"));
        assert_eq!(opts.rdr.letters(), ['A', 'B']);
        assert_eq!(opts.combine.inputs(), ["x.csv", "y.csv"]);
        assert_eq!(opts.combine.commit, CommitMode::Stage);
        assert!(opts.name_list.ascii_only);
    }
}
