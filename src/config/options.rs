// src/config/options.rs
use std::path::{Path, PathBuf};

use super::consts::*;
use crate::error::ConfigError;

/// Everything one pipeline invocation needs to know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    output_dir: PathBuf,
    workers: usize,
    pub rdr: RdrOptions,
    pub combine: CombineOptions,
    pub name_list: NameListOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            workers: WORKERS,
            rdr: RdrOptions::default(),
            combine: CombineOptions::default(),
            name_list: NameListOptions::default(),
        }
    }
}

impl PipelineOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let output_dir = output_dir.into();
        if output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }
        Ok(Self { output_dir, ..Self::default() })
    }

    pub fn output_dir(&self) -> &Path { &self.output_dir }
    pub fn workers(&self) -> usize { self.workers }

    pub fn with_workers(mut self, workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        self.workers = workers;
        Ok(self)
    }

    /// Final location of a logical artifact.
    pub fn artifact_path(&self, logical_name: &str) -> PathBuf {
        self.output_dir.join(logical_name)
    }
}

/// Which initial letters the Roller Derby Roster fetch walks through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RdrOptions {
    letters: Vec<char>,
}

impl Default for RdrOptions {
    fn default() -> Self {
        Self { letters: DEFAULT_RDR_LETTERS.chars().collect() }
    }
}

impl RdrOptions {
    /// Upper-cases the set and drops repeats, keeping first occurrence.
    pub fn new(charset: &str) -> Result<Self, ConfigError> {
        let mut letters: Vec<char> = Vec::new();
        for ch in charset.chars().filter(|c| !c.is_whitespace()) {
            if !ch.is_ascii_alphanumeric() {
                return Err(ConfigError::InvalidLetter(ch));
            }
            let ch = ch.to_ascii_uppercase();
            if !letters.contains(&ch) {
                letters.push(ch);
            }
        }
        if letters.is_empty() {
            return Err(ConfigError::EmptyLetters);
        }
        Ok(Self { letters })
    }

    pub fn letters(&self) -> &[char] { &self.letters }
}

/// What Combine does with its result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommitMode {
    /// Promote to `derby_names.csv`.
    #[default]
    Promote,
    /// Keep the table in memory for dependents; nothing is written.
    Stage,
}

/// Whether Combine declares edges to the fetch tasks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CombineDependencies {
    /// No edges. The operator guarantees the input artifacts already exist
    /// (e.g. from earlier `scrape-*` runs); a missing one fails Combine.
    #[default]
    AssumeArtifactsExist,
    /// One edge per input that belongs to a known source, so a Combine run
    /// triggers any fetch whose artifact is missing.
    RunFetches,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombineOptions {
    inputs: Vec<String>,
    pub commit: CommitMode,
    pub dependencies: CombineDependencies,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            inputs: [WFTDA_CSV, DRC_CSV, RDR_CSV, RDN_CSV, TWOEVILS_CSV].map(String::from).to_vec(),
            commit: CommitMode::Promote,
            dependencies: CombineDependencies::AssumeArtifactsExist,
        }
    }
}

impl CombineOptions {
    pub fn new<I, S>(
        inputs: I,
        commit: CommitMode,
        dependencies: CombineDependencies,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for input in inputs {
            let input: String = input.into();
            let input = s!(input.trim());
            let plain = !input.is_empty()
                && !input.contains(['/', '\\'])
                && input != "."
                && input != "..";
            if !plain {
                return Err(ConfigError::InvalidInput(input));
            }
            if list.contains(&input) {
                return Err(ConfigError::DuplicateInput(input));
            }
            list.push(input);
        }
        if list.is_empty() {
            return Err(ConfigError::NoInputs);
        }
        Ok(Self { inputs: list, commit, dependencies })
    }

    pub fn inputs(&self) -> &[String] { &self.inputs }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NameListOptions {
    pub ascii_only: bool,
}

impl NameListOptions {
    pub fn output_name(&self) -> &'static str {
        if self.ascii_only { NAMES_ASCII_TXT } else { NAMES_TXT }
    }
}
