// src/config/mod.rs
pub mod consts;
pub mod options;

pub use options::{
    CombineDependencies, CombineOptions, CommitMode, NameListOptions, PipelineOptions, RdrOptions,
};
