// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod log;
pub mod sources;
pub mod table;
pub mod tasks;

pub mod file;
pub mod progress;
pub mod runner;
pub mod store;

pub use runner::Pipeline;
