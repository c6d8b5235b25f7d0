// src/lib.rs
pub mod cli;
pub mod config;
pub mod tasks;
pub mod utils;

pub use config::defs::{OutputType, RunConfig, TaskError};
pub use tasks::{OutputRequest, OutputValue, Outputs};
