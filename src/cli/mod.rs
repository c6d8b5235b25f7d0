pub mod args;

pub use args::{Cli, ToolCommand};

use clap::Parser;

pub fn parse() -> Cli {
    Cli::parse()
}
