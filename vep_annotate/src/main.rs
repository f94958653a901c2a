#[macro_use]
extern crate log;

mod cli;
mod common;
mod config;
mod process;

fn main() -> Result<(), String> {
    let job = cli::process_cli()?;
    process::run(&job)
}
