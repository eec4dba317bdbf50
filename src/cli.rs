use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct CliOptions {
    /// Input file to count words in
    pub input: PathBuf,

    /// Number of worker threads
    #[arg(long, default_value_t = num_cpus::get())]
    pub workers: usize,

    /// Per-worker read buffer size, in KiB
    #[arg(long, default_value_t = 64)]
    pub buffer_kib: usize,
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}
