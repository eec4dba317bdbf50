use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use swiftcount::{cli, logging, partition, pipeline, source};

fn main() -> Result<()> {
    logging::init_logging();

    let cli_opts = cli::parse();
    if cli_opts.input.as_os_str().is_empty() {
        println!("usage: swiftcount <FILE>");
        std::process::exit(2);
    }

    let input = source::FileSource::open(&cli_opts.input)
        .with_context(|| format!("failed to open {}", cli_opts.input.display()))?;
    let input: Arc<dyn source::ByteSource> = Arc::new(input);

    let workers = cli_opts.workers.max(1);
    let buffer_kib = cli_opts.buffer_kib.max(1);
    let file_size = input.len();
    let ranges = partition::partition(file_size, workers);

    info!(
        "starting input={} size={} workers={} buffer_kib={}",
        cli_opts.input.display(),
        file_size,
        workers,
        buffer_kib
    );

    let total = pipeline::run(input, &ranges, buffer_kib.saturating_mul(1024))
        .with_context(|| format!("failed to count {}", cli_opts.input.display()))?;

    info!("run finished words={total}");
    println!("Word count is: {total}");

    Ok(())
}
