use anyhow::Result;
use docs2md::{cli::parse_args, run_extraction};
use log::LevelFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = parse_args()?;

    let level = match config.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let summary = run_extraction(&config).await?;
    println!("{summary}");
    Ok(())
}
