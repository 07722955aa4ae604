pub mod cli;

use anyhow::Context;
use canteen::{Canteen, supplier::ReaderSource};
use clap::Parser;
use common::logger::init_logger;

use cli::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_logger("canteen", is_production);

    let cfg = build_config_from_cli(&args);
    let canteen = Canteen::new(cfg)?;

    let source = ReaderSource::open(&args.input)
        .await
        .with_context(|| format!("opening plate input {}", args.input.display()))?;

    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // Without a signal handler the run can only end on its own.
            std::future::pending::<()>().await;
        }
    };

    let report = canteen.run_until(source, interrupt).await?;
    tracing::info!(
        run_id = %report.run_id,
        meals_served = report.counter.meals_served,
        peak_seated = report.peak_seated,
        "run completed"
    );

    Ok(())
}
